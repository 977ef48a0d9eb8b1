use async_trait::async_trait;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use crate::domains::wallet::models::Wallet;
use crate::shared::errors::RepositoryError;

// =====================================================
// WalletRepository Trait (저장소 인터페이스)
// =====================================================
// 서비스 계층은 이 trait만 참조합니다.
// - PgWalletRepository: PostgreSQL (운영)
// - InMemoryWalletRepository: 메모리 (테스트)
//
// 모든 변경 연산은 하나의 트랜잭션 안에서
// begin → row lock → 검증 → write → commit 순서로 처리되어야 합니다.
//
// 데드라인은 commit 전까지만 적용됩니다.
// commit 을 보낸 뒤에는 결과(성공/실패)를 그대로 돌려줘야 하며,
// commit 이 데드라인과 경쟁해서 "Timeout 인데 반영됨" 이 되면 안 됩니다.
// =====================================================

/// 연산 데드라인
/// Point in time after which a repository call must give up and roll back
///
/// `Deadline::NONE` 은 제한 없음.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub const NONE: Deadline = Deadline(None);

    /// 지금부터 `timeout` 뒤
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now().checked_add(timeout))
    }

    /// 남은 시간 (제한 없음 → None, 이미 지남 → Some(ZERO))
    pub fn remaining(&self) -> Option<Duration> {
        self.0
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// 데드라인까지 기다림. 초과하면 future 를 drop 하고 `Timeout`
    pub async fn wait<F: Future>(self, future: F) -> Result<F::Output, RepositoryError> {
        match self.0 {
            Some(at) => tokio::time::timeout_at(at, future)
                .await
                .map_err(|_| RepositoryError::Timeout),
            None => Ok(future.await),
        }
    }

    /// `wait` + 결과 평탄화
    pub async fn run<T, F>(self, future: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, RepositoryError>>,
    {
        self.wait(future).await?
    }
}

/// 지갑 저장소 인터페이스
/// Wallet storage capability
///
/// 같은 지갑에 대한 deposit / withdraw 는 row 단위 배타 잠금으로 직렬화되어야 하며,
/// 잠금은 트랜잭션 시작 후 획득해서 commit/rollback 까지 유지합니다.
///
/// `Timeout` 은 아무것도 반영되지 않았음을 뜻합니다.
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// 잔고 0 인 지갑 생성
    ///
    /// # Errors
    /// * `DuplicateWallet` - 해당 user_id 의 지갑이 이미 존재
    async fn create(&self, user_id: u64, deadline: Deadline) -> Result<Wallet, RepositoryError>;

    /// user_id + wallet_id 가 모두 일치하는 지갑 조회 (locking read)
    ///
    /// # Errors
    /// * `NotFound` - 일치하는 row 없음
    async fn get(
        &self,
        user_id: u64,
        wallet_id: u64,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError>;

    /// 입금: balance += amount
    ///
    /// # Errors
    /// * `NotFound` - 일치하는 row 없음
    async fn deposit(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError>;

    /// 출금: balance -= amount (balance >= amount 인 경우만)
    ///
    /// # Errors
    /// * `NotFound` - 일치하는 row 없음
    /// * `InsufficientFunds` - 잔고 부족, 트랜잭션 롤백
    async fn withdraw(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError>;
}

/// 음수 금액은 저장소에서도 거부
/// The repository never persists a negative delta
pub(crate) fn ensure_non_negative(amount: Decimal) -> Result<(), RepositoryError> {
    if amount < Decimal::ZERO {
        return Err(RepositoryError::Storage(anyhow::anyhow!(
            "refusing to apply negative amount {}",
            amount
        )));
    }
    Ok(())
}

/// 잔고 계산 (overflow 검사 포함)
pub(crate) fn apply_deposit(balance: Decimal, amount: Decimal) -> Result<Decimal, RepositoryError> {
    balance.checked_add(amount).ok_or_else(|| {
        RepositoryError::Storage(anyhow::anyhow!(
            "balance overflow: {} + {}",
            balance,
            amount
        ))
    })
}

pub(crate) fn apply_withdraw(balance: Decimal, amount: Decimal) -> Result<Decimal, RepositoryError> {
    if balance < amount {
        return Err(RepositoryError::InsufficientFunds {
            balance,
            requested: amount,
        });
    }
    balance.checked_sub(amount).ok_or_else(|| {
        RepositoryError::Storage(anyhow::anyhow!(
            "balance underflow: {} - {}",
            balance,
            amount
        ))
    })
}
