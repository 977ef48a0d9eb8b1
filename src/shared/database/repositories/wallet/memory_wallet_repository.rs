use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock as RowLock};
use crate::domains::wallet::models::Wallet;
use crate::shared::errors::RepositoryError;
use super::wallet_repository::{
    Deadline, WalletRepository, apply_deposit, apply_withdraw, ensure_non_negative,
};

// =====================================================
// InMemoryWalletRepository (테스트용 저장소)
// =====================================================
// PostgreSQL 과 같은 잠금 의미를 메모리에서 재현합니다.
//
// - row 마다 tokio RwLock 하나
//   write lock = SELECT ... FOR UPDATE
//   read lock  = SELECT ... FOR SHARE
// - user_id → wallet_id 인덱스가 UNIQUE (user_id) 역할
//
// 인덱스(parking_lot)는 await 를 넘어서 잡지 않습니다.
// 데드라인은 row lock 대기에만 적용됩니다.
// lock 을 얻은 뒤에는 await 없이 계산/저장하므로 "commit" 은 즉시 끝나고,
// Timeout 이면 아무것도 반영되지 않은 상태입니다.
// =====================================================

type WalletRow = Arc<RowLock<Wallet>>;

#[derive(Default)]
struct StoreState {
    last_id: u64,
    rows: HashMap<u64, WalletRow>,
    by_user: HashMap<u64, u64>,
}

/// 메모리 기반 지갑 저장소
/// In-memory wallet store with row-level locking semantics
#[derive(Default)]
pub struct InMemoryWalletRepository {
    state: RwLock<StoreState>,
}

impl InMemoryWalletRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, wallet_id: u64) -> Option<WalletRow> {
        self.state.read().rows.get(&wallet_id).cloned()
    }

    /// 지갑 row 의 배타 잠금을 잡고 있는 가드 반환
    /// Hold a wallet row's exclusive lock, as an in-flight transaction would.
    ///
    /// 가드가 drop 될 때까지 같은 지갑에 대한 get / deposit / withdraw 는 대기합니다.
    pub async fn hold_row_lock(&self, wallet_id: u64) -> Option<OwnedRwLockWriteGuard<Wallet>> {
        let row = self.row(wallet_id)?;
        Some(row.write_owned().await)
    }

    async fn mutate<F>(
        &self,
        user_id: u64,
        wallet_id: u64,
        deadline: Deadline,
        apply: F,
    ) -> Result<Wallet, RepositoryError>
    where
        F: FnOnce(Decimal) -> Result<Decimal, RepositoryError> + Send,
    {
        if deadline.is_expired() {
            return Err(RepositoryError::Timeout);
        }
        let row = self
            .row(wallet_id)
            .ok_or(RepositoryError::NotFound { user_id, wallet_id })?;

        let mut wallet = deadline.wait(row.write()).await?;
        if wallet.user_id != user_id {
            return Err(RepositoryError::NotFound { user_id, wallet_id });
        }

        // 검증 실패 시 row 는 그대로 (롤백과 동일)
        let balance = apply(wallet.balance)?;
        wallet.balance = balance;
        wallet.updated_at = Utc::now();

        Ok(wallet.clone())
    }
}

#[async_trait]
impl WalletRepository for InMemoryWalletRepository {
    async fn create(&self, user_id: u64, deadline: Deadline) -> Result<Wallet, RepositoryError> {
        if deadline.is_expired() {
            return Err(RepositoryError::Timeout);
        }

        let mut state = self.state.write();
        if state.by_user.contains_key(&user_id) {
            return Err(RepositoryError::DuplicateWallet { user_id });
        }

        state.last_id += 1;
        let now = Utc::now();
        let wallet = Wallet {
            id: state.last_id,
            user_id,
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        };

        state.by_user.insert(user_id, wallet.id);
        state
            .rows
            .insert(wallet.id, Arc::new(RowLock::new(wallet.clone())));

        Ok(wallet)
    }

    async fn get(
        &self,
        user_id: u64,
        wallet_id: u64,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        if deadline.is_expired() {
            return Err(RepositoryError::Timeout);
        }
        let row = self
            .row(wallet_id)
            .ok_or(RepositoryError::NotFound { user_id, wallet_id })?;

        let wallet = deadline.wait(row.read()).await?;
        if wallet.user_id != user_id {
            return Err(RepositoryError::NotFound { user_id, wallet_id });
        }

        Ok(wallet.clone())
    }

    async fn deposit(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        ensure_non_negative(amount)?;
        self.mutate(user_id, wallet_id, deadline, |balance| apply_deposit(balance, amount))
            .await
    }

    async fn withdraw(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        ensure_non_negative(amount)?;
        self.mutate(user_id, wallet_id, deadline, |balance| apply_withdraw(balance, amount))
            .await
    }
}
