use std::sync::Arc;
use std::time::Duration;
use rust_decimal::Decimal;
use crate::domains::wallet::models::{TransactionAction, Wallet};
use crate::shared::database::{Deadline, WalletRepository};
use crate::shared::errors::{RepositoryError, WalletError};

/// 지갑 서비스
/// WalletService: wallet use cases on top of a `WalletRepository`
///
/// 역할:
/// - 저장소로는 검증할 수 없는 비즈니스 조건 확인 (action, 음수 금액)
/// - 저장소 호출마다 데드라인 전달
/// - 저장소 에러를 도메인 에러(WalletError)로 변환
///
/// 재시도는 하지 않습니다. 모호한 실패 후 deposit/withdraw 를 다시 보내면
/// 두 번 반영될 수 있기 때문입니다.
#[derive(Clone)]
pub struct WalletService {
    repo: Arc<dyn WalletRepository>,
    deadline: Option<Duration>,
}

impl WalletService {
    /// 생성자
    /// Constructor
    pub fn new(repo: Arc<dyn WalletRepository>) -> Self {
        Self {
            repo,
            deadline: None,
        }
    }

    /// 저장소 호출마다 적용할 데드라인
    /// 저장소는 commit 전에 초과하면 롤백 후 Timeout,
    /// commit 을 보낸 뒤에는 commit 결과를 그대로 돌려줍니다.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// 새 지갑 생성
    /// Create new wallet for user
    /// Note: 사용자당 1개 지갑만 허용 (UNIQUE 제약)
    pub async fn create_wallet(&self, user_id: u64) -> Result<Wallet, WalletError> {
        let wallet = self
            .repo
            .create(user_id, self.deadline())
            .await
            .map_err(|e| self.reject("create", user_id, None, e))?;

        tracing::info!(user_id, wallet_id = wallet.id, "wallet created");
        Ok(wallet)
    }

    /// 지갑 조회 (user_id + wallet_id 모두 일치해야 함)
    /// Get wallet owned by user
    pub async fn get_wallet(&self, user_id: u64, wallet_id: u64) -> Result<Wallet, WalletError> {
        self.repo
            .get(user_id, wallet_id, self.deadline())
            .await
            .map_err(|e| self.reject("get", user_id, Some(wallet_id), e))
    }

    /// 입금 / 출금 적용
    /// Apply a deposit or withdraw to a wallet
    ///
    /// # Errors
    /// * `InvalidAction` - deposit / withdraw 가 아닌 action
    /// * `InvalidDeposit` / `InvalidWithdraw` - 음수 금액 (저장소 접근 없음)
    /// * `NotFound` - 지갑 없음 또는 소유자 불일치
    /// * `InsufficientFunds` - 잔고 부족 (잔고 변화 없음)
    /// * `Timeout` - commit 전에 데드라인 초과 (롤백됨, 잔고 변화 없음)
    pub async fn apply_transaction(
        &self,
        user_id: u64,
        wallet_id: u64,
        action: &str,
        amount: Decimal,
    ) -> Result<Wallet, WalletError> {
        let action: TransactionAction = action.parse().inspect_err(|e| {
            tracing::warn!(user_id, wallet_id, error = %e, "rejected transaction");
        })?;

        if amount < Decimal::ZERO {
            let err = match action {
                TransactionAction::Deposit => WalletError::InvalidDeposit,
                TransactionAction::Withdraw => WalletError::InvalidWithdraw,
            };
            tracing::warn!(user_id, wallet_id, %amount, error = %err, "rejected transaction");
            return Err(err);
        }

        let result = match action {
            TransactionAction::Deposit => {
                self.repo
                    .deposit(user_id, wallet_id, amount, self.deadline())
                    .await
            }
            TransactionAction::Withdraw => {
                self.repo
                    .withdraw(user_id, wallet_id, amount, self.deadline())
                    .await
            }
        };

        let wallet = result.map_err(|e| self.reject(action.as_str(), user_id, Some(wallet_id), e))?;

        tracing::info!(
            user_id,
            wallet_id,
            action = %action,
            %amount,
            balance = %wallet.balance,
            "transaction applied"
        );
        Ok(wallet)
    }

    // 호출 시점부터 계산한 데드라인
    fn deadline(&self) -> Deadline {
        self.deadline.map(Deadline::after).unwrap_or_default()
    }

    // 저장소 에러 → 도메인 에러 (+ 로그)
    fn reject(
        &self,
        operation: &'static str,
        user_id: u64,
        wallet_id: Option<u64>,
        err: RepositoryError,
    ) -> WalletError {
        let err = WalletError::from(err);
        match &err {
            WalletError::Internal(message) => {
                tracing::error!(operation, user_id, ?wallet_id, %message, "wallet operation failed");
            }
            other => {
                tracing::warn!(operation, user_id, ?wallet_id, error = %other, "wallet operation rejected");
            }
        }
        err
    }
}
