// Wallet domain state
// 지갑 도메인 상태
use std::sync::Arc;
use std::time::Duration;
use crate::domains::wallet::services::WalletService;
use crate::shared::database::WalletRepository;

/// Wallet domain state
/// 지갑 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct WalletState {
    pub wallet_service: WalletService,
}

impl WalletState {
    /// Create WalletState with a repository and per-operation deadline
    /// WalletState 생성 (저장소 + 데드라인)
    pub fn new(repo: Arc<dyn WalletRepository>, operation_timeout: Duration) -> Self {
        Self {
            wallet_service: WalletService::new(repo).with_deadline(operation_timeout),
        }
    }
}
