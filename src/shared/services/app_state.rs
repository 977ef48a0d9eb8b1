use std::sync::Arc;
use std::time::Duration;
use crate::shared::config::AppConfig;
use crate::shared::database::{Database, PgWalletRepository, WalletRepository};
use crate::domains::wallet::services::state::WalletState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// main 에서 한 번 만들어서 Router 의 state 로 전달합니다. (전역 변수 없음)
#[derive(Clone)]
pub struct AppState {
    pub wallet_state: WalletState,
}

impl AppState {
    /// Create AppState with database
    /// PostgreSQL 저장소로 모든 도메인 State 초기화
    pub fn new(db: &Database, config: &AppConfig) -> Self {
        let repo = PgWalletRepository::new(db.pool().clone());
        Self::with_repository(Arc::new(repo), config.wallet.operation_timeout)
    }

    /// 임의의 저장소로 생성 (테스트에서 InMemoryWalletRepository 주입)
    pub fn with_repository(repo: Arc<dyn WalletRepository>, operation_timeout: Duration) -> Self {
        Self {
            wallet_state: WalletState::new(repo, operation_timeout),
        }
    }
}
