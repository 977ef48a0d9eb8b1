// Wallet domain routes
// 지갑 도메인 라우터
use axum::{routing::{get, post}, Router};
use crate::domains::wallet::handlers::wallet_handler;
use crate::shared::services::AppState;

/// Create wallet router (nested under /users)
/// 지갑 라우터 생성
pub fn create_wallet_router() -> Router<AppState> {
    Router::new()
        .route("/:user_id/wallets", post(wallet_handler::create_wallet))
        .route(
            "/:user_id/wallets/:wallet_id",
            get(wallet_handler::get_wallet).put(wallet_handler::update_wallet),
        )
}
