// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합하고, 미들웨어/Swagger 를 붙인 앱 생성
// Routes module: combines all domain routers

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::domains::wallet::models::{TransactionRequest, Wallet};
use crate::domains::wallet::routes::create_wallet_router;
use crate::shared::config::ServerConfig;
use crate::shared::services::AppState;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::domains::wallet::handlers::wallet_handler::create_wallet,
        crate::domains::wallet::handlers::wallet_handler::get_wallet,
        crate::domains::wallet::handlers::wallet_handler::update_wallet
    ),
    components(schemas(
        Wallet,
        TransactionRequest
    )),
    tags(
        (name = "Wallets", description = "Wallet API endpoints (balance deposit / withdraw)")
    ),
    info(
        title = "Wallet API Server",
        description = "One wallet per user with transactional deposit / withdraw",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/users", create_wallet_router())
}

/// 서버에서 실제로 띄우는 앱
/// Router + Swagger UI + request timeout / trace / CORS layers
pub fn build_app(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    let mut app = Router::new()
        .merge(create_router())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(TimeoutLayer::new(server.request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // CORS 설정 (origin 이 설정된 경우만)
    if let Some(origin) = &server.cors_allowed_origin {
        let origin = origin
            .parse::<HeaderValue>()
            .context("Invalid CORS_ALLOWED_ORIGIN")?;

        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::ACCEPT,
            ]);
        app = app.layer(cors);
    }

    Ok(app)
}
