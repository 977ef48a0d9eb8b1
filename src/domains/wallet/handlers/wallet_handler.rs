use crate::domains::wallet::models::{TransactionRequest, Wallet};
use crate::shared::services::AppState;
use crate::shared::middleware::{UserPath, WalletPath};
use crate::shared::errors::WalletError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

/// 지갑 생성 핸들러
/// Create wallet handler
#[utoipa::path(
    post,
    path = "/users/{user_id}/wallets",
    params(
        ("user_id" = u64, Path, description = "User ID")
    ),
    responses(
        (status = 201, description = "Wallet created successfully", body = Wallet),
        (status = 400, description = "Invalid user id"),
        (status = 409, description = "User already has a wallet"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets"
)]
pub async fn create_wallet(
    State(app_state): State<AppState>,
    UserPath { user_id }: UserPath,
) -> Result<(StatusCode, Json<Wallet>), (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .create_wallet(user_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok((StatusCode::CREATED, Json(wallet)))
}

/// 지갑 조회 핸들러
/// Get wallet handler
#[utoipa::path(
    get,
    path = "/users/{user_id}/wallets/{wallet_id}",
    params(
        ("user_id" = u64, Path, description = "User ID"),
        ("wallet_id" = u64, Path, description = "Wallet ID")
    ),
    responses(
        (status = 200, description = "Wallet retrieved successfully", body = Wallet),
        (status = 400, description = "Invalid user id or wallet id"),
        (status = 404, description = "Wallet not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets"
)]
pub async fn get_wallet(
    State(app_state): State<AppState>,
    WalletPath { user_id, wallet_id }: WalletPath,
) -> Result<Json<Wallet>, (StatusCode, Json<serde_json::Value>)> {
    let wallet = app_state
        .wallet_state
        .wallet_service
        .get_wallet(user_id, wallet_id)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet))
}

/// 입금 / 출금 핸들러
/// Deposit / withdraw handler
/// Note: 바디 파싱 실패도 400 + {"error": ...} 형식으로 응답
#[utoipa::path(
    put,
    path = "/users/{user_id}/wallets/{wallet_id}",
    params(
        ("user_id" = u64, Path, description = "User ID"),
        ("wallet_id" = u64, Path, description = "Wallet ID")
    ),
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Transaction applied", body = Wallet),
        (status = 400, description = "Invalid input, unavailable action, negative amount or insufficient balance"),
        (status = 404, description = "Wallet not found"),
        (status = 504, description = "Deadline exceeded before commit; nothing was applied"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Wallets"
)]
pub async fn update_wallet(
    State(app_state): State<AppState>,
    WalletPath { user_id, wallet_id }: WalletPath,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<Json<Wallet>, (StatusCode, Json<serde_json::Value>)> {
    let Json(request) = payload.map_err(|e| -> (StatusCode, Json<serde_json::Value>) {
        WalletError::InvalidRequest(e.body_text()).into()
    })?;

    let wallet = app_state
        .wallet_state
        .wallet_service
        .apply_transaction(user_id, wallet_id, &request.action, request.amount)
        .await
        .map_err(|e: WalletError| -> (StatusCode, Json<serde_json::Value>) { e.into() })?;

    Ok(Json(wallet))
}
