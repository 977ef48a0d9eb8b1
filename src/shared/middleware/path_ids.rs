use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    Json,
};
use std::collections::HashMap;
use crate::shared::errors::WalletError;

/// 경로의 user_id (양의 정수)
/// `:user_id` path segment, validated as a positive integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPath {
    pub user_id: u64,
}

/// 경로의 user_id + wallet_id
/// `:user_id` and `:wallet_id` path segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletPath {
    pub user_id: u64,
    pub wallet_id: u64,
}

/// "12" → Some(12), "0" / "-1" / "abc" / i64 범위 초과 → None
///
/// DB 컬럼이 BIGINT 이므로 i64 범위 안의 양수만 허용합니다.
pub fn parse_id(raw: &str) -> Option<u64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Some(id as u64),
        _ => None,
    }
}

type IdRejection = (StatusCode, Json<serde_json::Value>);

fn reject(err: WalletError) -> IdRejection {
    err.into()
}

async fn path_params<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<HashMap<String, String>, IdRejection> {
    let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
        .await
        .map_err(|e| reject(WalletError::InvalidRequest(e.body_text())))?;
    Ok(params)
}

fn user_id_from(params: &HashMap<String, String>) -> Result<u64, WalletError> {
    params
        .get("user_id")
        .and_then(|raw| parse_id(raw))
        .ok_or(WalletError::InvalidUserId)
}

/// 사용법:
/// ```rust,ignore
/// pub async fn create_wallet(
///     State(app_state): State<AppState>,
///     UserPath { user_id }: UserPath,
/// ) -> Result<...> { ... }
/// ```
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for UserPath {
    type Rejection = IdRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;
        let user_id = user_id_from(&params).map_err(reject)?;
        Ok(Self { user_id })
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for WalletPath {
    type Rejection = IdRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = path_params(parts, state).await?;

        // user_id 먼저 검증 (둘 다 잘못된 경우 invalid user id)
        let user_id = user_id_from(&params).map_err(reject)?;
        let wallet_id = params
            .get("wallet_id")
            .and_then(|raw| parse_id(raw))
            .ok_or_else(|| reject(WalletError::InvalidWalletId))?;

        Ok(Self { user_id, wallet_id })
    }
}
