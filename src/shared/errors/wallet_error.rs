use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use crate::shared::errors::RepositoryError;

/// 지갑 관련 에러 (도메인 에러 분류)
/// Wallet-related errors (stable domain taxonomy)
///
/// 메시지는 클라이언트에 그대로 노출되므로 저장소 엔진의 에러 문자열에 의존하지 않습니다.
/// `Internal` 만 예외적으로 원본 메시지를 담고 있습니다 (진단용, 안정성 보장 없음).
#[derive(Error, Debug)]
pub enum WalletError {
    /// 경로의 user_id 형식 오류
    /// Malformed user id
    #[error("invalid user id")]
    InvalidUserId,

    /// 경로의 wallet_id 형식 오류
    /// Malformed wallet id
    #[error("invalid wallet id")]
    InvalidWalletId,

    /// 요청 바디 파싱 실패
    /// Request body could not be decoded
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    /// 음수 입금
    /// Negative deposit amount
    #[error("cannot deposit a negative amount")]
    InvalidDeposit,

    /// 음수 출금
    /// Negative withdraw amount
    #[error("cannot withdraw a negative amount")]
    InvalidWithdraw,

    /// 지원하지 않는 action
    /// Unrecognized action
    #[error("unavailable action: {action}")]
    InvalidAction { action: String },

    /// 지갑을 찾을 수 없음 (user_id + wallet_id 조합)
    /// Wallet not found for the (user_id, wallet_id) pair
    #[error("wallet not found")]
    NotFound { user_id: u64, wallet_id: u64 },

    /// 사용자당 지갑은 1개만 허용
    /// User already owns a wallet
    #[error("user already has a wallet")]
    WalletAlreadyExists { user_id: u64 },

    /// 잔고 부족
    /// Insufficient funds
    #[error("wallet balance not enough")]
    InsufficientFunds,

    /// 데드라인 초과 (트랜잭션은 롤백됨)
    /// Deadline exceeded, transaction rolled back
    #[error("wallet operation timed out")]
    Timeout,

    /// 내부 서버 에러
    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

impl WalletError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            WalletError::InvalidUserId
            | WalletError::InvalidWalletId
            | WalletError::InvalidRequest(_)
            | WalletError::InvalidDeposit
            | WalletError::InvalidWithdraw
            | WalletError::InvalidAction { .. }
            | WalletError::InsufficientFunds => StatusCode::BAD_REQUEST,
            WalletError::NotFound { .. } => StatusCode::NOT_FOUND,
            WalletError::WalletAlreadyExists { .. } => StatusCode::CONFLICT,
            WalletError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            WalletError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 저장소 에러 → 도메인 에러
impl From<RepositoryError> for WalletError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { user_id, wallet_id } => {
                WalletError::NotFound { user_id, wallet_id }
            }
            RepositoryError::DuplicateWallet { user_id } => {
                WalletError::WalletAlreadyExists { user_id }
            }
            RepositoryError::InsufficientFunds { .. } => WalletError::InsufficientFunds,
            RepositoryError::Timeout => WalletError::Timeout,
            RepositoryError::Storage(e) => WalletError::Internal(format!("{:#}", e)),
        }
    }
}

/// WalletError를 HTTP 응답으로 변환
impl From<WalletError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: WalletError) -> Self {
        (err.status_code(), Json(json!({ "error": err.to_string() })))
    }
}
