use thiserror::Error;
use rust_decimal::Decimal;

/// PostgreSQL SQLSTATE: unique_violation
pub const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE: lock_not_available (lock_timeout 초과)
pub const LOCK_NOT_AVAILABLE: &str = "55P03";
/// PostgreSQL SQLSTATE: query_canceled (statement_timeout 초과)
pub const QUERY_CANCELED: &str = "57014";

/// 저장소 계층 에러
/// Storage-level errors returned by a `WalletRepository`
///
/// 도메인에서 의미가 있는 조건(NotFound, DuplicateWallet, InsufficientFunds, Timeout)은
/// 여기서 분류되고, 나머지는 전부 `Storage` 로 감싸서 원본 메시지를 보존합니다.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("wallet not found: user_id={user_id}, wallet_id={wallet_id}")]
    NotFound { user_id: u64, wallet_id: u64 },

    #[error("wallet already exists: user_id={user_id}")]
    DuplicateWallet { user_id: u64 },

    #[error("insufficient funds: balance={balance}, requested={requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("timed out waiting for the wallet row")]
    Timeout,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RepositoryError {
    /// sqlx 에러 분류 (타임아웃 계열만 인식, 나머지는 Storage)
    /// Classify a raw sqlx error
    pub fn from_sqlx(err: sqlx::Error, context: &'static str) -> Self {
        if let Some(code) = database_code(&err) {
            if code == LOCK_NOT_AVAILABLE || code == QUERY_CANCELED {
                return RepositoryError::Timeout;
            }
        }

        RepositoryError::Storage(anyhow::Error::new(err).context(context))
    }
}

/// 데이터베이스가 돌려준 SQLSTATE 코드
pub fn database_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}
