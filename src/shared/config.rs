use std::time::Duration;
use thiserror::Error;

// =====================================================
// AppConfig - 환경 변수 설정
// =====================================================
// 역할: 환경 변수(.env 포함)에서 서버/DB/지갑 설정을 읽어옴
//
// 필수:
//   DATABASE_URL
// 선택 (기본값):
//   DATABASE_LOG_LEVEL=warn
//   DATABASE_MAX_OPEN_CONNECTIONS=10
//   PORT=8080
//   HTTP_SERVER_REQUEST_TIMEOUT=3s
//   HTTP_SERVER_SHUTDOWN_TIMEOUT=15s
//   CORS_ALLOWED_ORIGIN=(없음)
//   WALLET_OPERATION_TIMEOUT=2s
//
// WALLET_OPERATION_TIMEOUT 는 HTTP_SERVER_REQUEST_TIMEOUT 보다 짧아야 합니다.
// (같거나 길면 요청 타임아웃이 먼저 걸려 504 {"error": ...} 대신 빈 408 이 나감)
// =====================================================

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required key {0} missing value")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("{key} ({value:?}) must be shorter than {limit_key} ({limit:?})")]
    NotShorter {
        key: &'static str,
        value: Duration,
        limit_key: &'static str,
        limit: Duration,
    },
}

/// HTTP 서버 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// HTTP server port
    pub port: u16,
    /// 요청 하나의 최대 처리 시간 (읽기 + 핸들러 + 쓰기)
    pub request_timeout: Duration,
    /// Graceful shutdown 대기 시간
    pub shutdown_timeout: Duration,
    /// CORS 허용 origin (None 이면 CORS 레이어 없음)
    pub cors_allowed_origin: Option<String>,
}

/// PostgreSQL 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    /// sqlx statement log level
    pub log_level: log::LevelFilter,
    pub max_open_connections: u32,
}

/// 지갑 연산 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// 저장소 호출 하나에 주어지는 데드라인 (초과 시 롤백)
    pub operation_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub wallet: WalletConfig,
}

impl AppConfig {
    /// 환경 변수에서 설정 읽기 (.env 파일이 있으면 먼저 로드)
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 key → value 조회 함수로 설정 읽기 (테스트에서 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let log_level = match get("DATABASE_LOG_LEVEL") {
            Some(value) => value
                .parse::<log::LevelFilter>()
                .map_err(|_| ConfigError::Invalid { key: "DATABASE_LOG_LEVEL", value })?,
            None => log::LevelFilter::Warn,
        };

        let max_open_connections = parse_or(
            get("DATABASE_MAX_OPEN_CONNECTIONS"),
            "DATABASE_MAX_OPEN_CONNECTIONS",
            10u32,
        )?;
        if max_open_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_OPEN_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        let port = parse_or(get("PORT"), "PORT", 8080u16)?;

        let request_timeout = duration_or(
            get("HTTP_SERVER_REQUEST_TIMEOUT"),
            "HTTP_SERVER_REQUEST_TIMEOUT",
            Duration::from_secs(3),
        )?;
        let shutdown_timeout = duration_or(
            get("HTTP_SERVER_SHUTDOWN_TIMEOUT"),
            "HTTP_SERVER_SHUTDOWN_TIMEOUT",
            Duration::from_secs(15),
        )?;
        let operation_timeout = duration_or(
            get("WALLET_OPERATION_TIMEOUT"),
            "WALLET_OPERATION_TIMEOUT",
            Duration::from_secs(2),
        )?;
        if operation_timeout >= request_timeout {
            return Err(ConfigError::NotShorter {
                key: "WALLET_OPERATION_TIMEOUT",
                value: operation_timeout,
                limit_key: "HTTP_SERVER_REQUEST_TIMEOUT",
                limit: request_timeout,
            });
        }

        Ok(Self {
            server: ServerConfig {
                port,
                request_timeout,
                shutdown_timeout,
                cors_allowed_origin: get("CORS_ALLOWED_ORIGIN"),
            },
            database: DatabaseConfig {
                url,
                log_level,
                max_open_connections,
            },
            wallet: WalletConfig { operation_timeout },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn duration_or(
    value: Option<String>,
    key: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => parse_duration(&value).ok_or(ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

/// "500ms", "3s", "2m" 형식의 기간 파싱
/// Parse a duration such as `500ms`, `3s` or `2m`
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let split = value.find(|c: char| !c.is_ascii_digit())?;
    let (number, unit) = value.split_at(split);
    let number: u64 = number.parse().ok()?;

    match unit {
        "ms" => Some(Duration::from_millis(number)),
        "s" => Some(Duration::from_secs(number)),
        "m" => number.checked_mul(60).map(Duration::from_secs),
        _ => None,
    }
}
