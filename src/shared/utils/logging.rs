use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// RUST_LOG 가 없을 때 사용하는 기본 필터
pub const DEFAULT_LOG_FILTER: &str = "wallet_server=info,tower_http=info";

/// 로그 초기화 (tracing-subscriber)
/// Install the global tracing subscriber
///
/// `RUST_LOG` 환경 변수가 있으면 그 값을, 없으면 `DEFAULT_LOG_FILTER` 를 사용합니다.
/// 두 번 호출해도 패닉하지 않습니다 (이미 설치된 경우 무시).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
