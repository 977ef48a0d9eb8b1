/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - 로그 초기화 (tracing)
pub mod logging;
