//! 로깅 초기화 모듈

use tracing_subscriber::EnvFilter;

/// tracing 구독자 설치
///
/// `RUST_LOG`가 설정되어 있으면 그 값을, 아니면 상세 모드에서 `debug`,
/// 기본 모드에서 `warn` 수준을 사용합니다. 로그는 표준 에러로 출력됩니다.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "jsoncsv=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
