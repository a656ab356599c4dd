use tracing_subscriber::EnvFilter;

/// RUST_LOG が未設定の場合のログレベル
const DEFAULT_LOG_FILTER: &str = "info";

/// ログ出力を初期化
///
/// `log` クレートのレコードも tracing-subscriber 経由で出力される。
/// 既に初期化済みの場合は何もしない。
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }
}
