use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// init_logger は tracing-subscriber を初期化する。
/// RUST_LOG が設定されていればそれを優先し、なければ環境に応じたレベルを使う。
/// format が "text" の場合はプレーンテキスト出力、それ以外は JSON 出力。
pub fn init_logger(environment: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(environment)));

    let registry = tracing_subscriber::registry().with(filter);

    if format == "text" {
        registry.with(fmt::layer().with_target(true)).init();
    } else {
        registry.with(fmt::layer().json().with_target(true)).init();
    }
}

fn default_level(environment: &str) -> &'static str {
    match environment {
        "dev" => "debug",
        _ => "info",
    }
}
