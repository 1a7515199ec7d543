//! Shared logging initialization for worker bootstrap.

use std::sync::OnceLock;

/// Environment variable selecting the log level.
pub const ENV_LOG: &str = "WORKER_HOST_LOG";

static INIT: OnceLock<()> = OnceLock::new();

fn parse_level(raw: Option<&str>) -> tracing::Level {
    match raw.unwrap_or("info").to_ascii_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Level selected by `WORKER_HOST_LOG`, `INFO` when unset or unrecognized.
pub fn level_from_env() -> tracing::Level {
    parse_level(std::env::var(ENV_LOG).ok().as_deref())
}

/// Initialize process-level tracing output from `WORKER_HOST_LOG`.
///
/// Safe to call multiple times; only the first call installs the subscriber.
/// Best-effort: a subscriber installed elsewhere wins silently.
pub fn init() {
    if INIT.get().is_some() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_from_env())
        .with_target(false)
        .try_init();
    let _ = INIT.set(());
}
