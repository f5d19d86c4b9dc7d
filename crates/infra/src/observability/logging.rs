//! Tracing subscriber bootstrap.

use peek_domain::LoggingConfig;
use tracing_subscriber::EnvFilter;

const FALLBACK_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Filter precedence:
/// 1) `RUST_LOG`
/// 2) `config.level`
/// 3) `info`
///
/// Returns `false` when a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = filter_for(config);

    let installed = if config.json {
        tracing_subscriber::fmt().json().with_target(true).with_env_filter(filter).try_init()
    } else {
        tracing_subscriber::fmt()
            .with_target(true)
            .with_thread_names(true)
            .with_env_filter(filter)
            .try_init()
    };

    installed.is_ok()
}

fn filter_for(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = config.level.trim();
    if !level.is_empty() {
        if let Ok(filter) = EnvFilter::try_new(level) {
            return filter;
        }
    }

    EnvFilter::new(FALLBACK_FILTER)
}
