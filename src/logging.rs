//! Log subscriber setup

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `filter`. Returns false when a
/// subscriber was already installed.
pub fn init(filter: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).try_init().is_ok()
}
