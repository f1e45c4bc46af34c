//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;

/// Install a formatting subscriber. `RUST_LOG` wins over `default_directive`.
///
/// Returns false if a global subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// [`init`] with the configured `log_filter`.
pub fn init_from(config: &GeneralConfig) -> bool {
    init(&config.log_filter)
}
