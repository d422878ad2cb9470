//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// JSON logs by default (line-per-event, machine-shippable); set
/// `PODHARBOR_LOG_PRETTY` for human-readable output during development.
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,podharbor=debug"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if std::env::var_os("PODHARBOR_LOG_PRETTY").is_some() {
        let _ = builder.try_init();
    } else {
        let _ = builder.json().try_init();
    }
}
