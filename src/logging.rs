//! Logging configuration for the SQL runner.
//!
//! Diagnostics go to stderr so CI systems capture them alongside the
//! pipeline log, keeping stdout free for tooling.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging with an env-controllable filter.
///
/// Defaults to `info`; override with `RUST_LOG`.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
