//! Tracing subscriber setup for binaries and tests.
//!
//! The library itself only emits `tracing` spans and `log` records; it never
//! installs a global subscriber. Consumers call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber with env-filter support and bridges
/// `log` records into `tracing`.
///
/// `default_filter` is used when `RUST_LOG` is not set (e.g. `"info"` or
/// `"skema=debug,info"`). Calling this more than once is a no-op.
pub fn init(default_filter: &str) {
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
