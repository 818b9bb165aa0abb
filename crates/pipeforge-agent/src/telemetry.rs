//! Logging bootstrap for agent processes

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging for a deployed agent process.
///
/// Respects `RUST_LOG`; falls back to `info`. Call once at startup —
/// a second call is a no-op rather than a panic so embedded test
/// harnesses can share a process.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
