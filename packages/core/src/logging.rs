//! Logging Initialization
//!
//! Thin wrapper over `tracing-subscriber`: respects `RUST_LOG`, defaults
//! to `info`. Call once at startup; calling again is a no-op.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once (later calls are ignored), so tests and
/// embedding applications can both call it unconditionally.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
