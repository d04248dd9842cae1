//! # Logging Setup
//!
//! Tracing subscriber configuration for embedding binaries and tests.

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The level comes from `LOG_LEVEL` (trace/debug/info/warn/error, default
/// info); `RUST_LOG`-style per-target filters are honored when `LOG_LEVEL`
/// is unset. Safe to call once per process.
pub fn init_tracing() {
    let filter = match std::env::var("LOG_LEVEL") {
        Ok(level) => EnvFilter::new(level.to_lowercase()),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global tracing subscriber");

    info!("tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_once() {
        init_tracing();
        info!("subscriber accepts events");
    }
}
