//! Logging setup
//!
//! Structured logging via `tracing`, with the filter taken from
//! `RUST_LOG` when set and the configured log level otherwise.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global tracing subscriber
///
/// Safe to call once at startup; later calls are ignored so tests that
/// race on initialization do not panic.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_tracing("info");
        init_tracing("debug");
    }
}
