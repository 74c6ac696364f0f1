//! Logging system initialization
//!
//! Sets up tracing-based logging to stderr. Embedding applications that
//! install their own subscriber can skip this entirely; the crate only emits
//! `tracing` events and never requires a subscriber.

use crate::error::{Result, TabPulseError};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via the `RUST_LOG`
/// environment variable. Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true) // Include target module
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| TabPulseError::LoggingInit(Box::new(e)))?;

    tracing::debug!("tabpulse v{} logging initialized", env!("CARGO_PKG_VERSION"));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_init_fails() {
        // The first call installs the subscriber; the second must be
        // rejected rather than silently replacing it.
        assert!(init_logging().is_ok());
        assert!(matches!(
            init_logging(),
            Err(TabPulseError::LoggingInit(_))
        ));
    }
}
