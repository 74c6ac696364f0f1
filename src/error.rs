//! Error types for `tabpulse`
//!
//! Activation, stop, and teardown either succeed or are no-ops, so the
//! surface has very few fallible operations. The variants below cover the
//! two places that can genuinely reject, and they use `#[source]` where an
//! underlying error chain exists.

use thiserror::Error;

/// Main error type for `tabpulse` operations
#[derive(Debug, Error)]
pub enum TabPulseError {
    /// A polling interval of zero milliseconds was rejected at configuration
    /// time. The previous configuration, if any, stays in effect.
    #[error("invalid polling interval: {0} ms (must be non-zero)")]
    InvalidInterval(u64),

    /// Installing the global tracing subscriber failed
    /// Preserves the underlying error source for full error chain transparency
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for `tabpulse` operations
pub type Result<T> = std::result::Result<T, TabPulseError>;
