//! Configuration data models
//!
//! This module defines the snapshot type that configures a poll controller.

use crate::error::{Result, TabPulseError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default polling cadence in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 30_000;

/// Polling configuration snapshot
///
/// A settings value is immutable once handed to a controller; reconfiguring
/// replaces the whole snapshot. The callback is not part of the snapshot so
/// settings stay serializable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    /// Whether polling is enabled
    pub enabled: bool,
    /// Polling interval in milliseconds (non-zero)
    pub interval_ms: u64,
}

impl PollSettings {
    /// Polling interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Reject a zero interval before it can reach a timer host
    ///
    /// Negative intervals are unrepresentable (`u64`); zero is the one
    /// degenerate value a caller can construct.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(TabPulseError::InvalidInterval(self.interval_ms));
        }
        Ok(())
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
