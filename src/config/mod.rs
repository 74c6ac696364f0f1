//! Polling configuration module
//!
//! Configuration is modeled as an immutable snapshot: the controller never
//! mutates a running timer in place, it replaces the whole snapshot and
//! restarts from it.

pub mod models;

pub use models::{DEFAULT_POLL_INTERVAL_MS, PollSettings};
