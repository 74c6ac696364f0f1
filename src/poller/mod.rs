//! Interval polling module
//!
//! This module provides the poll controller that invokes a callback on a
//! fixed cadence while enabled.
//!
//! # Overview
//!
//! - **One timer, ever**: a controller owns at most one live timer handle at
//!   any point in time
//! - **Snapshot reconfiguration**: changing `enabled`, the interval, or the
//!   callback stops the active timer and starts a fresh one from the new
//!   snapshot; a running timer is never mutated in place
//! - **Idempotent stop**: `cleanup` can be called any number of times
//! - **Host-agnostic**: generic over [`TimerHost`](crate::host::TimerHost),
//!   so the same controller runs on a thread-backed timer in production and
//!   on a simulated clock in tests
//!
//! # Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tabpulse::config::PollSettings;
//! use tabpulse::host::ManualTimerHost;
//! use tabpulse::poller::PollController;
//! use std::time::Duration;
//!
//! let host = Arc::new(ManualTimerHost::new());
//! let polls = Arc::new(AtomicUsize::new(0));
//!
//! let polls_ref = Arc::clone(&polls);
//! let mut controller = PollController::new(
//!     Arc::clone(&host),
//!     PollSettings { enabled: true, interval_ms: 1_000 },
//!     Some(Arc::new(move || {
//!         polls_ref.fetch_add(1, Ordering::SeqCst);
//!     })),
//! )
//! .expect("settings are valid");
//!
//! host.advance(Duration::from_millis(2_500));
//! assert_eq!(polls.load(Ordering::SeqCst), 2);
//!
//! controller.cleanup();
//! host.advance(Duration::from_secs(60));
//! assert_eq!(polls.load(Ordering::SeqCst), 2);
//! ```

pub mod controller;

pub use controller::{PollCallback, PollController};
