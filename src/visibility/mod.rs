//! Visibility tracking module
//!
//! This module provides the tracker that mirrors the host surface's
//! visibility as a reactive boolean.
//!
//! # Overview
//!
//! - **Initial state on creation**: the tracked value starts as the negation
//!   of the source's current hidden flag
//! - **Reactive updates**: each host notification replaces the value with the
//!   negation of the hidden flag delivered with it
//! - **Read paths**: a direct read, a cheap cloneable
//!   [`VisibilityReader`](tracker::VisibilityReader) handle, and an mpsc
//!   change channel that receives the current boolean on every transition
//! - **Scoped subscription**: subscribe on creation, unsubscribe on drop,
//!   unconditionally
//!
//! # Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use tabpulse::host::EventVisibilitySource;
//! use tabpulse::visibility::VisibilityTracker;
//!
//! let source = Arc::new(EventVisibilitySource::new(true));
//! let tracker = VisibilityTracker::new(Arc::clone(&source));
//! assert!(!tracker.is_visible());
//!
//! let changes = tracker.changes();
//! source.set_hidden(false);
//! assert!(tracker.is_visible());
//! assert_eq!(changes.recv().unwrap(), true);
//! ```

pub mod tracker;

pub use tracker::{VisibilityReader, VisibilityTracker};
