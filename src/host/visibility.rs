//! Visibility notification source abstraction
//!
//! Defines the [`VisibilitySource`] trait consumed by the visibility tracker
//! and [`EventVisibilitySource`], the bridge implementation an embedding
//! shell feeds from whatever native notification tells it the surface was
//! foregrounded or backgrounded.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// Handler invoked with the host's hidden flag as of notification time
pub type VisibilityHandler = Box<dyn FnMut(bool) + Send + 'static>;

/// Opaque handle for a visibility subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Host-wide visibility notification primitive
///
/// The flag is "hidden" (true when the surface is backgrounded), matching the
/// convention of the underlying platform notifications; consumers invert it.
pub trait VisibilitySource {
    /// Whether the hosting surface is currently hidden
    fn currently_hidden(&self) -> bool;

    /// Register a handler for visibility-change notifications
    ///
    /// The handler receives the hidden flag current at the moment each
    /// notification is delivered.
    fn subscribe(&self, handler: VisibilityHandler) -> SubscriptionId;

    /// Remove a subscription
    ///
    /// A no-op for an unknown or already-removed id. When this returns, the
    /// handler will not be invoked again.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Visibility source fed by the embedding shell
///
/// The shell calls [`Self::set_hidden`] from its native visibility
/// notification (window occlusion callback, app lifecycle event, …); the
/// source stores the flag and notifies subscribers on actual transitions.
///
/// Handlers run on the thread that calls `set_hidden` and must not subscribe
/// or unsubscribe on the same source from inside a notification.
pub struct EventVisibilitySource {
    /// Current hidden flag
    hidden: AtomicBool,
    /// Id allocator
    next_id: AtomicU64,
    /// Registered handlers
    subscribers: Mutex<Vec<(SubscriptionId, VisibilityHandler)>>,
}

impl EventVisibilitySource {
    /// Create a source with the given initial hidden flag
    pub fn new(initially_hidden: bool) -> Self {
        Self {
            hidden: AtomicBool::new(initially_hidden),
            next_id: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Record a visibility change reported by the host shell
    ///
    /// Notifies subscribers only on an actual transition; repeated reports of
    /// the same flag are absorbed here.
    pub fn set_hidden(&self, hidden: bool) {
        if self.hidden.swap(hidden, Ordering::SeqCst) == hidden {
            debug!("visibility unchanged: hidden={}", hidden);
            return;
        }

        debug!("visibility changed: hidden={}", hidden);
        let mut subscribers = self.subscribers.lock();
        for (_, handler) in subscribers.iter_mut() {
            handler(hidden);
        }
    }

    /// Number of registered subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl Default for EventVisibilitySource {
    /// A source that starts visible (hidden flag false)
    fn default() -> Self {
        Self::new(false)
    }
}

impl VisibilitySource for EventVisibilitySource {
    fn currently_hidden(&self) -> bool {
        self.hidden.load(Ordering::SeqCst)
    }

    fn subscribe(&self, handler: VisibilityHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().retain(|(sub_id, _)| *sub_id != id);
    }
}
