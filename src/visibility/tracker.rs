//! Visibility tracker implementation

use crate::host::{SubscriptionId, VisibilitySource};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use tracing::debug;

/// Read-only handle onto a tracker's visibility value
///
/// Cheap to clone and safe to hold past the tracker's lifetime; after the
/// tracker is torn down the handle keeps returning the last tracked value.
#[derive(Debug, Clone)]
pub struct VisibilityReader {
    visible: Arc<AtomicBool>,
}

impl VisibilityReader {
    /// Current tracked visibility
    pub fn get(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// Tracks whether the hosting surface is visible to the user
///
/// Subscribes to the source on creation and unsubscribes on drop. The value
/// is mutated only by the change handler and is always the negation of the
/// hidden flag the source last delivered.
pub struct VisibilityTracker<S: VisibilitySource> {
    source: Arc<S>,
    /// Taken on drop so the unsubscribe runs exactly once
    subscription: Option<SubscriptionId>,
    visible: Arc<AtomicBool>,
    listeners: Arc<Mutex<Vec<mpsc::Sender<bool>>>>,
}

impl<S: VisibilitySource> VisibilityTracker<S> {
    /// Create a tracker and subscribe it to the source
    ///
    /// The initial value is derived from the source's current hidden flag,
    /// inverted.
    pub fn new(source: Arc<S>) -> Self {
        let visible = Arc::new(AtomicBool::new(!source.currently_hidden()));
        let listeners: Arc<Mutex<Vec<mpsc::Sender<bool>>>> = Arc::new(Mutex::new(Vec::new()));

        let handler_visible = Arc::clone(&visible);
        let handler_listeners = Arc::clone(&listeners);
        let subscription = source.subscribe(Box::new(move |hidden| {
            let now_visible = !hidden;
            handler_visible.store(now_visible, Ordering::SeqCst);
            // Fan out the new value, dropping listeners that went away.
            handler_listeners
                .lock()
                .retain(|tx| tx.send(now_visible).is_ok());
        }));

        debug!(
            "visibility tracker subscribed, initially visible={}",
            visible.load(Ordering::SeqCst)
        );

        Self {
            source,
            subscription: Some(subscription),
            visible,
            listeners,
        }
    }

    /// Current tracked visibility
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    /// Cloneable read-only handle onto the tracked value
    pub fn reader(&self) -> VisibilityReader {
        VisibilityReader {
            visible: Arc::clone(&self.visible),
        }
    }

    /// Register a change listener
    ///
    /// The receiver gets the current boolean after every visibility
    /// transition. Dropping the receiver unregisters it on the next
    /// transition.
    pub fn changes(&self) -> mpsc::Receiver<bool> {
        let (tx, rx) = mpsc::channel();
        self.listeners.lock().push(tx);
        rx
    }
}

impl<S: VisibilitySource> Drop for VisibilityTracker<S> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.source.unsubscribe(id);
            debug!("visibility tracker unsubscribed");
        }
    }
}
