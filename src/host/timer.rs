//! Repeating-timer host abstraction
//!
//! Defines the [`TimerHost`] trait consumed by the poll controller and the
//! production [`ThreadTimerHost`] implementation, which runs each live timer
//! on its own background thread.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error};

/// Callback invoked on every timer tick
pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Opaque handle for an active repeating timer
///
/// Owned exclusively by whoever called [`TimerHost::start`]; passing it to
/// [`TimerHost::stop`] invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub(crate) u64);

/// Host-environment repeating timer primitive
///
/// Implementations schedule `tick` every `interval`, measured from the
/// `start` call. Ticks for one id are strictly sequential and never overlap.
pub trait TimerHost {
    /// Start a repeating timer and return its handle
    fn start(&self, interval: Duration, tick: TickFn) -> TimerId;

    /// Stop a timer
    ///
    /// A no-op for an unknown or already-stopped id. When this returns, no
    /// further tick for `id` will run.
    fn stop(&self, id: TimerId);
}

/// Production timer host backed by one thread per live timer
///
/// The timer thread waits on a stop channel with `recv_timeout(interval)`, so
/// a timeout is a tick and a stop signal wakes it immediately. [`Self::stop`]
/// joins the thread before returning, which is what makes cancellation
/// synchronous: an in-flight tick finishes, then the thread exits.
///
/// A panicking tick is caught, logged at `error` level, and the cadence
/// continues. Do not call `stop` from inside the tick callback itself; the
/// join would deadlock.
#[derive(Default)]
pub struct ThreadTimerHost {
    /// Live timers by id
    timers: Mutex<HashMap<TimerId, ActiveTimer>>,
    /// Id allocator
    next_id: AtomicU64,
}

struct ActiveTimer {
    stop_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl ThreadTimerHost {
    /// Create a timer host with no live timers
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently live timers
    pub fn live_timers(&self) -> usize {
        self.timers.lock().len()
    }
}

impl TimerHost for ThreadTimerHost {
    fn start(&self, interval: Duration, mut tick: TickFn) -> TimerId {
        let id = TimerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let join = std::thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if std::panic::catch_unwind(AssertUnwindSafe(|| tick())).is_err() {
                            error!("timer {:?} tick panicked, keeping cadence", id);
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        self.timers.lock().insert(id, ActiveTimer { stop_tx, join });
        debug!("started timer {:?} with interval {:?}", id, interval);
        id
    }

    fn stop(&self, id: TimerId) {
        let Some(timer) = self.timers.lock().remove(&id) else {
            return;
        };

        // Wake the thread immediately; a send error just means it already
        // exited on channel disconnect.
        let _ = timer.stop_tx.send(());
        if timer.join.join().is_err() {
            error!("timer {:?} thread panicked during shutdown", id);
        }
        debug!("stopped timer {:?}", id);
    }
}

impl Drop for ThreadTimerHost {
    fn drop(&mut self) {
        let timers: Vec<(TimerId, ActiveTimer)> = self.timers.lock().drain().collect();
        for (id, timer) in timers {
            let _ = timer.stop_tx.send(());
            if timer.join.join().is_err() {
                error!("timer {:?} thread panicked during shutdown", id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ticks_fire_repeatedly() {
        let host = ThreadTimerHost::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        let id = host.start(
            Duration::from_millis(10),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(2))
                .expect("tick should fire");
        }
        host.stop(id);
    }

    #[test]
    fn test_stop_before_first_tick() {
        let host = ThreadTimerHost::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        let id = host.start(
            Duration::from_secs(60),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        host.stop(id);

        assert!(rx.try_recv().is_err(), "no tick before the first interval");
        assert_eq!(host.live_timers(), 0);
    }

    #[test]
    fn test_stop_is_synchronous() {
        let host = ThreadTimerHost::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        let id = host.start(
            Duration::from_millis(5),
            Box::new(move || {
                let _ = tx.send(());
            }),
        );
        rx.recv_timeout(Duration::from_secs(2))
            .expect("tick should fire");
        host.stop(id);

        // The thread is joined, so anything in the channel was sent before
        // stop returned.
        while rx.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "no tick after stop returned");
    }

    #[test]
    fn test_stop_unknown_id_is_noop() {
        let host = ThreadTimerHost::new();
        host.stop(TimerId(12345));

        let id = host.start(Duration::from_secs(60), Box::new(|| {}));
        host.stop(id);
        // Second stop of the same id is also a no-op.
        host.stop(id);
        assert_eq!(host.live_timers(), 0);
    }

    #[test]
    fn test_panicking_tick_keeps_cadence() {
        let host = ThreadTimerHost::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut first = true;

        let id = host.start(
            Duration::from_millis(10),
            Box::new(move || {
                let _ = tx.send(());
                if first {
                    first = false;
                    panic!("tick blew up");
                }
            }),
        );

        // The first tick panics; the second still arrives.
        rx.recv_timeout(Duration::from_secs(2)).expect("first tick");
        rx.recv_timeout(Duration::from_secs(2)).expect("second tick");
        host.stop(id);
    }
}
