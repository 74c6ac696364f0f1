//! Simulated-clock timer host
//!
//! [`ManualTimerHost`] implements [`TimerHost`] against a virtual clock that
//! only moves when [`ManualTimerHost::advance`] is called. Tests drive exact
//! cadences with it, and embedding apps can reuse it for replay/simulation.

use crate::host::timer::{TickFn, TimerHost, TimerId};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct SimTimer {
    id: TimerId,
    interval: Duration,
    next_due: Duration,
    /// Registration order, used to break due-time ties deterministically
    seq: u64,
    /// Tick is kept behind its own lock so the registry lock is released
    /// while a tick runs, allowing a tick to start/stop timers
    tick: Arc<Mutex<TickFn>>,
}

#[derive(Default)]
struct Registry {
    now: Duration,
    next_id: u64,
    started: u64,
    timers: Vec<SimTimer>,
}

/// Deterministic timer host driven by an explicit virtual clock
///
/// Timers become due at `registration time + interval` and re-arm at
/// `due + interval` after each tick, so a timer with interval `T` fires at
/// `T, 2T, 3T, …` on the virtual clock regardless of how `advance` calls are
/// sliced.
#[derive(Default)]
pub struct ManualTimerHost {
    inner: Mutex<Registry>,
}

impl ManualTimerHost {
    /// Create a host with the virtual clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.inner.lock().now
    }

    /// Number of currently live timers
    pub fn live_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }

    /// Total number of timers ever started on this host
    pub fn timers_started(&self) -> u64 {
        self.inner.lock().started
    }

    /// Advance the virtual clock by `delta`, firing every tick that becomes
    /// due on the way, in due order
    ///
    /// Ticks run with the registry unlocked, so a tick may call
    /// [`TimerHost::start`] or [`TimerHost::stop`] on this host; a timer
    /// stopped from inside a tick fires no further ticks.
    pub fn advance(&self, delta: Duration) {
        let target = self.inner.lock().now + delta;

        loop {
            let due_tick = {
                let mut inner = self.inner.lock();

                let mut best: Option<usize> = None;
                for (i, timer) in inner.timers.iter().enumerate() {
                    if timer.next_due > target {
                        continue;
                    }
                    let better = match best {
                        None => true,
                        Some(b) => {
                            (timer.next_due, timer.seq)
                                < (inner.timers[b].next_due, inner.timers[b].seq)
                        }
                    };
                    if better {
                        best = Some(i);
                    }
                }

                match best {
                    None => {
                        inner.now = target;
                        None
                    }
                    Some(i) => {
                        let due_at = inner.timers[i].next_due;
                        let interval = inner.timers[i].interval;
                        let tick = Arc::clone(&inner.timers[i].tick);
                        inner.timers[i].next_due = due_at + interval;
                        inner.now = due_at;
                        Some(tick)
                    }
                }
            };

            match due_tick {
                Some(tick) => (*tick.lock())(),
                None => break,
            }
        }
    }
}

impl TimerHost for ManualTimerHost {
    fn start(&self, interval: Duration, tick: TickFn) -> TimerId {
        // A zero interval would pin the virtual clock inside advance.
        let interval = interval.max(Duration::from_nanos(1));
        let mut inner = self.inner.lock();
        let id = TimerId(inner.next_id);
        inner.next_id += 1;
        inner.started += 1;
        let seq = inner.started;
        let next_due = inner.now + interval;
        inner.timers.push(SimTimer {
            id,
            interval,
            next_due,
            seq,
            tick: Arc::new(Mutex::new(tick)),
        });
        id
    }

    fn stop(&self, id: TimerId) {
        self.inner.lock().timers.retain(|timer| timer.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_tick(counter: &Arc<AtomicUsize>) -> TickFn {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_tick_due_at_exact_boundary() {
        let host = ManualTimerHost::new();
        let count = Arc::new(AtomicUsize::new(0));
        host.start(Duration::from_millis(1000), counting_tick(&count));

        host.advance(Duration::from_millis(999));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        host.advance(Duration::from_millis(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cadence_measured_from_registration() {
        let host = ManualTimerHost::new();
        host.advance(Duration::from_millis(250));

        let count = Arc::new(AtomicUsize::new(0));
        host.start(Duration::from_millis(100), counting_tick(&count));

        // Due at 350, 450, 550 on the virtual clock.
        host.advance(Duration::from_millis(299));
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(host.now(), Duration::from_millis(549));
    }

    #[test]
    fn test_multiple_timers_fire_in_due_order() {
        let host = ManualTimerHost::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let order_a = Arc::clone(&order);
        host.start(
            Duration::from_millis(300),
            Box::new(move || order_a.lock().push("slow")),
        );
        let order_b = Arc::clone(&order);
        host.start(
            Duration::from_millis(200),
            Box::new(move || order_b.lock().push("fast")),
        );

        host.advance(Duration::from_millis(600));
        // fast: 200, 400, 600; slow: 300, 600. Tie at 600 resolves by
        // registration order.
        assert_eq!(
            *order.lock(),
            vec!["fast", "slow", "fast", "slow", "fast"]
        );
    }

    #[test]
    fn test_stop_from_inside_tick() {
        let host = Arc::new(ManualTimerHost::new());
        let count = Arc::new(AtomicUsize::new(0));

        let host_ref = Arc::clone(&host);
        let count_ref = Arc::clone(&count);
        let id_cell: Arc<Mutex<Option<TimerId>>> = Arc::new(Mutex::new(None));
        let id_ref = Arc::clone(&id_cell);

        let id = host.start(
            Duration::from_millis(10),
            Box::new(move || {
                count_ref.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *id_ref.lock() {
                    host_ref.stop(id);
                }
            }),
        );
        *id_cell.lock() = Some(id);

        host.advance(Duration::from_millis(100));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(host.live_timers(), 0);
    }

    #[test]
    fn test_counters() {
        let host = ManualTimerHost::new();
        let a = host.start(Duration::from_millis(10), Box::new(|| {}));
        let b = host.start(Duration::from_millis(10), Box::new(|| {}));
        assert_eq!(host.live_timers(), 2);
        assert_eq!(host.timers_started(), 2);

        host.stop(a);
        host.stop(b);
        assert_eq!(host.live_timers(), 0);
        assert_eq!(host.timers_started(), 2);
    }
}
