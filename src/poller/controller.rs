//! Poll controller implementation
//!
//! Two states, `Idle` and `Active`. Activation requires `enabled = true` and
//! a callback; every reconfiguration passes through `Idle` (stop, then start
//! from the new snapshot). Teardown on drop leaves the controller `Idle`.

use crate::config::PollSettings;
use crate::error::Result;
use crate::host::{TickFn, TimerHost, TimerId};
use std::sync::Arc;
use tracing::debug;

/// Callback invoked on every poll tick
///
/// Shared so the controller can re-arm the same callback across
/// stop-then-restart cycles.
pub type PollCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Interval polling controller
///
/// Owns at most one live [`TimerId`] at any time. While `Active`, the host
/// invokes the callback every `interval_ms`, measured from activation.
pub struct PollController<H: TimerHost> {
    host: Arc<H>,
    settings: PollSettings,
    on_update: Option<PollCallback>,
    /// The single live timer handle, `None` while idle
    active: Option<TimerId>,
}

impl<H: TimerHost> PollController<H> {
    /// Create a controller and activate it if the configuration is eligible
    ///
    /// Eligible means `settings.enabled` and a callback present. A zero
    /// interval is rejected fail-fast and nothing is started.
    pub fn new(
        host: Arc<H>,
        settings: PollSettings,
        on_update: Option<PollCallback>,
    ) -> Result<Self> {
        settings.validate()?;
        let mut controller = Self {
            host,
            settings,
            on_update,
            active: None,
        };
        controller.restart();
        Ok(controller)
    }

    /// Replace the settings snapshot
    ///
    /// Stops the active timer (if any) and starts a fresh one when the new
    /// snapshot is still eligible, so a changed interval takes effect from
    /// the reconfiguration instant. Rejected settings leave the previous
    /// snapshot and any running timer untouched.
    pub fn reconfigure(&mut self, settings: PollSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        self.restart();
        Ok(())
    }

    /// Replace the callback, cycling the timer through `Idle`
    ///
    /// Passing `None` deactivates until a callback is supplied again.
    pub fn set_on_update(&mut self, on_update: Option<PollCallback>) {
        self.on_update = on_update;
        self.restart();
    }

    /// Manual stop, idempotent
    ///
    /// A no-op while idle; otherwise stops the timer and clears the handle.
    /// Once this returns, no further callback invocation occurs.
    pub fn cleanup(&mut self) {
        if let Some(id) = self.active.take() {
            self.host.stop(id);
            debug!("poll controller deactivated, stopped timer {:?}", id);
        }
    }

    /// Whether a timer is currently live
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Current settings snapshot
    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Stop, then start again if the current snapshot is eligible
    fn restart(&mut self) {
        self.cleanup();

        if !self.settings.enabled {
            return;
        }
        let Some(on_update) = self.on_update.clone() else {
            return;
        };

        let tick: TickFn = Box::new(move || on_update());
        let id = self.host.start(self.settings.interval(), tick);
        self.active = Some(id);
        debug!(
            "poll controller activated, timer {:?} every {} ms",
            id, self.settings.interval_ms
        );
    }
}

impl<H: TimerHost> Drop for PollController<H> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
