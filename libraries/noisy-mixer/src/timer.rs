//! Countdown auto-stop timer
//!
//! The countdown is driven by a single periodic `TickSource`. Ticks are
//! pulled, not pushed: the owner asks how many periods elapsed on its
//! `Clock` and applies them one by one. Re-arming replaces the previous
//! registration in place, so a tick from an old countdown can never be
//! delivered after a new one starts.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Label shown when no countdown is configured
pub const TIMER_PLACEHOLDER: &str = "Set Timer";

/// Shortest accepted tick period
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Monotonic time source
pub trait Clock: Send {
    /// Time elapsed since an arbitrary, fixed epoch
    fn now(&self) -> Duration;
}

/// Wall-clock backed monotonic clock
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Manually advanced clock for deterministic tests
///
/// Clones share the same time, so a test keeps one copy and hands the
/// other to the controller.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.nanos.store(at.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// One periodic tick registration
#[derive(Debug, Clone, Default)]
pub struct TickSource {
    period: Duration,
    next: Option<Duration>,
}

impl TickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a periodic tick starting one period after `now`
    ///
    /// Any previous registration is dropped first.
    pub fn arm(&mut self, now: Duration, period: Duration) {
        self.disarm();
        self.period = period.max(MIN_TICK_PERIOD);
        self.next = Some(now + self.period);
    }

    /// Stop ticking; safe to call when already stopped
    pub fn disarm(&mut self) {
        self.next = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// When the next tick is due, if armed
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next
    }

    /// Push the next deadline back one period, as if a tick had fired
    pub fn skip_period(&mut self) {
        if let Some(next) = self.next {
            self.next = Some(next + self.period);
        }
    }

    /// Consume and return the number of whole periods elapsed by `now`
    pub fn due_ticks(&mut self, now: Duration) -> u32 {
        let Some(next) = self.next else {
            return 0;
        };
        if now < next {
            return 0;
        }

        let overdue = (now - next).as_nanos() / self.period.as_nanos();
        let due = u32::try_from(overdue.saturating_add(1)).unwrap_or(u32::MAX);
        self.next = Some(next + self.period * due);
        due
    }
}

/// Observable countdown state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Duration the countdown was started with
    pub configured_secs: u32,

    /// Seconds left before auto-stop
    pub remaining_secs: u32,

    /// Whether a tick source is active
    pub running: bool,
}

impl TimerState {
    /// No countdown configured
    pub const fn idle() -> Self {
        Self {
            configured_secs: 0,
            remaining_secs: 0,
            running: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::idle()
    }

    /// "MM:SS" while time remains, otherwise the placeholder label
    pub fn label(&self) -> String {
        if self.remaining_secs == 0 {
            return TIMER_PLACEHOLDER.to_string();
        }
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }

    /// Whether the preset button for `minutes` should be highlighted
    pub fn is_preset_active(&self, minutes: u32) -> bool {
        self.configured_secs != 0 && self.configured_secs == minutes.saturating_mul(60)
    }
}

/// Result of applying one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// No countdown was running
    Idle,

    /// Remaining time decreased
    Ticked,

    /// Countdown reached zero and stopped
    Expired,
}

/// Countdown state plus its tick source
#[derive(Debug, Clone, Default)]
pub struct Countdown {
    state: TimerState,
    ticks: TickSource,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Cancel whatever is running, then start a countdown of `secs`
    ///
    /// A zero duration leaves the countdown idle.
    pub fn start(&mut self, secs: u32, now: Duration, period: Duration) {
        self.ticks.disarm();
        self.state = TimerState {
            configured_secs: secs,
            remaining_secs: secs,
            running: false,
        };

        if secs > 0 {
            self.ticks.arm(now, period);
            self.state.running = true;
        }
    }

    /// Stop the countdown and zero it; returns whether it was running
    pub fn cancel(&mut self) -> bool {
        let was_running = self.state.running;
        self.ticks.disarm();
        self.state = TimerState::idle();
        was_running
    }

    /// Fire one tick out of schedule
    ///
    /// The tick source deadline moves forward one period, so a later
    /// `due_ticks` does not count this tick again.
    pub fn tick(&mut self) -> TimerOutcome {
        self.ticks.skip_period();
        self.apply_tick()
    }

    /// Apply a tick already consumed from the tick source
    pub fn apply_tick(&mut self) -> TimerOutcome {
        if !self.state.running {
            return TimerOutcome::Idle;
        }

        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        if self.state.remaining_secs == 0 {
            self.ticks.disarm();
            self.state = TimerState::idle();
            return TimerOutcome::Expired;
        }

        TimerOutcome::Ticked
    }

    /// Number of ticks due on the tick source at `now`
    pub fn due_ticks(&mut self, now: Duration) -> u32 {
        self.ticks.due_ticks(now)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.ticks.next_deadline()
    }
}
