use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const TICK: Duration = Duration::from_secs(1);

/// Source of "now" for the engine
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock used by the application
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One-second countdown driven by deadlines rather than a sleeping thread.
///
/// While armed, the next deadline is kept. The owner calls `fire_if_due` (or
/// `fire_if_overdue`) in a loop to apply every passed boundary one by one.
/// Cancelling drops the deadline, so a late poll after a reset does nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    total_secs: u64,
    remaining_secs: u64,
    next_deadline: Option<Instant>,
}

impl Countdown {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            remaining_secs: total_secs,
            next_deadline: None,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        if self.remaining_secs > 0 {
            self.next_deadline = Some(now + TICK);
        }
    }

    pub fn cancel(&mut self) {
        self.next_deadline = None;
    }

    pub fn reset(&mut self, total_secs: u64) {
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.next_deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// Fire the pending tick if its deadline has passed.
    /// Returns true when a tick was applied.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        self.fire_when(|deadline| deadline <= now)
    }

    /// Like [`fire_if_due`](Self::fire_if_due) but a deadline equal to `now`
    /// is left pending.
    pub fn fire_if_overdue(&mut self, now: Instant) -> bool {
        self.fire_when(|deadline| deadline < now)
    }

    fn fire_when(&mut self, passed: impl FnOnce(Instant) -> bool) -> bool {
        match self.next_deadline {
            Some(deadline) if passed(deadline) => {
                self.tick();
                if self.remaining_secs > 0 {
                    self.next_deadline = Some(deadline + TICK);
                }
                true
            }
            _ => false,
        }
    }

    /// Decrement by one second. Stops itself at zero.
    pub fn tick(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.next_deadline = None;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }
}
