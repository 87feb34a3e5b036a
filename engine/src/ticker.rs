use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Shared, mutable tick period. Clones observe each other's changes.
#[derive(Debug, Clone)]
pub struct Speed {
    period: Rc<Cell<Duration>>,
}

impl Speed {
    pub fn new(period: Duration) -> Self {
        Speed {
            period: Rc::new(Cell::new(period)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period.get()
    }

    pub fn set_period(&self, period: Duration) {
        self.period.set(period);
    }
}

/// A repeating task driven by polling. The period is read from the shared
/// [`Speed`] on every poll, so speed changes apply to the very next decision.
#[derive(Debug)]
pub struct Ticker {
    speed: Speed,
    last_fire: Instant,
    cancelled: bool,
}

impl Ticker {
    pub fn new(speed: Speed, now: Instant) -> Self {
        Ticker {
            speed,
            last_fire: now,
            cancelled: false,
        }
    }

    pub fn speed(&self) -> &Speed {
        &self.speed
    }

    /// Returns true when a full period has passed since the last fire.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.cancelled {
            return false;
        }
        if now.saturating_duration_since(self.last_fire) >= self.speed.period() {
            self.last_fire = now;
            return true;
        }
        false
    }

    /// How long until the next poll would fire. `None` once cancelled.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        if self.cancelled {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.last_fire);
        Some(self.speed.period().saturating_sub(elapsed))
    }

    /// Restart the current period from `now`.
    pub fn reset(&mut self, now: Instant) {
        self.last_fire = now;
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
