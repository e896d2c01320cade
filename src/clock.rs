//! Time sources for the coordinator's debounce timers

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for replays and tests
///
/// Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    current: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            current: Rc::new(Cell::new(origin)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    /// Move to `to`; never moves backwards
    pub fn set(&self, to: Instant) {
        if to > self.current.get() {
            self.current.set(to);
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.current.get() - self.origin
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(other.elapsed(), Duration::from_millis(250));
        assert_eq!(other.now(), clock.origin() + Duration::from_millis(250));
    }

    #[test]
    fn test_set_never_moves_backwards() {
        let clock = ManualClock::new();
        clock.advance(Duration::from_millis(100));
        clock.set(clock.origin());
        assert_eq!(clock.elapsed(), Duration::from_millis(100));
    }
}
