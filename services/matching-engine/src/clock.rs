//! Time source injected into the engine
//!
//! The engine never reads the wall clock directly; everything it stamps
//! comes from a `Clock`. Production uses the monotonic clock, replay and
//! tests use a counting clock so identical intent streams produce
//! identical logs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use types::numeric::Timestamp;

/// Monotonic nanosecond time source.
pub trait Clock: Send {
    fn now(&self) -> Timestamp;
}

/// Nanoseconds elapsed since the clock was created.
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_nanos() as Timestamp
    }
}

/// Deterministic counter clock: each call returns the next integer.
pub struct StepClock {
    next: AtomicU64,
}

impl StepClock {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: Timestamp) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StepClock {
    fn now(&self) -> Timestamp {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_step_clock_counts() {
        let clock = StepClock::new();
        assert_eq!(clock.now(), 1);
        assert_eq!(clock.now(), 2);
        assert_eq!(clock.now(), 3);
    }

    #[test]
    fn test_step_clock_start() {
        let clock = StepClock::starting_at(100);
        assert_eq!(clock.now(), 100);
        assert_eq!(clock.now(), 101);
    }
}
