//! Time management utilities
//!
//! The engine's fixed-timestep loop reads time through the [`Clock`] trait so
//! the catch-up policy can be driven deterministically in tests and demos.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of monotonic time, in seconds since an arbitrary origin
pub trait Clock {
    /// Seconds elapsed since the clock's origin
    fn now(&self) -> f64;
}

/// Wall-clock time measured from the moment the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Manually advanced clock
///
/// Clones share the same time value, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Create a clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        self.seconds.set(self.seconds.get() + seconds);
    }

    /// Jump the clock to an absolute time
    pub fn set(&self, seconds: f64) {
        self.seconds.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}
