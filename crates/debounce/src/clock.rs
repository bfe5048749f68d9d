//! Time sources for the debouncer
//!
//! Every timestamp the debouncer records comes from a `Clock`, so tests can
//! drive time explicitly (including stepping it backward).

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait Clock: Send + Sync + 'static {
    /// Current time
    fn now(&self) -> Instant;
}

/// Reads tokio's clock, which follows paused time in tests
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Reads `std::time::Instant` directly
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock
///
/// Clones share the same reading.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock frozen at `origin`
    pub fn starting_at(origin: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(origin)),
        }
    }

    /// Move time forward
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now += delta;
    }

    /// Move time backward, stopping at the earliest representable instant
    pub fn rewind(&self, delta: Duration) {
        let mut now = self.now.lock();
        if let Some(earlier) = now.checked_sub(delta) {
            *now = earlier;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}
