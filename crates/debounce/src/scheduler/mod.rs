//! Timer scheduling backends
//!
//! The debouncer only needs two primitives: run a callback later, and
//! cancel a callback that has not run yet. Two implementations exist:
//! - `DelayScheduler`: tokio tasks that sleep for the requested delay
//! - `FrameScheduler`: callbacks queued for the next frame tick

pub mod delay;
pub mod frame;

pub use delay::DelayScheduler;
pub use frame::{FrameDriver, FrameScheduler};

use std::time::Duration;

/// Callback run when a timer fires
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle to a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a backend-specific identifier
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Backend-specific identifier
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Which kind of timer a scheduler produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Wall-clock delays
    Delay,
    /// Next-frame callbacks
    Frame,
}

/// Uniform scheduling capability used by `Debouncer`
///
/// Cancelling a handle that already fired (or was already cancelled) must
/// be a no-op.
pub trait Scheduler: Send + Sync + 'static {
    /// Run `callback` after `delay`
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Prevent a scheduled callback from running
    fn cancel(&self, handle: TimerHandle);

    /// Kind of timers this scheduler produces
    fn backend(&self) -> Backend;
}
