//! Delay-based timers on the tokio runtime

use super::{Backend, Scheduler, TimerCallback, TimerHandle};
use crate::{DebounceError, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::trace;

/// Scheduler that runs each callback in a tokio task after a sleep
///
/// Each live timer owns a cancellation sender. Removing the sender from the
/// map (on cancel) wakes the task and drops the callback unrun.
pub struct DelayScheduler {
    /// Runtime the timer tasks are spawned on
    runtime: Handle,
    /// Live timers: timer id -> cancellation sender
    timers: Arc<DashMap<u64, oneshot::Sender<()>>>,
    /// Id counter
    next_id: AtomicU64,
}

impl DelayScheduler {
    /// Create a scheduler spawning onto `runtime`
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a scheduler on the runtime of the calling thread
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| DebounceError::NoRuntime)
    }

    /// Number of timers that have neither fired nor been cancelled
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Scheduler for DelayScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (cancel_tx, cancel_rx) = oneshot::channel();

        // Registered before spawning so a zero delay cannot outrun the insert
        self.timers.insert(id, cancel_tx);

        let timers = Arc::clone(&self.timers);
        self.runtime.spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    if timers.remove(&id).is_some() {
                        callback();
                    }
                }
                _ = cancel_rx => {
                    trace!("Delay timer {} cancelled", id);
                }
            }
        });

        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some((_, cancel_tx)) = self.timers.remove(&handle.id()) {
            let _ = cancel_tx.send(());
        }
    }

    fn backend(&self) -> Backend {
        Backend::Delay
    }
}
