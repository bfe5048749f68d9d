//! Next-frame callbacks
//!
//! A `FrameScheduler` is a queue of callbacks that all run on the next
//! `tick()`. The host either ticks it from its own render loop or lets a
//! `FrameDriver` tick it at a fixed frame rate.

use super::{Backend, Scheduler, TimerCallback, TimerHandle};
use crate::{DebounceError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

/// Frame rate used when none is configured
pub const DEFAULT_FPS: u32 = 60;

#[derive(Default)]
struct FrameQueue {
    next_id: u64,
    frame: u64,
    callbacks: Vec<(u64, TimerCallback)>,
}

/// Queue of callbacks waiting for the next frame
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    queue: Arc<Mutex<FrameQueue>>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `callback` for the next frame
    pub fn request_frame(&self, callback: TimerCallback) -> TimerHandle {
        let mut queue = self.queue.lock();
        queue.next_id += 1;
        let id = queue.next_id;
        queue.callbacks.push((id, callback));
        TimerHandle::new(id)
    }

    /// Drop a queued callback
    pub fn cancel_frame(&self, handle: TimerHandle) {
        self.queue
            .lock()
            .callbacks
            .retain(|(id, _)| *id != handle.id());
    }

    /// Run one frame
    ///
    /// Only callbacks queued before the tick run; callbacks they queue wait
    /// for the following frame. Returns how many callbacks ran.
    pub fn tick(&self) -> usize {
        let due = {
            let mut queue = self.queue.lock();
            queue.frame += 1;
            std::mem::take(&mut queue.callbacks)
        };

        let ran = due.len();
        for (_, callback) in due {
            callback();
        }
        ran
    }

    /// Callbacks waiting for the next frame
    pub fn queued(&self) -> usize {
        self.queue.lock().callbacks.len()
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.queue.lock().frame
    }

    /// Tick this scheduler `fps` times per second on the current runtime
    pub fn drive(&self, fps: u32) -> Result<FrameDriver> {
        let runtime = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;
        let period = frame_interval(fps);
        let frames = self.clone();

        debug!("Starting frame driver ({} fps, period {:?})", fps.max(1), period);

        let task = runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let ran = frames.tick();
                if ran > 0 {
                    trace!("Frame ran {} callbacks", ran);
                }
            }
        });

        Ok(FrameDriver { task })
    }
}

impl Scheduler for FrameScheduler {
    fn schedule(&self, _delay: Duration, callback: TimerCallback) -> TimerHandle {
        self.request_frame(callback)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.cancel_frame(handle);
    }

    fn backend(&self) -> Backend {
        Backend::Frame
    }
}

/// Background task ticking a `FrameScheduler`
///
/// Ticking stops when the driver is stopped or dropped.
pub struct FrameDriver {
    task: JoinHandle<()>,
}

impl FrameDriver {
    /// Stop ticking
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Period between frames at `fps` (clamped to at least 1 fps)
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
