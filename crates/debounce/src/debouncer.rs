//! Debounce controller
//!
//! A `Debouncer` wraps an action so that a burst of calls (each arriving
//! less than `wait` after the previous one) collapses into at most one
//! execution per enabled edge:
//! - leading edge: the first call of the burst, executed immediately
//! - trailing edge: once the burst has been quiet for `wait`, executed
//!   with the last call's arguments
//!
//! `max_wait` caps how long a burst can keep deferring execution.
//!
//! Each controller owns at most one live timer. Timer callbacks carry a
//! sequence number and only act if it still matches the controller's
//! current timer, so cancelled, flushed or superseded timers are inert.

use crate::clock::{Clock, TokioClock};
use crate::options::DebounceOptions;
use crate::scheduler::{Backend, DelayScheduler, FrameScheduler, Scheduler, TimerHandle};
use crate::{DebounceError, Result};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

type Action<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// Builder for `Debouncer`
///
/// Scheduler selection happens in `build()` and is fixed afterwards:
/// 1. an explicit `scheduler()` always wins
/// 2. no `wait` and a `frames()` scheduler available: frame timing
/// 3. otherwise: tokio delay timers on the current runtime
pub struct DebouncerBuilder<A, R> {
    action: Option<Action<A, R>>,
    options: DebounceOptions,
    frames: Option<FrameScheduler>,
    scheduler: Option<Arc<dyn Scheduler>>,
    clock: Option<Arc<dyn Clock>>,
}

impl<A, R> Default for DebouncerBuilder<A, R> {
    fn default() -> Self {
        Self {
            action: None,
            options: DebounceOptions::default(),
            frames: None,
            scheduler: None,
            clock: None,
        }
    }
}

impl<A, R> DebouncerBuilder<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Action to debounce
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// Replace all timing options at once
    pub fn options(mut self, options: DebounceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn wait(mut self, wait: Duration) -> Self {
        self.options.wait = Some(wait);
        self
    }

    pub fn leading(mut self, leading: bool) -> Self {
        self.options.leading = leading;
        self
    }

    pub fn trailing(mut self, trailing: bool) -> Self {
        self.options.trailing = trailing;
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.options.max_wait = Some(max_wait);
        self
    }

    /// Make frame scheduling available
    pub fn frames(mut self, frames: FrameScheduler) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Use a specific scheduler regardless of `wait`
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Time source (defaults to `TokioClock`)
    pub fn clock<C: Clock>(mut self, clock: C) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Finish the debouncer
    ///
    /// Fails with `InvalidAction` if no action was supplied, and with
    /// `NoRuntime` if delay timers were selected outside a tokio runtime.
    pub fn build(self) -> Result<Debouncer<A, R>> {
        let action = self.action.ok_or(DebounceError::InvalidAction)?;

        let scheduler: Arc<dyn Scheduler> = match (self.scheduler, self.frames) {
            (Some(scheduler), _) => scheduler,
            (None, Some(frames)) if self.options.wait.is_none() => Arc::new(frames),
            (None, _) => Arc::new(DelayScheduler::current()?),
        };

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(TokioClock),
        };

        debug!(
            "Built debouncer (backend: {:?}, wait: {:?}, leading: {}, trailing: {}, max_wait: {:?})",
            scheduler.backend(),
            self.options.wait,
            self.options.leading,
            self.options.trailing,
            self.options.max_wait
        );

        Ok(Debouncer {
            inner: Arc::new(Inner {
                action,
                wait: self.options.effective_wait(),
                max_wait: self.options.effective_max_wait(),
                options: self.options,
                scheduler,
                clock,
                state: Mutex::new(State::default()),
            }),
        })
    }
}

/// Debounced wrapper around an action
///
/// Cloning yields another handle to the same controller. When the last
/// handle is dropped any live timer is cancelled.
pub struct Debouncer<A, R> {
    inner: Arc<Inner<A, R>>,
}

impl<A, R> Clone for Debouncer<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> Debouncer<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    pub fn builder() -> DebouncerBuilder<A, R> {
        DebouncerBuilder::new()
    }

    /// Trailing-edge debouncer on tokio timers
    pub fn new<F>(wait: Duration, action: F) -> Result<Self>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::builder().wait(wait).action(action).build()
    }

    /// Invoke the wrapper
    ///
    /// Returns the result of this call's execution if it triggered one,
    /// otherwise the result of the most recent execution (`None` before the
    /// first).
    pub fn call(&self, args: A) -> Option<R> {
        let inner = &self.inner;
        let now = inner.clock.now();
        let mut state = inner.state.lock();

        let invoking = inner.should_invoke(&state, now);
        state.pending_args = Some(args);
        state.last_call = Some(now);

        if invoking {
            if state.timer.is_none() {
                // Leading edge: opens the burst and its max-wait window
                state.last_invoke = Some(now);
                inner.start_timer(&mut state, inner.wait);
                if !inner.options.leading {
                    return state.result.clone();
                }
                trace!("Leading edge execution");
                let args = state.pending_args.take();
                drop(state);
                return args.map(|args| inner.invoke(args));
            }

            if inner.max_wait.is_some() {
                // Calls arriving faster than the timer can observe max_wait
                trace!("Max wait reached during burst");
                inner.start_timer(&mut state, inner.wait);
                state.last_invoke = Some(now);
                let args = state.pending_args.take();
                drop(state);
                return args.map(|args| inner.invoke(args));
            }
        }

        if state.timer.is_none() {
            inner.start_timer(&mut state, inner.wait);
        }
        state.result.clone()
    }

    /// Drop the pending timer and pending call
    ///
    /// The cached result is kept.
    pub fn cancel(&self) {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        if let Some(timer) = state.timer.take() {
            inner.scheduler.cancel(timer.handle);
            debug!("Cancelled pending debounce timer");
        }
        state.pending_args = None;
        state.last_call = None;
        state.last_invoke = None;
    }

    /// Execute a pending call now
    ///
    /// With no timer pending, returns the cached result unchanged.
    pub fn flush(&self) -> Option<R> {
        let inner = &self.inner;
        let mut state = inner.state.lock();
        let Some(timer) = state.timer.take() else {
            return state.result.clone();
        };
        inner.scheduler.cancel(timer.handle);

        let now = inner.clock.now();
        match inner.trailing_edge(&mut state, now) {
            Some(args) => {
                debug!("Flushing pending debounced call");
                drop(state);
                Some(inner.invoke(args))
            }
            None => state.result.clone(),
        }
    }

    /// Whether a timer is currently scheduled
    pub fn pending(&self) -> bool {
        self.inner.state.lock().timer.is_some()
    }

    /// Result of the most recent execution
    pub fn last_result(&self) -> Option<R> {
        self.inner.state.lock().result.clone()
    }

    /// Options as supplied to the builder
    pub fn options(&self) -> DebounceOptions {
        self.inner.options
    }

    /// Scheduling backend chosen at construction
    pub fn backend(&self) -> Backend {
        self.inner.scheduler.backend()
    }
}

#[derive(Clone, Copy)]
struct LiveTimer {
    seq: u64,
    handle: TimerHandle,
}

struct State<A, R> {
    /// Arguments of the latest call not yet executed
    pending_args: Option<A>,
    /// The single live timer, if any
    timer: Option<LiveTimer>,
    /// Sequence number of the most recently started timer
    timer_seq: u64,
    last_call: Option<Instant>,
    last_invoke: Option<Instant>,
    /// Result of the latest execution
    result: Option<R>,
}

impl<A, R> Default for State<A, R> {
    fn default() -> Self {
        Self {
            pending_args: None,
            timer: None,
            timer_seq: 0,
            last_call: None,
            last_invoke: None,
            result: None,
        }
    }
}

struct Inner<A, R> {
    action: Action<A, R>,
    /// Effective wait
    wait: Duration,
    /// Effective max wait (never below `wait`)
    max_wait: Option<Duration>,
    options: DebounceOptions,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    state: Mutex<State<A, R>>,
}

impl<A, R> Inner<A, R>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
{
    fn should_invoke(&self, state: &State<A, R>, now: Instant) -> bool {
        let Some(last_call) = state.last_call else {
            return true;
        };

        // A clock that went backward settles the burst
        let Some(since_call) = now.checked_duration_since(last_call) else {
            return true;
        };
        if since_call >= self.wait {
            return true;
        }

        match (self.max_wait, state.last_invoke) {
            (Some(max_wait), Some(last_invoke)) => now
                .checked_duration_since(last_invoke)
                .is_some_and(|since_invoke| since_invoke >= max_wait),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn remaining_wait(&self, state: &State<A, R>, now: Instant) -> Duration {
        let since_call = state
            .last_call
            .map(|last_call| now.saturating_duration_since(last_call))
            .unwrap_or_default();
        let waiting = self.wait.saturating_sub(since_call);

        match (self.max_wait, state.last_invoke) {
            (Some(max_wait), Some(last_invoke)) => {
                let since_invoke = now.saturating_duration_since(last_invoke);
                waiting.min(max_wait.saturating_sub(since_invoke))
            }
            _ => waiting,
        }
    }

    /// Replace the live timer with a new one firing after `delay`
    fn start_timer(self: &Arc<Self>, state: &mut State<A, R>, delay: Duration) {
        if let Some(previous) = state.timer.take() {
            self.scheduler.cancel(previous.handle);
        }

        state.timer_seq += 1;
        let seq = state.timer_seq;
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = self.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.timer_expired(seq);
                }
            }),
        );

        trace!("Started debounce timer {} ({:?})", seq, delay);
        state.timer = Some(LiveTimer { seq, handle });
    }

    fn timer_expired(self: &Arc<Self>, seq: u64) {
        let now = self.clock.now();
        let mut state = self.state.lock();

        if state.timer.map(|timer| timer.seq) != Some(seq) {
            trace!("Ignoring stale debounce timer {}", seq);
            return;
        }

        if !self.should_invoke(&state, now) {
            let remaining = self.remaining_wait(&state, now);
            state.timer = None;
            self.start_timer(&mut state, remaining);
            return;
        }

        state.timer = None;
        if let Some(args) = self.trailing_edge(&mut state, now) {
            trace!("Trailing edge execution");
            drop(state);
            self.invoke(args);
        }
    }

    /// Settle the burst; returns the arguments to execute, if any
    ///
    /// The caller has already cleared the timer.
    fn trailing_edge(&self, state: &mut State<A, R>, now: Instant) -> Option<A> {
        let args = state.pending_args.take();
        if self.options.trailing && args.is_some() {
            state.last_invoke = Some(now);
            args
        } else {
            None
        }
    }

    /// Run the action with no lock held, then cache its result
    fn invoke(&self, args: A) -> R {
        let result = (self.action)(args);
        self.state.lock().result = Some(result.clone());
        result
    }
}

impl<A, R> Drop for Inner<A, R> {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            self.scheduler.cancel(timer.handle);
        }
    }
}
