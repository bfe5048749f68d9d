//! Debounce timing options

use std::time::Duration;

/// Timing options for a `Debouncer`
///
/// `wait: None` asks for frame timing when a frame scheduler is available;
/// otherwise it behaves as a zero wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Quiet period that settles a burst
    pub wait: Option<Duration>,
    /// Execute on the first call of a burst
    pub leading: bool,
    /// Execute once the burst settles
    pub trailing: bool,
    /// Longest a burst may defer execution
    pub max_wait: Option<Duration>,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            wait: None,
            leading: false,
            trailing: true,
            max_wait: None,
        }
    }
}

impl DebounceOptions {
    /// Options with an explicit wait and default edges
    pub fn new(wait: Duration) -> Self {
        Self {
            wait: Some(wait),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    #[must_use]
    pub fn with_trailing(mut self, trailing: bool) -> Self {
        self.trailing = trailing;
        self
    }

    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Wait actually used for timer arithmetic
    pub fn effective_wait(&self) -> Duration {
        self.wait.unwrap_or_default()
    }

    /// Max wait raised to at least the effective wait
    pub fn effective_max_wait(&self) -> Option<Duration> {
        let wait = self.effective_wait();
        self.max_wait.map(|max| max.max(wait))
    }
}

/// Coerce a millisecond count into a `Duration`
///
/// NaN and negative values become zero; values too large to represent
/// saturate at `Duration::MAX`.
pub fn coerce_millis(millis: f64) -> Duration {
    if millis.is_nan() || millis <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(millis / 1000.0).unwrap_or(Duration::MAX)
}
