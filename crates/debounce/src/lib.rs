//! Debounce controller for Settle
//!
//! This crate provides:
//! - `Debouncer`: collapses bursts of calls into leading/trailing executions
//! - Pluggable scheduling (tokio delay timers or next-frame callbacks)
//! - Injectable clocks for deterministic tests
//! - TOML configuration with lenient millisecond coercion

pub mod clock;
pub mod config;
pub mod debouncer;
pub mod error;
pub mod options;
pub mod scheduler;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::DebounceConfig;
pub use debouncer::{Debouncer, DebouncerBuilder};
pub use error::DebounceError;
pub use options::DebounceOptions;
pub use scheduler::{Backend, DelayScheduler, FrameDriver, FrameScheduler, Scheduler, TimerHandle};

/// Result type for debounce operations
pub type Result<T> = std::result::Result<T, DebounceError>;
