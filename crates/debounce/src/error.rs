//! Error types for debouncer construction

use thiserror::Error;

/// Errors raised while building a debouncer or loading its configuration.
///
/// Once a `Debouncer` exists, none of its operations can fail.
#[derive(Debug, Error)]
pub enum DebounceError {
    /// The builder was finished without a callable action
    #[error("expected a callable action, none was supplied")]
    InvalidAction,

    /// Delay scheduling was selected outside of a tokio runtime
    #[error("delay scheduling requires a running tokio runtime")]
    NoRuntime,

    /// Configuration text was not valid TOML
    #[error("invalid debounce config: {0}")]
    Config(#[from] toml::de::Error),
}
