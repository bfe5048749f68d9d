//! Settle CLI library
//!
//! Glue around the `debounce` crate: settings, logging setup, replay
//! scripts and the command implementations used by the `settle` binary.

pub mod cmd;
pub mod logging;
pub mod script;
pub mod settings;
