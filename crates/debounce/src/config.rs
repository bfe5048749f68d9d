//! TOML configuration for debounce options
//!
//! Millisecond fields are read leniently: integers, floats and numeric
//! strings are accepted, and anything non-numeric or negative becomes zero.

use crate::options::{coerce_millis, DebounceOptions};
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Serializable form of `DebounceOptions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period in milliseconds (omit for frame timing)
    #[serde(deserialize_with = "lenient_millis", skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,

    /// Execute on the first call of a burst
    pub leading: bool,

    /// Execute once the burst settles
    pub trailing: bool,

    /// Longest deferral in milliseconds
    #[serde(deserialize_with = "lenient_millis", skip_serializing_if = "Option::is_none")]
    pub max_wait_ms: Option<u64>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        let defaults = DebounceOptions::default();
        Self {
            wait_ms: None,
            leading: defaults.leading,
            trailing: defaults.trailing,
            max_wait_ms: None,
        }
    }
}

impl DebounceConfig {
    /// Parse a standalone `[debounce]`-style table
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Convert into runtime options
    pub fn options(&self) -> DebounceOptions {
        DebounceOptions {
            wait: self.wait_ms.map(Duration::from_millis),
            leading: self.leading,
            trailing: self.trailing,
            max_wait: self.max_wait_ms.map(Duration::from_millis),
        }
    }
}

impl From<&DebounceOptions> for DebounceConfig {
    fn from(opts: &DebounceOptions) -> Self {
        Self {
            wait_ms: opts.wait.map(duration_to_millis),
            leading: opts.leading,
            trailing: opts.trailing,
            max_wait_ms: opts.max_wait.map(duration_to_millis),
        }
    }
}

fn duration_to_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMillis {
    Int(i64),
    Float(f64),
    Text(String),
    Other(toml::Value),
}

fn lenient_millis<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = match RawMillis::deserialize(deserializer)? {
        RawMillis::Int(n) => u64::try_from(n).unwrap_or(0),
        RawMillis::Float(f) => duration_to_millis(coerce_millis(f)),
        RawMillis::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| duration_to_millis(coerce_millis(f)))
            .unwrap_or(0),
        RawMillis::Other(_) => 0,
    };
    Ok(Some(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = DebounceConfig::from_toml_str("").unwrap();
        assert_eq!(config, DebounceConfig::default());
        assert_eq!(config.options(), DebounceOptions::default());
    }

    #[test]
    fn test_full_config() {
        let config = DebounceConfig::from_toml_str(
            "wait_ms = 300\nleading = true\ntrailing = false\nmax_wait_ms = 1000\n",
        )
        .unwrap();

        let opts = config.options();
        assert_eq!(opts.wait, Some(Duration::from_millis(300)));
        assert!(opts.leading);
        assert!(!opts.trailing);
        assert_eq!(opts.max_wait, Some(Duration::from_millis(1000)));
    }

    #[test]
    fn test_lenient_millis_coercion() {
        let cases = [
            ("wait_ms = \"250\"", 250),
            ("wait_ms = \" 40 \"", 40),
            ("wait_ms = \"soon\"", 0),
            ("wait_ms = -5", 0),
            ("wait_ms = 12.7", 12),
            ("wait_ms = -3.5", 0),
            ("wait_ms = true", 0),
        ];

        for (source, expected) in cases {
            let config = DebounceConfig::from_toml_str(source).unwrap();
            assert_eq!(config.wait_ms, Some(expected), "source: {}", source);
        }
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = DebounceConfig::from_toml_str("wait_ms = = 3").unwrap_err();
        assert!(matches!(err, crate::DebounceError::Config(_)));
    }

    #[test]
    fn test_serialize_skips_missing_waits() {
        let text = toml::to_string(&DebounceConfig::default()).unwrap();
        assert!(!text.contains("wait_ms"));
        assert!(text.contains("trailing = true"));

        let opts = DebounceOptions::new(Duration::from_millis(75));
        let text = toml::to_string(&DebounceConfig::from(&opts)).unwrap();
        assert!(text.contains("wait_ms = 75"));
    }
}
