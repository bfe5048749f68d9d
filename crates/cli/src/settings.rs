//! Settings file management
//!
//! Settings live in `~/.config/settle/config.toml` unless `--config` names
//! another file. Command-line flags are applied on top of the file.

use anyhow::{Context, Result};
use clap::Args;
use debounce::scheduler::frame::DEFAULT_FPS;
use debounce::DebounceConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Wait used when neither the file nor the flags set one
pub const DEFAULT_WAIT_MS: u64 = 300;

/// Accepted frame rates
pub const FPS_RANGE: std::ops::RangeInclusive<u32> = 1..=240;

/// Complete settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub debounce: DebounceConfig,
    pub frames: FrameSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig {
                wait_ms: Some(DEFAULT_WAIT_MS),
                ..DebounceConfig::default()
            },
            frames: FrameSettings::default(),
        }
    }
}

/// Frame scheduling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameSettings {
    /// Offer frame timing to debouncers without a wait
    pub enabled: bool,
    /// Frames per second
    pub fps: u32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            fps: DEFAULT_FPS,
        }
    }
}

impl Settings {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !FPS_RANGE.contains(&self.frames.fps) {
            anyhow::bail!(
                "frames.fps must be between {} and {} (got {})",
                FPS_RANGE.start(),
                FPS_RANGE.end(),
                self.frames.fps
            );
        }
        Ok(())
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse settings")
    }
}

/// Timing flags shared by `run` and `replay`
#[derive(Debug, Clone, Default, Args)]
pub struct TimingArgs {
    /// Quiet period in milliseconds before a search runs
    #[arg(long, value_name = "MS")]
    pub wait: Option<u64>,

    /// Search on the first keystroke of a burst
    #[arg(long)]
    pub leading: bool,

    /// Don't search once a burst settles
    #[arg(long)]
    pub no_trailing: bool,

    /// Longest a burst may defer a search, in milliseconds
    #[arg(long, value_name = "MS")]
    pub max_wait: Option<u64>,

    /// Time searches by frame ticks (unless --wait is given)
    #[arg(long)]
    pub frames: bool,

    /// Frame rate for --frames
    #[arg(long, value_name = "FPS")]
    pub fps: Option<u32>,
}

impl TimingArgs {
    /// Apply flags on top of file settings
    pub fn apply(&self, settings: &mut Settings) {
        if self.frames {
            settings.frames.enabled = true;
            if self.wait.is_none() {
                settings.debounce.wait_ms = None;
            }
        }
        if let Some(wait) = self.wait {
            settings.debounce.wait_ms = Some(wait);
        }
        if self.leading {
            settings.debounce.leading = true;
        }
        if self.no_trailing {
            settings.debounce.trailing = false;
        }
        if let Some(max_wait) = self.max_wait {
            settings.debounce.max_wait_ms = Some(max_wait);
        }
        if let Some(fps) = self.fps {
            settings.frames.fps = fps;
        }
    }
}

/// Default settings file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("settle").join("config.toml"))
}

/// Load settings
///
/// An explicit path must exist. The default path is optional; without it
/// the built-in defaults apply.
pub fn load(explicit: Option<&Path>) -> Result<Settings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_file_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Settings::default()),
        },
    };

    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let settings = Settings::from_toml_str(&source)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    settings.validate()?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Annotated example settings file
pub fn example_config() -> String {
    format!(
        r#"# Settle configuration

[debounce]
# Quiet period before a search runs. Remove this line to time searches
# by frame ticks when [frames] is enabled.
wait_ms = {wait}
# Search on the first keystroke of a burst
leading = false
# Search once the burst settles
trailing = true
# Longest a burst may defer a search
# max_wait_ms = 1000

[frames]
enabled = false
fps = {fps}
"#,
        wait = DEFAULT_WAIT_MS,
        fps = DEFAULT_FPS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_example_config_round_trips_to_defaults() {
        let settings = Settings::from_toml_str(&example_config()).unwrap();
        assert_eq!(settings, Settings::default());
        settings.validate().unwrap();
    }

    #[test]
    fn test_missing_debounce_table_keeps_default_wait() {
        let settings = Settings::from_toml_str("[frames]\nenabled = true\n").unwrap();
        assert_eq!(settings.debounce.wait_ms, Some(DEFAULT_WAIT_MS));
        assert!(settings.frames.enabled);
    }

    #[test]
    fn test_debounce_table_without_wait_means_frame_timing() {
        let settings = Settings::from_toml_str("[debounce]\nleading = true\n").unwrap();
        assert_eq!(settings.debounce.wait_ms, None);
        assert!(settings.debounce.leading);
    }

    #[test]
    fn test_validate_rejects_bad_fps() {
        let mut settings = Settings::default();
        settings.frames.fps = 0;
        assert!(settings.validate().is_err());

        settings.frames.fps = 500;
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("frames.fps"), "unexpected error: {}", err);
    }

    #[test]
    fn test_flags_override_file() {
        let mut settings = Settings::default();
        let args = TimingArgs {
            wait: Some(120),
            leading: true,
            no_trailing: true,
            max_wait: Some(400),
            ..TimingArgs::default()
        };
        args.apply(&mut settings);

        let opts = settings.debounce.options();
        assert_eq!(opts.wait, Some(Duration::from_millis(120)));
        assert!(opts.leading);
        assert!(!opts.trailing);
        assert_eq!(opts.max_wait, Some(Duration::from_millis(400)));
    }

    #[test]
    fn test_frames_flag_drops_wait_unless_given() {
        let mut settings = Settings::default();
        TimingArgs { frames: true, fps: Some(30), ..TimingArgs::default() }.apply(&mut settings);
        assert!(settings.frames.enabled);
        assert_eq!(settings.frames.fps, 30);
        assert_eq!(settings.debounce.wait_ms, None);

        let mut settings = Settings::default();
        TimingArgs { frames: true, wait: Some(50), ..TimingArgs::default() }.apply(&mut settings);
        assert_eq!(settings.debounce.wait_ms, Some(50));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settle.toml");
        std::fs::write(&path, "[debounce]\nwait_ms = \"75\"\n\n[frames]\nfps = 30\n").unwrap();

        let settings = load(Some(&path)).unwrap();
        assert_eq!(settings.debounce.wait_ms, Some(75));
        assert_eq!(settings.frames.fps, 30);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_rejects_invalid_fps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settle.toml");
        std::fs::write(&path, "[frames]\nfps = 1000\n").unwrap();
        assert!(load(Some(&path)).is_err());
    }
}
