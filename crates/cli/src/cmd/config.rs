//! Configuration command
//!
//! Shows the effective settings, the settings file location, or an example
//! settings file.

use crate::settings::{self, Settings};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

/// Print effective settings (file plus flags)
pub fn run_show(settings: &Settings, source: Option<&Path>) -> Result<()> {
    let location = match source {
        Some(path) => path.display().to_string(),
        None => match settings::config_file_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };

    let text = toml::to_string_pretty(settings).context("Failed to render settings")?;

    println!("{}", "Effective Configuration".bold());
    println!("{}: {}\n", "Source".dimmed(), location.dimmed());
    print!("{}", text);

    if settings.debounce.wait_ms.is_none() {
        let timing = if settings.frames.enabled {
            format!("frame ticks at {} fps", settings.frames.fps)
        } else {
            "zero wait (no frame loop enabled)".to_string()
        };
        println!("\n{} {}", "Timing:".yellow(), timing);
    }

    Ok(())
}

/// Print the settings file path
pub fn run_path(source: Option<&Path>) -> Result<()> {
    let path = match source {
        Some(path) => path.to_path_buf(),
        None => settings::config_file_path().context("Could not determine config file path")?,
    };

    println!("{}", path.display());
    if !path.exists() {
        println!("{}", "File does not exist. Use --example to generate one.".yellow());
    }
    Ok(())
}

/// Print an example settings file
pub fn run_example() -> Result<()> {
    print!("{}", settings::example_config());
    Ok(())
}
