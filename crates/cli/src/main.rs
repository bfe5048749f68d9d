//! Settle CLI - settle command

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::cmd;
use cli_lib::logging;
use cli_lib::settings::{self, Settings, TimingArgs};
use std::path::{Path, PathBuf};

/// Settle - debounced search input from the terminal
#[derive(Parser)]
#[command(name = "settle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (default: ~/.config/settle/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Debounce search queries read line by line from stdin
    Run {
        #[command(flatten)]
        timing: TimingArgs,

        /// At end of input, wait for the burst to settle instead of flushing
        #[arg(long)]
        no_flush: bool,
    },
    /// Replay a timed keystroke script (`<offset_ms> <text>` per line)
    Replay {
        /// Script file
        script: PathBuf,

        #[command(flatten)]
        timing: TimingArgs,

        /// At end of script, wait for the burst to settle instead of flushing
        #[arg(long)]
        no_flush: bool,
    },
    /// Show effective configuration
    Config {
        /// Print the settings file path
        #[arg(long, conflicts_with = "example")]
        path: bool,

        /// Print an example settings file
        #[arg(long)]
        example: bool,

        #[command(flatten)]
        timing: TimingArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Held until exit so file logs are flushed
    let _log_guard = logging::init(cli.log_file.as_deref())?;

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run { timing, no_flush } => {
            let settings = effective_settings(config, &timing)?;
            cmd::run::run(&settings, !no_flush).await
        }
        Commands::Replay { script, timing, no_flush } => {
            let settings = effective_settings(config, &timing)?;
            cmd::replay::run(&settings, &script, !no_flush).await
        }
        Commands::Config { path, example, timing } => {
            if example {
                return cmd::config::run_example();
            }
            if path {
                return cmd::config::run_path(config);
            }
            let settings = effective_settings(config, &timing)?;
            cmd::config::run_show(&settings, config)
        }
    }
}

/// Settings file with command-line flags applied on top
fn effective_settings(config: Option<&Path>, timing: &TimingArgs) -> Result<Settings> {
    let mut settings = settings::load(config)?;
    timing.apply(&mut settings);
    settings.validate()?;
    Ok(settings)
}
