//! SnapZone CLI: display inspection and non-interactive capture.
//!
//! Usage:
//!   snapzone displays [--json]    List displays and the virtual screen
//!   snapzone capture [OPTIONS]    Capture the screen, a display, or a region
//!   snapzone check                Check capture capabilities
//!   snapzone config [--init]      Show or initialize configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snapzone_common::config::{AppConfig, QualityPreset, ScreenshotMode};

mod commands;

#[derive(Parser)]
#[command(
    name = "snapzone",
    about = "Multi-monitor area screenshots",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List displays, the virtual screen and the display under the pointer
    Displays {
        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Capture without the interactive overlay
    Capture {
        /// Capture scope: auto|mouse|all (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<ScreenshotMode>,

        /// Zero-based display index to capture whole
        #[arg(short, long, conflicts_with = "region")]
        display: Option<usize>,

        /// Region in virtual-screen pixels: X,Y,W,H
        #[arg(short, long, value_parser = commands::capture::parse_region, allow_hyphen_values = true)]
        region: Option<snapzone_platform_core::ScreenRect>,

        /// Quality preset: low|medium|high (defaults to the configured preset)
        #[arg(short, long)]
        quality: Option<QualityPreset>,

        /// Output directory (defaults to the configured save directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name prefix (defaults to the configured prefix)
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Check capture capabilities
    Check,

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long, requires = "init")]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    snapzone_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Displays { json } => commands::displays::run(json),
        Commands::Capture {
            mode,
            display,
            region,
            quality,
            output,
            prefix,
        } => commands::capture::run(commands::capture::CaptureArgs {
            mode: mode.unwrap_or(config.screenshot_mode),
            display,
            region,
            quality: quality.unwrap_or(config.quality_preset),
            output: output.unwrap_or_else(|| config.save_directory.clone()),
            prefix: prefix.unwrap_or_else(|| config.file_prefix.clone()),
        }),
        Commands::Check => commands::check::run(),
        Commands::Config { init, force } => commands::config::run(init, force),
    }
}
