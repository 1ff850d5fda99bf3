//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Smallest accepted canvas dimension, in pixels.
const MIN_CANVAS_PX: u32 = 200;

/// csv-visualizer - aggregate CSV columns and chart them
///
/// Finds CSV files by glob pattern, sums the configured value columns per
/// group, and writes a line or bar chart PNG next to each source file.
///
/// Examples:
///   csv-visualizer --config charts.json
///   csv-visualizer --config charts.json --dry-run
///   csv-visualizer --config charts.json --width 1600 --height 900
///   csv-visualizer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the JSON config file defining source files and columns
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "CSV_VISUALIZER_CONFIG",
        required_unless_present = "init_config"
    )]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: resolve patterns and list files without drawing charts
    #[arg(long)]
    pub dry_run: bool,

    /// Chart width in pixels
    #[arg(long, default_value = "1000", value_name = "PX")]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value = "600", value_name = "PX")]
    pub height: u32,

    /// Generate a sample charts.json configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.config.is_none() {
            return Err("A configuration file is required (--config)".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.width < MIN_CANVAS_PX || self.height < MIN_CANVAS_PX {
            return Err(format!(
                "Chart dimensions must be at least {}x{} pixels",
                MIN_CANVAS_PX, MIN_CANVAS_PX
            ));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether to draw a progress bar while rendering.
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.dry_run
    }
}
