//! csv-visualizer - CSV aggregation and chart rendering
//!
//! A CLI tool that finds CSV files by glob pattern, sums value columns per
//! group key, and writes a line or bar chart next to each source file.
//!
//! Exit codes:
//!   0 - Run completed (individual files may have been skipped)
//!   1 - Invalid arguments, or the configuration could not be loaded

mod analysis;
mod chart;
mod cli;
mod config;
mod error;
mod models;
mod runner;
mod scanner;
mod table;

use anyhow::{Context, Result};
use chart::RenderOptions;
use cli::Args;
use config::JobList;
use models::RunSummary;
use runner::{JobRunner, RunOptions};
use scanner::ScanConfig;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// File written by --init-config.
const SAMPLE_CONFIG_FILE: &str = "charts.json";

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("csv-visualizer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args) {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Critical Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write a sample job list.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(SAMPLE_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            SAMPLE_CONFIG_FILE
        );
        std::process::exit(1);
    }

    std::fs::write(path, JobList::sample_json())
        .with_context(|| format!("Failed to write {}", SAMPLE_CONFIG_FILE))?;

    println!("✅ Created {} with two sample jobs.", SAMPLE_CONFIG_FILE);
    println!("   Edit the patterns, columns and groupby keys to match your data.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` takes
/// precedence over the flags when it is set.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the job list and process every entry.
fn run(args: &Args) -> Result<RunSummary> {
    let config_path = args
        .config
        .as_deref()
        .context("No configuration file given")?;

    let job_list = JobList::load(config_path).context("Failed to load configuration")?;
    info!(
        "✅ Loaded {} job entries from {}",
        job_list.jobs.len(),
        config_path.display()
    );

    if args.dry_run {
        println!("\n🔍 Dry run: resolving patterns (no charts are drawn)...\n");
    }

    let options = RunOptions {
        dry_run: args.dry_run,
        show_progress: args.show_progress(),
        render: RenderOptions {
            width: args.width,
            height: args.height,
        },
        scan: ScanConfig::default(),
    };

    Ok(JobRunner::new(options).run(&job_list.jobs))
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Run Summary:");
    println!(
        "   Started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "   Jobs: {} ({} without matching files)",
        summary.jobs, summary.jobs_without_matches
    );
    println!("   Files matched: {}", summary.files_matched);
    println!("   Charts written: {}", summary.charts_written);
    if summary.files_failed > 0 {
        println!("   Files skipped: {} (see log)", summary.files_failed);
    }
    println!("   Duration: {:.1}s", summary.duration_seconds);
}
