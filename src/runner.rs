//! Job runner.
//!
//! Walks the job list in order. For each entry the pattern is resolved, and
//! every matched file is loaded, aggregated and rendered on its own. A failure
//! on one file is logged and counted, then the next file is processed.

use crate::analysis;
use crate::chart::{ChartRenderer, ChartSpec, RenderOptions};
use crate::config::JobConfig;
use crate::error::ProcessError;
use crate::models::RunSummary;
use crate::scanner::{FileResolver, ScanConfig};
use crate::table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Options controlling a run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Resolve and list files without loading or rendering them.
    pub dry_run: bool,
    /// Show a progress bar per job entry.
    pub show_progress: bool,
    /// Canvas settings for rendered charts.
    pub render: RenderOptions,
    /// Glob matching settings.
    pub scan: ScanConfig,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            show_progress: false,
            render: RenderOptions::default(),
            scan: ScanConfig::default(),
        }
    }
}

/// Runs scan-aggregate-render jobs sequentially.
pub struct JobRunner {
    options: RunOptions,
    resolver: FileResolver,
    renderer: ChartRenderer,
}

impl JobRunner {
    /// Create a new job runner.
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            resolver: FileResolver::new(options.scan),
            renderer: ChartRenderer::new(options.render),
        }
    }

    /// Process every job entry in order and return the outcome counters.
    pub fn run(&self, jobs: &[JobConfig]) -> RunSummary {
        let start = Instant::now();
        let mut summary = RunSummary::start();

        for (i, job) in jobs.iter().enumerate() {
            info!("--- Processing job {} of {} ---", i + 1, jobs.len());
            summary.jobs += 1;
            self.run_job(job, &mut summary);
        }

        summary.duration_seconds = start.elapsed().as_secs_f64();
        summary
    }

    fn run_job(&self, job: &JobConfig, summary: &mut RunSummary) {
        let files = match self.resolver.resolve(&job.directory) {
            Ok(files) => files,
            Err(e) => {
                error!("Skipping job: {}", e);
                summary.jobs_without_matches += 1;
                return;
            }
        };

        info!("Found {} files matching '{}'", files.len(), job.directory);
        if files.is_empty() {
            summary.jobs_without_matches += 1;
            return;
        }
        summary.files_matched += files.len();

        if self.options.dry_run {
            for file in &files {
                let spec = ChartSpec::for_source(file, job);
                println!("     📄 {} -> {}", file.display(), spec.output.display());
            }
            return;
        }

        let progress = self.progress_bar(files.len());

        for file in &files {
            if let Some(ref pb) = progress {
                pb.set_message(display_name(file));
            }

            match self.process_file(file, job) {
                Ok(output) => {
                    info!("✅ Generated chart: {}", output.display());
                    summary.charts_written += 1;
                }
                Err(e) => {
                    error!("❌ Failed to process {}: {}", file.display(), e);
                    summary.files_failed += 1;
                }
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
    }

    /// Load, aggregate and render one file. Returns the chart path.
    pub fn process_file(&self, file: &Path, job: &JobConfig) -> Result<PathBuf, ProcessError> {
        info!("⏳ Processing {}...", display_name(file));

        let table = Table::load(file)?;
        let series = analysis::aggregate(&table, job)?;
        debug!(
            "{} groups, total {} in {}",
            series.len(),
            series.total(),
            file.display()
        );

        let spec = ChartSpec::for_source(file, job);
        self.renderer.render(&series, &spec)?;
        Ok(spec.output)
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.options.show_progress {
            return None;
        }

        let pb = ProgressBar::new(len as u64);
        match ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => warn!("Invalid progress bar template: {}", e),
        }
        Some(pb)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
