//! Batch command - analyze every image under one or more paths.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pixelguard_adapters::FsImageSource;
use pixelguard_core::config::DetectionMode;
use pixelguard_core::{BatchSummary, ImageSource, PixelGuard};
use tracing::{info, warn};

use super::{ExitCode, ModeArgs, OutputFormat};
use crate::config::AppConfig;
use crate::output::{self, ProgressBar};

/// Mode used by `batch` when neither the CLI nor a config file names one.
pub const DEFAULT_MODE: DetectionMode = DetectionMode::Photo;

/// Arguments for `pixelguard batch`.
#[derive(Args, Clone, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct BatchArgs {
    /// Files or directories to analyze
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// List every detector's details under each image (console format)
    #[arg(long)]
    pub details: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl BatchArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.mode.mode = args.mode.mode.or_else(|| config.mode());
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }
        args.format = args.format.or_else(|| config.format());
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }
        args
    }
}

/// Result of running the batch command.
pub struct BatchResult {
    /// Counts over the batch.
    #[allow(dead_code)] // Exposed for programmatic use
    pub summary: BatchSummary,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the batch command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &BatchArgs) -> Result<BatchResult> {
    info!("Running batch command on {} paths", args.paths.len());

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();
    if total == Some(0) {
        warn!("No supported images found");
    }

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let engine = PixelGuard::new(args.mode.detection_config(DEFAULT_MODE));
    let report = engine.analyze_batch(&source, &progress_bar);

    let reporter = output::create(
        args.format.unwrap_or_default(),
        args.output.as_deref(),
        args.pretty,
        args.details,
    )?;
    reporter.report_batch(&report)?;
    reporter.flush()?;

    Ok(BatchResult {
        summary: report.summary,
        exit_code: ExitCode::from_problematic(report.summary.problematic),
    })
}
