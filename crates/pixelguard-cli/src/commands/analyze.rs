//! Analyze command - run the detectors on one image.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pixelguard_adapters::load_image;
use pixelguard_core::config::{parse_ratio_list, DetectionConfig, DetectionMode};
use pixelguard_core::{ImageAnalysis, PixelGuard};
use tracing::info;

use super::{parse_fraction, ExitCode, ModeArgs, OutputFormat};
use crate::config::AppConfig;
use crate::output;

/// Arguments for `pixelguard analyze`.
#[derive(Args, Clone, Debug)]
pub struct AnalyzeArgs {
    /// Image to analyze
    pub image: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Black border fill threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub border_fill_threshold: Option<f64>,

    /// Uniform color coverage threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub uniform_threshold: Option<f64>,

    /// Background dominance threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub background_threshold: Option<f64>,

    /// Color similarity tolerance for uniform color and background
    #[arg(long)]
    pub color_tolerance: Option<u32>,

    /// Aspect ratio matching tolerance
    #[arg(long)]
    pub ratio_tolerance: Option<f64>,

    /// Minimum image width in pixels
    #[arg(long)]
    pub min_width: Option<u32>,

    /// Minimum image height in pixels
    #[arg(long)]
    pub min_height: Option<u32>,

    /// Target aspect ratios as comma-separated W:H pairs, e.g. "16:9,4:3"
    #[arg(long)]
    pub target_ratios: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl AnalyzeArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.mode.mode = args.mode.mode.or_else(|| config.mode());
        args.format = args.format.or_else(|| config.format());
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args
    }

    /// Mode configuration with the command-line overrides applied.
    #[must_use]
    pub fn detection_config(&self) -> DetectionConfig {
        let mut config = self.mode.detection_config(DetectionMode::Default);

        if let Some(threshold) = self.border_fill_threshold {
            config.border_fill.black_fill_threshold = threshold;
        }
        if let Some(threshold) = self.uniform_threshold {
            config.uniform_color.coverage_threshold = threshold;
        }
        if let Some(threshold) = self.background_threshold {
            config.background.coverage_threshold = threshold;
        }
        if let Some(tolerance) = self.color_tolerance {
            config.uniform_color.color_delta_threshold = tolerance;
            config.background.color_tolerance = tolerance;
        }
        if let Some(tolerance) = self.ratio_tolerance {
            config.ratio.tolerance = tolerance;
        }
        if let Some(width) = self.min_width {
            config.ratio.minimum_width = width;
        }
        if let Some(height) = self.min_height {
            config.ratio.minimum_height = height;
        }
        if let Some(ref ratios) = self.target_ratios {
            config.ratio.target_ratios = parse_ratio_list(ratios);
        }

        config
    }
}

/// Result of running the analyze command.
pub struct AnalyzeResult {
    /// The analysis that was reported.
    #[allow(dead_code)] // Exposed for programmatic use
    pub analysis: ImageAnalysis,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the analyze command.
///
/// Expects `args` to have been processed through `with_config()` first.
pub fn run(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    info!("Analyzing {}", args.image.display());

    let image = load_image(&args.image)?;
    let engine = PixelGuard::new(args.detection_config());
    let analysis = engine.analyze(&image);

    let reporter = output::create(
        args.format.unwrap_or_default(),
        args.output.as_deref(),
        args.pretty,
        true,
    )?;
    reporter.report_single(&analysis)?;
    reporter.flush()?;

    let exit_code = ExitCode::from_problematic(usize::from(analysis.is_problematic()));
    Ok(AnalyzeResult {
        analysis,
        exit_code,
    })
}
