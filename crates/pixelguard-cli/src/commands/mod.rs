//! CLI command definitions and handlers.

pub mod analyze;
pub mod batch;
pub mod env_vars;
pub mod show_config;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pixelguard_core::config::{DetectionConfig, DetectionMode, EnvSnapshot};

/// PixelGuard - Image quality control for catalog and document images
#[derive(Parser)]
#[command(name = "pixelguard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single image
    Analyze(analyze::AnalyzeArgs),
    /// Analyze every image in one or more folders
    Batch(batch::BatchArgs),
    /// List detection modes, or print the configuration of one mode
    ShowConfig(show_config::ShowConfigArgs),
    /// Print the environment variables read by the custom mode
    ShowEnvVars(env_vars::EnvVarsArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every analyzed image passed.
    Success = 0,
    /// At least one image was flagged.
    IssuesFound = 1,
    /// Usage or runtime error.
    Error = 2,
}

impl ExitCode {
    /// Exit status for a problematic count.
    #[must_use]
    pub const fn from_problematic(problematic: usize) -> Self {
        if problematic > 0 {
            Self::IssuesFound
        } else {
            Self::Success
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Console,
    /// A single JSON document
    Json,
    /// JSON Lines (one analysis per line)
    Jsonl,
    /// `file_path,is_problematic` rows
    Csv,
}

impl OutputFormat {
    /// Parses a config-file format name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(name, true).ok()
    }
}

/// Mode selection shared by `analyze` and `batch`.
#[derive(Args, Clone, Debug, Default)]
pub struct ModeArgs {
    /// Detection mode: strict, default, lenient, photo, document or custom
    #[arg(short, long)]
    pub mode: Option<DetectionMode>,
}

impl ModeArgs {
    /// Resolves the mode, falling back to `fallback`. `custom` reads `PXG_*`
    /// variables from the process environment.
    #[must_use]
    pub fn detection_config(&self, fallback: DetectionMode) -> DetectionConfig {
        let mode = self.mode.unwrap_or(fallback);
        let env = if mode == DetectionMode::Custom {
            EnvSnapshot::from_process()
        } else {
            EnvSnapshot::default()
        };
        DetectionConfig::from_mode(mode, &env)
    }
}

/// Parse and validate a fraction (0.0-1.0).
pub fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
pub fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
