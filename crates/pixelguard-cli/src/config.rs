//! Configuration file support for pixelguard.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/pixelguard/config.toml` (lowest priority)
//! - Project-local: `.pixelguard.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use pixelguard_core::config::DetectionMode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::commands::OutputFormat;

/// Project-local config file name.
pub const PROJECT_FILE: &str = ".pixelguard.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Detection mode used when `--mode` is not given.
    pub mode: Option<String>,
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "console", "json", "jsonl" or "csv".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/pixelguard/config.toml`
    /// 2. Project-local: `.pixelguard.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Configured detection mode, if valid.
    #[must_use]
    pub fn mode(&self) -> Option<DetectionMode> {
        self.general.mode.as_deref().and_then(|m| m.parse().ok())
    }

    /// Configured output format, if valid.
    #[must_use]
    pub fn format(&self) -> Option<OutputFormat> {
        self.output
            .format
            .as_deref()
            .and_then(OutputFormat::from_name)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref m) = self.general.mode {
            if let Err(e) = m.parse::<DetectionMode>() {
                return Err(format!("general.mode: {e}"));
            }
        }

        if let Some(ref f) = self.output.format {
            if OutputFormat::from_name(f).is_none() {
                return Err(format!(
                    "output.format must be 'console', 'json', 'jsonl' or 'csv', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.mode = other.general.mode.or_else(|| self.general.mode.take());
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pixelguard").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.pixelguard.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
