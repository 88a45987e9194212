//! Detection configuration: per-detector parameters, mode presets and the
//! environment-driven custom mode.

mod env;
mod mode;
mod params;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

pub use env::{EnvSnapshot, EnvVar, ENV_PREFIX};
pub use mode::{ConfigFactory, DetectionMode};
pub use params::{
    default_target_ratios, parse_ratio_list, AspectRatio, BackgroundConfig, BackgroundMethod,
    BorderFillConfig, ColorSpace, RatioConfig, UniformColorConfig,
};

/// The four built-in detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Black bands at the top or bottom.
    BorderFill,
    /// One color covering most of the image.
    UniformColor,
    /// One background color dominating the image.
    Background,
    /// Aspect ratio and dimension limits.
    Ratio,
}

impl DetectorKind {
    /// Every detector, in canonical execution order.
    pub const ALL: [Self; 4] = [
        Self::BorderFill,
        Self::UniformColor,
        Self::Background,
        Self::Ratio,
    ];

    /// Identifier used as `detector_name`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BorderFill => "border_fill",
            Self::UniformColor => "uniform_color",
            Self::Background => "background",
            Self::Ratio => "ratio",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown detector '{s}'"))
    }
}

/// Complete engine configuration: one parameter bundle per detector and the
/// ordered list of enabled detectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionConfig {
    /// Border-fill parameters.
    pub border_fill: BorderFillConfig,
    /// Uniform-color parameters.
    pub uniform_color: UniformColorConfig,
    /// Background parameters.
    pub background: BackgroundConfig,
    /// Ratio parameters.
    pub ratio: RatioConfig,
    enabled_detectors: Vec<DetectorKind>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            border_fill: BorderFillConfig::default(),
            uniform_color: UniformColorConfig::default(),
            background: BackgroundConfig::default(),
            ratio: RatioConfig::default(),
            enabled_detectors: DetectorKind::ALL.to_vec(),
        }
    }
}

impl DetectionConfig {
    /// Builds the configuration for a preset mode.
    ///
    /// Only [`DetectionMode::Custom`] reads `env`.
    #[must_use]
    pub fn from_mode(mode: DetectionMode, env: &EnvSnapshot) -> Self {
        ConfigFactory::from_mode(mode, env)
    }

    /// Parses a mode name and builds its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMode`] for unrecognized names.
    pub fn from_mode_name(mode: &str, env: &EnvSnapshot) -> Result<Self, ConfigError> {
        Ok(Self::from_mode(mode.parse()?, env))
    }

    /// Enabled detectors, unique and in execution order.
    #[must_use]
    pub fn enabled_detectors(&self) -> &[DetectorKind] {
        &self.enabled_detectors
    }

    /// Whether `kind` runs under this configuration.
    #[must_use]
    pub fn is_enabled(&self, kind: DetectorKind) -> bool {
        self.enabled_detectors.contains(&kind)
    }

    /// Replaces the enabled list. Duplicates are dropped, keeping the first.
    #[must_use]
    pub fn with_enabled_detectors(mut self, kinds: impl IntoIterator<Item = DetectorKind>) -> Self {
        let mut enabled = Vec::with_capacity(DetectorKind::ALL.len());
        for kind in kinds {
            if !enabled.contains(&kind) {
                enabled.push(kind);
            }
        }
        self.enabled_detectors = enabled;
        self
    }
}
