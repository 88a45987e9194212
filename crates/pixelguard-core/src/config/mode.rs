//! Named detection presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::params::ratios;
use super::{
    BackgroundConfig, BackgroundMethod, BorderFillConfig, ColorSpace, DetectionConfig,
    EnvSnapshot, RatioConfig, UniformColorConfig,
};
use crate::domain::ConfigError;

/// A named bundle of thresholds for all four detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Low tolerance for issues.
    Strict,
    /// Library defaults.
    #[default]
    Default,
    /// High tolerance for minor issues.
    Lenient,
    /// Tuned for photographs.
    Photo,
    /// Tuned for scanned documents.
    Document,
    /// Every field read from `PXG_*` environment variables.
    Custom,
}

impl DetectionMode {
    /// Every mode, in display order.
    pub const ALL: [Self; 6] = [
        Self::Strict,
        Self::Default,
        Self::Lenient,
        Self::Photo,
        Self::Document,
        Self::Custom,
    ];

    /// Lower-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Default => "default",
            Self::Lenient => "lenient",
            Self::Photo => "photo",
            Self::Document => "document",
            Self::Custom => "custom",
        }
    }

    /// One-line description for listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Strict => "Strict detection with low tolerance for issues",
            Self::Default => "Balanced detection suitable for most use cases",
            Self::Lenient => "Lenient detection with high tolerance for minor issues",
            Self::Photo => "Optimized for photo analysis with natural image characteristics",
            Self::Document => "Optimized for document analysis with text and structured content",
            Self::Custom => "Custom configuration based on environment variables",
        }
    }
}

impl fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownMode(s.to_string()))
    }
}

/// Builds a [`DetectionConfig`] for a [`DetectionMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigFactory;

impl ConfigFactory {
    /// Returns the preset for `mode`. Only [`DetectionMode::Custom`] reads `env`.
    #[must_use]
    pub fn from_mode(mode: DetectionMode, env: &EnvSnapshot) -> DetectionConfig {
        match mode {
            DetectionMode::Default => DetectionConfig::default(),
            DetectionMode::Strict => strict(),
            DetectionMode::Lenient => lenient(),
            DetectionMode::Photo => photo(),
            DetectionMode::Document => document(),
            DetectionMode::Custom => env.detection_config(),
        }
    }
}

fn strict() -> DetectionConfig {
    DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.03,
            white_fill_threshold: 0.03,
            uniformity_required: 0.95,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            color_delta_threshold: 10,
            coverage_threshold: 0.80,
            ..UniformColorConfig::default()
        },
        background: BackgroundConfig {
            coverage_threshold: 0.65,
            color_tolerance: 15,
            ..BackgroundConfig::default()
        },
        ratio: RatioConfig {
            target_ratios: ratios(&[(16.0, 9.0), (4.0, 3.0), (1.0, 1.0)]),
            tolerance: 0.05,
            minimum_width: 200,
            minimum_height: 200,
            ..RatioConfig::default()
        },
        ..DetectionConfig::default()
    }
}

fn lenient() -> DetectionConfig {
    DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.15,
            white_fill_threshold: 0.15,
            uniformity_required: 0.80,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            color_delta_threshold: 30,
            coverage_threshold: 0.95,
            ..UniformColorConfig::default()
        },
        background: BackgroundConfig {
            coverage_threshold: 0.85,
            color_tolerance: 35,
            ..BackgroundConfig::default()
        },
        ratio: RatioConfig {
            target_ratios: ratios(&[
                (16.0, 9.0),
                (4.0, 3.0),
                (1.0, 1.0),
                (3.0, 4.0),
                (9.0, 16.0),
                (21.0, 9.0),
            ]),
            tolerance: 0.2,
            minimum_width: 50,
            minimum_height: 50,
            ..RatioConfig::default()
        },
        ..DetectionConfig::default()
    }
}

fn photo() -> DetectionConfig {
    DetectionConfig {
        border_fill: BorderFillConfig {
            top_region_fraction: 0.05,
            bottom_region_fraction: 0.05,
            black_fill_threshold: 0.08,
            white_fill_threshold: 0.12,
            uniformity_required: 0.85,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            color_space: ColorSpace::Lab,
            color_delta_threshold: 20,
            coverage_threshold: 0.90,
            ignore_edges: true,
            ..UniformColorConfig::default()
        },
        background: BackgroundConfig {
            method: BackgroundMethod::EdgeBased,
            coverage_threshold: 0.75,
            color_tolerance: 25,
            ..BackgroundConfig::default()
        },
        ratio: RatioConfig {
            tolerance: 0.1,
            minimum_width: 300,
            minimum_height: 300,
            ..RatioConfig::default()
        },
        ..DetectionConfig::default()
    }
}

fn document() -> DetectionConfig {
    DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.02,
            white_fill_threshold: 0.30,
            uniformity_required: 0.95,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            color_space: ColorSpace::Rgb,
            color_delta_threshold: 25,
            coverage_threshold: 0.95,
            ignore_edges: false,
            ..UniformColorConfig::default()
        },
        background: BackgroundConfig {
            method: BackgroundMethod::HistogramBased,
            coverage_threshold: 0.80,
            color_tolerance: 30,
            ..BackgroundConfig::default()
        },
        ratio: RatioConfig {
            target_ratios: ratios(&[(4.0, 3.0), (1.0, 1.0), (3.0, 4.0), (1.414, 1.0)]),
            tolerance: 0.05,
            minimum_width: 500,
            minimum_height: 500,
            ..RatioConfig::default()
        },
        ..DetectionConfig::default()
    }
}
