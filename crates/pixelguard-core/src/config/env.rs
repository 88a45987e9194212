//! Environment snapshot and the `custom` mode built from it.

use std::collections::HashMap;
use std::str::FromStr;

use tracing::warn;

use super::params::parse_ratio_list;
use super::{
    AspectRatio, BackgroundConfig, BorderFillConfig, DetectionConfig, DetectorKind, RatioConfig,
    UniformColorConfig,
};

/// Prefix shared by every variable the custom mode reads.
pub const ENV_PREFIX: &str = "PXG_";

const BORDER_TOP_REGION: &str = "PXG_BORDER_FILL_TOP_REGION_PERCENTAGE";
const BORDER_BOTTOM_REGION: &str = "PXG_BORDER_FILL_BOTTOM_REGION_PERCENTAGE";
const BORDER_BLACK_THRESHOLD: &str = "PXG_BORDER_FILL_BLACK_THRESHOLD";
const BORDER_WHITE_THRESHOLD: &str = "PXG_BORDER_FILL_WHITE_THRESHOLD";
const BORDER_BLACK_FILL: &str = "PXG_BORDER_FILL_BLACK_FILL_THRESHOLD";
const BORDER_WHITE_FILL: &str = "PXG_BORDER_FILL_WHITE_FILL_THRESHOLD";
const BORDER_CHECK_TOP: &str = "PXG_BORDER_FILL_CHECK_TOP";
const BORDER_CHECK_BOTTOM: &str = "PXG_BORDER_FILL_CHECK_BOTTOM";
const BORDER_UNIFORMITY: &str = "PXG_BORDER_FILL_UNIFORMITY_REQUIRED";

const UNIFORM_DELTA: &str = "PXG_UNIFORM_COLOR_DELTA_THRESHOLD";
const UNIFORM_SPACE: &str = "PXG_UNIFORM_COLOR_SPACE";
const UNIFORM_COVERAGE: &str = "PXG_UNIFORM_COLOR_COVERAGE_THRESHOLD";
const UNIFORM_SAMPLE_SIZE: &str = "PXG_UNIFORM_COLOR_SAMPLE_SIZE";
const UNIFORM_IGNORE_EDGES: &str = "PXG_UNIFORM_COLOR_IGNORE_EDGES";
const UNIFORM_EDGE_IGNORE: &str = "PXG_UNIFORM_COLOR_EDGE_IGNORE_PERCENTAGE";
const UNIFORM_SAMPLE_SEED: &str = "PXG_UNIFORM_COLOR_SAMPLE_SEED";

const BACKGROUND_METHOD: &str = "PXG_BACKGROUND_DETECTION_METHOD";
const BACKGROUND_CORNER: &str = "PXG_BACKGROUND_CORNER_SAMPLE_PERCENTAGE";
const BACKGROUND_EDGE: &str = "PXG_BACKGROUND_EDGE_SAMPLE_PERCENTAGE";
const BACKGROUND_COVERAGE: &str = "PXG_BACKGROUND_COVERAGE_THRESHOLD";
const BACKGROUND_TOLERANCE: &str = "PXG_BACKGROUND_COLOR_TOLERANCE";
const BACKGROUND_BINS: &str = "PXG_BACKGROUND_HISTOGRAM_BINS";
const BACKGROUND_DOMINANT: &str = "PXG_BACKGROUND_DOMINANT_COLOR_THRESHOLD";

const RATIO_TARGETS: &str = "PXG_RATIO_TARGET_RATIOS";
const RATIO_TOLERANCE: &str = "PXG_RATIO_TOLERANCE";
const RATIO_CHECK_MIN: &str = "PXG_RATIO_CHECK_MINIMUM_DIMENSIONS";
const RATIO_MIN_WIDTH: &str = "PXG_RATIO_MINIMUM_WIDTH";
const RATIO_MIN_HEIGHT: &str = "PXG_RATIO_MINIMUM_HEIGHT";
const RATIO_CHECK_MAX: &str = "PXG_RATIO_CHECK_MAXIMUM_DIMENSIONS";
const RATIO_MAX_WIDTH: &str = "PXG_RATIO_MAXIMUM_WIDTH";
const RATIO_MAX_HEIGHT: &str = "PXG_RATIO_MAXIMUM_HEIGHT";

/// Per-detector enable flag, e.g. `PXG_DETECTOR_RATIO_ENABLED`.
fn enable_flag(kind: DetectorKind) -> &'static str {
    match kind {
        DetectorKind::BorderFill => "PXG_DETECTOR_BORDER_FILL_ENABLED",
        DetectorKind::UniformColor => "PXG_DETECTOR_UNIFORM_COLOR_ENABLED",
        DetectorKind::Background => "PXG_DETECTOR_BACKGROUND_ENABLED",
        DetectorKind::Ratio => "PXG_DETECTOR_RATIO_ENABLED",
    }
}

/// An immutable copy of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the `PXG_*` variables of the current process.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_pairs(std::env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)))
    }

    /// Builds a snapshot from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Raw value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Parses `key`, falling back to `default` when missing or invalid.
    pub fn parsed<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.get(key) else {
            return default;
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring {key}={raw:?}: {e}");
                default
            }
        }
    }

    /// Reads a boolean. `true`, `1`, `yes` and `on` (any case) are true,
    /// anything else present is false.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, |raw| {
            matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }

    /// Reads a ratio list; an absent or fully malformed value yields `default`.
    #[must_use]
    pub fn ratios(&self, key: &str, default: &[AspectRatio]) -> Vec<AspectRatio> {
        let Some(raw) = self.get(key) else {
            return default.to_vec();
        };
        let parsed = parse_ratio_list(raw);
        if parsed.is_empty() {
            warn!("No valid ratios in {key}={raw:?}, using defaults");
            default.to_vec()
        } else {
            parsed
        }
    }

    /// Reads the sampling seed: an integer, or `random` for OS seeding.
    fn seed(&self, key: &str, default: Option<u64>) -> Option<u64> {
        match self.get(key).map(str::trim) {
            None => default,
            Some(raw) if raw.eq_ignore_ascii_case("random") => None,
            Some(raw) => raw.parse().map(Some).unwrap_or_else(|e| {
                warn!("Ignoring {key}={raw:?}: {e}");
                default
            }),
        }
    }

    /// Enabled detectors in canonical order, each toggled by its own flag.
    #[must_use]
    pub fn enabled_detectors(&self) -> Vec<DetectorKind> {
        DetectorKind::ALL
            .into_iter()
            .filter(|&kind| self.flag(enable_flag(kind), true))
            .collect()
    }

    /// Builds the `custom` mode configuration. Every field falls back to the
    /// library default.
    #[must_use]
    pub fn detection_config(&self) -> DetectionConfig {
        DetectionConfig {
            border_fill: self.border_fill_config(),
            uniform_color: self.uniform_color_config(),
            background: self.background_config(),
            ratio: self.ratio_config(),
            ..DetectionConfig::default()
        }
        .with_enabled_detectors(self.enabled_detectors())
    }

    fn border_fill_config(&self) -> BorderFillConfig {
        let d = BorderFillConfig::default();
        BorderFillConfig {
            top_region_fraction: self.parsed(BORDER_TOP_REGION, d.top_region_fraction),
            bottom_region_fraction: self.parsed(BORDER_BOTTOM_REGION, d.bottom_region_fraction),
            black_threshold: self.parsed(BORDER_BLACK_THRESHOLD, d.black_threshold),
            white_threshold: self.parsed(BORDER_WHITE_THRESHOLD, d.white_threshold),
            black_fill_threshold: self.parsed(BORDER_BLACK_FILL, d.black_fill_threshold),
            white_fill_threshold: self.parsed(BORDER_WHITE_FILL, d.white_fill_threshold),
            check_top: self.flag(BORDER_CHECK_TOP, d.check_top),
            check_bottom: self.flag(BORDER_CHECK_BOTTOM, d.check_bottom),
            uniformity_required: self.parsed(BORDER_UNIFORMITY, d.uniformity_required),
        }
    }

    fn uniform_color_config(&self) -> UniformColorConfig {
        let d = UniformColorConfig::default();
        UniformColorConfig {
            color_space: self.parsed(UNIFORM_SPACE, d.color_space),
            color_delta_threshold: self.parsed(UNIFORM_DELTA, d.color_delta_threshold),
            coverage_threshold: self.parsed(UNIFORM_COVERAGE, d.coverage_threshold),
            sample_size: self.parsed(UNIFORM_SAMPLE_SIZE, d.sample_size),
            ignore_edges: self.flag(UNIFORM_IGNORE_EDGES, d.ignore_edges),
            edge_ignore_fraction: self.parsed(UNIFORM_EDGE_IGNORE, d.edge_ignore_fraction),
            sample_seed: self.seed(UNIFORM_SAMPLE_SEED, d.sample_seed),
        }
    }

    fn background_config(&self) -> BackgroundConfig {
        let d = BackgroundConfig::default();
        BackgroundConfig {
            method: self.parsed(BACKGROUND_METHOD, d.method),
            corner_sample_fraction: self.parsed(BACKGROUND_CORNER, d.corner_sample_fraction),
            edge_sample_fraction: self.parsed(BACKGROUND_EDGE, d.edge_sample_fraction),
            coverage_threshold: self.parsed(BACKGROUND_COVERAGE, d.coverage_threshold),
            color_tolerance: self.parsed(BACKGROUND_TOLERANCE, d.color_tolerance),
            histogram_bins: self.parsed(BACKGROUND_BINS, d.histogram_bins),
            dominant_color_threshold: self.parsed(BACKGROUND_DOMINANT, d.dominant_color_threshold),
        }
    }

    fn ratio_config(&self) -> RatioConfig {
        let d = RatioConfig::default();
        RatioConfig {
            target_ratios: self.ratios(RATIO_TARGETS, &d.target_ratios),
            tolerance: self.parsed(RATIO_TOLERANCE, d.tolerance),
            check_minimum_dimensions: self.flag(RATIO_CHECK_MIN, d.check_minimum_dimensions),
            minimum_width: self.parsed(RATIO_MIN_WIDTH, d.minimum_width),
            minimum_height: self.parsed(RATIO_MIN_HEIGHT, d.minimum_height),
            check_maximum_dimensions: self.flag(RATIO_CHECK_MAX, d.check_maximum_dimensions),
            maximum_width: self.parsed(RATIO_MAX_WIDTH, d.maximum_width),
            maximum_height: self.parsed(RATIO_MAX_HEIGHT, d.maximum_height),
        }
    }
}

/// A documented custom-mode variable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EnvVar {
    /// Variable name.
    pub name: &'static str,
    /// Value used when the variable is unset.
    pub default: String,
    /// What the variable controls.
    pub description: &'static str,
}

impl EnvVar {
    fn new(name: &'static str, default: impl ToString, description: &'static str) -> Self {
        Self {
            name,
            default: default.to_string(),
            description,
        }
    }

    /// Every variable read by the custom mode, grouped by detector.
    #[must_use]
    pub fn documented() -> Vec<Self> {
        let border = BorderFillConfig::default();
        let uniform = UniformColorConfig::default();
        let background = BackgroundConfig::default();
        let ratio = RatioConfig::default();
        let targets = ratio
            .target_ratios
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let seed = uniform
            .sample_seed
            .map_or_else(|| "random".to_string(), |s| s.to_string());

        let mut vars: Vec<Self> = DetectorKind::ALL
            .into_iter()
            .map(|kind| Self::new(enable_flag(kind), true, "Run this detector"))
            .collect();
        vars.extend([
            Self::new(BORDER_TOP_REGION, border.top_region_fraction, "Top region height fraction"),
            Self::new(
                BORDER_BOTTOM_REGION,
                border.bottom_region_fraction,
                "Bottom region height fraction",
            ),
            Self::new(
                BORDER_BLACK_THRESHOLD,
                border.black_threshold,
                "Luminance below which a pixel is black (0-255)",
            ),
            Self::new(
                BORDER_WHITE_THRESHOLD,
                border.white_threshold,
                "Luminance above which a pixel is white (0-255)",
            ),
            Self::new(
                BORDER_BLACK_FILL,
                border.black_fill_threshold,
                "Black fraction that flags a region",
            ),
            Self::new(
                BORDER_WHITE_FILL,
                border.white_fill_threshold,
                "White fill threshold (reported, never flags)",
            ),
            Self::new(BORDER_CHECK_TOP, border.check_top, "Inspect the top region"),
            Self::new(BORDER_CHECK_BOTTOM, border.check_bottom, "Inspect the bottom region"),
            Self::new(BORDER_UNIFORMITY, border.uniformity_required, "Required fill uniformity"),
            Self::new(UNIFORM_DELTA, uniform.color_delta_threshold, "Per-channel color tolerance"),
            Self::new(UNIFORM_SPACE, uniform.color_space, "Color space: LAB, HSV or RGB"),
            Self::new(UNIFORM_COVERAGE, uniform.coverage_threshold, "Coverage that flags an image"),
            Self::new(UNIFORM_SAMPLE_SIZE, uniform.sample_size, "Maximum sampled pixels"),
            Self::new(UNIFORM_IGNORE_EDGES, uniform.ignore_edges, "Crop a margin before sampling"),
            Self::new(
                UNIFORM_EDGE_IGNORE,
                uniform.edge_ignore_fraction,
                "Margin fraction per side",
            ),
            Self::new(UNIFORM_SAMPLE_SEED, seed, "Sampling seed, or 'random'"),
            Self::new(
                BACKGROUND_METHOD,
                background.method,
                "edge_based, corner_based or histogram_based",
            ),
            Self::new(
                BACKGROUND_CORNER,
                background.corner_sample_fraction,
                "Corner block fraction",
            ),
            Self::new(BACKGROUND_EDGE, background.edge_sample_fraction, "Edge band fraction"),
            Self::new(
                BACKGROUND_COVERAGE,
                background.coverage_threshold,
                "Coverage that flags an image",
            ),
            Self::new(BACKGROUND_TOLERANCE, background.color_tolerance, "Lab distance tolerance"),
            Self::new(BACKGROUND_BINS, background.histogram_bins, "Histogram bins (unused)"),
            Self::new(
                BACKGROUND_DOMINANT,
                background.dominant_color_threshold,
                "Dominant color threshold (unused)",
            ),
            Self::new(RATIO_TARGETS, targets, "Comma-separated W:H list"),
            Self::new(RATIO_TOLERANCE, ratio.tolerance, "Accepted ratio difference"),
            Self::new(
                RATIO_CHECK_MIN,
                ratio.check_minimum_dimensions,
                "Enforce minimum dimensions",
            ),
            Self::new(RATIO_MIN_WIDTH, ratio.minimum_width, "Minimum width"),
            Self::new(RATIO_MIN_HEIGHT, ratio.minimum_height, "Minimum height"),
            Self::new(
                RATIO_CHECK_MAX,
                ratio.check_maximum_dimensions,
                "Enforce maximum dimensions",
            ),
            Self::new(RATIO_MAX_WIDTH, ratio.maximum_width, "Maximum width"),
            Self::new(RATIO_MAX_HEIGHT, ratio.maximum_height, "Maximum height"),
        ]);
        vars
    }
}
