//! Per-detector parameter bundles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ConfigError;

/// Color space used by the uniform-color detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorSpace {
    /// CIE L*a*b* scaled to 8-bit channels.
    #[default]
    Lab,
    /// Hue in `[0, 180)`, saturation and value in `[0, 255]`.
    Hsv,
    /// Raw 8-bit RGB.
    Rgb,
}

impl ColorSpace {
    /// Upper-case identifier, as reported in details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lab => "LAB",
            Self::Hsv => "HSV",
            Self::Rgb => "RGB",
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSpace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LAB" => Ok(Self::Lab),
            "HSV" => Ok(Self::Hsv),
            "RGB" => Ok(Self::Rgb),
            _ => Err(ConfigError::UnknownColorSpace(s.to_string())),
        }
    }
}

/// How the background detector estimates the dominant color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMethod {
    /// Bands along all four edges.
    #[default]
    EdgeBased,
    /// Blocks in the four corners.
    CornerBased,
    /// Three-cluster k-means over the whole image.
    HistogramBased,
}

impl BackgroundMethod {
    /// Snake-case identifier, as reported in details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EdgeBased => "edge_based",
            Self::CornerBased => "corner_based",
            Self::HistogramBased => "histogram_based",
        }
    }
}

impl fmt::Display for BackgroundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundMethod {
    type Err = ConfigError;

    /// Accepts the full names and the short `edge`, `corner`, `histogram` forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge_based" | "edge" => Ok(Self::EdgeBased),
            "corner_based" | "corner" => Ok(Self::CornerBased),
            "histogram_based" | "histogram" => Ok(Self::HistogramBased),
            _ => Err(ConfigError::UnknownBackgroundMethod(s.to_string())),
        }
    }
}

/// A target aspect ratio expressed as `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    /// Width component, always positive.
    pub width: f64,
    /// Height component, always positive.
    pub height: f64,
}

impl AspectRatio {
    /// Creates a ratio. Both components must be finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRatio`] otherwise.
    pub fn new(width: f64, height: f64) -> Result<Self, ConfigError> {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            Ok(Self { width, height })
        } else {
            Err(ConfigError::InvalidRatio(format!("{width}:{height}")))
        }
    }

    /// `width / height`.
    #[must_use]
    pub fn value(self) -> f64 {
        self.width / self.height
    }

    const fn fixed(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRatio(s.trim().to_string());
        let (width, height) = s.trim().split_once(':').ok_or_else(invalid)?;
        let width: f64 = width.trim().parse().map_err(|_| invalid())?;
        let height: f64 = height.trim().parse().map_err(|_| invalid())?;
        Self::new(width, height).map_err(|_| invalid())
    }
}

/// Parses a comma-separated list such as `16:9,4:3,1:1`.
///
/// Malformed entries are skipped with a warning; the result may be empty.
#[must_use]
pub fn parse_ratio_list(list: &str) -> Vec<AspectRatio> {
    list.split(',')
        .filter_map(|entry| match entry.parse::<AspectRatio>() {
            Ok(ratio) => Some(ratio),
            Err(e) => {
                tracing::warn!("Skipping target ratio: {e}");
                None
            }
        })
        .collect()
}

/// The default target ratios: 16:9, 4:3, 1:1, 3:4, 9:16.
#[must_use]
pub fn default_target_ratios() -> Vec<AspectRatio> {
    vec![
        AspectRatio::fixed(16.0, 9.0),
        AspectRatio::fixed(4.0, 3.0),
        AspectRatio::fixed(1.0, 1.0),
        AspectRatio::fixed(3.0, 4.0),
        AspectRatio::fixed(9.0, 16.0),
    ]
}

pub(crate) fn ratios(pairs: &[(f64, f64)]) -> Vec<AspectRatio> {
    pairs
        .iter()
        .map(|&(width, height)| AspectRatio::fixed(width, height))
        .collect()
}

/// Configuration for the border-fill detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderFillConfig {
    /// Fraction of the image height inspected at the top.
    pub top_region_fraction: f64,
    /// Fraction of the image height inspected at the bottom.
    pub bottom_region_fraction: f64,
    /// Luminance strictly below this counts as black.
    pub black_threshold: u8,
    /// Luminance strictly above this counts as white.
    pub white_threshold: u8,
    /// Black fraction a region must exceed to be flagged.
    pub black_fill_threshold: f64,
    /// White fraction threshold. Carried by the presets; white coverage never flags.
    pub white_fill_threshold: f64,
    /// Inspect the top region.
    pub check_top: bool,
    /// Inspect the bottom region.
    pub check_bottom: bool,
    /// Minimum fraction of matching pixels for the fill to count as uniform.
    pub uniformity_required: f64,
}

impl Default for BorderFillConfig {
    fn default() -> Self {
        Self {
            top_region_fraction: 0.1,
            bottom_region_fraction: 0.1,
            black_threshold: 30,
            white_threshold: 225,
            black_fill_threshold: 0.05,
            white_fill_threshold: 0.05,
            check_top: true,
            check_bottom: true,
            uniformity_required: 0.90,
        }
    }
}

/// Configuration for the uniform-color detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniformColorConfig {
    /// Color space samples are compared in.
    pub color_space: ColorSpace,
    /// Maximum per-channel difference from the dominant color.
    pub color_delta_threshold: u32,
    /// Coverage at or above which the image is flagged.
    pub coverage_threshold: f64,
    /// Maximum number of pixels sampled.
    pub sample_size: usize,
    /// Crop a margin from every side before sampling.
    pub ignore_edges: bool,
    /// Margin cropped from each side, as a fraction of the dimension.
    pub edge_ignore_fraction: f64,
    /// Seed for pixel subsampling. `None` seeds from the OS.
    pub sample_seed: Option<u64>,
}

impl Default for UniformColorConfig {
    fn default() -> Self {
        Self {
            color_space: ColorSpace::Lab,
            color_delta_threshold: 15,
            coverage_threshold: 0.85,
            sample_size: 1000,
            ignore_edges: true,
            edge_ignore_fraction: 0.02,
            sample_seed: Some(42),
        }
    }
}

/// Configuration for the background detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundConfig {
    /// Dominant-color estimation method.
    pub method: BackgroundMethod,
    /// Corner block size, as a fraction of each dimension.
    pub corner_sample_fraction: f64,
    /// Edge band thickness, as a fraction of each dimension.
    pub edge_sample_fraction: f64,
    /// Coverage above which the image is flagged.
    pub coverage_threshold: f64,
    /// Maximum Lab distance from the dominant color.
    pub color_tolerance: u32,
    /// Histogram bin count. Not used by the current methods.
    pub histogram_bins: u32,
    /// Dominant-color share threshold. Not used by the current methods.
    pub dominant_color_threshold: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            method: BackgroundMethod::EdgeBased,
            corner_sample_fraction: 0.08,
            edge_sample_fraction: 0.05,
            coverage_threshold: 0.70,
            color_tolerance: 25,
            histogram_bins: 64,
            dominant_color_threshold: 0.60,
        }
    }
}

/// Configuration for the ratio detector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioConfig {
    /// Accepted ratios, checked in order.
    pub target_ratios: Vec<AspectRatio>,
    /// Maximum absolute difference between actual and target ratio.
    pub tolerance: f64,
    /// Enforce the minimum dimensions.
    pub check_minimum_dimensions: bool,
    /// Minimum width in pixels.
    pub minimum_width: u32,
    /// Minimum height in pixels.
    pub minimum_height: u32,
    /// Enforce the maximum dimensions.
    pub check_maximum_dimensions: bool,
    /// Maximum width in pixels.
    pub maximum_width: u32,
    /// Maximum height in pixels.
    pub maximum_height: u32,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            target_ratios: default_target_ratios(),
            tolerance: 0.1,
            check_minimum_dimensions: true,
            minimum_width: 100,
            minimum_height: 100,
            check_maximum_dimensions: false,
            maximum_width: 10_000,
            maximum_height: 10_000,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_color_space_parsing() {
        assert_eq!("lab".parse::<ColorSpace>(), Ok(ColorSpace::Lab));
        assert_eq!(" Hsv ".parse::<ColorSpace>(), Ok(ColorSpace::Hsv));
        assert_eq!("RGB".parse::<ColorSpace>(), Ok(ColorSpace::Rgb));
        assert!("XYZ".parse::<ColorSpace>().is_err());
        assert_eq!(ColorSpace::Lab.to_string(), "LAB");
    }

    #[test]
    fn test_background_method_aliases() {
        assert_eq!(
            "histogram".parse::<BackgroundMethod>(),
            Ok(BackgroundMethod::HistogramBased)
        );
        assert_eq!(
            "CORNER_BASED".parse::<BackgroundMethod>(),
            Ok(BackgroundMethod::CornerBased)
        );
        assert!("center".parse::<BackgroundMethod>().is_err());
    }

    #[test]
    fn test_aspect_ratio_parsing() {
        let ratio: AspectRatio = "16:9".parse().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(ratio.width, 16.0);
        assert_eq!(ratio.height, 9.0);
        assert_eq!(ratio.to_string(), "16:9");

        let a4: AspectRatio = " 1.414 : 1 ".parse().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(a4.to_string(), "1.414:1");

        assert!("16".parse::<AspectRatio>().is_err());
        assert!("16:0".parse::<AspectRatio>().is_err());
        assert!("a:b".parse::<AspectRatio>().is_err());
        assert!("-4:3".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_parse_ratio_list_skips_malformed() {
        let parsed = parse_ratio_list("16:9, bogus ,4:3,,1:0");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].to_string(), "16:9");
        assert_eq!(parsed[1].to_string(), "4:3");
        assert!(parse_ratio_list("nothing").is_empty());
    }

    #[test]
    fn test_defaults() {
        let border = BorderFillConfig::default();
        assert_eq!(border.black_threshold, 30);
        assert!(border.check_top && border.check_bottom);
        assert_eq!(UniformColorConfig::default().sample_seed, Some(42));
        assert_eq!(BackgroundConfig::default().coverage_threshold, 0.70);
        assert_eq!(RatioConfig::default().target_ratios.len(), 5);
    }
}
