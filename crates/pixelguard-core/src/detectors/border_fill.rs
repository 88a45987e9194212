//! Border-fill detection: solid black bands at the top or bottom of an image,
//! typically left by letterboxing or bad crops.

use image::{DynamicImage, RgbImage};
use serde_json::{json, Value};

use super::{percent, run_guarded};
use crate::config::BorderFillConfig;
use crate::domain::{DetectionError, DetectionResult, Detector, Details};
use crate::sampling::{luminance, region_extent, rows};

const ERROR_KIND: &str = "border_fill_error";

#[derive(Debug, Clone, Copy)]
enum Region {
    Top,
    Bottom,
}

impl Region {
    const fn key(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        }
    }
}

/// Fill statistics for one border region.
#[derive(Debug, Clone)]
struct RegionAnalysis {
    region: Region,
    black_fraction: f64,
    white_fraction: f64,
    issues: Vec<String>,
}

impl RegionAnalysis {
    fn is_problematic(&self) -> bool {
        !self.issues.is_empty()
    }

    fn to_json(&self) -> Value {
        json!({
            "region": self.region.key(),
            "black_percentage": self.black_fraction,
            "white_percentage": self.white_fraction,
            "is_problematic": self.is_problematic(),
            "issues": self.issues,
        })
    }
}

/// Flags images whose top or bottom rows are dominated by black.
///
/// White coverage is measured and reported per region but never flags.
#[derive(Debug, Clone, Default)]
pub struct BorderFillDetector {
    config: BorderFillConfig,
}

impl BorderFillDetector {
    /// Detector identifier.
    pub const NAME: &'static str = "border_fill";

    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: BorderFillConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &BorderFillConfig {
        &self.config
    }

    fn analyze(&self, image: &RgbImage) -> Result<DetectionResult, DetectionError> {
        let mut details = Details::new();
        let mut issues = Vec::new();
        let mut checked = 0u32;
        let mut flagged = 0u32;

        let regions = [
            (Region::Top, self.config.check_top, self.config.top_region_fraction),
            (
                Region::Bottom,
                self.config.check_bottom,
                self.config.bottom_region_fraction,
            ),
        ];
        for (region, enabled, fraction) in regions {
            if !enabled {
                continue;
            }
            let analysis = self.analyze_region(image, region, fraction)?;
            checked += 1;
            if analysis.is_problematic() {
                flagged += 1;
                issues.extend(analysis.issues.iter().cloned());
            }
            details.insert(format!("{}_border", region.key()), analysis.to_json());
        }

        let confidence = if checked == 0 {
            0.0
        } else {
            f64::from(flagged) / f64::from(checked)
        };
        Ok(DetectionResult::new(
            Self::NAME,
            !issues.is_empty(),
            confidence,
            details,
            issues,
        ))
    }

    #[allow(clippy::cast_precision_loss)]
    fn analyze_region(
        &self,
        image: &RgbImage,
        region: Region,
        fraction: f64,
    ) -> Result<RegionAnalysis, DetectionError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DetectionError::Detector {
                kind: ERROR_KIND,
                message: format!(
                    "{} region fraction must be within [0, 1], got {fraction}",
                    region.key()
                ),
            });
        }

        let height = region_extent(image.height(), fraction);
        let start = match region {
            Region::Top => 0,
            Region::Bottom => image.height() - height,
        };
        let luma: Vec<u8> = rows(image, start, height)
            .into_iter()
            .map(luminance)
            .collect();

        let (black_fraction, white_fraction) = if luma.is_empty() {
            (0.0, 0.0)
        } else {
            let total = luma.len() as f64;
            let black = luma.iter().filter(|&&l| l < self.config.black_threshold).count();
            let white = luma.iter().filter(|&&l| l > self.config.white_threshold).count();
            (black as f64 / total, white as f64 / total)
        };

        let mut issues = Vec::new();
        if self.is_black_filled(black_fraction) {
            issues.push(format!(
                "{} border has black fill: {}",
                region.title(),
                percent(black_fraction)
            ));
        }

        Ok(RegionAnalysis {
            region,
            black_fraction,
            white_fraction,
            issues,
        })
    }

    /// The fill must exceed its threshold and also be uniform across the region.
    fn is_black_filled(&self, fraction: f64) -> bool {
        fraction > self.config.black_fill_threshold && fraction >= self.config.uniformity_required
    }
}

impl Detector for BorderFillDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn detect(&self, image: &DynamicImage) -> DetectionResult {
        run_guarded(Self::NAME, image, |rgb| self.analyze(rgb))
    }
}
