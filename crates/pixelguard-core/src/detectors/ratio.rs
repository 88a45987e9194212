//! Aspect-ratio and dimension checks.

use image::DynamicImage;
use serde_json::json;

use super::finish;
use crate::config::{AspectRatio, RatioConfig};
use crate::domain::{into_details, DetectionError, DetectionResult, Detector};
use crate::sampling;

const ERROR_KIND: &str = "ratio_detection_error";

/// Outcome of scanning the target list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RatioMatch {
    /// A target within tolerance, the first one in list order.
    Within(AspectRatio),
    /// No target within tolerance; the nearest one, if any target exists.
    Outside(Option<AspectRatio>),
}

/// Flags images whose aspect ratio matches no target or whose dimensions
/// violate the configured bounds.
#[derive(Debug, Clone, Default)]
pub struct RatioDetector {
    config: RatioConfig,
}

impl RatioDetector {
    /// Detector identifier.
    pub const NAME: &'static str = "ratio";

    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: RatioConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &RatioConfig {
        &self.config
    }

    #[allow(clippy::cast_precision_loss)]
    fn analyze(&self, width: u32, height: u32) -> Result<DetectionResult, DetectionError> {
        let tolerance = self.config.tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(DetectionError::Detector {
                kind: ERROR_KIND,
                message: format!("tolerance must be a non-negative number, got {tolerance}"),
            });
        }

        let actual = f64::from(width) / f64::from(height);
        let dimension_violations = self.dimension_violations(width, height);
        let ratio_violations = match self.match_ratio(actual) {
            RatioMatch::Within(_) => Vec::new(),
            RatioMatch::Outside(None) => {
                vec![format!("Ratio {actual:.3} doesn't match any target ratios")]
            }
            RatioMatch::Outside(Some(closest)) => vec![format!(
                "Ratio {actual:.3} doesn't match any target ratios. Closest: {:.3} ({closest})",
                closest.value()
            )],
        };

        let issues: Vec<String> = dimension_violations
            .iter()
            .chain(&ratio_violations)
            .cloned()
            .collect();
        let max_issues = (self.config.target_ratios.len() + 2).max(1);
        let confidence = issues.len() as f64 / max_issues as f64;

        let targets: Vec<[f64; 2]> = self
            .config
            .target_ratios
            .iter()
            .map(|r| [r.width, r.height])
            .collect();
        let details = into_details(json!({
            "width": width,
            "height": height,
            "actual_aspect_ratio": actual,
            "target_ratios": targets,
            "tolerance": tolerance,
            "aspect_ratio_violations": ratio_violations,
            "dimension_violations": dimension_violations,
        }));

        Ok(DetectionResult::new(
            Self::NAME,
            !issues.is_empty(),
            confidence,
            details,
            issues,
        ))
    }

    fn dimension_violations(&self, width: u32, height: u32) -> Vec<String> {
        let c = &self.config;
        let mut violations = Vec::new();
        if c.check_minimum_dimensions {
            if width < c.minimum_width {
                violations.push(format!("Width {width} is below minimum {}", c.minimum_width));
            }
            if height < c.minimum_height {
                violations.push(format!("Height {height} is below minimum {}", c.minimum_height));
            }
        }
        if c.check_maximum_dimensions {
            if width > c.maximum_width {
                violations.push(format!("Width {width} exceeds maximum {}", c.maximum_width));
            }
            if height > c.maximum_height {
                violations.push(format!("Height {height} exceeds maximum {}", c.maximum_height));
            }
        }
        violations
    }

    /// Scans targets in configured order. The first target within tolerance
    /// wins even if a later one is closer.
    fn match_ratio(&self, actual: f64) -> RatioMatch {
        let mut closest: Option<(AspectRatio, f64)> = None;
        for &target in &self.config.target_ratios {
            let difference = (actual - target.value()).abs();
            if difference <= self.config.tolerance {
                return RatioMatch::Within(target);
            }
            if closest.map_or(true, |(_, best)| difference < best) {
                closest = Some((target, difference));
            }
        }
        RatioMatch::Outside(closest.map(|(target, _)| target))
    }
}

impl Detector for RatioDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Only the geometry is read, so the pixels are never converted.
    fn detect(&self, image: &DynamicImage) -> DetectionResult {
        let outcome = sampling::validate(image)
            .and_then(|()| self.analyze(image.width(), image.height()));
        finish(Self::NAME, outcome)
    }
}
