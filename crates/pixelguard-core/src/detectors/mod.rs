//! The four pixel heuristics and the composite that aggregates them.

mod background;
mod border_fill;
mod composite;
mod ratio;
mod uniform_color;

use image::{DynamicImage, RgbImage};
use tracing::{debug, warn};

pub use background::BackgroundDetector;
pub use border_fill::BorderFillDetector;
pub use composite::CompositeDetector;
pub use ratio::RatioDetector;
pub use uniform_color::UniformColorDetector;

use crate::config::{DetectionConfig, DetectorKind};
use crate::domain::{DetectionError, DetectionResult, Detector};
use crate::sampling;

/// Instantiates the detector for `kind` with its slice of `config`.
#[must_use]
pub fn build(kind: DetectorKind, config: &DetectionConfig) -> Box<dyn Detector> {
    match kind {
        DetectorKind::BorderFill => Box::new(BorderFillDetector::new(config.border_fill.clone())),
        DetectorKind::UniformColor => {
            Box::new(UniformColorDetector::new(config.uniform_color.clone()))
        }
        DetectorKind::Background => Box::new(BackgroundDetector::new(config.background.clone())),
        DetectorKind::Ratio => Box::new(RatioDetector::new(config.ratio.clone())),
    }
}

/// Shared `detect` body: validates and normalizes the input, runs `analyze`,
/// and turns any error into a failure result.
pub(crate) fn run_guarded<F>(name: &str, image: &DynamicImage, analyze: F) -> DetectionResult
where
    F: FnOnce(&RgbImage) -> Result<DetectionResult, DetectionError>,
{
    let outcome = sampling::validate(image).and_then(|()| analyze(&sampling::to_rgb8(image)));
    finish(name, outcome)
}

/// Logs a detector outcome and turns an error into a failure result.
pub(crate) fn finish(
    name: &str,
    outcome: Result<DetectionResult, DetectionError>,
) -> DetectionResult {
    match outcome {
        Ok(result) => {
            debug!(
                detector = name,
                problematic = result.is_problematic,
                confidence = result.confidence(),
                "Detector finished"
            );
            result
        }
        Err(e) => {
            warn!(detector = name, "Detection failed: {e}");
            DetectionResult::from_error(name, &e)
        }
    }
}

/// Percentage with one decimal, as used in issue strings.
fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
