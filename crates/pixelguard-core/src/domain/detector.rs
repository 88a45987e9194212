//! Detector trait shared by every heuristic and the composite.

use image::DynamicImage;

use super::DetectionResult;

/// A pixel heuristic that classifies an image as problematic or passing.
///
/// Implementations must not panic or propagate errors: any failure is reported
/// as a problematic [`DetectionResult`] carrying `error_type` and
/// `error_message` details.
pub trait Detector: Send + Sync {
    /// Identifier used as `detector_name` and as the composite's details key.
    fn name(&self) -> &str;

    /// Runs the heuristic on a decoded image.
    fn detect(&self, image: &DynamicImage) -> DetectionResult;
}
