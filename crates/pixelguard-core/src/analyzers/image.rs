//! Single-image analysis.

use std::sync::OnceLock;

use image::DynamicImage;
use tracing::debug;

use crate::config::DetectionConfig;
use crate::detectors::CompositeDetector;
use crate::domain::{ImageAnalysis, ImageInfo};

/// Runs the enabled detectors on one decoded image.
///
/// The detector set is built from the configuration on first use, unless a
/// composite was injected with [`ImageAnalyzer::with_composite`].
#[derive(Debug)]
pub struct ImageAnalyzer {
    config: DetectionConfig,
    composite: OnceLock<CompositeDetector>,
}

impl ImageAnalyzer {
    /// Creates an analyzer for `config`.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            composite: OnceLock::new(),
        }
    }

    /// Creates an analyzer that runs `composite` instead of the detectors
    /// enabled in `config`.
    #[must_use]
    pub fn with_composite(config: DetectionConfig, composite: CompositeDetector) -> Self {
        Self {
            config,
            composite: OnceLock::from(composite),
        }
    }

    /// The configuration this analyzer was built from.
    #[must_use]
    pub const fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// The detectors run for each image.
    pub fn composite(&self) -> &CompositeDetector {
        self.composite
            .get_or_init(|| CompositeDetector::from_config(&self.config))
    }

    /// Analyzes a loaded image.
    #[must_use]
    pub fn analyze(&self, info: &ImageInfo) -> ImageAnalysis {
        self.analyze_image(&info.path, &info.image)
    }

    /// Analyzes a decoded image identified by `path`.
    ///
    /// Each detector contributes one result, in execution order.
    #[must_use]
    pub fn analyze_image(&self, path: &str, image: &DynamicImage) -> ImageAnalysis {
        let mut analysis = ImageAnalysis::new(path, image.width(), image.height());
        for result in self.composite().detect_each(image) {
            analysis.add_result(result);
        }
        debug!(
            path,
            problematic = analysis.is_problematic(),
            "Image analyzed"
        );
        analysis
    }
}
