//! Image and batch analyzers, plus the [`PixelGuard`] entry point.

mod batch;
mod image;

pub use self::batch::{load_failure_analysis, BatchAnalyzer, LOADER_NAME};
pub use self::image::ImageAnalyzer;

use std::sync::Arc;

use ::image::DynamicImage;

use crate::config::{DetectionConfig, DetectionMode, EnvSnapshot};
use crate::domain::{BatchReport, ImageAnalysis, ImageInfo};
use crate::ports::{ImageSource, ProgressSink};

/// Top-level engine: one configuration, shared by single-image and batch
/// analysis.
#[derive(Debug, Clone)]
pub struct PixelGuard {
    analyzer: Arc<ImageAnalyzer>,
}

impl PixelGuard {
    /// Creates an engine for `config`.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            analyzer: Arc::new(ImageAnalyzer::new(config)),
        }
    }

    /// Creates an engine for a preset mode. `env` is only consulted for
    /// [`DetectionMode::Custom`].
    #[must_use]
    pub fn from_mode(mode: DetectionMode, env: &EnvSnapshot) -> Self {
        Self::new(DetectionConfig::from_mode(mode, env))
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        self.analyzer.config()
    }

    /// Analyzes a decoded image.
    #[must_use]
    pub fn analyze_image(&self, path: &str, image: &DynamicImage) -> ImageAnalysis {
        self.analyzer.analyze_image(path, image)
    }

    /// Analyzes a loaded image.
    #[must_use]
    pub fn analyze(&self, info: &ImageInfo) -> ImageAnalysis {
        self.analyzer.analyze(info)
    }

    /// Analyzes every image of `source`, reporting progress.
    pub fn analyze_batch(
        &self,
        source: &dyn ImageSource,
        progress: &dyn ProgressSink,
    ) -> BatchReport {
        BatchAnalyzer::with_analyzer(Arc::clone(&self.analyzer))
            .process_with_progress(source, progress)
    }
}

impl Default for PixelGuard {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}
