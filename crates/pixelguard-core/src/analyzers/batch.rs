//! Batch analysis over an image source.

use std::sync::Arc;

use tracing::{info, warn};

use super::ImageAnalyzer;
use crate::config::DetectionConfig;
use crate::domain::{BatchReport, DetectionResult, ImageAnalysis};
use crate::ports::{ImageSource, LoadFailure, NoopProgress, ProgressEvent, ProgressSink};

/// Detector name recorded for images that could not be loaded.
pub const LOADER_NAME: &str = "image_loader";

/// Analyzes every image of a source in order.
///
/// Failures are isolated per image: an image that cannot be loaded is
/// recorded as a problematic analysis and the batch continues.
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    analyzer: Arc<ImageAnalyzer>,
}

impl BatchAnalyzer {
    /// Creates a batch analyzer for `config`.
    #[must_use]
    pub fn new(config: DetectionConfig) -> Self {
        Self::with_analyzer(Arc::new(ImageAnalyzer::new(config)))
    }

    /// Creates a batch analyzer around an existing image analyzer.
    #[must_use]
    pub const fn with_analyzer(analyzer: Arc<ImageAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// The per-image analyzer.
    #[must_use]
    pub fn analyzer(&self) -> &ImageAnalyzer {
        &self.analyzer
    }

    /// Processes `source` without progress reporting.
    #[must_use]
    pub fn process(&self, source: &dyn ImageSource) -> BatchReport {
        self.process_with_progress(source, &NoopProgress)
    }

    /// Processes `source`, reporting each step to `progress`.
    pub fn process_with_progress(
        &self,
        source: &dyn ImageSource,
        progress: &dyn ProgressSink,
    ) -> BatchReport {
        let total = source.count_hint();
        info!(total = ?total, "Starting batch");

        let mut analyses = Vec::with_capacity(total.unwrap_or_default());
        for (index, item) in source.images().enumerate() {
            let analysis = match item {
                Ok(image) => {
                    progress.on_event(ProgressEvent::Started {
                        path: image.path.clone(),
                        index,
                        total,
                    });
                    self.analyzer.analyze(&image)
                }
                Err(failure) => {
                    warn!("Failed to load {failure}");
                    progress.on_event(ProgressEvent::Failed {
                        path: failure.path.clone(),
                        reason: format!("{:#}", failure.reason),
                    });
                    load_failure_analysis(&failure)
                }
            };
            progress.on_event(ProgressEvent::Completed {
                index,
                analysis: analysis.clone(),
            });
            analyses.push(analysis);
        }

        let report = BatchReport::new(analyses);
        info!(
            total = report.summary.total,
            problematic = report.summary.problematic,
            "Batch finished"
        );
        progress.on_event(ProgressEvent::Finished {
            summary: report.summary,
        });
        report
    }
}

/// A problematic analysis standing in for an image that failed to load.
#[must_use]
pub fn load_failure_analysis(failure: &LoadFailure) -> ImageAnalysis {
    let mut analysis = ImageAnalysis::new(failure.path.clone(), 0, 0);
    analysis.add_result(DetectionResult::failure(
        LOADER_NAME,
        "image_load_error",
        format!("{:#}", failure.reason),
    ));
    analysis
}
