//! Result output port for writing analyses.

use crate::domain::{BatchReport, ImageAnalysis};

/// Port for reporting analyses, e.g. to the console or a file.
pub trait ResultOutput: Send + Sync {
    /// Reports a single-image analysis.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn report_single(&self, analysis: &ImageAnalysis) -> anyhow::Result<()>;

    /// Reports a completed batch.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn report_batch(&self, report: &BatchReport) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
