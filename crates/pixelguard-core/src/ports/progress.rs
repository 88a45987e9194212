//! Progress reporting port for UI integration.

use crate::domain::{BatchSummary, ImageAnalysis};

/// Events emitted during batch analysis.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Analysis started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// Analysis completed for an image.
    Completed {
        /// Index in the batch (0-based).
        index: usize,
        /// The analysis.
        analysis: ImageAnalysis,
    },
    /// An image could not be loaded. It is still recorded as problematic.
    Failed {
        /// Path to the image.
        path: String,
        /// Why loading failed.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Counts over the whole batch.
        summary: BatchSummary,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// Sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}
