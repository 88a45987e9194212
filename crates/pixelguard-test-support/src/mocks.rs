//! Mock implementations of core port traits and detectors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use image::DynamicImage;
use pixelguard_core::domain::{
    BatchReport, BatchSummary, DetectionResult, Detector, Details, ImageAnalysis, ImageInfo,
};
use pixelguard_core::ports::{
    ImageSource, LoadFailure, ProgressEvent, ProgressSink, ResultOutput,
};

enum Entry {
    Image(ImageInfo),
    Broken { path: String, reason: String },
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, plus optional load failures, in insertion order.
pub struct MockImageSource {
    entries: Vec<Entry>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(Entry::Image).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an image that fails to load with `reason`.
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<String>, reason: impl Into<String>) -> Self {
        self.entries.push(Entry::Broken {
            path: path.into(),
            reason: reason.into(),
        });
        self
    }

    /// Appends an image.
    #[must_use]
    pub fn with_image(mut self, image: ImageInfo) -> Self {
        self.entries.push(Entry::Image(image));
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LoadFailure>> + Send + '_> {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Box::new(self.entries.iter().map(|entry| match entry {
            Entry::Image(info) => Ok(info.clone()),
            Entry::Broken { path, reason } => Err(LoadFailure::new(
                path.clone(),
                anyhow::anyhow!("{reason}"),
            )),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
#[derive(Default)]
pub struct MockResultOutput {
    singles: Arc<Mutex<Vec<ImageAnalysis>>>,
    batches: Arc<Mutex<Vec<BatchReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured single-image analyses.
    #[must_use]
    pub fn singles(&self) -> Vec<ImageAnalysis> {
        self.singles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns all captured batch reports.
    #[must_use]
    pub fn batches(&self) -> Vec<BatchReport> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultOutput for MockResultOutput {
    fn report_single(&self, analysis: &ImageAnalysis) -> anyhow::Result<()> {
        self.singles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(analysis.clone());
        Ok(())
    }

    fn report_batch(&self, report: &BatchReport) -> anyhow::Result<()> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Failed` events.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Failed { .. }))
    }

    /// Returns the summary from the `Finished` event, if any.
    #[must_use]
    pub fn finished_summary(&self) -> Option<BatchSummary> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { summary } => Some(*summary),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(e))
            .count()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Detector returning a fixed verdict, counting invocations.
pub struct StaticDetector {
    name: String,
    problematic: bool,
    confidence: f64,
    issues: Vec<String>,
    calls: AtomicUsize,
}

impl StaticDetector {
    /// A detector that always passes.
    #[must_use]
    pub fn passing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            problematic: false,
            confidence: 0.0,
            issues: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A detector that always flags the image with `issue`.
    #[must_use]
    pub fn flagging(name: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            problematic: true,
            confidence: 1.0,
            issues: vec![issue.into()],
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `detect` calls so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Detector for StaticDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, _image: &DynamicImage) -> DetectionResult {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let mut details = Details::new();
        details.insert("static".into(), serde_json::Value::Bool(true));
        DetectionResult::new(
            self.name.clone(),
            self.problematic,
            self.confidence,
            details,
            self.issues.clone(),
        )
    }
}

/// Detector that panics on every call.
pub struct PanickingDetector {
    name: String,
}

impl PanickingDetector {
    /// Creates a panicking detector called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Detector for PanickingDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, _image: &DynamicImage) -> DetectionResult {
        panic!("{} exploded", self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_image_source_empty() {
        let source = MockImageSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert_eq!(source.images().count(), 0);
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_image_source_with_failure() {
        let info = ImageInfo::new("test.jpg", DynamicImage::new_rgb8(100, 100));
        let source = MockImageSource::new(vec![info]).with_failure("bad.jpg", "truncated");

        assert_eq!(source.count_hint(), Some(2));
        let items: Vec<_> = source.images().collect();
        assert!(items[0].is_ok());
        let err = items[1].as_ref().err().unwrap();
        assert_eq!(err.path, "bad.jpg");
        assert_eq!(err.to_string(), "bad.jpg: truncated");
    }

    #[test]
    fn test_mock_result_output() {
        let output = MockResultOutput::new();
        let analysis = ImageAnalysis::new("test.jpg", 100, 100);

        output.report_single(&analysis).unwrap();
        output
            .report_batch(&BatchReport::new(vec![analysis]))
            .unwrap();
        output.flush().unwrap();

        assert_eq!(output.singles()[0].path, "test.jpg");
        assert_eq!(output.batches()[0].summary.total, 1);
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();

        sink.on_event(ProgressEvent::Started {
            path: "test.jpg".into(),
            index: 0,
            total: Some(1),
        });
        sink.on_event(ProgressEvent::Finished {
            summary: BatchSummary::default(),
        });

        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.failed_count(), 0);
        assert_eq!(sink.finished_summary(), Some(BatchSummary::default()));
    }

    #[test]
    fn test_static_detector_counts_calls() {
        let detector = StaticDetector::flagging("fake", "always bad");
        let result = detector.detect(&DynamicImage::new_rgb8(1, 1));
        assert!(result.is_problematic);
        assert_eq!(result.issues, vec!["always bad"]);
        assert_eq!(detector.calls(), 1);
    }
}
