//! Detection and analysis result types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::DetectionError;

/// Free-form, detector-specific details attached to a result.
pub type Details = Map<String, Value>;

/// Converts a `json!` object literal into a [`Details`] map.
///
/// Non-object values produce an empty map.
#[must_use]
pub fn into_details(value: Value) -> Details {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Verdict of a single detector (or of the composite) for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Identifier of the detector that produced this result.
    pub detector_name: String,
    /// Whether the detector flagged the image.
    pub is_problematic: bool,
    /// Confidence in `[0, 1]`. Clamped on construction and deserialization.
    #[serde(deserialize_with = "deserialize_confidence")]
    confidence: f64,
    /// Detector-specific details.
    #[serde(default)]
    pub details: Details,
    /// Human-readable issues, in the order they were found.
    #[serde(default)]
    pub issues: Vec<String>,
}

impl DetectionResult {
    /// Creates a result, clamping `confidence` into `[0, 1]`.
    #[must_use]
    pub fn new(
        detector_name: impl Into<String>,
        is_problematic: bool,
        confidence: f64,
        details: Details,
        issues: Vec<String>,
    ) -> Self {
        Self {
            detector_name: detector_name.into(),
            is_problematic,
            confidence: clamp_confidence(confidence),
            details,
            issues,
        }
    }

    /// A passing result with zero confidence and no details.
    #[must_use]
    pub fn passing(detector_name: impl Into<String>) -> Self {
        Self::new(detector_name, false, 0.0, Details::new(), Vec::new())
    }

    /// A maximally problematic result describing a failure.
    ///
    /// `details` carries `error_type` and `error_message`; the single issue reads
    /// `"<detector> detection failed: <message>"`.
    #[must_use]
    pub fn failure(
        detector_name: impl Into<String>,
        error_type: &str,
        message: impl Into<String>,
    ) -> Self {
        let detector_name = detector_name.into();
        let message = message.into();
        let mut details = Details::new();
        details.insert("error_type".into(), Value::from(error_type));
        details.insert("error_message".into(), Value::from(message.as_str()));
        let issues = vec![format!("{detector_name} detection failed: {message}")];
        Self::new(detector_name, true, 1.0, details, issues)
    }

    /// Builds the failure result for a [`DetectionError`].
    #[must_use]
    pub fn from_error(detector_name: impl Into<String>, error: &DetectionError) -> Self {
        Self::failure(detector_name, error.error_type(), error.message())
    }

    /// Confidence in `[0, 1]`.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// The `error_type` detail, if this result records a failure.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        self.details.get("error_type").and_then(Value::as_str)
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_confidence)
}

/// Complete analysis of a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Source identifier, usually a file path.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    results: Vec<DetectionResult>,
    is_problematic: bool,
}

impl ImageAnalysis {
    /// Creates an analysis with no results yet.
    #[must_use]
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            results: Vec::new(),
            is_problematic: false,
        }
    }

    /// Appends a result. A problematic result marks the whole analysis problematic.
    pub fn add_result(&mut self, result: DetectionResult) {
        if result.is_problematic {
            self.is_problematic = true;
        }
        self.results.push(result);
    }

    /// Results in insertion order.
    #[must_use]
    pub fn results(&self) -> &[DetectionResult] {
        &self.results
    }

    /// True if any added result was problematic.
    #[must_use]
    pub const fn is_problematic(&self) -> bool {
        self.is_problematic
    }

    /// All issues across results, each prefixed with the detector that raised it.
    #[must_use]
    pub fn issue_lines(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.is_problematic)
            .flat_map(|r| {
                r.issues
                    .iter()
                    .map(move |issue| format!("{}: {issue}", r.detector_name))
            })
            .collect()
    }

    /// One-line reason for a problematic verdict, `None` when the image passed.
    #[must_use]
    pub fn failure_summary(&self) -> Option<String> {
        if !self.is_problematic {
            return None;
        }
        let lines = self.issue_lines();
        if lines.is_empty() {
            Some("failed by detector(s)".to_string())
        } else {
            Some(lines.join("; "))
        }
    }
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Images analyzed.
    pub total: usize,
    /// Images flagged as problematic.
    pub problematic: usize,
    /// Images that passed. Always `total - problematic`.
    pub passed: usize,
}

impl BatchSummary {
    /// Reduces a list of analyses to its counts.
    #[must_use]
    pub fn from_analyses(analyses: &[ImageAnalysis]) -> Self {
        let total = analyses.len();
        let problematic = analyses.iter().filter(|a| a.is_problematic()).count();
        Self {
            total,
            problematic,
            passed: total - problematic,
        }
    }
}

/// Summary plus every per-image analysis, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Aggregate counts.
    pub summary: BatchSummary,
    /// Per-image analyses.
    pub analyses: Vec<ImageAnalysis>,
}

impl BatchReport {
    /// Builds a report, deriving the summary from `analyses`.
    #[must_use]
    pub fn new(analyses: Vec<ImageAnalysis>) -> Self {
        Self {
            summary: BatchSummary::from_analyses(&analyses),
            analyses,
        }
    }
}

/// A decoded image together with its source identifier.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path or other identifier of the image.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: image::DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image, reading its dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        Self {
            path: path.into(),
            width: image.width(),
            height: image.height(),
            image,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn result(name: &str, problematic: bool) -> DetectionResult {
        DetectionResult::new(name, problematic, 0.5, Details::new(), vec![])
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(result("x", true).confidence(), 0.5);
        let high = DetectionResult::new("x", true, 1.5, Details::new(), vec![]);
        let low = DetectionResult::new("x", true, -0.5, Details::new(), vec![]);
        let nan = DetectionResult::new("x", true, f64::NAN, Details::new(), vec![]);
        assert_eq!(high.confidence(), 1.0);
        assert_eq!(low.confidence(), 0.0);
        assert_eq!(nan.confidence(), 0.0);
    }

    #[test]
    fn test_confidence_clamped_on_deserialize() {
        let json = r#"{"detector_name":"x","is_problematic":false,"confidence":3.0}"#;
        let parsed: DetectionResult = serde_json::from_str(json).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(parsed.confidence(), 1.0);
        assert!(parsed.details.is_empty());
        assert!(parsed.issues.is_empty());
    }

    #[test]
    fn test_failure_result() {
        let failed = DetectionResult::failure("ratio", "ratio_detection_error", "boom");
        assert!(failed.is_problematic);
        assert_eq!(failed.confidence(), 1.0);
        assert_eq!(failed.error_type(), Some("ratio_detection_error"));
        assert_eq!(failed.details["error_message"], "boom");
        assert_eq!(failed.issues, vec!["ratio detection failed: boom"]);
    }

    #[test]
    fn test_analysis_problematic_is_sticky() {
        let mut analysis = ImageAnalysis::new("a.png", 10, 10);
        assert!(!analysis.is_problematic());

        analysis.add_result(result("one", true));
        analysis.add_result(result("two", false));

        assert!(analysis.is_problematic());
        assert_eq!(analysis.results().len(), 2);
        assert_eq!(analysis.results()[0].detector_name, "one");
    }

    #[test]
    fn test_failure_summary() {
        let mut analysis = ImageAnalysis::new("a.png", 10, 10);
        assert_eq!(analysis.failure_summary(), None);

        let mut flagged = result("ratio", true);
        flagged.issues.push("Width 5 is below minimum 100".into());
        analysis.add_result(flagged);

        assert_eq!(
            analysis.failure_summary().as_deref(),
            Some("ratio: Width 5 is below minimum 100")
        );
    }

    #[test]
    fn test_batch_summary_counts() {
        let mut bad = ImageAnalysis::new("bad.png", 1, 1);
        bad.add_result(result("x", true));
        let good = ImageAnalysis::new("good.png", 1, 1);

        let report = BatchReport::new(vec![bad, good.clone(), good]);

        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.problematic, 1);
        assert_eq!(report.summary.passed, 2);
        assert_eq!(
            report.summary.passed,
            report.summary.total - report.summary.problematic
        );
    }

    #[test]
    fn test_empty_batch_summary() {
        let summary = BatchSummary::from_analyses(&[]);
        assert_eq!(summary, BatchSummary::default());
    }
}
