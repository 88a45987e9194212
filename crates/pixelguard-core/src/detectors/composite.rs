//! Runs an ordered list of detectors and merges their verdicts.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use image::DynamicImage;
use serde_json::Value;
use tracing::warn;

use super::build;
use crate::config::DetectionConfig;
use crate::domain::{DetectionError, DetectionResult, Detector, Details};

/// An ordered, mutable collection of detectors that behaves as one detector.
///
/// The merged result is problematic if any member is; its confidence is the
/// share of problematic members, its details map each member's name to that
/// member's details, and its issues are concatenated in member order.
#[derive(Default)]
pub struct CompositeDetector {
    detectors: Vec<Box<dyn Detector>>,
}

impl CompositeDetector {
    /// Detector identifier.
    pub const NAME: &'static str = "composite";

    /// Wraps the given detectors, preserving order.
    #[must_use]
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// Builds every detector enabled in `config`, in its configured order.
    #[must_use]
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(
            config
                .enabled_detectors()
                .iter()
                .map(|&kind| build(kind, config))
                .collect(),
        )
    }

    /// Appends a detector.
    pub fn add(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Removes every detector called `name`. Returns whether any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.detectors.len();
        self.detectors.retain(|d| d.name() != name);
        self.detectors.len() != before
    }

    /// First detector called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Detector> {
        self.detectors
            .iter()
            .find(|d| d.name() == name)
            .map(|d| d.as_ref())
    }

    /// Member names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// True when there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Runs every member in order. A panicking member yields a `detector_error`
    /// failure result instead of unwinding.
    #[must_use]
    pub fn detect_each(&self, image: &DynamicImage) -> Vec<DetectionResult> {
        self.detectors
            .iter()
            .map(|detector| run_isolated(detector.as_ref(), image))
            .collect()
    }
}

fn run_isolated(detector: &dyn Detector, image: &DynamicImage) -> DetectionResult {
    match catch_unwind(AssertUnwindSafe(|| detector.detect(image))) {
        Ok(result) => result,
        Err(payload) => {
            let error = DetectionError::Aggregation {
                detector: detector.name().to_string(),
                message: panic_message(payload.as_ref()),
            };
            warn!("Detector panicked: {error}");
            DetectionResult::from_error(detector.name(), &error)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "detector panicked".to_string())
}

impl Detector for CompositeDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, image: &DynamicImage) -> DetectionResult {
        if self.detectors.is_empty() {
            return DetectionResult::passing(Self::NAME);
        }

        let results = self.detect_each(image);
        let problematic = results.iter().filter(|r| r.is_problematic).count();
        let mut details = Details::new();
        let mut issues = Vec::new();
        for (detector, result) in self.detectors.iter().zip(results) {
            details.insert(detector.name().to_string(), Value::Object(result.details));
            issues.extend(result.issues);
        }

        DetectionResult::new(
            Self::NAME,
            problematic > 0,
            problematic as f64 / self.detectors.len() as f64,
            details,
            issues,
        )
    }
}

impl fmt::Debug for CompositeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeDetector")
            .field("detectors", &self.names())
            .finish()
    }
}
