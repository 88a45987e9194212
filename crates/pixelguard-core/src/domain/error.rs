//! Error types for the detection engine.

use thiserror::Error;

/// A failure while running a detector.
///
/// Detectors never return these to callers: [`crate::Detector::detect`] turns
/// them into problematic results via [`crate::DetectionResult::from_error`].
#[derive(Debug, Clone, Error)]
pub enum DetectionError {
    /// The input buffer is absent or has no pixels.
    #[error("{0}")]
    InvalidImage(String),
    /// A heuristic failed while analyzing the image.
    #[error("{message}")]
    Detector {
        /// Detector-specific error kind, e.g. `border_fill_error`.
        kind: &'static str,
        /// Human-readable description.
        message: String,
    },
    /// A sub-detector failed underneath the composite.
    #[error("{detector}: {message}")]
    Aggregation {
        /// Name of the failing sub-detector.
        detector: String,
        /// Human-readable description.
        message: String,
    },
}

impl DetectionError {
    /// Value recorded under the `error_type` detail key.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidImage(_) => "invalid_image",
            Self::Detector { kind, .. } => *kind,
            Self::Aggregation { .. } => "detector_error",
        }
    }

    /// Value recorded under the `error_message` detail key.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidImage(message)
            | Self::Detector { message, .. }
            | Self::Aggregation { message, .. } => message.clone(),
        }
    }
}

/// A configuration value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Mode name not among the known presets.
    #[error("unknown detection mode '{0}' (expected strict, default, lenient, photo, document or custom)")]
    UnknownMode(String),
    /// Color space name not among LAB, HSV, RGB.
    #[error("unsupported color space '{0}' (expected LAB, HSV or RGB)")]
    UnknownColorSpace(String),
    /// Background method name not recognized.
    #[error("unknown background detection method '{0}' (expected edge_based, corner_based or histogram_based)")]
    UnknownBackgroundMethod(String),
    /// Ratio string not of the form `W:H` with positive numbers.
    #[error("invalid aspect ratio '{0}' (expected W:H with positive numbers)")]
    InvalidRatio(String),
}

/// Degenerate input to k-means clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// No finite samples to cluster.
    #[error("no finite samples to cluster")]
    Empty,
    /// Zero clusters requested.
    #[error("cluster count must be at least 1")]
    InvalidClusterCount,
}
