//! Core domain types for image quality detection.

mod detector;
mod error;
mod result;

pub use detector::Detector;
pub use error::{ClusterError, ConfigError, DetectionError};
pub use result::{
    into_details, BatchReport, BatchSummary, DetectionResult, Details, ImageAnalysis, ImageInfo,
};
