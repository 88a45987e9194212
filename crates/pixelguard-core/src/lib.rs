//! PixelGuard Core - Detection engine for image quality control
//!
//! This crate contains the domain types, the four pixel heuristics (border
//! fill, uniform color, background dominance, aspect ratio), the composite
//! that aggregates them, mode-based configuration and the analyzers that run
//! them over single images or batches.

pub mod analyzers;
pub mod config;
pub mod detectors;
pub mod domain;
pub mod ports;
pub mod sampling;

pub use analyzers::{BatchAnalyzer, ImageAnalyzer, PixelGuard};
pub use config::{
    AspectRatio, BackgroundConfig, BackgroundMethod, BorderFillConfig, ColorSpace, ConfigFactory,
    DetectionConfig, DetectionMode, DetectorKind, EnvSnapshot, RatioConfig, UniformColorConfig,
};
pub use detectors::{
    BackgroundDetector, BorderFillDetector, CompositeDetector, RatioDetector, UniformColorDetector,
};
pub use domain::{
    BatchReport, BatchSummary, ConfigError, DetectionError, DetectionResult, Detector, Details,
    ImageAnalysis, ImageInfo,
};
pub use ports::{ImageSource, LoadFailure, ProgressEvent, ProgressSink, ResultOutput};
