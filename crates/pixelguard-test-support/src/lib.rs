//! Test support utilities for pixelguard.
//!
//! Provides mocks, fake detectors, and synthetic image builders for testing
//! the detection engine.
//!
//! # Example
//!
//! ```
//! use pixelguard_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! let clean = SyntheticImageBuilder::clean_photo();
//! let bordered = SyntheticImageBuilder::black_top_border(320, 180, 18);
//!
//! let source = MockImageSource::new(vec![clean, bordered]).with_failure("bad.jpg", "truncated");
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{
    MockImageSource, MockProgressSink, MockResultOutput, PanickingDetector, StaticDetector,
};
