//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the detection engine and external adapters.

mod image_source;
mod progress;
mod result_output;

pub use image_source::{ImageSource, LoadFailure};
pub use progress::{NoopProgress, ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
