//! Image source port for loading images from various sources.

use thiserror::Error;

use crate::domain::ImageInfo;

/// An image that could not be loaded.
#[derive(Debug, Error)]
#[error("{path}: {reason:#}")]
pub struct LoadFailure {
    /// Path or identifier of the image.
    pub path: String,
    /// Underlying cause.
    pub reason: anyhow::Error,
}

impl LoadFailure {
    /// Creates a failure for `path`.
    pub fn new(path: impl Into<String>, reason: anyhow::Error) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source.
    ///
    /// Items that fail to load are yielded as [`LoadFailure`]s so callers can
    /// record them and continue.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, LoadFailure>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
