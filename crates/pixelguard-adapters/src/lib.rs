//! PixelGuard Adapters - External adapters for pixelguard.
//!
//! This crate provides the filesystem image source: discovery of supported
//! files and decoding with the `image` crate.

pub mod fs;

pub use fs::{is_supported_image, load_image, FsImageSource, SUPPORTED_EXTENSIONS};
