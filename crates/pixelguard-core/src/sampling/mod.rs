//! Pixel sampling utilities shared by the detectors: format normalization,
//! color-space conversion, region extraction, coverage and clustering.

mod color;
mod kmeans;
mod normalize;
mod regions;

pub use color::{
    chebyshev_distance, convert, convert_all, euclidean_distance, lab8_to_rgb, luminance,
    rgb_to_hsv8, rgb_to_lab8,
};
pub use kmeans::{mean_color, KMeans, KMeansFit};
pub use normalize::{to_rgb8, validate};
pub use regions::{
    corner_blocks, edge_bands, interior, region_extent, rows, sample_extent,
};

/// Fraction of `pixels` within `tolerance` of `target` on every channel.
///
/// Returns 0 for an empty slice.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn chebyshev_coverage(pixels: &[[f64; 3]], target: [f64; 3], tolerance: f64) -> f64 {
    if pixels.is_empty() {
        return 0.0;
    }
    let matching = pixels
        .iter()
        .filter(|p| chebyshev_distance(**p, target) <= tolerance)
        .count();
    matching as f64 / pixels.len() as f64
}

/// Widens 8-bit pixels to `f64` channels without conversion.
#[must_use]
pub fn widen(pixels: &[[u8; 3]]) -> Vec<[f64; 3]> {
    pixels.iter().map(|p| p.map(f64::from)).collect()
}
