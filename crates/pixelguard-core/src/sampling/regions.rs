//! Rectangular region extraction from RGB images.

use image::{imageops, GenericImageView, RgbImage};

/// `floor(dimension * fraction)`, bounded by `dimension`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn region_extent(dimension: u32, fraction: f64) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    ((f64::from(dimension) * fraction).floor() as u32).min(dimension)
}

/// Like [`region_extent`] but never zero for a positive fraction, so that
/// sampling small images still yields pixels.
#[must_use]
pub fn sample_extent(dimension: u32, fraction: f64) -> u32 {
    let extent = region_extent(dimension, fraction);
    if extent == 0 && fraction > 0.0 {
        dimension.min(1)
    } else {
        extent
    }
}

/// Pixels of the rectangle at `(x, y)` with the given size, row-major.
fn block(image: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> Vec<[u8; 3]> {
    imageops::crop_imm(image, x, y, width, height)
        .pixels()
        .map(|(_, _, p)| p.0)
        .collect()
}

/// `count` full-width rows starting at row `start`.
#[must_use]
pub fn rows(image: &RgbImage, start: u32, count: u32) -> Vec<[u8; 3]> {
    block(image, 0, start, image.width(), count)
}

/// The image with a margin of `fraction * dimension` cropped from every side.
///
/// A zero margin keeps the whole image.
#[must_use]
pub fn interior(image: &RgbImage, fraction: f64) -> Vec<[u8; 3]> {
    let (width, height) = image.dimensions();
    let margin_x = region_extent(width, fraction);
    let margin_y = region_extent(height, fraction);
    block(
        image,
        margin_x,
        margin_y,
        width.saturating_sub(2 * margin_x),
        height.saturating_sub(2 * margin_y),
    )
}

/// Concatenated top, bottom, left and right bands of the given thickness.
///
/// Bands overlap at the corners.
#[must_use]
pub fn edge_bands(image: &RgbImage, fraction: f64) -> Vec<[u8; 3]> {
    let (width, height) = image.dimensions();
    let band_h = sample_extent(height, fraction);
    let band_w = sample_extent(width, fraction);

    let mut pixels = rows(image, 0, band_h);
    pixels.extend(rows(image, height - band_h, band_h));
    pixels.extend(block(image, 0, 0, band_w, height));
    pixels.extend(block(image, width - band_w, 0, band_w, height));
    pixels
}

/// Concatenated top-left, top-right, bottom-left and bottom-right blocks.
#[must_use]
pub fn corner_blocks(image: &RgbImage, fraction: f64) -> Vec<[u8; 3]> {
    let (width, height) = image.dimensions();
    let block_h = sample_extent(height, fraction);
    let block_w = sample_extent(width, fraction);
    let right = width - block_w;
    let bottom = height - block_h;

    let mut pixels = block(image, 0, 0, block_w, block_h);
    pixels.extend(block(image, right, 0, block_w, block_h));
    pixels.extend(block(image, 0, bottom, block_w, block_h));
    pixels.extend(block(image, right, bottom, block_w, block_h));
    pixels
}
