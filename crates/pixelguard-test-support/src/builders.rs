//! Synthetic image builders for testing.

use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use pixelguard_core::domain::ImageInfo;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builder for creating synthetic test images.
///
/// Provides convenience methods for generating images that trip (or pass)
/// specific detectors: letterbox borders, flat colors, dominant backgrounds.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Uniform Images ===

    /// Creates a uniform gray image.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> ImageInfo {
        let img = GrayImage::from_pixel(width, height, Luma([value]));
        ImageInfo::new("synthetic://uniform_gray", DynamicImage::ImageLuma8(img))
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb([r, g, b]));
        ImageInfo::new("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }

    /// Creates a uniform 16-bit RGB image.
    #[must_use]
    pub fn rgb16_uniform(width: u32, height: u32, value: u16) -> ImageInfo {
        let img: ImageBuffer<Rgb<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(width, height, Rgb([value, value, value]));
        ImageInfo::new("synthetic://rgb16_uniform", DynamicImage::ImageRgb16(img))
    }

    // === Busy Images ===

    /// Creates seeded RGB noise. Passes every pixel heuristic at sane sizes.
    #[must_use]
    pub fn noise(width: u32, height: u32, seed: u64) -> ImageInfo {
        ImageInfo::new(
            "synthetic://noise",
            DynamicImage::ImageRgb8(noise_rgb(width, height, seed)),
        )
    }

    /// Creates a black and white checkerboard.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell = cell_size.max(1);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        ImageInfo::new("synthetic://checkerboard", DynamicImage::ImageLuma8(img))
    }

    // === Border Fill ===

    /// Creates noise with its first `rows` rows painted black.
    #[must_use]
    pub fn black_top_border(width: u32, height: u32, rows: u32) -> ImageInfo {
        let mut img = noise_rgb(width, height, 1);
        paint_rows(&mut img, 0..rows.min(height), Rgb([0, 0, 0]));
        ImageInfo::new("synthetic://black_top_border", DynamicImage::ImageRgb8(img))
    }

    /// Creates noise with its last `rows` rows painted white.
    #[must_use]
    pub fn white_bottom_border(width: u32, height: u32, rows: u32) -> ImageInfo {
        let mut img = noise_rgb(width, height, 2);
        paint_rows(
            &mut img,
            height.saturating_sub(rows)..height,
            Rgb([255, 255, 255]),
        );
        ImageInfo::new(
            "synthetic://white_bottom_border",
            DynamicImage::ImageRgb8(img),
        )
    }

    /// Creates noise with black bars of `rows` rows at the top and bottom.
    #[must_use]
    pub fn letterboxed(width: u32, height: u32, rows: u32) -> ImageInfo {
        let mut img = noise_rgb(width, height, 3);
        paint_rows(&mut img, 0..rows.min(height), Rgb([0, 0, 0]));
        paint_rows(
            &mut img,
            height.saturating_sub(rows)..height,
            Rgb([0, 0, 0]),
        );
        ImageInfo::new("synthetic://letterboxed", DynamicImage::ImageRgb8(img))
    }

    // === Background ===

    /// Creates a `background` image with a centered `side`-pixel square.
    #[must_use]
    pub fn centered_square(
        width: u32,
        height: u32,
        side: u32,
        background: [u8; 3],
        square: [u8; 3],
    ) -> ImageInfo {
        let side = side.min(width).min(height);
        let left = (width - side) / 2;
        let top = (height - side) / 2;
        let img = RgbImage::from_fn(width, height, |x, y| {
            let inside = (left..left + side).contains(&x) && (top..top + side).contains(&y);
            if inside {
                Rgb(square)
            } else {
                Rgb(background)
            }
        });
        ImageInfo::new("synthetic://centered_square", DynamicImage::ImageRgb8(img))
    }

    // === Special Test Images ===

    /// Creates a 1x1 pixel image (edge case).
    #[must_use]
    pub fn single_pixel(value: u8) -> ImageInfo {
        Self::uniform_gray(1, 1, value)
    }

    /// Creates an image with no pixels.
    #[must_use]
    pub fn empty() -> ImageInfo {
        ImageInfo::new("synthetic://empty", DynamicImage::new_rgb8(0, 0))
    }
}

/// Convenience functions for common test images.
impl SyntheticImageBuilder {
    /// A 16:9 noise image that every detector passes.
    #[must_use]
    pub fn clean_photo() -> ImageInfo {
        Self::noise(320, 180, 7)
    }

    /// A 4:3 mid-gray image, flagged for uniform color.
    #[must_use]
    pub fn flat_gray() -> ImageInfo {
        Self::uniform_gray(400, 300, 128)
    }
}

fn noise_rgb(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| Rgb(rng.random::<[u8; 3]>()))
}

fn paint_rows(img: &mut RgbImage, rows: std::ops::Range<u32>, color: Rgb<u8>) {
    let width = img.width();
    for y in rows {
        for x in 0..width {
            img.put_pixel(x, y, color);
        }
    }
}
