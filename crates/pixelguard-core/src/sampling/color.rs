//! Color-space conversion on 8-bit RGB pixels.
//!
//! Converted values use the usual 8-bit encodings: Lab as `L * 255 / 100`,
//! `a + 128`, `b + 128`; HSV with hue halved to `[0, 180)` and saturation and
//! value scaled to `[0, 255]`. All outputs are rounded to whole numbers.

use palette::{FromColor, Hsv, Lab, Srgb};

use crate::config::ColorSpace;

/// Converts one pixel into `space`.
#[must_use]
pub fn convert(pixel: [u8; 3], space: ColorSpace) -> [f64; 3] {
    match space {
        ColorSpace::Lab => rgb_to_lab8(pixel),
        ColorSpace::Hsv => rgb_to_hsv8(pixel),
        ColorSpace::Rgb => pixel.map(f64::from),
    }
}

/// Converts every pixel into `space`.
#[must_use]
pub fn convert_all(pixels: &[[u8; 3]], space: ColorSpace) -> Vec<[f64; 3]> {
    pixels.iter().map(|&p| convert(p, space)).collect()
}

/// 8-bit encoded CIE L*a*b* (D65).
#[must_use]
pub fn rgb_to_lab8(pixel: [u8; 3]) -> [f64; 3] {
    let lab: Lab = Lab::from_color(srgb(pixel));
    [
        encode(f64::from(lab.l) * 255.0 / 100.0),
        encode(f64::from(lab.a) + 128.0),
        encode(f64::from(lab.b) + 128.0),
    ]
}

/// 8-bit encoded HSV.
#[must_use]
pub fn rgb_to_hsv8(pixel: [u8; 3]) -> [f64; 3] {
    let hsv: Hsv = Hsv::from_color(srgb(pixel));
    let hue = (f64::from(hsv.hue.into_positive_degrees()) / 2.0).round() % 180.0;
    [
        hue,
        encode(f64::from(hsv.saturation) * 255.0),
        encode(f64::from(hsv.value) * 255.0),
    ]
}

/// Decodes an 8-bit encoded Lab color back to RGB, clamping out-of-gamut values.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn lab8_to_rgb(lab: [f64; 3]) -> [u8; 3] {
    let lab = lab.map(|c| c.clamp(0.0, 255.0));
    let lab = Lab::new(
        (lab[0] * 100.0 / 255.0) as f32,
        (lab[1] - 128.0) as f32,
        (lab[2] - 128.0) as f32,
    );
    let rgb = Srgb::from_color(lab);
    [rgb.red, rgb.green, rgb.blue].map(|c| unit_to_u8(f64::from(c)))
}

/// Fixed-point luminance, `0.299 R + 0.587 G + 0.114 B` rounded.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn luminance(pixel: [u8; 3]) -> u8 {
    let [r, g, b] = pixel.map(u32::from);
    // Weights sum to 1 << 14, so the result never exceeds 255.
    ((r * 4899 + g * 9617 + b * 1868 + 8192) >> 14) as u8
}

/// Largest absolute per-channel difference.
#[must_use]
pub fn chebyshev_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Euclidean distance.
#[must_use]
pub fn euclidean_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn srgb(pixel: [u8; 3]) -> Srgb {
    Srgb::new(pixel[0], pixel[1], pixel[2]).into_format()
}

fn encode(value: f64) -> f64 {
    value.round().clamp(0.0, 255.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(value: f64) -> u8 {
    if value.is_finite() {
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}
