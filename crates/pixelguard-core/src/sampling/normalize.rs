//! Input validation and conversion to 8-bit, 3-channel RGB.

use image::{DynamicImage, Rgb, RgbImage};

use crate::domain::DetectionError;

/// Rejects images without pixels.
///
/// # Errors
///
/// Returns [`DetectionError::InvalidImage`] when either dimension is zero.
pub fn validate(image: &DynamicImage) -> Result<(), DetectionError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DetectionError::InvalidImage(
            "Invalid image provided".to_string(),
        ));
    }
    Ok(())
}

/// Converts any decoded image to 8-bit RGB.
///
/// Gray is replicated across channels and alpha is dropped. 16-bit samples are
/// clipped to 255 rather than rescaled; float samples in `[0, 1]` are scaled to
/// `[0, 255]` with non-finite values mapped to 0.
#[must_use]
pub fn to_rgb8(image: &DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            let wide = image.to_rgb16();
            RgbImage::from_fn(wide.width(), wide.height(), |x, y| {
                Rgb(wide.get_pixel(x, y).0.map(clip_u16))
            })
        }
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            let float = image.to_rgb32f();
            RgbImage::from_fn(float.width(), float.height(), |x, y| {
                Rgb(float.get_pixel(x, y).0.map(scale_f32))
            })
        }
        _ => image.to_rgb8(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn clip_u16(value: u16) -> u8 {
    value.min(255) as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_f32(value: f32) -> u8 {
    if value.is_finite() {
        (value * 255.0).clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb32FImage, Rgba};

    #[test]
    fn test_validate_rejects_empty() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
        let err = validate(&empty).err();
        assert!(matches!(err, Some(DetectionError::InvalidImage(_))));
        assert!(validate(&DynamicImage::ImageRgb8(RgbImage::new(1, 1))).is_ok());
    }

    #[test]
    fn test_gray_is_replicated() {
        let gray = GrayImage::from_pixel(2, 2, Luma([77]));
        let rgb = to_rgb8(&DynamicImage::ImageLuma8(gray));
        assert_eq!(rgb.get_pixel(1, 1).0, [77, 77, 77]);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let rgba = ImageBuffer::from_pixel(2, 2, Rgba([10u8, 20, 30, 0]));
        let rgb = to_rgb8(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_sixteen_bit_is_clipped() {
        let wide = ImageBuffer::from_pixel(1, 1, Rgb([100u16, 255, 4000]));
        let rgb = to_rgb8(&DynamicImage::ImageRgb16(wide));
        assert_eq!(rgb.get_pixel(0, 0).0, [100, 255, 255]);
    }

    #[test]
    fn test_float_is_scaled() {
        let float = Rgb32FImage::from_pixel(1, 1, Rgb([0.5f32, f32::NAN, 2.0]));
        let rgb = to_rgb8(&DynamicImage::ImageRgb32F(float));
        assert_eq!(rgb.get_pixel(0, 0).0, [127, 0, 255]);
    }
}
