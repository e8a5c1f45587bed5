//! Image resizing with Fit / Fill / Stretch modes.
//!
//! Resampling is delegated to `image::imageops::resize` with the Triangle
//! (bilinear) filter. All functions return new buffers without modifying
//! the input.

use serde::{Deserialize, Serialize};

use crate::buffer::RasterBuffer;
use crate::error::{ImageError, Result};

/// How the source aspect ratio is reconciled with the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeMode {
    /// Scale uniformly to fit inside the box. The output may be smaller
    /// than the box in one dimension.
    #[default]
    Fit,
    /// Scale uniformly to cover the box, then centre-crop to exactly the
    /// box size.
    Fill,
    /// Scale each axis independently to exactly the box size.
    Stretch,
}

/// Resize an image into a `target_width × target_height` box.
///
/// # Errors
///
/// * `EmptyBuffer` if `image` has no area
/// * `InvalidDimensions` if either target dimension is zero
pub fn resize(
    image: &RasterBuffer,
    target_width: u32,
    target_height: u32,
    mode: ResizeMode,
) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    if target_width == 0 || target_height == 0 {
        return Err(ImageError::InvalidDimensions {
            width: target_width as i64,
            height: target_height as i64,
        });
    }

    match mode {
        ResizeMode::Fit => {
            let (w, h) = calculate_fit_dimensions(
                image.width(),
                image.height(),
                target_width,
                target_height,
            );
            resample(image, w, h)
        }
        ResizeMode::Fill => {
            let (w, h) = calculate_fill_dimensions(
                image.width(),
                image.height(),
                target_width,
                target_height,
            );
            let scaled = resample(image, w, h)?;
            // Centre the scaled image in the target canvas, clipping overflow
            let left = (w - target_width) / 2;
            let top = (h - target_height) / 2;
            super::crop(
                &scaled,
                left as i64,
                top as i64,
                target_width as i64,
                target_height as i64,
            )
        }
        ResizeMode::Stretch => resample(image, target_width, target_height),
    }
}

/// Resample to exact dimensions with bilinear filtering.
pub(crate) fn resample(image: &RasterBuffer, width: u32, height: u32) -> Result<RasterBuffer> {
    // Fast path: if dimensions match, just clone
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    let rgba = image.to_rgba_image();
    let resized = image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle);
    Ok(RasterBuffer::from_rgba_image(resized))
}

/// Dimensions after scaling by `min(tw / sw, th / sh)`.
fn calculate_fit_dimensions(width: u32, height: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let scale = (target_w as f64 / width as f64).min(target_h as f64 / height as f64);
    scaled_dimensions(width, height, scale)
}

/// Dimensions after scaling by `max(tw / sw, th / sh)`, never smaller than
/// the target box.
/// Scaled size covering the target box. Rounds up so the centred crop
/// never runs short; the epsilon absorbs float noise on exact multiples.
fn calculate_fill_dimensions(width: u32, height: u32, target_w: u32, target_h: u32) -> (u32, u32) {
    let scale = (target_w as f64 / width as f64).max(target_h as f64 / height as f64);
    let cover = |v: u32| ((v as f64 * scale - 1e-9).ceil() as u32).max(1);
    (cover(width).max(target_w), cover(height).max(target_h))
}

fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).round() as u32;
    let h = (height as f64 * scale).round() as u32;
    (w.max(1), h.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterBuffer {
        // Create a simple gradient image for testing
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8); // R
                pixels.push(((y * 255) / height.max(1)) as u8); // G
                pixels.push(128); // B
                pixels.push(255); // A
            }
        }
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_fit_preserves_aspect() {
        let red = RasterBuffer::filled(100, 100, [255, 0, 0, 255]);
        let resized = resize(&red, 50, 200, ResizeMode::Fit).unwrap();

        assert_eq!(resized.width(), 50);
        assert_eq!(resized.height(), 50);
        assert_eq!(resized.pixel(25, 25), [255, 0, 0, 255]);
    }

    #[test]
    fn test_fit_upscale() {
        let img = create_test_image(40, 20);
        let resized = resize(&img, 100, 100, ResizeMode::Fit).unwrap();

        assert_eq!(resized.width(), 100);
        assert_eq!(resized.height(), 50);
    }

    #[test]
    fn test_fill_exact_box() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 60, 60, ResizeMode::Fill).unwrap();

        assert_eq!(resized.width(), 60);
        assert_eq!(resized.height(), 60);
        assert_eq!(resized.pixels().len(), 60 * 60 * 4);
    }

    #[test]
    fn test_fill_dimensions_round_up() {
        // 7 * (10 / 3) = 23.33, which must cover rather than round down
        assert_eq!(calculate_fill_dimensions(7, 3, 10, 10), (24, 10));
        assert_eq!(calculate_fill_dimensions(200, 100, 100, 100), (200, 100));
        assert_eq!(calculate_fill_dimensions(3, 7, 10, 10), (10, 24));
    }

    #[test]
    fn test_fill_centres_content() {
        // Left half black, right half white; filling a square crops equally
        // from both sides so the centre column sits on the boundary.
        let mut img = RasterBuffer::filled(200, 100, [0, 0, 0, 255]);
        for y in 0..100 {
            for x in 100..200 {
                let idx = ((y * 200 + x) * 4) as usize;
                img.pixels_mut()[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        let resized = resize(&img, 100, 100, ResizeMode::Fill).unwrap();

        assert_eq!(resized.pixel(0, 50)[0], 0);
        assert_eq!(resized.pixel(99, 50)[0], 255);
    }

    #[test]
    fn test_stretch_ignores_aspect() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 30, 90, ResizeMode::Stretch).unwrap();

        assert_eq!(resized.width(), 30);
        assert_eq!(resized.height(), 90);
    }

    #[test]
    fn test_resize_same_dimensions_is_copy() {
        let img = create_test_image(100, 50);
        let resized = resize(&img, 100, 50, ResizeMode::Stretch).unwrap();
        assert_eq!(resized, img);
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(100, 50);

        assert!(matches!(
            resize(&img, 0, 50, ResizeMode::Fit),
            Err(ImageError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            resize(&img, 50, 0, ResizeMode::Fill),
            Err(ImageError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_resize_empty_buffer() {
        let img = RasterBuffer::transparent(0, 10);
        assert!(matches!(
            resize(&img, 10, 10, ResizeMode::Fit),
            Err(ImageError::EmptyBuffer)
        ));
    }

    #[test]
    fn test_calculate_fit_dimensions() {
        assert_eq!(calculate_fit_dimensions(6000, 4000, 2560, 2560), (2560, 1707));
        assert_eq!(calculate_fit_dimensions(4000, 6000, 2560, 2560), (1707, 2560));
        assert_eq!(calculate_fit_dimensions(1000, 1, 10, 10), (10, 1));
    }

    #[test]
    fn test_calculate_fill_dimensions_covers_box() {
        let (w, h) = calculate_fill_dimensions(300, 200, 100, 100);
        assert_eq!((w, h), (150, 100));

        let (w, h) = calculate_fill_dimensions(7, 3, 11, 13);
        assert!(w >= 11 && h >= 13);
    }
}
