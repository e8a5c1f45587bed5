//! Arbitrary-angle image rotation with bilinear interpolation.
//!
//! Positive angles rotate clockwise on screen (y axis pointing down).
//! The output canvas is the axis-aligned bounding box of the rotated source
//! rectangle; pixels outside the rotated footprint are fully transparent.
//!
//! # Algorithm
//!
//! Quarter turns are exact pixel permutations. Every other angle uses
//! inverse mapping: for each output pixel centre we compute the source
//! position and interpolate the four nearest source pixels.
//!
//! For a clockwise rotation by θ, the inverse transform is:
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::Result;

/// Angles closer than this to a quarter turn are treated as exact.
const ANGLE_EPSILON: f64 = 0.001;

/// Tolerance when testing whether a mapped point lies on the source.
const FOOTPRINT_EPSILON: f64 = 1e-6;

/// Rotation that can be performed without resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuarterTurn {
    None,
    Cw90,
    Cw180,
    Cw270,
}

/// Classify an angle (degrees, any sign or magnitude) as a quarter turn.
fn quarter_turn(angle_degrees: f64) -> Option<QuarterTurn> {
    let normalized = angle_degrees.rem_euclid(360.0);
    [
        (0.0, QuarterTurn::None),
        (90.0, QuarterTurn::Cw90),
        (180.0, QuarterTurn::Cw180),
        (270.0, QuarterTurn::Cw270),
        (360.0, QuarterTurn::None),
    ]
    .into_iter()
    .find(|(target, _)| (normalized - target).abs() < ANGLE_EPSILON)
    .map(|(_, turn)| turn)
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// `new_w = |w·cos θ| + |h·sin θ|`, `new_h = |w·sin θ| + |h·cos θ|`,
/// rounded to whole pixels and at least 1. Quarter turns are exact.
///
/// # Example
///
/// ```ignore
/// // 90-degree rotation swaps dimensions
/// assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match quarter_turn(angle_degrees) {
        Some(QuarterTurn::None | QuarterTurn::Cw180) => return (width, height),
        Some(QuarterTurn::Cw90 | QuarterTurn::Cw270) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.rem_euclid(360.0).to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image around its center.
///
/// The output canvas is expanded to fit the entire rotated image (no
/// clipping). Uncovered corners are transparent.
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn rotate(image: &RasterBuffer, angle_degrees: f64) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;

    if let Some(turn) = quarter_turn(angle_degrees) {
        let rgba = image.to_rgba_image();
        let rotated = match turn {
            QuarterTurn::None => return Ok(image.clone()),
            QuarterTurn::Cw90 => image::imageops::rotate90(&rgba),
            QuarterTurn::Cw180 => image::imageops::rotate180(&rgba),
            QuarterTurn::Cw270 => image::imageops::rotate270(&rgba),
        };
        return Ok(RasterBuffer::from_rgba_image(rotated));
    }

    let (src_w, src_h) = (image.width() as f64, image.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(image.width(), image.height(), angle_degrees);

    let angle_rad = angle_degrees.rem_euclid(360.0).to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Center of source and destination images
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = RasterBuffer::transparent(dst_w, dst_h);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Pixel centre relative to the destination centre
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx;
            let src_y = -dx * sin + dy * cos + src_cy;

            if src_x < -FOOTPRINT_EPSILON
                || src_y < -FOOTPRINT_EPSILON
                || src_x > src_w + FOOTPRINT_EPSILON
                || src_y > src_h + FOOTPRINT_EPSILON
            {
                continue;
            }

            let pixel = sample_bilinear(image, src_x - 0.5, src_y - 0.5);
            let idx = output.index(dst_x, dst_y);
            output.pixels_mut()[idx..idx + CHANNELS].copy_from_slice(&pixel);
        }
    }

    Ok(output)
}

/// Get a pixel as [f64; 4], replicating edge pixels for out-of-range
/// coordinates.
#[inline]
fn get_pixel_clamped(image: &RasterBuffer, px: i64, py: i64) -> [f64; 4] {
    let x = px.clamp(0, image.width() as i64 - 1) as u32;
    let y = py.clamp(0, image.height() as i64 - 1) as u32;
    image.pixel(x, y).map(|c| c as f64)
}

/// Sample a pixel using bilinear interpolation.
///
/// `(x, y)` are in pixel-centre coordinates: `(0.0, 0.0)` is exactly the
/// centre of the top-left pixel.
fn sample_bilinear(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    // Fractional distances
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_pixel_clamped(image, x0, y0);
    let p10 = get_pixel_clamped(image, x0 + 1, y0);
    let p01 = get_pixel_clamped(image, x0, y0 + 1);
    let p11 = get_pixel_clamped(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 4];
    for i in 0..CHANNELS {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.round().clamp(0.0, 255.0) as u8;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 7 % 256) as u8);
                pixels.push((y * 11 % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
                pixels.push(255);
            }
        }
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_compute_bounds_no_rotation() {
        assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 360.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, -720.0), (100, 50));
    }

    #[test]
    fn test_compute_bounds_quarter_turns() {
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, -90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));
    }

    #[test]
    fn test_compute_bounds_45_degrees() {
        // 100 * cos(45) + 100 * sin(45) = 141.42
        assert_eq!(compute_rotated_bounds(100, 100, 45.0), (141, 141));
    }

    #[test]
    fn test_rotate_360_is_identity() {
        let img = create_test_image(17, 9);
        assert_eq!(rotate(&img, 360.0).unwrap(), img);
        assert_eq!(rotate(&img, 0.0).unwrap(), img);
    }

    #[test]
    fn test_rotate_90_clockwise() {
        let img = create_test_image(4, 2);
        let rotated = rotate(&img, 90.0).unwrap();

        assert_eq!(rotated.width(), 2);
        assert_eq!(rotated.height(), 4);
        // Clockwise: the bottom-left source pixel becomes the top-left
        assert_eq!(rotated.pixel(0, 0), img.pixel(0, 1));
        assert_eq!(rotated.pixel(1, 0), img.pixel(0, 0));
    }

    #[test]
    fn test_rotate_90_then_back() {
        let img = create_test_image(13, 7);
        let there = rotate(&img, 90.0).unwrap();
        let back = rotate(&there, -90.0).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_rotate_180() {
        let img = create_test_image(5, 3);
        let rotated = rotate(&img, 180.0).unwrap();
        assert_eq!(rotated.pixel(0, 0), img.pixel(4, 2));
    }

    #[test]
    fn test_rotate_45_expands_with_transparent_corners() {
        let img = RasterBuffer::filled(50, 50, [200, 10, 10, 255]);
        let rotated = rotate(&img, 45.0).unwrap();

        assert!(rotated.width() > 50);
        assert!(rotated.height() > 50);
        // Corners are outside the diamond footprint
        assert_eq!(rotated.pixel(0, 0)[3], 0);
        assert_eq!(rotated.pixel(rotated.width() - 1, 0)[3], 0);
        // Centre is covered by the source colour
        let c = rotated.pixel(rotated.width() / 2, rotated.height() / 2);
        assert_eq!(c, [200, 10, 10, 255]);
    }

    #[test]
    fn test_rotate_empty_buffer() {
        let img = RasterBuffer::transparent(0, 5);
        assert!(rotate(&img, 30.0).is_err());
    }

    #[test]
    fn test_rotate_does_not_mutate_input() {
        let img = create_test_image(10, 10);
        let copy = img.clone();
        let _ = rotate(&img, 33.0).unwrap();
        assert_eq!(img, copy);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
