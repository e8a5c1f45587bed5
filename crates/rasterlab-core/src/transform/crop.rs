//! Image cropping in source pixel coordinates.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel
//! - the window `[x, x + width) × [y, y + height)` is copied verbatim
//!
//! # Example
//!
//! ```ignore
//! // Take the right half of a 200x100 image
//! let cropped = crop(&image, 100, 0, 100, 100)?;
//! ```

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::{ImageError, Result};

/// Crop a window out of an image.
///
/// # Arguments
///
/// * `image` - Source image to crop
/// * `x`, `y` - Top-left corner of the window in pixels
/// * `width`, `height` - Window size in pixels
///
/// # Behavior
///
/// - A negative origin is clamped to 0; an origin past the image is clamped
///   to the last column/row
/// - Width and height are then reduced so the window ends at the right and
///   bottom edges at most; the window never leaves the source
/// - Full-image window returns an identical copy
///
/// # Errors
///
/// * `EmptyBuffer` if `image` has no area
/// * `InvalidDimensions` if `width` or `height` is not positive
pub fn crop(image: &RasterBuffer, x: i64, y: i64, width: i64, height: i64) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    if width <= 0 || height <= 0 {
        return Err(ImageError::InvalidDimensions { width, height });
    }

    let src_w = image.width() as i64;
    let src_h = image.height() as i64;

    let left = x.clamp(0, src_w - 1);
    let top = y.clamp(0, src_h - 1);
    let out_width = width.min(src_w - left) as u32;
    let out_height = height.min(src_h - top) as u32;
    let (left, top) = (left as u32, top as u32);

    // Fast path: full crop returns a clone
    if left == 0 && top == 0 && out_width == image.width() && out_height == image.height() {
        return Ok(image.clone());
    }

    let row_bytes = out_width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    // Copy pixel data row by row
    for row in 0..out_height {
        let start = image.index(left, top + row);
        output.extend_from_slice(&image.pixels()[start..start + row_bytes]);
    }

    RasterBuffer::new(out_width, out_height, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
