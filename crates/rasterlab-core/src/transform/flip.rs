//! Mirror an image horizontally, vertically, or both.

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::Result;

/// Mirror pixel columns and/or rows.
///
/// * `horizontal` - mirror left-right
/// * `vertical` - mirror top-bottom
///
/// Both together is a point reflection through the centre (same as a 180°
/// rotation). The output always has the input's dimensions.
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn flip(image: &RasterBuffer, horizontal: bool, vertical: bool) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;

    let width = image.width();
    let height = image.height();
    let row_bytes = width as usize * CHANNELS;
    let src = image.pixels();
    let mut output = Vec::with_capacity(src.len());

    for y in 0..height {
        let src_y = if vertical { height - 1 - y } else { y };
        let row = &src[src_y as usize * row_bytes..(src_y as usize + 1) * row_bytes];

        if horizontal {
            for pixel in row.chunks_exact(CHANNELS).rev() {
                output.extend_from_slice(pixel);
            }
        } else {
            output.extend_from_slice(row);
        }
    }

    RasterBuffer::new(width, height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterBuffer {
        let pixels = (0..width * height * 4).map(|i| (i * 13 % 256) as u8).collect();
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_flip_horizontal() {
        let img = create_test_image(3, 2);
        let flipped = flip(&img, true, false).unwrap();

        assert_eq!(flipped.pixel(0, 0), img.pixel(2, 0));
        assert_eq!(flipped.pixel(2, 1), img.pixel(0, 1));
        assert_eq!(flipped.pixel(1, 1), img.pixel(1, 1));
    }

    #[test]
    fn test_flip_vertical() {
        let img = create_test_image(3, 2);
        let flipped = flip(&img, false, true).unwrap();

        assert_eq!(flipped.pixel(0, 0), img.pixel(0, 1));
        assert_eq!(flipped.pixel(2, 1), img.pixel(2, 0));
    }

    #[test]
    fn test_flip_both_is_point_reflection() {
        let img = create_test_image(4, 3);
        let flipped = flip(&img, true, true).unwrap();

        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(flipped.pixel(x, y), img.pixel(3 - x, 2 - y));
            }
        }
    }

    #[test]
    fn test_flip_none_is_copy() {
        let img = create_test_image(5, 5);
        assert_eq!(flip(&img, false, false).unwrap(), img);
    }

    #[test]
    fn test_flip_empty_buffer() {
        let img = RasterBuffer::transparent(3, 0);
        assert!(flip(&img, true, false).is_err());
    }
}
