//! Mosaic effect: replace square tiles by their average colour.

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::Result;

/// Pixelate an image into `block_size × block_size` tiles.
///
/// Tiles are aligned to the top-left corner. Tiles on the right and bottom
/// edges are truncated to the image and averaged over the pixels they
/// actually cover. All four channels are averaged and rounded.
///
/// `block_size < 1` returns an identical copy; `block_size == 1` is also an
/// identity in effect.
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn pixelate(image: &RasterBuffer, block_size: i32) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    if block_size <= 1 {
        return Ok(image.clone());
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let block = block_size as usize;
    let mut output = image.pixels().to_vec();

    for tile_y in (0..height).step_by(block) {
        let y_end = (tile_y + block).min(height);
        for tile_x in (0..width).step_by(block) {
            let x_end = (tile_x + block).min(width);

            let mut sum = [0u64; CHANNELS];
            for y in tile_y..y_end {
                let start = (y * width + tile_x) * CHANNELS;
                let end = (y * width + x_end) * CHANNELS;
                for pixel in output[start..end].chunks_exact(CHANNELS) {
                    for (acc, &v) in sum.iter_mut().zip(pixel) {
                        *acc += v as u64;
                    }
                }
            }

            let count = ((y_end - tile_y) * (x_end - tile_x)) as f64;
            let mut mean = [0u8; CHANNELS];
            for (m, &s) in mean.iter_mut().zip(&sum) {
                *m = (s as f64 / count).round() as u8;
            }

            for y in tile_y..y_end {
                let start = (y * width + tile_x) * CHANNELS;
                let end = (y * width + x_end) * CHANNELS;
                for pixel in output[start..end].chunks_exact_mut(CHANNELS) {
                    pixel.copy_from_slice(&mean);
                }
            }
        }
    }

    RasterBuffer::new(image.width(), image.height(), output)
}
