//! Box blur with edge replication.
//!
//! Each output pixel is the mean of the `(2r + 1)²` square around it in the
//! source, with out-of-range coordinates clamped to the nearest edge pixel.
//! All four channels are averaged.
//!
//! # Algorithm
//!
//! A uniform square kernel with clamped coordinates is separable, so the
//! square sum is computed as a row sum followed by a column sum over the row
//! sums. Each window sum comes from prefix sums plus the replicated edge
//! samples, so the cost per pixel does not depend on the radius. Sums are
//! kept as integers and divided once at the end, which gives exactly the
//! same result as summing the square directly.
//! The source is only read and the output is a separate allocation, so no
//! pixel ever sees an already-blurred neighbour.

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::Result;

/// Blur an image with a square box kernel of the given radius.
///
/// `radius < 1` returns an identical copy. Any larger radius is exact,
/// including radii far beyond the image size.
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn box_blur(image: &RasterBuffer, radius: i32) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    if radius < 1 {
        return Ok(image.clone());
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    let r = radius as i64;
    let src = image.pixels();

    // Horizontal pass: row_sums[y][x][c] = Σ src[y][clamp(x + dx)][c]
    let mut row_sums = vec![0u128; width * height * CHANNELS];
    for y in 0..height {
        let row = &src[y * width * CHANNELS..(y + 1) * width * CHANNELS];
        let out = &mut row_sums[y * width * CHANNELS..(y + 1) * width * CHANNELS];
        window_sums(width, r, |i, c| row[i * CHANNELS + c] as u128, |i, c, v| {
            out[i * CHANNELS + c] = v
        });
    }

    // Vertical pass over the row sums
    let side = (2 * r + 1) as u128;
    let count = side * side;
    let mut output = vec![0u8; width * height * CHANNELS];
    for x in 0..width {
        window_sums(
            height,
            r,
            |i, c| row_sums[(i * width + x) * CHANNELS + c],
            |i, c, v| {
                output[(i * width + x) * CHANNELS + c] = ((v + count / 2) / count).min(255) as u8;
            },
        );
    }

    RasterBuffer::new(image.width(), image.height(), output)
}

/// Sum of the `2r + 1` samples centred on every position of an axis of
/// length `len`, clamping indices to `0..len`.
///
/// `read(i, c)` returns the sample at position `i` and channel `c`;
/// `write(i, c, sum)` receives the window sum centred on `i`.
fn window_sums<R, W>(len: usize, r: i64, read: R, mut write: W)
where
    R: Fn(usize, usize) -> u128,
    W: FnMut(usize, usize, u128),
{
    let last = len as i64 - 1;
    let mut prefix = vec![0u128; len + 1];

    for c in 0..CHANNELS {
        for i in 0..len {
            prefix[i + 1] = prefix[i] + read(i, c);
        }
        let first = prefix[1];
        let end = prefix[len] - prefix[len - 1];

        for i in 0..=last {
            let lo = i - r;
            let hi = i + r;
            // Indices before 0 repeat the first sample, past `last` the end one.
            let below = (-lo).max(0) as u128;
            let above = (hi - last).max(0) as u128;
            let inside = prefix[(hi.min(last) + 1) as usize] - prefix[lo.max(0) as usize];
            write(i as usize, c, inside + below * first + above * end);
        }
    }
}
