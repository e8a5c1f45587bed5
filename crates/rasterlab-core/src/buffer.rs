//! The RGBA raster buffer every operation reads and writes.

use crate::error::{ImageError, Result};

/// Number of bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// An owned image with interleaved 8-bit RGBA pixel data.
///
/// The pixel vector always holds exactly `width * height * 4` bytes in
/// row-major order. A zero-area buffer can be constructed (e.g. to stand for
/// "nothing loaded") but every operation rejects it with
/// [`ImageError::EmptyBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a buffer from dimensions and RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns `ImageError::InvalidPixelData` if `pixels.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(ImageError::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; byte_len(width, height)],
        }
    }

    /// Create a RasterBuffer from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for use with `image::imageops`.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        // Length is guaranteed by construction, so from_raw cannot fail here;
        // fall back to an empty image rather than panic.
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| image::RgbaImage::new(0, 0))
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable RGBA bytes. The slice length cannot change, so the size
    /// invariant holds.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the buffer and return its pixel vector.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA value at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this buffer has no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Fail with `EmptyBuffer` when the buffer has no area.
    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(ImageError::EmptyBuffer)
        } else {
            Ok(())
        }
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
