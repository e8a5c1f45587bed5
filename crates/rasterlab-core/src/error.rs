//! Error type shared by every raster operation.

use thiserror::Error;

use crate::codec::{DecodeError, EncodeError};

/// Errors reported by transforms, filters, the compositor and the codec.
///
/// A failing operation never hands back a partially written buffer: callers
/// either get a complete new `RasterBuffer` or one of these.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The input buffer has zero width or zero height.
    #[error("Image buffer is empty")]
    EmptyBuffer,

    /// A requested output size is zero or negative.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be positive")]
    InvalidDimensions { width: i64, height: i64 },

    /// Pixel data length doesn't match `width * height * 4`.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// An image watermark was requested without a source image attached.
    #[error("Watermark image source is missing")]
    MissingWatermarkSource,

    /// Input bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The buffer could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

pub type Result<T> = std::result::Result<T, ImageError>;
