//! Conversion between file bytes and raster buffers.
//!
//! Everything else in the crate works on decoded [`RasterBuffer`]s; this is
//! the only module that knows about file formats. The [`Codec`] trait is the
//! seam the batch pipeline is generic over, so hosts with their own codecs
//! (or tests that need a failing one) can plug them in.
//!
//! # Supported formats
//!
//! - Decode: PNG, JPEG, WebP (format sniffed from content), EXIF-oriented
//! - Encode: PNG, JPEG (quality mapped from `[0, 1]`), lossless WebP

mod decode;
mod encode;
mod types;

pub use decode::{decode_image, extract_orientation};
pub use encode::encode_image;
pub use types::{DecodeError, EncodeError, ExportOptions, Orientation, OutputFormat, MAX_INPUT_BYTES};

use crate::buffer::RasterBuffer;

/// Decoder and encoder pair.
pub trait Codec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer, DecodeError>;

    fn encode(&self, image: &RasterBuffer, format: OutputFormat, quality: f32) -> Result<Vec<u8>, EncodeError>;
}

/// [`Codec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
        decode_image(bytes)
    }

    fn encode(&self, image: &RasterBuffer, format: OutputFormat, quality: f32) -> Result<Vec<u8>, EncodeError> {
        encode_image(image, format, quality)
    }
}
