//! Encoding for export.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{EncodeError, OutputFormat};
use crate::buffer::{RasterBuffer, CHANNELS};
use crate::luminance::to_channel;

/// Encode a buffer as `format`.
///
/// `quality` in `[0, 1]` maps to JPEG quality `round(q * 100)`, clamped to
/// 1-100. PNG and WebP (lossless) ignore it. JPEG has no alpha channel, so
/// transparent pixels are flattened onto white first.
///
/// # Errors
///
/// - `InvalidDimensions` if the buffer has no area
/// - `EncodingFailed` if the encoder reports an error
pub fn encode_image(image: &RasterBuffer, format: OutputFormat, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width(), image.height());
    if image.is_empty() {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    let result = match format {
        OutputFormat::Png => {
            PngEncoder::new(&mut buffer).write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
        }
        OutputFormat::Jpeg => {
            let rgb = flatten_onto_white(image.pixels());
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)).write_image(
                &rgb,
                width,
                height,
                ExtendedColorType::Rgb8,
            )
        }
        OutputFormat::Webp => {
            WebPEncoder::new_lossless(&mut buffer).write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
        }
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let bytes = buffer.into_inner();
    tracing::debug!(format = format.extension(), bytes = bytes.len(), "Encoded image");
    Ok(bytes)
}

/// Map `[0, 1]` quality onto the JPEG encoder's 1-100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    if quality.is_nan() {
        return 90;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Composite RGBA over opaque white, dropping alpha.
fn flatten_onto_white(pixels: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixels.len() / CHANNELS * 3);
    for px in pixels.chunks_exact(CHANNELS) {
        let a = px[3] as f32 / 255.0;
        for &c in &px[..3] {
            rgb.push(to_channel(c as f32 * a + 255.0 * (1.0 - a)));
        }
    }
    rgb
}
