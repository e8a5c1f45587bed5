//! Decoding with EXIF orientation correction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, MAX_INPUT_BYTES};
use crate::buffer::RasterBuffer;

/// Decode file bytes into an upright RGBA buffer.
///
/// The format is sniffed from the content. Any EXIF orientation tag is
/// applied so the result is always displayed the right way up.
///
/// # Errors
///
/// - `TooLarge` if `bytes` exceeds [`MAX_INPUT_BYTES`]
/// - `InvalidFormat` if the format is not recognised
/// - `CorruptedFile` if the data cannot be decoded
pub fn decode_image(bytes: &[u8]) -> Result<RasterBuffer, DecodeError> {
    if bytes.len() > MAX_INPUT_BYTES {
        return Err(DecodeError::TooLarge {
            size: bytes.len(),
            limit: MAX_INPUT_BYTES,
        });
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    let format = reader.format().ok_or(DecodeError::InvalidFormat)?;

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let orientation = extract_orientation(bytes);
    tracing::debug!(
        ?format,
        width = img.width(),
        height = img.height(),
        ?orientation,
        "Decoded image"
    );

    let upright = apply_orientation(img, orientation);
    Ok(RasterBuffer::from_rgba_image(upright.into_rgba8()))
}

/// EXIF orientation of a container, `Normal` when absent or unreadable.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 1, Rgba([1, 2, 3, 4]));

        let buf = decode_image(&png_bytes(&img)).unwrap();
        assert_eq!(buf.width(), 3);
        assert_eq!(buf.height(), 2);
        assert_eq!(buf.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(buf.pixel(2, 1), [1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_garbage() {
        let bytes = b"definitely not an image";
        assert!(matches!(decode_image(bytes), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated_png() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([200, 0, 0, 255]));
        let bytes = png_bytes(&img);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_too_large() {
        let bytes = vec![0u8; MAX_INPUT_BYTES + 1];
        assert!(matches!(
            decode_image(&bytes),
            Err(DecodeError::TooLarge { limit: MAX_INPUT_BYTES, .. })
        ));
    }

    #[test]
    fn test_orientation_without_exif() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert_eq!(extract_orientation(&png_bytes(&img)), Orientation::Normal);
        assert_eq!(extract_orientation(&[0, 1, 2, 3]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        // 2x1: red then blue; 90° CW puts red on top
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let out = apply_orientation(DynamicImage::ImageRgba8(img), Orientation::Rotate90CW).into_rgba8();
        assert_eq!(out.dimensions(), (1, 2));
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 1), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

        let out = apply_orientation(DynamicImage::ImageRgba8(img), Orientation::FlipHorizontal).into_rgba8();
        assert_eq!(out.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }
}
