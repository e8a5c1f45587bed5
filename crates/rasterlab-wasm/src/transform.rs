//! WASM bindings for geometric transforms.
//!
//! All of these return a new image and leave the input untouched.

use crate::types::{to_js, to_js_error, JsRasterBuffer};
use rasterlab_core::transform::{self, ResizeMode};
use wasm_bindgen::prelude::*;

/// Resize into a `target_width × target_height` box.
///
/// `mode` is `"fit"` (keep aspect, fit inside), `"fill"` (keep aspect,
/// cover and centre-crop) or `"stretch"`. Throws on any other mode.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const thumb = resize(image, 320, 240, "fill");
/// ```
#[wasm_bindgen]
pub fn resize(
    image: &JsRasterBuffer,
    target_width: u32,
    target_height: u32,
    mode: &str,
) -> Result<JsRasterBuffer, JsValue> {
    let mode = resize_mode_from_str(mode).ok_or_else(|| to_js_error(format!("Unknown resize mode: {}", mode)))?;
    to_js(transform::resize(image.buffer(), target_width, target_height, mode))
}

/// Crop to a pixel window. The window is clamped to the image.
#[wasm_bindgen]
pub fn crop(image: &JsRasterBuffer, x: i32, y: i32, width: i32, height: i32) -> Result<JsRasterBuffer, JsValue> {
    to_js(transform::crop(
        image.buffer(),
        x as i64,
        y as i64,
        width as i64,
        height as i64,
    ))
}

/// Rotate around the centre; positive angles turn clockwise.
///
/// The canvas grows to the rotated bounding box and uncovered corners are
/// transparent.
#[wasm_bindgen]
pub fn rotate(image: &JsRasterBuffer, angle_degrees: f64) -> Result<JsRasterBuffer, JsValue> {
    to_js(transform::rotate(image.buffer(), angle_degrees))
}

#[wasm_bindgen]
pub fn flip(image: &JsRasterBuffer, horizontal: bool, vertical: bool) -> Result<JsRasterBuffer, JsValue> {
    to_js(transform::flip(image.buffer(), horizontal, vertical))
}

pub(crate) fn resize_mode_from_str(mode: &str) -> Option<ResizeMode> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "fit" => Some(ResizeMode::Fit),
        "fill" => Some(ResizeMode::Fill),
        "stretch" => Some(ResizeMode::Stretch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> JsRasterBuffer {
        let pixels: Vec<u8> = (0..(width * height * 4) as usize).map(|i| (i % 256) as u8).collect();
        JsRasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_resize_modes() {
        let img = test_image(100, 100);
        let fit = resize(&img, 50, 200, "fit").unwrap();
        assert_eq!((fit.width(), fit.height()), (50, 50));

        let fill = resize(&img, 50, 200, "fill").unwrap();
        assert_eq!((fill.width(), fill.height()), (50, 200));

        let stretch = resize(&img, 30, 10, "stretch").unwrap();
        assert_eq!((stretch.width(), stretch.height()), (30, 10));
    }

    #[test]
    fn test_resize_mode_from_str() {
        assert_eq!(resize_mode_from_str("fit"), Some(ResizeMode::Fit));
        assert_eq!(resize_mode_from_str(" Fill "), Some(ResizeMode::Fill));
        assert_eq!(resize_mode_from_str("STRETCH"), Some(ResizeMode::Stretch));
        assert_eq!(resize_mode_from_str("bogus"), None);
        assert_eq!(resize_mode_from_str(""), None);
    }

    #[test]
    fn test_rotation_90_degrees() {
        let img = test_image(100, 50);
        let result = rotate(&img, 90.0).unwrap();
        assert_eq!(result.width(), 50);
        assert_eq!(result.height(), 100);
    }

    #[test]
    fn test_rotation_45_degrees_expands() {
        let img = test_image(100, 100);
        let result = rotate(&img, 45.0).unwrap();
        assert!(result.width() > 100);
        assert!(result.height() > 100);
    }

    #[test]
    fn test_crop_window() {
        let img = test_image(200, 100);
        let result = crop(&img, 50, 0, 100, 100).unwrap();
        assert_eq!(result.width(), 100);
        assert_eq!(result.height(), 100);
    }

    #[test]
    fn test_flip_keeps_dimensions() {
        let img = test_image(7, 3);
        let result = flip(&img, true, true).unwrap();
        assert_eq!((result.width(), result.height()), (7, 3));
    }
}
