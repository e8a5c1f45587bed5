//! WASM bindings for pixel filters.

use crate::types::{to_js, to_js_error, JsRasterBuffer};
use rasterlab_core::adjustments::{self, ColorAdjustments, FilterKind};
use rasterlab_core::filter;
use wasm_bindgen::prelude::*;

/// Blend towards luminance grayscale; `intensity` in `[0, 1]`.
#[wasm_bindgen]
pub fn grayscale(image: &JsRasterBuffer, intensity: f32) -> Result<JsRasterBuffer, JsValue> {
    to_js(adjustments::grayscale(image.buffer(), intensity))
}

/// Contrast, then brightness, then saturation; each in `[-100, 100]`.
#[wasm_bindgen]
pub fn color_adjust(
    image: &JsRasterBuffer,
    brightness: f32,
    contrast: f32,
    saturation: f32,
) -> Result<JsRasterBuffer, JsValue> {
    let adj = ColorAdjustments::new(brightness, contrast, saturation);
    to_js(adjustments::color_adjust(image.buffer(), &adj))
}

/// Apply a named tonal filter: `"sepia"`, `"invert"` or `"saturate"`.
#[wasm_bindgen]
pub fn apply_filter(image: &JsRasterBuffer, kind: &str) -> Result<JsRasterBuffer, JsValue> {
    let kind = filter_kind_from_str(kind).ok_or_else(|| to_js_error(format!("Unknown filter: {}", kind)))?;
    to_js(adjustments::apply_filter(image.buffer(), kind))
}

/// Box blur; `radius < 1` returns a copy.
#[wasm_bindgen]
pub fn box_blur(image: &JsRasterBuffer, radius: i32) -> Result<JsRasterBuffer, JsValue> {
    to_js(filter::box_blur(image.buffer(), radius))
}

/// Mosaic into `block_size` tiles; `block_size < 1` returns a copy.
#[wasm_bindgen]
pub fn pixelate(image: &JsRasterBuffer, block_size: i32) -> Result<JsRasterBuffer, JsValue> {
    to_js(filter::pixelate(image.buffer(), block_size))
}

pub(crate) fn filter_kind_from_str(kind: &str) -> Option<FilterKind> {
    match kind {
        "sepia" => Some(FilterKind::Sepia),
        "invert" => Some(FilterKind::Invert),
        "saturate" => Some(FilterKind::Saturate),
        _ => None,
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_unknown_filter_throws() {
        let img = JsRasterBuffer::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        assert!(apply_filter(&img, "vintage").is_err());
    }
}
