//! Decode and encode bindings.
//!
//! # Example
//!
//! ```typescript
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const jpeg = encode_image(image, "image/jpeg", 0.85);
//! ```

use crate::types::{to_js_error, JsRasterBuffer};
use rasterlab_core::codec::{self, ExportOptions, OutputFormat};
use wasm_bindgen::prelude::*;

/// Decode PNG, JPEG or WebP bytes into an upright RGBA image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterBuffer, JsValue> {
    codec::decode_image(bytes)
        .map(JsRasterBuffer::from_buffer)
        .map_err(to_js_error)
}

/// Encode an image.
///
/// `format` is a MIME type (`"image/png"`) or a short name (`"png"`,
/// `"jpeg"`, `"jpg"`, `"webp"`). `quality` in `[0, 1]` only affects JPEG.
#[wasm_bindgen]
pub fn encode_image(image: &JsRasterBuffer, format: &str, quality: f32) -> Result<Vec<u8>, JsValue> {
    let format = format_from_str(format).ok_or_else(|| to_js_error(format!("Unsupported output format: {}", format)))?;
    codec::encode_image(image.buffer(), format, quality).map_err(to_js_error)
}

/// MIME type for a format name, e.g. for building a `Blob`.
#[wasm_bindgen]
pub fn mime_type_for(format: &str) -> Option<String> {
    format_from_str(format).map(|f| f.mime_type().to_string())
}

pub(crate) fn format_from_str(format: &str) -> Option<OutputFormat> {
    OutputFormat::from_mime(format).or_else(|| match format.trim().to_ascii_lowercase().as_str() {
        "png" => Some(OutputFormat::Png),
        "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
        "webp" => Some(OutputFormat::Webp),
        _ => None,
    })
}

/// Export options from a JS object; `undefined`/`null` give the defaults.
pub(crate) fn export_from_js(value: JsValue) -> Result<ExportOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(ExportOptions::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| to_js_error(format!("Invalid export options: {}", e)))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_garbage_throws() {
        assert!(decode_image(&[1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_export_defaults_from_undefined() {
        let opts = export_from_js(JsValue::UNDEFINED).unwrap();
        assert_eq!(opts, ExportOptions::default());
    }
}
