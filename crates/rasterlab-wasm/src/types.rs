//! WASM-compatible wrapper types for image data.

use rasterlab_core::RasterBuffer;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it into a new
/// `Uint8Array`; keep images on the WASM side between operations and only
/// extract pixels for display or export.
#[wasm_bindgen]
pub struct JsRasterBuffer {
    inner: RasterBuffer,
}

#[wasm_bindgen]
impl JsRasterBuffer {
    /// Wrap RGBA pixel data (4 bytes per pixel, row-major).
    ///
    /// Throws if `pixels.length != width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterBuffer, JsValue> {
        RasterBuffer::new(width, height, pixels)
            .map(Self::from_buffer)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// RGBA pixel data as a `Uint8Array` copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; the finalizer releases it too.
    pub fn free(self) {}
}

impl JsRasterBuffer {
    pub(crate) fn from_buffer(inner: RasterBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn buffer(&self) -> &RasterBuffer {
        &self.inner
    }
}

/// Wrap a core result for return to JS.
pub(crate) fn to_js(result: rasterlab_core::Result<RasterBuffer>) -> Result<JsRasterBuffer, JsValue> {
    result.map(JsRasterBuffer::from_buffer).map_err(to_js_error)
}

pub(crate) fn to_js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_raster_buffer_creation() {
        let img = JsRasterBuffer::new(100, 50, vec![0u8; 100 * 50 * 4]).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 20000);
    }

    #[test]
    fn test_js_raster_buffer_pixels() {
        let pixels = vec![255u8, 128, 64, 32, 16, 8, 4, 2];
        let img = JsRasterBuffer::new(2, 1, pixels.clone()).unwrap();
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_from_buffer() {
        let js_img = JsRasterBuffer::from_buffer(RasterBuffer::filled(20, 10, [1, 2, 3, 4]));
        assert_eq!(js_img.width(), 20);
        assert_eq!(js_img.buffer().pixel(19, 9), [1, 2, 3, 4]);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_rejects_wrong_length() {
        let result = JsRasterBuffer::new(2, 2, vec![0u8; 15]);
        assert!(result.is_err());
    }
}
