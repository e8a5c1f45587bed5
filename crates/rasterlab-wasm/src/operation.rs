//! Generic operation binding.
//!
//! `apply_operation` takes the same params object the batch pipeline uses,
//! so the UI can preview exactly what a batch run will do.

use crate::types::{to_js, to_js_error, JsRasterBuffer};
use rasterlab_core::params::{self, TransformParams};
use wasm_bindgen::prelude::*;

/// Apply any operation described by a `TransformParams` object, e.g.
/// `{ op: "rotate", angleDegrees: 90 }`.
///
/// `overlay` is attached as the source of an image watermark and ignored
/// for other operations.
#[wasm_bindgen]
pub fn apply_operation(
    image: &JsRasterBuffer,
    params: JsValue,
    overlay: Option<JsRasterBuffer>,
) -> Result<JsRasterBuffer, JsValue> {
    let params = params_from_js(params, overlay.as_ref())?;
    to_js(params::apply(image.buffer(), &params))
}

pub(crate) fn params_from_js(value: JsValue, overlay: Option<&JsRasterBuffer>) -> Result<TransformParams, JsValue> {
    let mut params: TransformParams =
        serde_wasm_bindgen::from_value(value).map_err(|e| to_js_error(format!("Invalid operation: {}", e)))?;
    if let (TransformParams::Watermark(wm), Some(overlay)) = (&mut params, overlay) {
        wm.attach_source(overlay.buffer().clone());
    }
    Ok(params)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_apply_rotate() {
        let img = JsRasterBuffer::new(4, 2, vec![0u8; 32]).unwrap();
        let params = js_sys::JSON::parse(r#"{"op":"rotate","angleDegrees":90}"#).unwrap();
        let out = apply_operation(&img, params, None).unwrap();
        assert_eq!((out.width(), out.height()), (2, 4));
    }

    #[wasm_bindgen_test]
    fn test_unknown_operation_throws() {
        let img = JsRasterBuffer::new(1, 1, vec![0u8; 4]).unwrap();
        let params = js_sys::JSON::parse(r#"{"op":"sharpen"}"#).unwrap();
        assert!(apply_operation(&img, params, None).is_err());
    }
}
