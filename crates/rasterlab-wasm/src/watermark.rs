//! Watermark bindings.
//!
//! The watermark config is a plain JS object matching the core `Watermark`
//! shape. Image watermarks pass their source as a separate `JsRasterBuffer`,
//! which is moved into the call; pass a fresh handle each time.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const out = apply_watermark(image, {
//!   content: { type: "text", text: "© 2024", fontSize: 48 },
//!   x: 20, y: image.height - 20, opacity: 0.6,
//! });
//!
//! const logoed = apply_watermark(image, {
//!   content: { type: "image" },
//!   x: 10, y: 10, width: 120, height: 40, opacity: 0.8,
//! }, logo);
//!
//! // Same relative spot on every image of a batch
//! const centred = { content: { type: "text", text: "© 2025" },
//!   anchor: "center", x: -100, y: 0 };
//! ```

use crate::types::{to_js, to_js_error, JsRasterBuffer};
use rasterlab_core::watermark::{self, Watermark};
use wasm_bindgen::prelude::*;

/// Composite a watermark at full resolution.
#[wasm_bindgen]
pub fn apply_watermark(
    image: &JsRasterBuffer,
    config: JsValue,
    overlay: Option<JsRasterBuffer>,
) -> Result<JsRasterBuffer, JsValue> {
    let wm = watermark_from_js(config, overlay.as_ref())?;
    to_js(watermark::composite(image.buffer(), &wm))
}

/// Render a scaled-down preview, at most `max_width` wide (500 if 0).
#[wasm_bindgen]
pub fn preview_watermark(
    image: &JsRasterBuffer,
    config: JsValue,
    overlay: Option<JsRasterBuffer>,
    max_width: u32,
) -> Result<JsRasterBuffer, JsValue> {
    let wm = watermark_from_js(config, overlay.as_ref())?;
    let max_width = if max_width == 0 {
        watermark::PREVIEW_MAX_WIDTH
    } else {
        max_width
    };
    to_js(watermark::render_preview(image.buffer(), &wm, max_width))
}

fn watermark_from_js(config: JsValue, overlay: Option<&JsRasterBuffer>) -> Result<Watermark, JsValue> {
    let mut wm: Watermark =
        serde_wasm_bindgen::from_value(config).map_err(|e| to_js_error(format!("Invalid watermark: {}", e)))?;
    if let Some(overlay) = overlay {
        wm.attach_source(overlay.buffer().clone());
    }
    Ok(wm)
}
