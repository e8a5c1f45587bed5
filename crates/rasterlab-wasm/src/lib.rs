//! Rasterlab WASM - WebAssembly bindings for Rasterlab
//!
//! This crate exposes the rasterlab-core transforms, filters, watermark
//! compositor, crop editor and batch pipeline to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `types` - `JsRasterBuffer`, the image handle passed between calls
//! - `codec` - Decoding uploads and encoding exports
//! - `transform` - Resize, crop, rotate, flip
//! - `filter` - Grayscale, color adjustment, presets, blur, pixelate
//! - `watermark` - Text and image watermarks, plus scaled previews
//! - `selection` - Interactive crop box state machine
//! - `operation` - Any operation from a params object
//! - `batch` - One operation over many files
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, resize, encode_image } from '@rasterlab/wasm';
//!
//! await init();
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const small = resize(image, 800, 600, "fit");
//! const png = encode_image(small, "image/png", 1.0);
//! ```

use wasm_bindgen::prelude::*;

mod batch;
mod codec;
mod filter;
mod operation;
mod selection;
mod transform;
mod types;
mod watermark;

pub use batch::JsBatchPipeline;
pub use codec::{decode_image, encode_image, mime_type_for};
pub use filter::{apply_filter, box_blur, color_adjust, grayscale, pixelate};
pub use operation::apply_operation;
pub use selection::JsCropEditor;
pub use transform::{crop, flip, resize, rotate};
pub use types::JsRasterBuffer;
pub use watermark::{apply_watermark, preview_watermark};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&format!("rasterlab-wasm {} loaded", version()).into());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
