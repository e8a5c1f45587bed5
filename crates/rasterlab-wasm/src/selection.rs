//! Crop editor binding.
//!
//! The host forwards pointer events (in display pixels relative to the
//! displayed image) and reads the box back after each one.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const editor = new JsCropEditor(image.width, image.height);
//! editor.set_display_size(canvas.clientWidth, canvas.clientHeight);
//!
//! canvas.onpointerdown = (e) => editor.on_pointer_down(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => {
//!   canvas.style.cursor = editor.cursor_at(e.offsetX, e.offsetY);
//!   if (editor.on_pointer_move(e.offsetX, e.offsetY)) redraw(editor);
//! };
//! canvas.onpointerup = () => editor.on_pointer_up();
//!
//! const [x, y, w, h] = editor.pixel_rect();
//! const cropped = crop(image, x, y, w, h);
//! ```

use crate::types::to_js_error;
use rasterlab_core::selection::{AspectRatio, CropEditor};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsCropEditor {
    inner: CropEditor,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Editor covering the whole image with a free ratio.
    #[wasm_bindgen(constructor)]
    pub fn new(image_width: u32, image_height: u32) -> JsCropEditor {
        JsCropEditor {
            inner: CropEditor::new(image_width, image_height),
        }
    }

    pub fn set_display_size(&mut self, width: f64, height: f64) {
        self.inner.set_display_size(width, height);
    }

    /// Start a drag. Returns the grabbed handle (`"move"`, `"n"`, `"se"`,
    /// ...) or `undefined` when the point misses the box.
    pub fn on_pointer_down(&mut self, x: f64, y: f64) -> Option<String> {
        self.inner.on_pointer_down(x, y).map(|h| h.as_str().to_string())
    }

    /// Returns true if the box changed.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.on_pointer_move(x, y).is_some()
    }

    pub fn on_pointer_up(&mut self) {
        self.inner.on_pointer_up();
    }

    /// `"free"` or a `"w:h"` preset such as `"16:9"`.
    pub fn set_aspect_ratio(&mut self, ratio: &str) -> Result<(), JsValue> {
        let aspect = AspectRatio::parse(ratio).ok_or_else(|| to_js_error(format!("Invalid aspect ratio: {}", ratio)))?;
        self.inner.set_aspect_ratio(aspect);
        Ok(())
    }

    pub fn set_box_numeric(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.set_box_numeric(x, y, width, height);
    }

    pub fn set_x(&mut self, x: f64) {
        self.inner.set_x(x);
    }

    pub fn set_y(&mut self, y: f64) {
        self.inner.set_y(y);
    }

    pub fn set_width(&mut self, width: f64) {
        self.inner.set_width(width);
    }

    pub fn set_height(&mut self, height: f64) {
        self.inner.set_height(height);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// CSS cursor for the pointer position.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        self.inner.cursor_at(x, y).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.crop_box().x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.crop_box().y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.crop_box().width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.crop_box().height
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    /// Whole-pixel `[x, y, width, height]` for `crop`.
    pub fn pixel_rect(&self) -> Vec<i32> {
        let (x, y, w, h) = self.inner.pixel_rect();
        [x, y, w, h].iter().map(|&v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32).collect()
    }
}
