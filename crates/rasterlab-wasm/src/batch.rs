//! Batch pipeline binding.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const batch = new JsBatchPipeline();
//! for (const file of files) {
//!   batch.add(file.name, new Uint8Array(await file.arrayBuffer()));
//! }
//!
//! const report = batch.run(
//!   { op: "pixelate", blockSize: 10 },
//!   { format: "jpeg", quality: 0.85 },
//!   (p) => bar.value = p.fraction,
//! );
//! for (const out of report.outputs) {
//!   download(new Blob([out.bytes], { type: out.mimeType }), out.name);
//! }
//! ```

use crate::codec::export_from_js;
use crate::operation::params_from_js;
use crate::types::{to_js_error, JsRasterBuffer};
use js_sys::{Array, Function, Object, Reflect, Uint8Array};
use rasterlab_core::batch::{BatchPipeline, BatchReport};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct JsBatchPipeline {
    inner: BatchPipeline,
}

impl Default for JsBatchPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsBatchPipeline {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsBatchPipeline {
        JsBatchPipeline {
            inner: BatchPipeline::new(),
        }
    }

    /// Queue encoded image bytes; returns the item id.
    pub fn add(&mut self, name: String, bytes: Vec<u8>) -> f64 {
        self.inner.add(name, bytes) as f64
    }

    pub fn remove(&mut self, id: f64) -> bool {
        self.inner.remove(id as u64)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Run one operation over every queued image.
    ///
    /// `params` is a `TransformParams` object, `export` an `ExportOptions`
    /// object (or `undefined` for PNG). `on_progress` receives
    /// `{ completed, failed, total, fraction, id, status }` after each item.
    /// Returns `{ outputs, completed, failed, failures }`; per-item errors
    /// are reported there, never thrown.
    pub fn run(
        &mut self,
        params: JsValue,
        export: JsValue,
        on_progress: &Function,
        overlay: Option<JsRasterBuffer>,
    ) -> Result<JsValue, JsValue> {
        let params = params_from_js(params, overlay.as_ref())?;
        let export = export_from_js(export)?;

        let report = self.inner.run(&params, &export, |progress| {
            let value = match serde_wasm_bindgen::to_value(progress) {
                Ok(value) => value,
                Err(e) => {
                    web_sys::console::warn_1(&progress_warning(progress.id, &e).into());
                    return;
                }
            };
            if let Err(e) = on_progress.call1(&JsValue::NULL, &value) {
                web_sys::console::warn_2(&"Batch progress callback failed:".into(), &e);
            }
        });

        for failure in &report.failures {
            web_sys::console::warn_1(&format!("Batch item '{}' failed: {}", failure.name, failure.error).into());
        }
        report_to_js(&report)
    }
}

fn progress_warning(id: u64, error: &impl std::fmt::Display) -> String {
    format!("Batch progress for item {} could not be converted: {}", id, error)
}

fn report_to_js(report: &BatchReport) -> Result<JsValue, JsValue> {
    let outputs = Array::new();
    for out in &report.outputs {
        let obj = Object::new();
        Reflect::set(&obj, &"id".into(), &JsValue::from_f64(out.id as f64))?;
        Reflect::set(&obj, &"name".into(), &out.name.as_str().into())?;
        Reflect::set(&obj, &"mimeType".into(), &out.format.mime_type().into())?;
        Reflect::set(&obj, &"extension".into(), &out.format.extension().into())?;
        Reflect::set(&obj, &"bytes".into(), &Uint8Array::from(out.bytes.as_slice()))?;
        outputs.push(&obj);
    }

    let result = Object::new();
    Reflect::set(&result, &"outputs".into(), &outputs)?;
    Reflect::set(&result, &"completed".into(), &JsValue::from_f64(report.completed as f64))?;
    Reflect::set(&result, &"failed".into(), &JsValue::from_f64(report.failed as f64))?;
    let failures = serde_wasm_bindgen::to_value(&report.failures).map_err(to_js_error)?;
    Reflect::set(&result, &"failures".into(), &failures)?;
    Ok(result.into())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use rasterlab_core::{encode_image, OutputFormat, RasterBuffer};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn params(json: &str) -> JsValue {
        js_sys::JSON::parse(json).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_run_reports_counts() {
        let png = encode_image(&RasterBuffer::filled(20, 20, [200, 0, 0, 255]), OutputFormat::Png, 1.0).unwrap();

        let mut batch = JsBatchPipeline::new();
        batch.add("a.png".into(), png.clone());
        batch.add("bad.png".into(), vec![0, 0, 0]);
        batch.add("c.png".into(), png);

        let callback = Function::new_no_args("");
        let report = batch
            .run(
                params(r#"{"op":"pixelate","blockSize":10}"#),
                JsValue::UNDEFINED,
                &callback,
                None,
            )
            .unwrap();

        let completed = Reflect::get(&report, &"completed".into()).unwrap();
        let failed = Reflect::get(&report, &"failed".into()).unwrap();
        assert_eq!(completed.as_f64(), Some(2.0));
        assert_eq!(failed.as_f64(), Some(1.0));
        assert_eq!(batch.length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_run_rejects_bad_params() {
        let mut batch = JsBatchPipeline::new();
        let callback = Function::new_no_args("");
        let result = batch.run(params(r#"{"op":"sharpen"}"#), JsValue::UNDEFINED, &callback, None);
        assert!(result.is_err());
    }
}
