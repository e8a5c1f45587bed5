//! Batch pipeline: one operation over many images.
//!
//! Each queued item goes through decode → [`apply`] → encode on its own.
//! A failure at any stage is recorded against that item and the run moves
//! on; sibling items are never affected and the run is never aborted.
//!
//! After a run, successful items leave the queue and their encoded bytes are
//! returned in the [`BatchReport`]. Failed items stay queued with their
//! error, so a later run retries them.

use serde::Serialize;

use crate::buffer::RasterBuffer;
use crate::codec::{Codec, ExportOptions, ImageCodec, OutputFormat};
use crate::error::Result;
use crate::params::{apply, TransformParams};

/// Identifier handed out by [`BatchPipeline::add`]. Increases monotonically
/// for the lifetime of a pipeline.
pub type BatchId = u64;

/// Lifecycle of a queued item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "camelCase")]
pub enum BatchStatus {
    Pending,
    Processing,
    Done,
    Failed(String),
}

/// One queued input.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub id: BatchId,
    pub name: String,
    pub bytes: Vec<u8>,
    pub status: BatchStatus,
}

/// Encoded result for a successful item.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutput {
    pub id: BatchId,
    pub name: String,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Error recorded for a failed item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub id: BatchId,
    pub name: String,
    pub error: String,
}

/// Snapshot emitted after each item finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchProgress {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
    /// `(completed + failed) / total`
    pub fraction: f32,
    /// Item that just finished.
    pub id: BatchId,
    pub status: BatchStatus,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// In submission order.
    pub outputs: Vec<BatchOutput>,
    pub completed: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
}

/// Queue of images plus the codec used to read and write them.
#[derive(Debug)]
pub struct BatchPipeline<C: Codec = ImageCodec> {
    codec: C,
    items: Vec<BatchItem>,
    next_id: BatchId,
}

impl BatchPipeline<ImageCodec> {
    pub fn new() -> Self {
        Self::with_codec(ImageCodec)
    }
}

impl Default for BatchPipeline<ImageCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> BatchPipeline<C> {
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Queue encoded image bytes. Nothing is decoded until a run.
    pub fn add(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> BatchId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(BatchItem {
            id,
            name: name.into(),
            bytes,
            status: BatchStatus::Pending,
        });
        id
    }

    /// Drop an item from the queue. Returns false for unknown ids.
    pub fn remove(&mut self, id: BatchId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[BatchItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Process every queued item in submission order.
    ///
    /// `on_progress` is called once per item, after it finishes.
    pub fn run<F>(&mut self, params: &TransformParams, export: &ExportOptions, mut on_progress: F) -> BatchReport
    where
        F: FnMut(&BatchProgress),
    {
        let total = self.items.len();
        tracing::info!(total, op = params.name(), "Batch run started");

        let mut report = BatchReport::default();
        for item in &mut self.items {
            item.status = BatchStatus::Processing;
            let result = process_item(&self.codec, &item.bytes, params, export);
            record(item, result, export.format, &mut report);

            on_progress(&BatchProgress {
                completed: report.completed,
                failed: report.failed,
                total,
                fraction: fraction(report.completed + report.failed, total),
                id: item.id,
                status: item.status.clone(),
            });
        }

        self.finish(report)
    }

    /// Process every queued item across the rayon thread pool.
    ///
    /// Same contract as [`run`](Self::run), except `on_progress` may be
    /// called from worker threads and in completion order. Outputs still
    /// follow submission order.
    #[cfg(feature = "parallel")]
    pub fn run_parallel<F>(&mut self, params: &TransformParams, export: &ExportOptions, on_progress: F) -> BatchReport
    where
        C: Sync,
        F: Fn(&BatchProgress) + Sync,
    {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let total = self.items.len();
        tracing::info!(total, op = params.name(), "Parallel batch run started");

        let completed = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let codec = &self.codec;

        let results: Vec<Result<Vec<u8>>> = self
            .items
            .par_iter_mut()
            .map(|item| {
                item.status = BatchStatus::Processing;
                let result = process_item(codec, &item.bytes, params, export);
                let (done, errors) = match &result {
                    Ok(_) => {
                        item.status = BatchStatus::Done;
                        (completed.fetch_add(1, Ordering::SeqCst) + 1, failed.load(Ordering::SeqCst))
                    }
                    Err(e) => {
                        item.status = BatchStatus::Failed(e.to_string());
                        (completed.load(Ordering::SeqCst), failed.fetch_add(1, Ordering::SeqCst) + 1)
                    }
                };

                on_progress(&BatchProgress {
                    completed: done,
                    failed: errors,
                    total,
                    fraction: fraction(done + errors, total),
                    id: item.id,
                    status: item.status.clone(),
                });
                result
            })
            .collect();

        let mut report = BatchReport::default();
        for (item, result) in self.items.iter_mut().zip(results) {
            record(item, result, export.format, &mut report);
        }
        self.finish(report)
    }

    /// Drop finished items and log the summary.
    fn finish(&mut self, report: BatchReport) -> BatchReport {
        self.items.retain(|item| item.status != BatchStatus::Done);
        tracing::info!(
            completed = report.completed,
            failed = report.failed,
            "Batch run finished"
        );
        report
    }
}

/// Decode, transform and encode one input.
fn process_item<C: Codec>(
    codec: &C,
    bytes: &[u8],
    params: &TransformParams,
    export: &ExportOptions,
) -> Result<Vec<u8>> {
    let image: RasterBuffer = codec.decode(bytes)?;
    let output = apply(&image, params)?;
    Ok(codec.encode(&output, export.format, export.quality)?)
}

/// Set the item's final status and add it to the report.
fn record(item: &mut BatchItem, result: Result<Vec<u8>>, format: OutputFormat, report: &mut BatchReport) {
    match result {
        Ok(bytes) => {
            item.status = BatchStatus::Done;
            report.completed += 1;
            report.outputs.push(BatchOutput {
                id: item.id,
                name: item.name.clone(),
                format,
                bytes,
            });
        }
        Err(e) => {
            let error = e.to_string();
            tracing::warn!(id = item.id, name = %item.name, %error, "Batch item failed");
            item.status = BatchStatus::Failed(error.clone());
            report.failed += 1;
            report.failures.push(BatchFailure {
                id: item.id,
                name: item.name.clone(),
                error,
            });
        }
    }
}

fn fraction(done: usize, total: usize) -> f32 {
    if total == 0 {
        1.0
    } else {
        done as f32 / total as f32
    }
}
