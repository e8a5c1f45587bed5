//! Rasterlab Core - raster image transform library
//!
//! This crate provides the image processing behind Rasterlab: geometric
//! transforms, pixel filters, watermark compositing, the crop selection
//! state machine, and a batch pipeline that runs one operation over many
//! images.
//!
//! Every operation borrows a [`RasterBuffer`] and returns a new one; nothing
//! here keeps a buffer between calls.

pub mod adjustments;
pub mod batch;
pub mod buffer;
pub mod codec;
pub mod error;
pub mod filter;
pub mod luminance;
pub mod params;
pub mod selection;
pub mod transform;
pub mod watermark;

pub use adjustments::{apply_filter, color_adjust, grayscale, ColorAdjustments, FilterKind};
pub use batch::{BatchId, BatchPipeline, BatchProgress, BatchReport, BatchStatus};
pub use buffer::RasterBuffer;
pub use codec::{decode_image, encode_image, Codec, ExportOptions, ImageCodec, OutputFormat};
pub use error::{ImageError, Result};
pub use filter::{box_blur, pixelate};
pub use params::{apply, TransformParams};
pub use selection::{AspectRatio, CropBox, CropEditor, Handle};
pub use transform::{compute_rotated_bounds, crop, flip, resize, rotate, ResizeMode};
pub use watermark::{composite, render_preview, Anchor, Watermark, WatermarkContent};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_resize_red_square() {
        let red = RasterBuffer::filled(100, 100, [255, 0, 0, 255]);
        let out = resize(&red, 50, 200, ResizeMode::Fit).unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
        assert_eq!(out.pixel(25, 25), [255, 0, 0, 255]);
    }

    #[test]
    fn test_crop_window_origin() {
        let pixels = (0..200u32 * 100 * 4).map(|i| (i % 251) as u8).collect();
        let img = RasterBuffer::new(200, 100, pixels).unwrap();
        let out = crop(&img, 50, 0, 100, 100).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
        assert_eq!(out.pixel(0, 0), img.pixel(50, 0));
    }

    #[test]
    fn test_batch_pixelate_with_one_bad_source() {
        let mut pipeline = BatchPipeline::new();
        for name in ["a.png", "b.png"] {
            let img = RasterBuffer::filled(40, 30, [10, 120, 240, 255]);
            pipeline.add(name, encode_image(&img, OutputFormat::Png, 0.9).unwrap());
        }
        pipeline.add("c.png", vec![0xde, 0xad, 0xbe, 0xef]);

        let params = TransformParams::Pixelate { block_size: 10 };
        let report = pipeline.run(&params, &ExportOptions::default(), |_| {});
        assert_eq!((report.completed, report.failed), (2, 1));
        assert_eq!(report.outputs.len(), 2);
    }

    #[test]
    fn test_zero_color_adjust_is_identity() {
        let pixels = (0..16u32 * 16 * 4).map(|i| (i * 7 % 256) as u8).collect();
        let img = RasterBuffer::new(16, 16, pixels).unwrap();
        assert_eq!(color_adjust(&img, &ColorAdjustments::default()).unwrap(), img);
    }

    #[test]
    fn test_crop_editor_feeds_crop() {
        let img = RasterBuffer::filled(400, 300, [0, 0, 0, 255]);
        let mut editor = CropEditor::new(img.width(), img.height());
        editor.set_aspect_ratio(AspectRatio::Fixed(1.0));

        let (x, y, w, h) = editor.pixel_rect();
        let out = crop(&img, x, y, w, h).unwrap();
        assert_eq!((out.width(), out.height()), (300, 300));
    }
}
