//! Watermark compositing.
//!
//! A watermark is either a line of text drawn as an outline pass followed by
//! a fill pass, or an overlay image scaled to a box. Both are blended
//! source-over with a global opacity onto a copy of the target.
//!
//! Placement is in target pixels and may be negative or extend past the
//! target; anything outside is clipped. Text is never wrapped. With
//! [`Anchor::Center`] the position is an offset from the target's centre,
//! so one watermark lands in the same relative spot on images of any size.
//!
//! Sizes are clamped before any allocation: font sizes to
//! [`MAX_FONT_SIZE`], image boxes to the target's dimensions. Only the
//! characters that can touch the target are rasterized.

mod blend;
mod text;

use serde::{Deserialize, Serialize};

use crate::buffer::RasterBuffer;
use crate::error::{ImageError, Result};
use crate::transform::resample;

/// Outline alpha relative to the watermark opacity.
pub const TEXT_STROKE_ALPHA: f32 = 0.3;

/// Outline width for full-resolution renders.
pub const STROKE_WIDTH: u32 = 3;

/// Outline width for preview renders.
pub const PREVIEW_STROKE_WIDTH: u32 = 2;

/// Default preview width cap.
pub const PREVIEW_MAX_WIDTH: u32 = 500;

/// Largest full-resolution font size, in pixels.
pub const MAX_FONT_SIZE: f32 = 150.0;

/// What to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WatermarkContent {
    Text {
        text: String,
        #[serde(rename = "fontSize")]
        font_size: f32,
        #[serde(default = "default_fill")]
        fill: [u8; 3],
        #[serde(default = "default_stroke")]
        stroke: [u8; 3],
    },
    /// The source image is attached by the host after deserializing.
    Image {
        #[serde(skip)]
        source: Option<RasterBuffer>,
    },
}

fn default_fill() -> [u8; 3] {
    [255, 255, 255]
}

fn default_stroke() -> [u8; 3] {
    [0, 0, 0]
}

fn default_opacity() -> f32 {
    0.5
}

/// What `(x, y)` is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    /// The target's top-left corner.
    #[default]
    TopLeft,
    /// The target's centre, `(width / 2, height / 2)`.
    Center,
}

/// A watermark and its placement on the target.
///
/// For text, `(x, y)` is the left end of the baseline and `width`/`height`
/// are ignored. For images, `(x, y)` is the top-left corner of the
/// `width × height` box the source is scaled into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    pub content: WatermarkContent,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub width: i64,
    #[serde(default)]
    pub height: i64,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub anchor: Anchor,
}

impl Watermark {
    /// Text watermark with default colours.
    pub fn text(text: impl Into<String>, font_size: f32, x: i64, y: i64, opacity: f32) -> Self {
        Self {
            content: WatermarkContent::Text {
                text: text.into(),
                font_size,
                fill: default_fill(),
                stroke: default_stroke(),
            },
            x,
            y,
            width: 0,
            height: 0,
            opacity,
            anchor: Anchor::TopLeft,
        }
    }

    /// Image watermark scaled into the given box.
    pub fn image(source: RasterBuffer, x: i64, y: i64, width: i64, height: i64, opacity: f32) -> Self {
        Self {
            content: WatermarkContent::Image { source: Some(source) },
            x,
            y,
            width,
            height,
            opacity,
            anchor: Anchor::TopLeft,
        }
    }

    /// Same watermark measured from `anchor`.
    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Position on a `width × height` target in top-left coordinates.
    pub fn origin(&self, width: u32, height: u32) -> (i64, i64) {
        match self.anchor {
            Anchor::TopLeft => (self.x, self.y),
            Anchor::Center => (
                self.x.saturating_add(width as i64 / 2),
                self.y.saturating_add(height as i64 / 2),
            ),
        }
    }

    /// Attach (or replace) the source of an image watermark.
    ///
    /// Has no effect on text watermarks.
    pub fn attach_source(&mut self, image: RasterBuffer) {
        if let WatermarkContent::Image { source } = &mut self.content {
            *source = Some(image);
        }
    }

    /// Copy with every position and size multiplied by `scale`.
    pub fn scaled(&self, scale: f64) -> Self {
        let mul = |v: i64| (v as f64 * scale).round() as i64;
        let content = match &self.content {
            WatermarkContent::Text {
                text,
                font_size,
                fill,
                stroke,
            } => WatermarkContent::Text {
                text: text.clone(),
                font_size: (cap_font_size(*font_size) as f64 * scale) as f32,
                fill: *fill,
                stroke: *stroke,
            },
            image => image.clone(),
        };
        Self {
            content,
            x: mul(self.x),
            y: mul(self.y),
            width: mul(self.width),
            height: mul(self.height),
            opacity: self.opacity,
            anchor: self.anchor,
        }
    }
}

/// Composite a watermark onto a copy of `image` at full resolution.
///
/// # Errors
///
/// - `EmptyBuffer` if `image` has no area
/// - `MissingWatermarkSource` for an image watermark with no source attached
/// - `InvalidDimensions` for an image watermark with a non-positive box
///
/// Font sizes above [`MAX_FONT_SIZE`] are drawn at that size; image boxes
/// larger than the target are shrunk to the target's width and height.
pub fn composite(image: &RasterBuffer, watermark: &Watermark) -> Result<RasterBuffer> {
    composite_with_stroke(image, watermark, STROKE_WIDTH)
}

/// Factor mapping full-resolution coordinates onto a preview at most
/// `max_width` wide. Never upscales.
pub fn preview_scale(image_width: u32, max_width: u32) -> f64 {
    if image_width == 0 || image_width <= max_width {
        1.0
    } else {
        max_width as f64 / image_width as f64
    }
}

/// Render a scaled-down preview of `composite`.
///
/// The base is shrunk to at most `max_width` wide and the watermark's
/// placement, box and font size are multiplied by the same factor, so the
/// preview matches the full render in relative terms.
///
/// # Errors
///
/// Same as [`composite`].
pub fn render_preview(image: &RasterBuffer, watermark: &Watermark, max_width: u32) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    let scale = preview_scale(image.width(), max_width);
    let base = if scale < 1.0 {
        let height = ((image.height() as f64 * scale).round() as u32).max(1);
        resample(image, max_width, height)?
    } else {
        image.clone()
    };

    composite_with_stroke(&base, &watermark.scaled(scale), PREVIEW_STROKE_WIDTH)
}

fn composite_with_stroke(image: &RasterBuffer, watermark: &Watermark, stroke_width: u32) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    let opacity = clamp_opacity(watermark.opacity);

    match &watermark.content {
        WatermarkContent::Text {
            text,
            font_size,
            fill,
            stroke,
        } => {
            let mut output = image.clone();
            let size = match font_px(*font_size) {
                Some(size) if opacity > 0.0 && !text.is_empty() => size,
                _ => return Ok(output),
            };
            let (x, y) = watermark.origin(image.width(), image.height());
            let cell = size as i64;
            let pad = text::stroke_pad(stroke_width) as i64;

            let top = y.saturating_sub(cell + pad);
            if top >= image.height() as i64 || top.saturating_add(cell + 2 * pad) <= 0 {
                return Ok(output);
            }

            // Characters whose padded cell overlaps the target columns
            let count = text.chars().count() as i64;
            let first = (x.saturating_neg().saturating_sub(pad).max(0) / cell).min(count);
            let reach = (image.width() as i64).saturating_sub(x).saturating_add(pad);
            let end = if reach <= 0 {
                0
            } else {
                (reach.saturating_add(cell - 1) / cell).min(count)
            };
            if first >= end {
                return Ok(output);
            }

            let visible: String = text.chars().skip(first as usize).take((end - first) as usize).collect();
            tracing::debug!(chars = end - first, size, "Rendering text watermark");

            let mask = text::rasterize(&visible, size, stroke_width);
            let left = x.saturating_add(first * cell).saturating_sub(pad);
            let stroke_colour = [stroke[0], stroke[1], stroke[2], 255];
            let fill_colour = [fill[0], fill[1], fill[2], 255];

            blend::draw_mask(
                &mut output,
                &mask.stroke,
                mask.width,
                left,
                top,
                stroke_colour,
                opacity * TEXT_STROKE_ALPHA,
            );
            blend::draw_mask(&mut output, &mask.fill, mask.width, left, top, fill_colour, opacity);
            Ok(output)
        }
        WatermarkContent::Image { source } => {
            let source = source.as_ref().ok_or(ImageError::MissingWatermarkSource)?;
            source.ensure_not_empty()?;
            if watermark.width <= 0 || watermark.height <= 0 {
                return Err(ImageError::InvalidDimensions {
                    width: watermark.width,
                    height: watermark.height,
                });
            }

            let width = watermark.width.min(image.width() as i64) as u32;
            let height = watermark.height.min(image.height() as i64) as u32;
            let overlay = resample(source, width, height)?;
            let (x, y) = watermark.origin(image.width(), image.height());
            let mut output = image.clone();
            blend::draw_image(&mut output, &overlay, x, y, opacity);
            Ok(output)
        }
    }
}

fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Font size limited to `MAX_FONT_SIZE`. NaN passes through.
fn cap_font_size(font_size: f32) -> f32 {
    if font_size.is_nan() {
        font_size
    } else {
        font_size.min(MAX_FONT_SIZE)
    }
}

/// Whole-pixel font size, or `None` when nothing would be drawn.
fn font_px(font_size: f32) -> Option<u32> {
    let size = cap_font_size(font_size).round();
    if size.is_nan() || size < 1.0 {
        None
    } else {
        Some(size as u32)
    }
}
