//! Operation parameters and dispatch.
//!
//! [`TransformParams`] names one operation and its arguments. It is the unit
//! of work for the batch pipeline and the shape the host sends across the
//! WASM boundary, tagged by `"op"`:
//!
//! ```json
//! { "op": "resize", "targetWidth": 800, "targetHeight": 600, "mode": "fit" }
//! { "op": "pixelate", "blockSize": 10 }
//! { "op": "colorAdjust", "brightness": 10, "contrast": -5, "saturation": 0 }
//! ```

use serde::{Deserialize, Serialize};

use crate::adjustments::{apply_filter, color_adjust, grayscale, ColorAdjustments, FilterKind};
use crate::buffer::RasterBuffer;
use crate::error::{ImageError, Result};
use crate::filter::{box_blur, pixelate};
use crate::transform::{crop, flip, resize, rotate, ResizeMode};
use crate::watermark::{composite, Watermark};

/// One operation with its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TransformParams {
    Resize {
        target_width: i64,
        target_height: i64,
        #[serde(default)]
        mode: ResizeMode,
    },
    Crop {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },
    Rotate {
        angle_degrees: f64,
    },
    Flip {
        #[serde(default)]
        horizontal: bool,
        #[serde(default)]
        vertical: bool,
    },
    Blur {
        radius: i32,
    },
    Pixelate {
        block_size: i32,
    },
    Grayscale {
        #[serde(default = "full_intensity")]
        intensity: f32,
    },
    Filter {
        kind: FilterKind,
    },
    ColorAdjust(ColorAdjustments),
    Watermark(Watermark),
    /// No pixel change; only the export settings matter.
    Convert,
}

fn full_intensity() -> f32 {
    1.0
}

impl TransformParams {
    /// Short operation name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            TransformParams::Resize { .. } => "resize",
            TransformParams::Crop { .. } => "crop",
            TransformParams::Rotate { .. } => "rotate",
            TransformParams::Flip { .. } => "flip",
            TransformParams::Blur { .. } => "blur",
            TransformParams::Pixelate { .. } => "pixelate",
            TransformParams::Grayscale { .. } => "grayscale",
            TransformParams::Filter { .. } => "filter",
            TransformParams::ColorAdjust(_) => "colorAdjust",
            TransformParams::Watermark(_) => "watermark",
            TransformParams::Convert => "convert",
        }
    }
}

/// Run the operation `params` names on `image`.
///
/// # Errors
///
/// Whatever the operation reports; `Resize` with a target outside
/// `1..=u32::MAX` is `InvalidDimensions`.
pub fn apply(image: &RasterBuffer, params: &TransformParams) -> Result<RasterBuffer> {
    tracing::debug!(
        op = params.name(),
        width = image.width(),
        height = image.height(),
        "Applying operation"
    );

    match params {
        TransformParams::Resize {
            target_width,
            target_height,
            mode,
        } => {
            let invalid = || ImageError::InvalidDimensions {
                width: *target_width,
                height: *target_height,
            };
            let w = u32::try_from(*target_width).map_err(|_| invalid())?;
            let h = u32::try_from(*target_height).map_err(|_| invalid())?;
            resize(image, w, h, *mode)
        }
        TransformParams::Crop { x, y, width, height } => crop(image, *x, *y, *width, *height),
        TransformParams::Rotate { angle_degrees } => rotate(image, *angle_degrees),
        TransformParams::Flip { horizontal, vertical } => flip(image, *horizontal, *vertical),
        TransformParams::Blur { radius } => box_blur(image, *radius),
        TransformParams::Pixelate { block_size } => pixelate(image, *block_size),
        TransformParams::Grayscale { intensity } => grayscale(image, *intensity),
        TransformParams::Filter { kind } => apply_filter(image, *kind),
        TransformParams::ColorAdjust(adjustments) => color_adjust(image, adjustments),
        TransformParams::Watermark(watermark) => composite(image, watermark),
        TransformParams::Convert => {
            image.ensure_not_empty()?;
            Ok(image.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterBuffer {
        let pixels = (0..width * height * 4).map(|i| (i * 11 % 256) as u8).collect();
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_dispatch_resize() {
        let img = RasterBuffer::filled(100, 100, [255, 0, 0, 255]);
        let params = TransformParams::Resize {
            target_width: 50,
            target_height: 200,
            mode: ResizeMode::Fit,
        };
        let out = apply(&img, &params).unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
    }

    #[test]
    fn test_dispatch_resize_negative_target() {
        let img = create_test_image(4, 4);
        let params = TransformParams::Resize {
            target_width: -1,
            target_height: 10,
            mode: ResizeMode::Stretch,
        };
        assert!(matches!(
            apply(&img, &params),
            Err(ImageError::InvalidDimensions { width: -1, height: 10 })
        ));
    }

    #[test]
    fn test_dispatch_crop() {
        let img = create_test_image(200, 100);
        let out = apply(
            &img,
            &TransformParams::Crop {
                x: 50,
                y: 0,
                width: 100,
                height: 100,
            },
        )
        .unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
        assert_eq!(out.pixel(0, 0), img.pixel(50, 0));
    }

    #[test]
    fn test_dispatch_identity_operations() {
        let img = create_test_image(12, 9);
        let identities = [
            TransformParams::Blur { radius: 0 },
            TransformParams::Pixelate { block_size: 0 },
            TransformParams::Grayscale { intensity: 0.0 },
            TransformParams::ColorAdjust(ColorAdjustments::default()),
            TransformParams::Flip {
                horizontal: false,
                vertical: false,
            },
            TransformParams::Convert,
        ];
        for params in &identities {
            assert_eq!(&apply(&img, params).unwrap(), &img, "{}", params.name());
        }
    }

    #[test]
    fn test_dispatch_empty_buffer() {
        let img = RasterBuffer::transparent(0, 0);
        assert!(matches!(
            apply(&img, &TransformParams::Convert),
            Err(ImageError::EmptyBuffer)
        ));
    }

    #[test]
    fn test_params_from_json() {
        let params: TransformParams =
            serde_json::from_str(r#"{"op":"resize","targetWidth":800,"targetHeight":600,"mode":"fill"}"#).unwrap();
        assert_eq!(
            params,
            TransformParams::Resize {
                target_width: 800,
                target_height: 600,
                mode: ResizeMode::Fill,
            }
        );

        let params: TransformParams = serde_json::from_str(r#"{"op":"pixelate","blockSize":10}"#).unwrap();
        assert_eq!(params, TransformParams::Pixelate { block_size: 10 });

        let params: TransformParams = serde_json::from_str(r#"{"op":"colorAdjust","brightness":20}"#).unwrap();
        assert_eq!(params, TransformParams::ColorAdjust(ColorAdjustments::new(20.0, 0.0, 0.0)));

        let params: TransformParams = serde_json::from_str(r#"{"op":"filter","kind":"sepia"}"#).unwrap();
        assert_eq!(params, TransformParams::Filter { kind: FilterKind::Sepia });

        let params: TransformParams = serde_json::from_str(r#"{"op":"grayscale"}"#).unwrap();
        assert_eq!(params, TransformParams::Grayscale { intensity: 1.0 });
    }

    #[test]
    fn test_watermark_params_from_json() {
        let json = r#"{
            "op": "watermark",
            "content": { "type": "text", "text": "(c) me", "fontSize": 24 },
            "x": 10, "y": 40, "opacity": 0.8
        }"#;
        let params: TransformParams = serde_json::from_str(json).unwrap();
        let TransformParams::Watermark(wm) = params else {
            panic!("expected watermark");
        };
        assert_eq!(wm, Watermark::text("(c) me", 24.0, 10, 40, 0.8));
    }
}
