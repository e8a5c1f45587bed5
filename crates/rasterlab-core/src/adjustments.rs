//! Per-pixel tonal adjustments and stylized filters.
//!
//! Every function here maps each pixel independently; alpha is preserved.
//! Channel values are rounded and clamped to 0-255 whenever they are written
//! back to a byte.
//!
//! ## Colour Adjustment Order
//! 1. Contrast
//! 2. Brightness
//! 3. Saturation
//!
//! Each stage is rounded and clamped before the next one runs, so the order
//! changes the result.

use serde::{Deserialize, Serialize};

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::error::Result;
use crate::luminance::{luminance, luminance_u8, to_channel};

/// Fraction of a pixel's channel spread added back by the saturate filter.
pub const SATURATE_BOOST: f32 = 0.2;

/// Brightness, contrast and saturation, each in -100..=100 (0 = neutral).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorAdjustments {
    /// Brightness (-100 to 100)
    pub brightness: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
}

impl ColorAdjustments {
    /// Create a new ColorAdjustments with neutral values.
    pub fn new(brightness: f32, contrast: f32, saturation: f32) -> Self {
        Self {
            brightness,
            contrast,
            saturation,
        }
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Copy with every field clamped to -100..=100. NaN becomes 0.
    pub fn clamped(&self) -> Self {
        Self {
            brightness: clamp_percent(self.brightness),
            contrast: clamp_percent(self.contrast),
            saturation: clamp_percent(self.saturation),
        }
    }
}

/// Stylized single-pass filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    /// Classic sepia tone matrix.
    Sepia,
    /// Photographic negative.
    Invert,
    /// Push every channel up by a fraction of the pixel's chroma spread.
    Saturate,
}

#[inline]
fn clamp_percent(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-100.0, 100.0)
    }
}

/// Blend an image towards its luminance.
///
/// `intensity` is clamped to 0..=1: 0 returns an identical copy, 1 gives full
/// grayscale (`r == g == b` for every pixel).
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn grayscale(image: &RasterBuffer, intensity: f32) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    let mut output = image.clone();
    apply_grayscale(output.pixels_mut(), intensity);
    Ok(output)
}

/// Grayscale blend over RGBA bytes in place.
pub fn apply_grayscale(pixels: &mut [u8], intensity: f32) {
    let intensity = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };
    if intensity == 0.0 {
        return;
    }

    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        let y = luminance_u8(chunk[0], chunk[1], chunk[2]);
        if intensity == 1.0 {
            let gray = to_channel(y);
            chunk[0] = gray;
            chunk[1] = gray;
            chunk[2] = gray;
        } else {
            for c in &mut chunk[..3] {
                let v = *c as f32;
                *c = to_channel(v + (y - v) * intensity);
            }
        }
    }
}

/// Apply contrast, brightness and saturation in that fixed order.
///
/// All-zero adjustments return an identical copy.
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn color_adjust(image: &RasterBuffer, adjustments: &ColorAdjustments) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    let mut output = image.clone();
    apply_color_adjustments(output.pixels_mut(), adjustments);
    Ok(output)
}

/// Colour adjustment over RGBA bytes in place.
pub fn apply_color_adjustments(pixels: &mut [u8], adjustments: &ColorAdjustments) {
    let adj = adjustments.clamped();
    // Early exit if no adjustments
    if adj.is_default() {
        return;
    }

    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        let mut rgb = [chunk[0], chunk[1], chunk[2]];

        if adj.contrast != 0.0 {
            rgb = apply_contrast(rgb, adj.contrast);
        }
        if adj.brightness != 0.0 {
            rgb = apply_brightness(rgb, adj.brightness);
        }
        if adj.saturation != 0.0 {
            rgb = apply_saturation(rgb, adj.saturation);
        }

        chunk[..3].copy_from_slice(&rgb);
    }
}

/// Contrast around mid-gray.
///
/// Formula: `output = (input - 128) * (contrast + 100) / 100 + 128`
#[inline]
fn apply_contrast(rgb: [u8; 3], contrast: f32) -> [u8; 3] {
    let factor = (contrast + 100.0) / 100.0;
    rgb.map(|c| to_channel((c as f32 - 128.0) * factor + 128.0))
}

/// Additive brightness: `brightness / 100` of the full range.
#[inline]
fn apply_brightness(rgb: [u8; 3], brightness: f32) -> [u8; 3] {
    let offset = brightness / 100.0 * 255.0;
    rgb.map(|c| to_channel(c as f32 + offset))
}

/// Scale each channel's distance from the pixel's luminance.
#[inline]
fn apply_saturation(rgb: [u8; 3], saturation: f32) -> [u8; 3] {
    let factor = (saturation + 100.0) / 100.0;
    let y = luminance(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32);
    rgb.map(|c| to_channel(y + (c as f32 - y) * factor))
}

/// Apply a stylized filter.
///
/// # Errors
///
/// Returns `EmptyBuffer` if `image` has no area.
pub fn apply_filter(image: &RasterBuffer, kind: FilterKind) -> Result<RasterBuffer> {
    image.ensure_not_empty()?;
    let mut output = image.clone();
    apply_filter_in_place(output.pixels_mut(), kind);
    Ok(output)
}

/// Stylized filter over RGBA bytes in place.
pub fn apply_filter_in_place(pixels: &mut [u8], kind: FilterKind) {
    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        let rgb = match kind {
            FilterKind::Sepia => sepia(chunk[0], chunk[1], chunk[2]),
            FilterKind::Invert => [255 - chunk[0], 255 - chunk[1], 255 - chunk[2]],
            FilterKind::Saturate => saturate_boost(chunk[0], chunk[1], chunk[2]),
        };
        chunk[..3].copy_from_slice(&rgb);
    }
}

#[inline]
fn sepia(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    [
        to_channel(0.393 * r + 0.769 * g + 0.189 * b),
        to_channel(0.349 * r + 0.686 * g + 0.168 * b),
        to_channel(0.272 * r + 0.534 * g + 0.131 * b),
    ]
}

#[inline]
fn saturate_boost(r: u8, g: u8, b: u8) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;
    if delta == 0.0 {
        return [r, g, b];
    }
    [r, g, b].map(|c| to_channel(c as f32 + delta * SATURATE_BOOST))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
