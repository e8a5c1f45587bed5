//! Interactive crop selection.
//!
//! The selection is a box in source-image pixels that the user reshapes by
//! dragging handles in display space. The state machine lives in
//! [`CropEditor`]; the box maths for a single drag is the pure function
//! [`drag_box`], so the next box depends only on the box at drag start, the
//! handle, and the image-space delta.
//!
//! Invariants after every mutation:
//!
//! - `0 <= x`, `0 <= y`, `x + width <= image_width`, `y + height <= image_height`
//! - `width >= MIN_CROP_SIZE` and `height >= MIN_CROP_SIZE` (or the full
//!   image dimension for images smaller than that)
//! - with a fixed ratio `r`, `width / height == r` within float tolerance

mod editor;
mod handle;

use serde::{Deserialize, Serialize};

pub use editor::{drag_box, CropEditor};
pub use handle::Handle;

/// Smallest width and height of a selection, in image pixels.
pub const MIN_CROP_SIZE: f64 = 10.0;

/// Hit radius around handles, in display pixels.
pub const HANDLE_HIT_RADIUS: f64 = 15.0;

/// Selection rectangle in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Box covering a whole `width × height` image.
    pub fn full(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Same box with every coordinate multiplied by per-axis factors.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }
}

/// Aspect-ratio lock for the selection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AspectRatio {
    #[default]
    Free,
    /// `width / height`, always positive and finite.
    Fixed(f64),
}

impl AspectRatio {
    /// Parse `"free"` or a `"w:h"` preset such as `"16:9"`.
    ///
    /// Returns `None` for anything else, including non-positive parts.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("free") {
            return Some(Self::Free);
        }
        let (w, h) = s.split_once(':')?;
        let w: f64 = w.trim().parse().ok()?;
        let h: f64 = h.trim().parse().ok()?;
        Self::fixed(w / h)
    }

    /// `Fixed(ratio)` if the ratio is positive and finite.
    pub fn fixed(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self::Fixed(ratio))
    }

    /// The locked `width / height`. A `Fixed` ratio that is not positive
    /// and finite counts as unlocked.
    pub fn ratio(&self) -> Option<f64> {
        match *self {
            Self::Free => None,
            Self::Fixed(r) if r.is_finite() && r > 0.0 => Some(r),
            Self::Fixed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets() {
        assert_eq!(AspectRatio::parse("free"), Some(AspectRatio::Free));
        assert_eq!(AspectRatio::parse("1:1"), Some(AspectRatio::Fixed(1.0)));
        assert_eq!(AspectRatio::parse("4:3"), Some(AspectRatio::Fixed(4.0 / 3.0)));
        assert_eq!(AspectRatio::parse("16:9"), Some(AspectRatio::Fixed(16.0 / 9.0)));
        assert_eq!(AspectRatio::parse("3:4"), Some(AspectRatio::Fixed(0.75)));
        assert_eq!(AspectRatio::parse("9:16"), Some(AspectRatio::Fixed(9.0 / 16.0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(AspectRatio::parse("wide"), None);
        assert_eq!(AspectRatio::parse("0:1"), None);
        assert_eq!(AspectRatio::parse("1:0"), None);
        assert_eq!(AspectRatio::parse("-4:3"), None);
    }

    #[test]
    fn test_crop_box_edges() {
        let b = CropBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.right(), 40.0);
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.scaled(0.5, 2.0), CropBox::new(5.0, 40.0, 15.0, 80.0));
    }
}
