//! Crop selection state machine.

use super::handle::{hit_test, Handle};
use super::{AspectRatio, CropBox, MIN_CROP_SIZE};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        handle: Handle,
        /// Pointer position at drag start, display pixels.
        start: (f64, f64),
        /// Selection at drag start.
        origin: CropBox,
    },
}

/// Crop selection over one image.
///
/// Pointer coordinates are in display pixels, relative to the top-left of
/// the displayed image. The box is kept in image pixels. Set the display
/// size whenever the preview is laid out at a different size than the
/// image.
#[derive(Debug, Clone, PartialEq)]
pub struct CropEditor {
    image_width: f64,
    image_height: f64,
    display_width: f64,
    display_height: f64,
    crop: CropBox,
    aspect: AspectRatio,
    drag: DragState,
}

impl CropEditor {
    /// Editor covering the full image with a free ratio.
    ///
    /// The display size starts equal to the image size.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        let (w, h) = (image_width as f64, image_height as f64);
        Self {
            image_width: w,
            image_height: h,
            display_width: w,
            display_height: h,
            crop: CropBox::full(w, h),
            aspect: AspectRatio::Free,
            drag: DragState::Idle,
        }
    }

    pub fn image_size(&self) -> (f64, f64) {
        (self.image_width, self.image_height)
    }

    pub fn crop_box(&self) -> CropBox {
        self.crop
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Handle of the drag in progress.
    pub fn active_handle(&self) -> Option<Handle> {
        match self.drag {
            DragState::Dragging { handle, .. } => Some(handle),
            DragState::Idle => None,
        }
    }

    /// Size the image is displayed at. Non-positive sizes are ignored.
    pub fn set_display_size(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.display_width = width;
            self.display_height = height;
        }
    }

    /// Image pixels per display pixel on each axis.
    fn display_to_image(&self) -> (f64, f64) {
        (
            self.image_width / self.display_width,
            self.image_height / self.display_height,
        )
    }

    /// Handle under a display-space point.
    pub fn hit_test(&self, px: f64, py: f64) -> Option<Handle> {
        let (sx, sy) = self.display_to_image();
        hit_test(&self.crop.scaled(1.0 / sx, 1.0 / sy), px, py)
    }

    /// CSS cursor for a display-space point: the active handle while
    /// dragging, otherwise whatever is under the pointer.
    pub fn cursor_at(&self, px: f64, py: f64) -> &'static str {
        self.active_handle()
            .or_else(|| self.hit_test(px, py))
            .map_or("default", Handle::cursor)
    }

    /// Start a drag if the point hits a handle.
    pub fn on_pointer_down(&mut self, px: f64, py: f64) -> Option<Handle> {
        let handle = self.hit_test(px, py)?;
        tracing::debug!(handle = handle.as_str(), "Crop drag started");
        self.drag = DragState::Dragging {
            handle,
            start: (px, py),
            origin: self.crop,
        };
        Some(handle)
    }

    /// Update the box for the current pointer position.
    ///
    /// Returns the new box while dragging, `None` when idle.
    pub fn on_pointer_move(&mut self, px: f64, py: f64) -> Option<CropBox> {
        let DragState::Dragging { handle, start, origin } = self.drag else {
            return None;
        };
        let (sx, sy) = self.display_to_image();
        let dx = (px - start.0) * sx;
        let dy = (py - start.1) * sy;

        self.crop = drag_box(&origin, handle, dx, dy, self.image_width, self.image_height, self.aspect);
        Some(self.crop)
    }

    pub fn on_pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Lock (or unlock) the aspect ratio and reshape the box to match.
    ///
    /// Any drag in progress ends first. The current width drives the new
    /// height; the result is shrunk to fit and shifted back inside the image.
    ///
    /// A ratio that is not positive and finite unlocks the box. A ratio no
    /// minimum-size box could satisfy inside the image is pulled back to the
    /// nearest one that can.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.drag = DragState::Idle;
        self.aspect = match aspect.ratio() {
            Some(r) => {
                let (min_w, min_h) = self.min_size();
                AspectRatio::Fixed(clamp_soft(r, min_w / self.image_height, self.image_width / min_h))
            }
            None => AspectRatio::Free,
        };
        let c = self.crop;
        self.set_box_numeric(c.x, c.y, c.width, c.height);
    }

    /// Replace the box from numeric inputs.
    ///
    /// Size is clamped to `[MIN_CROP_SIZE, image]`, a fixed ratio is applied
    /// from the width, then the origin is clamped so the box fits.
    /// Non-finite inputs keep the current value.
    pub fn set_box_numeric(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let c = self.crop;
        let x = finite_or(x, c.x);
        let y = finite_or(y, c.y);
        let width = finite_or(width, c.width);
        let height = finite_or(height, c.height);

        let (min_w, min_h) = self.min_size();
        let (width, height) = match self.aspect.ratio() {
            Some(r) => {
                let w = clamp_soft(width, min_w.max(min_h * r), self.image_width.min(self.image_height * r));
                (w, w / r)
            }
            None => (
                clamp_soft(width, min_w, self.image_width),
                clamp_soft(height, min_h, self.image_height),
            ),
        };

        self.crop = CropBox::new(
            clamp_soft(x, 0.0, (self.image_width - width).max(0.0)),
            clamp_soft(y, 0.0, (self.image_height - height).max(0.0)),
            width,
            height,
        );
    }

    pub fn set_x(&mut self, x: f64) {
        let c = self.crop;
        self.set_box_numeric(x, c.y, c.width, c.height);
    }

    pub fn set_y(&mut self, y: f64) {
        let c = self.crop;
        self.set_box_numeric(c.x, y, c.width, c.height);
    }

    /// Set the width; with a fixed ratio the height follows.
    pub fn set_width(&mut self, width: f64) {
        let c = self.crop;
        self.set_box_numeric(c.x, c.y, width, c.height);
    }

    /// Set the height; with a fixed ratio the width follows.
    pub fn set_height(&mut self, height: f64) {
        let c = self.crop;
        let width = match self.aspect.ratio() {
            Some(r) if height.is_finite() => height * r,
            _ => c.width,
        };
        self.set_box_numeric(c.x, c.y, width, height);
    }

    /// Full-image box, free ratio, no drag.
    pub fn reset(&mut self) {
        self.crop = CropBox::full(self.image_width, self.image_height);
        self.aspect = AspectRatio::Free;
        self.drag = DragState::Idle;
    }

    /// Selection rounded to whole pixels as `(x, y, width, height)`.
    ///
    /// Edges are rounded, not sizes, so the rectangle never leaves the
    /// image.
    pub fn pixel_rect(&self) -> (i64, i64, i64, i64) {
        let c = self.crop;
        let left = c.x.round() as i64;
        let top = c.y.round() as i64;
        let right = c.right().round() as i64;
        let bottom = c.bottom().round() as i64;
        (left, top, right - left, bottom - top)
    }

    fn min_size(&self) -> (f64, f64) {
        min_size(self.image_width, self.image_height)
    }
}

/// Box after dragging `handle` by `(dx, dy)` image pixels from `origin`.
///
/// `origin` is expected to satisfy the selection invariants for the given
/// image size and ratio; the result does too.
pub fn drag_box(
    origin: &CropBox,
    handle: Handle,
    dx: f64,
    dy: f64,
    image_width: f64,
    image_height: f64,
    aspect: AspectRatio,
) -> CropBox {
    if handle == Handle::Move {
        return CropBox::new(
            clamp_soft(origin.x + dx, 0.0, (image_width - origin.width).max(0.0)),
            clamp_soft(origin.y + dy, 0.0, (image_height - origin.height).max(0.0)),
            origin.width,
            origin.height,
        );
    }

    match aspect.ratio() {
        None => drag_free(origin, handle, dx, dy, image_width, image_height),
        Some(r) => drag_fixed(origin, handle, dx, dy, image_width, image_height, r),
    }
}

fn drag_free(origin: &CropBox, handle: Handle, dx: f64, dy: f64, image_width: f64, image_height: f64) -> CropBox {
    let (min_w, min_h) = min_size(image_width, image_height);
    let mut left = origin.x;
    let mut top = origin.y;
    let mut right = origin.right();
    let mut bottom = origin.bottom();

    if handle.moves_left() {
        left = clamp_soft(left + dx, 0.0, right - min_w);
    }
    if handle.moves_right() {
        right = clamp_soft(right + dx, left + min_w, image_width);
    }
    if handle.moves_top() {
        top = clamp_soft(top + dy, 0.0, bottom - min_h);
    }
    if handle.moves_bottom() {
        bottom = clamp_soft(bottom + dy, top + min_h, image_height);
    }

    CropBox::new(left, top, right - left, bottom - top)
}

fn drag_fixed(
    origin: &CropBox,
    handle: Handle,
    dx: f64,
    dy: f64,
    image_width: f64,
    image_height: f64,
    ratio: f64,
) -> CropBox {
    let (min_w, min_h) = min_size(image_width, image_height);

    // The edge opposite the dragged one stays put
    let anchor_right = handle.moves_left();
    let anchor_bottom = handle.moves_top();
    let room_x = if anchor_right { origin.right() } else { image_width - origin.x };
    let room_y = if anchor_bottom { origin.bottom() } else { image_height - origin.y };

    let width = if handle.width_driven() {
        let raw = if handle.moves_left() { origin.width - dx } else { origin.width + dx };
        clamp_soft(raw, min_w.max(min_h * ratio), room_x.min(room_y * ratio))
    } else {
        let raw = if handle.moves_top() { origin.height - dy } else { origin.height + dy };
        let height = clamp_soft(raw, min_h.max(min_w / ratio), room_y.min(room_x / ratio));
        height * ratio
    };
    let height = width / ratio;

    let x = if anchor_right { origin.right() - width } else { origin.x };
    let y = if anchor_bottom { origin.bottom() - height } else { origin.y };
    CropBox::new(x, y, width, height)
}

/// Minimum selection size, capped by the image itself.
fn min_size(image_width: f64, image_height: f64) -> (f64, f64) {
    (MIN_CROP_SIZE.min(image_width), MIN_CROP_SIZE.min(image_height))
}

/// Clamp to `[lo, hi]`, letting `hi` win when the range is empty.
fn clamp_soft(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
