//! Drag handles and hit testing.

use serde::{Deserialize, Serialize};

use super::{CropBox, HANDLE_HIT_RADIUS};

/// Part of the selection a drag grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Move,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Handle {
    /// CSS cursor shown while hovering or dragging this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            Handle::Move => "move",
            Handle::N | Handle::S => "ns-resize",
            Handle::E | Handle::W => "ew-resize",
            Handle::NE | Handle::SW => "nesw-resize",
            Handle::NW | Handle::SE => "nwse-resize",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handle::Move => "move",
            Handle::N => "n",
            Handle::S => "s",
            Handle::E => "e",
            Handle::W => "w",
            Handle::NE => "ne",
            Handle::NW => "nw",
            Handle::SE => "se",
            Handle::SW => "sw",
        }
    }

    pub(crate) fn moves_left(self) -> bool {
        matches!(self, Handle::W | Handle::NW | Handle::SW)
    }

    pub(crate) fn moves_right(self) -> bool {
        matches!(self, Handle::E | Handle::NE | Handle::SE)
    }

    pub(crate) fn moves_top(self) -> bool {
        matches!(self, Handle::N | Handle::NE | Handle::NW)
    }

    pub(crate) fn moves_bottom(self) -> bool {
        matches!(self, Handle::S | Handle::SE | Handle::SW)
    }

    /// Whether a fixed-ratio drag derives height from width.
    ///
    /// Only the pure vertical edges drive height.
    pub(crate) fn width_driven(self) -> bool {
        !matches!(self, Handle::N | Handle::S)
    }
}

/// Find the handle under a display-space point.
///
/// `bounds` is the selection in display pixels. Corners win over edges,
/// edges over the interior.
pub(crate) fn hit_test(bounds: &CropBox, px: f64, py: f64) -> Option<Handle> {
    let r = HANDLE_HIT_RADIUS;
    let (left, top, right, bottom) = (bounds.x, bounds.y, bounds.right(), bounds.bottom());
    let near = |a: f64, b: f64| (a - b).abs() < r;

    let corners = [
        (Handle::NW, left, top),
        (Handle::NE, right, top),
        (Handle::SW, left, bottom),
        (Handle::SE, right, bottom),
    ];
    if let Some(&(handle, _, _)) = corners.iter().find(|&&(_, cx, cy)| near(px, cx) && near(py, cy)) {
        return Some(handle);
    }

    let within_x = px >= left && px <= right;
    let within_y = py >= top && py <= bottom;
    if within_x && near(py, top) {
        return Some(Handle::N);
    }
    if within_x && near(py, bottom) {
        return Some(Handle::S);
    }
    if within_y && near(px, left) {
        return Some(Handle::W);
    }
    if within_y && near(px, right) {
        return Some(Handle::E);
    }

    (within_x && within_y).then_some(Handle::Move)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> CropBox {
        CropBox::new(100.0, 100.0, 200.0, 100.0)
    }

    #[test]
    fn test_corner_hits() {
        assert_eq!(hit_test(&bounds(), 100.0, 100.0), Some(Handle::NW));
        assert_eq!(hit_test(&bounds(), 310.0, 95.0), Some(Handle::NE));
        assert_eq!(hit_test(&bounds(), 90.0, 210.0), Some(Handle::SW));
        assert_eq!(hit_test(&bounds(), 314.0, 214.0), Some(Handle::SE));
    }

    #[test]
    fn test_edge_hits() {
        assert_eq!(hit_test(&bounds(), 200.0, 105.0), Some(Handle::N));
        assert_eq!(hit_test(&bounds(), 200.0, 190.0), Some(Handle::S));
        assert_eq!(hit_test(&bounds(), 110.0, 150.0), Some(Handle::W));
        assert_eq!(hit_test(&bounds(), 295.0, 150.0), Some(Handle::E));
    }

    #[test]
    fn test_interior_is_move() {
        assert_eq!(hit_test(&bounds(), 200.0, 150.0), Some(Handle::Move));
    }

    #[test]
    fn test_miss() {
        assert_eq!(hit_test(&bounds(), 50.0, 50.0), None);
        // Just past the hit radius outside the right edge
        assert_eq!(hit_test(&bounds(), 315.0, 150.0), None);
        // Beside the top edge but outside its span and corner radius
        assert_eq!(hit_test(&bounds(), 80.0, 100.0), None);
    }

    #[test]
    fn test_cursor_names() {
        assert_eq!(Handle::Move.cursor(), "move");
        assert_eq!(Handle::N.cursor(), "ns-resize");
        assert_eq!(Handle::W.cursor(), "ew-resize");
        assert_eq!(Handle::SW.cursor(), "nesw-resize");
        assert_eq!(Handle::SE.cursor(), "nwse-resize");
    }
}
