//! Luminance calculation using ITU-R BT.601 coefficients.
//!
//! Shared by the grayscale blend and the saturation stage of colour
//! adjustment so both agree on what "gray" means.

/// ITU-R BT.601 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.114;

/// Calculate luminance from channel values on the 0-255 scale.
///
/// Inputs may already be outside 0-255 (intermediate adjustment values);
/// the result is not clamped.
#[inline]
pub fn luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// Calculate luminance from u8 RGB values (0 to 255), unrounded.
#[inline]
pub fn luminance_u8(r: u8, g: u8, b: u8) -> f32 {
    luminance(r as f32, g as f32, b as f32)
}

/// Round and clamp a channel value to a byte.
#[inline]
pub fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficients_sum_to_one() {
        let sum = LUMINANCE_R + LUMINANCE_G + LUMINANCE_B;
        assert!((sum - 1.0).abs() < 1e-6, "Coefficients should sum to 1.0");
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(to_channel(luminance_u8(255, 255, 255)), 255);
        assert_eq!(to_channel(luminance_u8(0, 0, 0)), 0);
    }

    #[test]
    fn test_luminance_gray_preserves_value() {
        for v in [0u8, 64, 128, 192, 255] {
            assert_eq!(to_channel(luminance_u8(v, v, v)), v);
        }
    }

    #[test]
    fn test_luminance_primaries() {
        // 0.299 * 255 = 76.245, 0.587 * 255 = 149.685, 0.114 * 255 = 29.07
        assert_eq!(to_channel(luminance_u8(255, 0, 0)), 76);
        assert_eq!(to_channel(luminance_u8(0, 255, 0)), 150);
        assert_eq!(to_channel(luminance_u8(0, 0, 255)), 29);
    }

    #[test]
    fn test_to_channel_clamps() {
        assert_eq!(to_channel(-12.0), 0);
        assert_eq!(to_channel(300.0), 255);
        assert_eq!(to_channel(127.5), 128);
    }
}
