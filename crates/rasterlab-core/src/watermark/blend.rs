//! Source-over blending with a global alpha multiplier.

use crate::buffer::{RasterBuffer, CHANNELS};
use crate::luminance::to_channel;

/// Blend one RGBA colour onto a destination pixel.
///
/// The effective source alpha is `src[3] / 255 * alpha`. The destination's
/// own alpha is honoured, so painting onto a transparent pixel yields the
/// source colour at the effective alpha.
#[inline]
pub(crate) fn blend_pixel(dst: &mut [u8], src: [u8; 4], alpha: f32) {
    let sa = src[3] as f32 / 255.0 * alpha;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    for c in 0..3 {
        let s = src[c] as f32;
        let d = dst[c] as f32;
        dst[c] = to_channel((s * sa + d * da * (1.0 - sa)) / out_a);
    }
    dst[3] = to_channel(out_a * 255.0);
}

/// Draw `overlay` onto `target` with its top-left corner at `(x, y)`.
///
/// Overlay pixels that land outside the target are skipped.
pub(crate) fn draw_image(target: &mut RasterBuffer, overlay: &RasterBuffer, x: i64, y: i64, alpha: f32) {
    let tw = target.width() as i64;
    let th = target.height() as i64;
    let ow = overlay.width() as i64;
    let oh = overlay.height() as i64;

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + ow).min(tw);
    let y1 = (y + oh).min(th);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src = overlay.pixels();
    let dst = target.pixels_mut();
    for ty in y0..y1 {
        let oy = ty - y;
        for tx in x0..x1 {
            let ox = tx - x;
            let s = ((oy * ow + ox) as usize) * CHANNELS;
            let d = ((ty * tw + tx) as usize) * CHANNELS;
            let colour = [src[s], src[s + 1], src[s + 2], src[s + 3]];
            blend_pixel(&mut dst[d..d + CHANNELS], colour, alpha);
        }
    }
}

/// Paint a solid colour at every set cell of a boolean mask.
///
/// The mask is `mask_width` cells wide; cell `(mx, my)` lands on target
/// pixel `(x + mx, y + my)`.
pub(crate) fn draw_mask(
    target: &mut RasterBuffer,
    mask: &[bool],
    mask_width: usize,
    x: i64,
    y: i64,
    colour: [u8; 4],
    alpha: f32,
) {
    if mask_width == 0 {
        return;
    }
    let tw = target.width() as i64;
    let th = target.height() as i64;
    let dst = target.pixels_mut();

    for (i, _) in mask.iter().enumerate().filter(|(_, &set)| set) {
        let tx = x + (i % mask_width) as i64;
        let ty = y + (i / mask_width) as i64;
        if tx < 0 || ty < 0 || tx >= tw || ty >= th {
            continue;
        }
        let d = ((ty * tw + tx) as usize) * CHANNELS;
        blend_pixel(&mut dst[d..d + CHANNELS], colour, alpha);
    }
}
