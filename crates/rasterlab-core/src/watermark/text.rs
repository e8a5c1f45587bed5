//! Bitmap text rasterization for text watermarks.
//!
//! Glyphs come from the 8×8 `font8x8` face, scaled with nearest-neighbour
//! sampling to a square cell of `font_size` pixels and thickened by one
//! source column to read as bold. Layout is monospace: each character
//! advances by one cell.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};

/// Side length of a source glyph in font units.
const GLYPH_SIZE: usize = 8;

/// Rasterized text coverage plus its outline band.
///
/// Both masks share the same grid. The grid is padded by `pad` cells on
/// every side so the outside half of the stroke has room; text cell
/// `(0, 0)` sits at grid cell `(pad, pad)`.
#[derive(Debug, Clone)]
pub(crate) struct TextMask {
    pub width: usize,
    pub height: usize,
    pub pad: usize,
    pub fill: Vec<bool>,
    pub stroke: Vec<bool>,
}

/// 8×8 bitmap for `c`, bit `x` of row `y` set when the pixel is inked.
///
/// Characters missing from both faces render as blanks.
fn glyph(c: char) -> [u8; GLYPH_SIZE] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .unwrap_or([0; GLYPH_SIZE])
}

/// Grid padding needed around the text for a stroke of this width.
pub(crate) fn stroke_pad(stroke_width: u32) -> usize {
    stroke_width.div_ceil(2) as usize
}

/// Rasterize `text` at `font_size` px and derive a stroke band of the given
/// width around every glyph boundary.
pub(crate) fn rasterize(text: &str, font_size: u32, stroke_width: u32) -> TextMask {
    let size = font_size as usize;
    let chars: Vec<char> = text.chars().collect();
    let radius = stroke_width as f32 / 2.0;
    let pad = stroke_pad(stroke_width);

    let width = chars.len() * size + 2 * pad;
    let height = size + 2 * pad;
    let mut fill = vec![false; width * height];

    for (i, &c) in chars.iter().enumerate() {
        let rows = glyph(c);
        let cell_x = pad + i * size;
        for py in 0..size {
            // Bold: OR with the bitmap shifted one column right
            let row = rows[py * GLYPH_SIZE / size];
            let row = row | (row << 1);
            for px in 0..size {
                let bit = px * GLYPH_SIZE / size;
                if row & (1 << bit) != 0 {
                    fill[(pad + py) * width + cell_x + px] = true;
                }
            }
        }
    }

    let stroke = outline(&fill, width, height, radius);
    TextMask {
        width,
        height,
        pad,
        fill,
        stroke,
    }
}

/// Cells within `radius` of the boundary between set and unset cells.
///
/// Computed as the dilation of the mask minus its erosion, both with a
/// disc of `radius`.
fn outline(mask: &[bool], width: usize, height: usize, radius: f32) -> Vec<bool> {
    if radius <= 0.0 {
        return vec![false; mask.len()];
    }

    let reach = radius.ceil() as i64;
    let disc: Vec<(i64, i64)> = (-reach..=reach)
        .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f32) <= radius * radius)
        .collect();

    let at = |x: i64, y: i64| -> bool {
        x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height && mask[y as usize * width + x as usize]
    };

    let mut band = vec![false; mask.len()];
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let inked = at(x, y);
            // Inside cells need an unset neighbour, outside cells a set one
            let on_edge = disc.iter().any(|&(dx, dy)| at(x + dx, y + dy) != inked);
            band[y as usize * width + x as usize] = on_edge;
        }
    }
    band
}
