//! Glyph rasterization onto a white RGB canvas.
//!
//! Glyphs are drawn black at a horizontal origin of 0 and a caller supplied
//! baseline. Every glyph is measured and drawn on its own, so its bitmap never
//! depends on neighbouring characters.

use imgref::ImgVec;
use rgb::RGB8;

use crate::VectorFont;

/// RGB pixel buffer, row major
pub type PixelBuffer = ImgVec<RGB8>;

pub const WHITE: RGB8 = RGB8 { r: 255, g: 255, b: 255 };
pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Extra canvas space around a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasPadding {
    /// Canvas is exactly `max(advance, size)` by `size`
    #[default]
    None,
    /// One extra column and two extra rows for anti-alias bleed
    AntiAlias,
}

impl CanvasPadding {
    /// Extra (columns, rows)
    pub fn extra(self) -> (usize, usize) {
        match self {
            Self::None => (0, 0),
            Self::AntiAlias => (1, 2),
        }
    }
}

/// Create a canvas with every pixel set to white.
pub fn white_canvas(width: usize, height: usize) -> PixelBuffer {
    ImgVec::new(vec![WHITE; width * height], width, height)
}

/// Size of the canvas a single character is rendered on.
pub fn char_canvas_size<F: VectorFont + ?Sized>(font: &F, ch: char, font_size: u32, padding: CanvasPadding) -> (usize, usize) {
    let advance = font.advance_width(ch, font_size as f32).max(0.0) as usize;
    let (extra_x, extra_y) = padding.extra();
    (advance.max(font_size as usize) + extra_x, font_size as usize + extra_y)
}

/// Render one character on a fresh white canvas.
pub fn render_char<F: VectorFont + ?Sized>(font: &F, ch: char, font_size: u32, baseline: f32, padding: CanvasPadding) -> PixelBuffer {
    let (width, height) = char_canvas_size(font, ch, font_size, padding);
    let mut canvas = white_canvas(width, height);
    draw_glyph(&mut canvas, font, ch, font_size as f32, 0.0, baseline);
    canvas
}

/// Draw `ch` in black with its pen origin at (`origin_x`, `baseline`).
///
/// The pen position is rounded horizontally and floored vertically.
///
/// Coverage is composited over whatever is already on the canvas, pixels
/// outside the canvas are clipped. Returns the advance width of the glyph.
pub fn draw_glyph<F: VectorFont + ?Sized>(canvas: &mut PixelBuffer, font: &F, ch: char, px: f32, origin_x: f32, baseline: f32) -> f32 {
    let coverage = font.rasterize(ch, px);
    if !coverage.is_empty() {
        let left = origin_x.round() as i32 + coverage.left;
        // floored: the lowest ink row must stay above font_size - y2
        let top = baseline.floor() as i32 - (coverage.bottom + coverage.height as i32);
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);

        for gy in 0..coverage.height {
            let y = top + gy as i32;
            if y < 0 || y >= height {
                continue;
            }
            for gx in 0..coverage.width {
                let x = left + gx as i32;
                if x < 0 || x >= width {
                    continue;
                }
                let c = coverage.get(gx, gy);
                if c > 0 {
                    let pixel = &mut canvas[(x as usize, y as usize)];
                    *pixel = fill_black(*pixel, c);
                }
            }
        }
    }
    font.advance_width(ch, px)
}

/// Composite black with `coverage` alpha over `pixel`.
fn fill_black(pixel: RGB8, coverage: u8) -> RGB8 {
    let keep = 255 - coverage as u32;
    let blend = |v: u8| ((v as u32 * keep + 127) / 255) as u8;
    RGB8::new(blend(pixel.r), blend(pixel.g), blend(pixel.b))
}
