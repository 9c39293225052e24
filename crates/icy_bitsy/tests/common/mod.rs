//! Synthetic fonts for conversion tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use icy_bitsy::{CancellationToken, GlyphBounds, GlyphCoverage, LineMetrics, VectorFont};

pub fn init_logging() {
    let _ = env_logger::builder().filter_level(log::LevelFilter::Debug).is_test(true).try_init();
}

/// Pixel size at which a pattern maps one cell to one pixel
pub const DESIGN_PX: usize = 8;

/// A glyph drawn as text: '#' is full coverage, '+' half coverage.
pub struct PatternGlyph {
    pub ch: char,
    pub rows: Vec<&'static str>,
    /// Rows of the pattern that sit below the baseline
    pub descent: i32,
    /// Advance in pattern cells
    pub advance: f32,
}

impl PatternGlyph {
    pub fn new(ch: char, rows: &[&'static str], descent: i32) -> Self {
        let advance = rows.iter().map(|r| r.len()).max().unwrap_or(0) as f32 + 1.0;
        Self {
            ch,
            rows: rows.to_vec(),
            descent,
            advance,
        }
    }

    fn columns(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    fn coverage_at(&self, x: usize, y: usize) -> u8 {
        match self.rows.get(y).and_then(|r| r.as_bytes().get(x)) {
            Some(b'#') => 255,
            Some(b'+') => 128,
            _ => 0,
        }
    }

    fn ink_rows(&self) -> Option<(usize, usize)> {
        let inked: Vec<usize> = (0..self.rows.len()).filter(|&y| (0..self.columns()).any(|x| self.coverage_at(x, y) > 0)).collect();
        Some((*inked.first()?, *inked.last()?))
    }
}

/// Fixed bitmap patterns scaled by whole multiples of [`DESIGN_PX`].
pub struct PatternFont {
    pub glyphs: Vec<PatternGlyph>,
}

impl PatternFont {
    pub fn new(glyphs: Vec<PatternGlyph>) -> Self {
        Self { glyphs }
    }

    /// 'A', 'g' and a space
    pub fn sample() -> Self {
        Self::new(vec![letter_a(), letter_g(), PatternGlyph::new(' ', &[], 0)])
    }

    fn glyph(&self, ch: char) -> Option<&PatternGlyph> {
        self.glyphs.iter().find(|g| g.ch == ch)
    }

    fn scale(px: f32) -> usize {
        (px as usize / DESIGN_PX).max(1)
    }
}

pub fn letter_a() -> PatternGlyph {
    PatternGlyph::new('A', &[".###.", "#...#", "#####", "#...#", "#...#", "#...#"], 0)
}

pub fn letter_g() -> PatternGlyph {
    PatternGlyph::new('g', &[".####", "#...#", "#...#", ".####", "....#", "####."], 2)
}

impl VectorFont for PatternFont {
    fn glyph_codepoints(&self) -> Vec<char> {
        self.glyphs.iter().map(|g| g.ch).collect()
    }

    fn advance_width(&self, ch: char, px: f32) -> f32 {
        self.glyph(ch).map_or(0.0, |g| g.advance * Self::scale(px) as f32)
    }

    fn glyph_bounds(&self, ch: char, px: f32) -> GlyphBounds {
        let Some(glyph) = self.glyph(ch) else {
            return GlyphBounds::default();
        };
        let Some((first, last)) = glyph.ink_rows() else {
            return GlyphBounds::default();
        };
        let s = Self::scale(px) as f32;
        let rows = glyph.rows.len() as i32;
        let y_min = (rows - 1 - last as i32 - glyph.descent) as f32 * s;
        GlyphBounds {
            x_min: 0.0,
            y_min,
            width: glyph.columns() as f32 * s,
            height: (last - first + 1) as f32 * s,
        }
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphCoverage {
        let Some(glyph) = self.glyph(ch) else {
            return GlyphCoverage::default();
        };
        let s = Self::scale(px);
        let width = glyph.columns() * s;
        let height = glyph.rows.len() * s;
        let mut data = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                data[y * width + x] = glyph.coverage_at(x / s, y / s);
            }
        }
        GlyphCoverage {
            left: 0,
            bottom: -glyph.descent * s as i32,
            width,
            height,
            data,
        }
    }

    fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
        let s = Self::scale(px) as f32;
        Some(LineMetrics {
            ascent: 6.0 * s,
            descent: -2.0 * s,
        })
    }
}

/// Wraps a font and arms a token after a number of rasterized glyphs.
pub struct CancellingFont<F> {
    pub inner: F,
    pub token: CancellationToken,
    pub cancel_after: usize,
    pub rasterized: AtomicUsize,
}

impl<F: VectorFont> CancellingFont<F> {
    pub fn new(inner: F, token: CancellationToken, cancel_after: usize) -> Self {
        Self {
            inner,
            token,
            cancel_after,
            rasterized: AtomicUsize::new(0),
        }
    }
}

impl<F: VectorFont> VectorFont for CancellingFont<F> {
    fn glyph_codepoints(&self) -> Vec<char> {
        self.inner.glyph_codepoints()
    }

    fn advance_width(&self, ch: char, px: f32) -> f32 {
        self.inner.advance_width(ch, px)
    }

    fn glyph_bounds(&self, ch: char, px: f32) -> GlyphBounds {
        self.inner.glyph_bounds(ch, px)
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphCoverage {
        if self.rasterized.fetch_add(1, Ordering::SeqCst) + 1 >= self.cancel_after {
            self.token.cancel();
        }
        self.inner.rasterize(ch, px)
    }

    fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
        self.inner.line_metrics(px)
    }
}

/// Many identical block glyphs on consecutive codepoints
pub fn block_font(count: u32) -> PatternFont {
    let glyphs = (0..count)
        .filter_map(|i| char::from_u32(0x4E00 + i))
        .map(|ch| PatternGlyph::new(ch, &["###", "#.#", "###"], 0))
        .collect();
    PatternFont::new(glyphs)
}
