//! Font contract used by the converter.
//!
//! The converter never parses font binaries itself. Anything that can list its
//! mapped codepoints, measure a glyph and produce a coverage bitmap can be
//! converted; [`fontdue::Font`] is the implementation used for TTF/OTF files.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::{ConvertError, Result};

/// Outline bounding box of a glyph in pixels, y axis pointing up from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBounds {
    pub x_min: f32,
    pub y_min: f32,
    pub width: f32,
    pub height: f32,
}

impl GlyphBounds {
    /// Lowest point of the outline below the baseline in y-down coordinates.
    /// Positive for descenders, zero for empty glyphs.
    pub fn y2(&self) -> f32 {
        -self.y_min
    }
}

/// 8-bit coverage bitmap of a glyph.
///
/// `left` and `bottom` position the bitmap relative to the pen origin on the
/// baseline (y up), `data` holds `width * height` values, top row first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphCoverage {
    pub left: i32,
    pub bottom: i32,
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GlyphCoverage {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }
}

/// Vertical line metrics in pixels. `descent` is negative below the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    pub ascent: f32,
    pub descent: f32,
}

/// A scalable font as seen by the converter.
///
/// All measurements are for glyphs in isolation: no kerning, hinting or
/// ligature substitution.
pub trait VectorFont {
    /// Codepoints that have a glyph, in glyph table order.
    /// Glyphs without a mapped codepoint are left out.
    fn glyph_codepoints(&self) -> Vec<char>;

    /// Horizontal advance of `ch` at `px` pixels per em.
    fn advance_width(&self, ch: char, px: f32) -> f32;

    /// Outline bounds of `ch` at `px` pixels per em.
    fn glyph_bounds(&self, ch: char, px: f32) -> GlyphBounds;

    /// Anti-aliased coverage of `ch` at `px` pixels per em.
    fn rasterize(&self, ch: char, px: f32) -> GlyphCoverage;

    fn line_metrics(&self, px: f32) -> Option<LineMetrics>;
}

impl<T: VectorFont + ?Sized> VectorFont for &T {
    fn glyph_codepoints(&self) -> Vec<char> {
        (**self).glyph_codepoints()
    }

    fn advance_width(&self, ch: char, px: f32) -> f32 {
        (**self).advance_width(ch, px)
    }

    fn glyph_bounds(&self, ch: char, px: f32) -> GlyphBounds {
        (**self).glyph_bounds(ch, px)
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphCoverage {
        (**self).rasterize(ch, px)
    }

    fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
        (**self).line_metrics(px)
    }
}

impl<T: VectorFont + ?Sized> VectorFont for Arc<T> {
    fn glyph_codepoints(&self) -> Vec<char> {
        (**self).glyph_codepoints()
    }

    fn advance_width(&self, ch: char, px: f32) -> f32 {
        (**self).advance_width(ch, px)
    }

    fn glyph_bounds(&self, ch: char, px: f32) -> GlyphBounds {
        (**self).glyph_bounds(ch, px)
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphCoverage {
        (**self).rasterize(ch, px)
    }

    fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
        (**self).line_metrics(px)
    }
}

/// Load a TTF/OTF font from a file
pub fn load_font(path: &Path) -> Result<fontdue::Font> {
    let font_data = std::fs::read(path)?;
    parse_font(font_data)
}

/// Parse a TTF/OTF font from memory
pub fn parse_font(font_data: Vec<u8>) -> Result<fontdue::Font> {
    fontdue::Font::from_bytes(font_data, fontdue::FontSettings::default()).map_err(|e| ConvertError::FontParse { message: e.to_string() })
}

/// Order `(codepoint, glyph index)` pairs by glyph index.
///
/// A glyph mapped from several codepoints is listed once, under its smallest
/// codepoint. U+0000 counts as unmapped.
pub fn glyph_table_order(mapping: impl IntoIterator<Item = (char, u16)>) -> Vec<char> {
    let mut by_index: BTreeMap<u16, char> = BTreeMap::new();
    for (ch, index) in mapping {
        if ch == '\0' {
            continue;
        }
        by_index
            .entry(index)
            .and_modify(|cur| {
                if ch < *cur {
                    *cur = ch;
                }
            })
            .or_insert(ch);
    }
    by_index.into_values().collect()
}

impl From<fontdue::OutlineBounds> for GlyphBounds {
    fn from(bounds: fontdue::OutlineBounds) -> Self {
        Self {
            x_min: bounds.xmin,
            y_min: bounds.ymin,
            width: bounds.width,
            height: bounds.height,
        }
    }
}

impl VectorFont for fontdue::Font {
    fn glyph_codepoints(&self) -> Vec<char> {
        glyph_table_order(self.chars().iter().map(|(&ch, index)| (ch, index.get())))
    }

    fn advance_width(&self, ch: char, px: f32) -> f32 {
        self.metrics(ch, px).advance_width
    }

    fn glyph_bounds(&self, ch: char, px: f32) -> GlyphBounds {
        GlyphBounds::from(self.metrics(ch, px).bounds)
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphCoverage {
        let (metrics, data) = fontdue::Font::rasterize(self, ch, px);
        GlyphCoverage {
            left: metrics.xmin,
            bottom: metrics.ymin,
            width: metrics.width,
            height: metrics.height,
            data,
        }
    }

    fn line_metrics(&self, px: f32) -> Option<LineMetrics> {
        self.horizontal_line_metrics(px).map(|m| LineMetrics {
            ascent: m.ascent,
            descent: m.descent,
        })
    }
}
