//! The bitsyfont text format.
//!
//! ```text
//! FONT <name>
//! SIZE <width> <height>
//! CHAR <codepoint>
//! <height lines of exactly <width> characters, each '0' or '1'>
//! ...
//! ```
//!
//! Lines are joined with `\n`, codepoints are decimal Unicode scalar values and
//! every glyph block has the same width and height.

use std::fmt::Display;

use crate::{BoundingBox, ConvertError, Result};

/// Binarized rows of one rasterized glyph, before cropping.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub codepoint: char,
    pub rows: Vec<Vec<bool>>,
    /// Canvas size the glyph was rendered on
    pub canvas_width: usize,
    pub canvas_height: usize,
}

/// A glyph cropped to the font's grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitsyGlyph {
    pub codepoint: char,
    /// Exactly `height` rows of exactly `width` pixels
    pub rows: Vec<Vec<bool>>,
}

impl BitsyGlyph {
    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.rows.get(y).and_then(|row| row.get(x)).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&bit| !bit))
    }
}

/// A complete bitsyfont document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitsyFont {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub glyphs: Vec<BitsyGlyph>,
}

impl BitsyFont {
    /// A font without glyphs (`SIZE 0 0`)
    pub fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 0,
            height: 0,
            glyphs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn glyph(&self, ch: char) -> Option<&BitsyGlyph> {
        self.glyphs.iter().find(|g| g.codepoint == ch)
    }

    /// Parse a bitsyfont document.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_suffix('\n').unwrap_or(text);
        let mut lines = text.split('\n').enumerate().map(|(i, line)| (i + 1, line));

        let (line_no, line) = lines.next().ok_or_else(|| ConvertError::parse(1, "missing FONT header"))?;
        let name = match line {
            "FONT" => "",
            _ => line
                .strip_prefix("FONT ")
                .ok_or_else(|| ConvertError::parse(line_no, format!("expected FONT header, got '{line}'")))?,
        };

        let (line_no, line) = lines.next().ok_or_else(|| ConvertError::parse(line_no + 1, "missing SIZE header"))?;
        let (width, height) = parse_size(line_no, line)?;

        let mut font = BitsyFont {
            name: name.to_string(),
            width,
            height,
            glyphs: Vec::new(),
        };

        while let Some((line_no, line)) = lines.next() {
            let codepoint = parse_char(line_no, line)?;
            let mut rows = Vec::with_capacity(height);
            for _ in 0..height {
                let (row_no, row) = lines
                    .next()
                    .ok_or_else(|| ConvertError::parse(line_no, format!("glyph {} has fewer than {height} rows", codepoint as u32)))?;
                rows.push(parse_row(row_no, row, width)?);
            }
            font.glyphs.push(BitsyGlyph { codepoint, rows });
        }

        Ok(font)
    }
}

fn parse_size(line_no: usize, line: &str) -> Result<(usize, usize)> {
    let mut parts = line.split(' ');
    if parts.next() != Some("SIZE") {
        return Err(ConvertError::parse(line_no, format!("expected SIZE header, got '{line}'")));
    }
    let mut dimension = |what: &str| -> Result<usize> {
        parts
            .next()
            .and_then(|v| v.parse::<usize>().ok())
            .ok_or_else(|| ConvertError::parse(line_no, format!("invalid {what} in '{line}'")))
    };
    let width = dimension("width")?;
    let height = dimension("height")?;
    if parts.next().is_some() {
        return Err(ConvertError::parse(line_no, format!("trailing data in '{line}'")));
    }
    Ok((width, height))
}

fn parse_char(line_no: usize, line: &str) -> Result<char> {
    let value = line
        .strip_prefix("CHAR ")
        .ok_or_else(|| ConvertError::parse(line_no, format!("expected CHAR, got '{line}'")))?;
    let cp: u32 = value
        .parse()
        .map_err(|_| ConvertError::parse(line_no, format!("invalid codepoint '{value}'")))?;
    char::from_u32(cp).ok_or_else(|| ConvertError::parse(line_no, format!("{cp} is not a Unicode scalar value")))
}

fn parse_row(line_no: usize, line: &str, width: usize) -> Result<Vec<bool>> {
    let pixels = line.chars().count();
    if pixels != width {
        return Err(ConvertError::parse(line_no, format!("row has {pixels} pixels, expected {width}")));
    }
    line.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(ConvertError::parse(line_no, format!("invalid pixel '{c}'"))),
        })
        .collect()
}

impl Display for BitsyFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FONT {}\nSIZE {} {}", self.name, self.width, self.height)?;
        for glyph in &self.glyphs {
            write!(f, "\nCHAR {}", glyph.codepoint as u32)?;
            for row in &glyph.rows {
                f.write_str("\n")?;
                for &bit in row {
                    f.write_str(if bit { "1" } else { "0" })?;
                }
            }
        }
        Ok(())
    }
}

/// Collects rasterized glyphs and the growing bounding box, then crops
/// everything to the final grid in [`BitsyFontBuilder::finish`].
#[derive(Debug, Default)]
pub struct BitsyFontBuilder {
    glyphs: Vec<GlyphBitmap>,
    bbox: BoundingBox,
}

impl BitsyFontBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, glyph: GlyphBitmap) {
        self.bbox.add_rows(&glyph.rows, glyph.canvas_width, glyph.canvas_height);
        self.glyphs.push(glyph);
    }

    /// Pad or truncate every glyph to the shared box.
    pub fn finish(self, name: &str) -> BitsyFont {
        let (width, height) = self.bbox.size();
        let glyphs = self
            .glyphs
            .into_iter()
            .map(|glyph| {
                let mut rows = glyph.rows;
                rows.resize_with(height, Vec::new);
                for row in &mut rows {
                    row.resize(width, false);
                }
                BitsyGlyph { codepoint: glyph.codepoint, rows }
            })
            .collect();

        BitsyFont {
            name: name.to_string(),
            width,
            height,
            glyphs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bitmap(codepoint: char, pattern: &[&str]) -> GlyphBitmap {
        let rows: Vec<Vec<bool>> = pattern.iter().map(|line| line.chars().map(|c| c == '1').collect()).collect();
        GlyphBitmap {
            codepoint,
            canvas_width: rows.first().map_or(0, Vec::len),
            canvas_height: rows.len(),
            rows,
        }
    }

    #[test]
    fn test_empty_font() {
        assert_eq!(BitsyFont::empty("Empty").to_string(), "FONT Empty\nSIZE 0 0");
        assert_eq!(BitsyFontBuilder::new().finish("Empty"), BitsyFont::empty("Empty"));
    }

    #[test]
    fn test_builder_crops_to_shared_box() {
        let mut builder = BitsyFontBuilder::new();
        builder.push(bitmap('A', &["0110", "1001", "0000", "0000"]));
        builder.push(bitmap('.', &["000", "000", "100", "000"]));
        let font = builder.finish("Test");

        assert_eq!(font.to_string(), "FONT Test\nSIZE 4 3\nCHAR 65\n0110\n1001\n0000\nCHAR 46\n0000\n0000\n1000");
    }

    #[test]
    fn test_narrow_canvas_is_padded() {
        let mut builder = BitsyFontBuilder::new();
        builder.push(bitmap('i', &["10", "10"]));
        builder.push(bitmap('m', &["11111", "10101"]));
        let font = builder.finish("Pad");

        assert_eq!(font.size(), (5, 2));
        assert_eq!(font.glyph('i').unwrap().rows, vec![vec![true, false, false, false, false]; 2]);
    }

    #[test]
    fn test_parse_reads_back_written_font() {
        let text = "FONT My Font\nSIZE 3 2\nCHAR 97\n010\n111\nCHAR 128512\n000\n001";
        let font = BitsyFont::parse(text).unwrap();
        assert_eq!(font.name(), "My Font");
        assert_eq!(font.size(), (3, 2));
        assert_eq!(font.glyphs.len(), 2);
        assert_eq!(font.glyphs[1].codepoint, '😀');
        assert!(font.glyphs[1].get_pixel(2, 1));
        assert_eq!(font.to_string(), text);
    }

    #[test]
    fn test_parse_accepts_trailing_newline() {
        let font = BitsyFont::parse("FONT x\nSIZE 0 0\n").unwrap();
        assert_eq!(font, BitsyFont::empty("x"));
    }

    #[test]
    fn test_parse_zero_height_blocks() {
        let font = BitsyFont::parse("FONT x\nSIZE 0 0\nCHAR 32\nCHAR 33").unwrap();
        assert_eq!(font.glyphs.len(), 2);
        assert!(font.glyphs.iter().all(|g| g.rows.is_empty()));
    }

    #[test]
    fn test_parse_font_header() {
        assert_eq!(BitsyFont::parse("FONT\nSIZE 0 0").unwrap().name(), "");
        assert_eq!(BitsyFont::parse("FONT  Two\nSIZE 0 0").unwrap().name(), " Two");
        assert!(matches!(BitsyFont::parse("FONTXYZ\nSIZE 0 0"), Err(ConvertError::Parse { line: 1, .. })));
    }

    #[test]
    fn test_parse_row_counts_characters() {
        let Err(ConvertError::Parse { line, message }) = BitsyFont::parse("FONT x\nSIZE 4 1\nCHAR 65\néé") else {
            panic!("multibyte row must be rejected");
        };
        assert_eq!(line, 4);
        assert_eq!(message, "row has 2 pixels, expected 4");

        let Err(ConvertError::Parse { message, .. }) = BitsyFont::parse("FONT x\nSIZE 2 1\nCHAR 65\né0") else {
            panic!("non binary pixel must be rejected");
        };
        assert_eq!(message, "invalid pixel 'é'");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(BitsyFont::parse("SIZE 1 1"), Err(ConvertError::Parse { line: 1, .. })));
        assert!(matches!(BitsyFont::parse("FONT x\nSIZE a 1"), Err(ConvertError::Parse { line: 2, .. })));
        assert!(matches!(BitsyFont::parse("FONT x\nSIZE 2 1\nCHAR 65\n101"), Err(ConvertError::Parse { line: 4, .. })));
        assert!(matches!(BitsyFont::parse("FONT x\nSIZE 2 1\nCHAR 65\n12"), Err(ConvertError::Parse { line: 4, .. })));
        assert!(matches!(BitsyFont::parse("FONT x\nSIZE 2 2\nCHAR 65\n10"), Err(ConvertError::Parse { line: 3, .. })));
        assert!(matches!(BitsyFont::parse("FONT x\nSIZE 0 0\nCHAR 55296"), Err(ConvertError::Parse { line: 3, .. })));
    }
}
