use std::collections::HashSet;

use crate::VectorFont;

/// Where the converted codepoints come from.
///
/// The source can be iterated any number of times and always yields the same
/// ordered, duplicate free sequence, which the two conversion passes rely on.
#[derive(Debug, Clone)]
pub enum CodepointSource<'a> {
    /// Distinct characters of a text, in order of first appearance
    Restricted(&'a str),
    /// Every mapped glyph of a font, in glyph table order
    Glyphs(Vec<char>),
}

impl<'a> CodepointSource<'a> {
    pub fn restricted(text: &'a str) -> Self {
        Self::Restricted(text)
    }

    pub fn from_font<F: VectorFont + ?Sized>(font: &F) -> Self {
        Self::Glyphs(font.glyph_codepoints())
    }

    pub fn iter(&self) -> Codepoints<'_> {
        match self {
            Self::Restricted(text) => Codepoints::Restricted {
                chars: text.chars(),
                seen: HashSet::new(),
            },
            Self::Glyphs(glyphs) => Codepoints::Glyphs(glyphs.iter()),
        }
    }

    /// Number of codepoints the source yields
    pub fn len(&self) -> usize {
        match self {
            Self::Restricted(_) => self.iter().count(),
            Self::Glyphs(glyphs) => glyphs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Restricted(text) => text.is_empty(),
            Self::Glyphs(glyphs) => glyphs.is_empty(),
        }
    }
}

impl<'s> IntoIterator for &'s CodepointSource<'_> {
    type Item = char;
    type IntoIter = Codepoints<'s>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over a [`CodepointSource`]
#[derive(Debug, Clone)]
pub enum Codepoints<'s> {
    Restricted { chars: std::str::Chars<'s>, seen: HashSet<char> },
    Glyphs(std::slice::Iter<'s, char>),
}

impl Iterator for Codepoints<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        match self {
            Self::Restricted { chars, seen } => chars.by_ref().find(|ch| seen.insert(*ch)),
            Self::Glyphs(glyphs) => glyphs.next().copied(),
        }
    }
}
