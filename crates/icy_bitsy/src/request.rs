use std::path::Path;

use crate::raster::CanvasPadding;
use crate::{CodepointSource, ConvertError, Result, VectorFont};

pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const DEFAULT_MIN_WHITE: u8 = 192;
pub const DEFAULT_MAX_BLACK: u8 = 64;

/// Minimum distance kept between the black and the white threshold
pub const THRESHOLD_GAP: u8 = 5;

/// Everything a conversion needs.
#[derive(Debug, Clone)]
pub struct GenerationRequest<F> {
    pub font: F,
    /// Only convert the characters of `restrict_text`
    pub do_restrict: bool,
    pub restrict_text: String,
    /// Font size in pixels per em
    pub font_size: u32,
    /// Luminance above this is forced to white
    pub min_white: u8,
    /// Luminance below this is forced to black
    pub max_black: u8,
}

impl<F: VectorFont> GenerationRequest<F> {
    pub fn new(font: F) -> Self {
        Self {
            font,
            do_restrict: false,
            restrict_text: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            min_white: DEFAULT_MIN_WHITE,
            max_black: DEFAULT_MAX_BLACK,
        }
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Restrict the conversion to the distinct characters of `text`.
    pub fn with_restrict(mut self, text: impl Into<String>) -> Self {
        self.do_restrict = true;
        self.restrict_text = text.into();
        self
    }

    pub fn with_thresholds(mut self, min_white: u8, max_black: u8) -> Self {
        self.min_white = min_white;
        self.max_black = max_black;
        self
    }

    /// Like [`GenerationRequest::with_thresholds`] but keeps the thresholds
    /// at least [`THRESHOLD_GAP`] apart and `min_white` below 255.
    pub fn with_clamped_thresholds(self, min_white: u8, max_black: u8) -> Self {
        let min_white = clamp_min_white(min_white, max_black);
        let max_black = clamp_max_black(max_black, min_white);
        self.with_thresholds(min_white, max_black)
    }

    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(ConvertError::InvalidFontSize { size: self.font_size });
        }
        Ok(())
    }

    /// The codepoints to convert. Both conversion passes iterate this.
    pub fn codepoints(&self) -> CodepointSource<'_> {
        if self.do_restrict {
            CodepointSource::restricted(&self.restrict_text)
        } else {
            CodepointSource::from_font(&self.font)
        }
    }

    /// Full font conversions get extra room for anti-alias bleed.
    pub fn canvas_padding(&self) -> CanvasPadding {
        if self.do_restrict { CanvasPadding::None } else { CanvasPadding::AntiAlias }
    }
}

pub fn clamp_min_white(value: u8, max_black: u8) -> u8 {
    let low = max_black.saturating_add(THRESHOLD_GAP).min(254);
    value.clamp(low, 254)
}

pub fn clamp_max_black(value: u8, min_white: u8) -> u8 {
    value.min(min_white.saturating_sub(THRESHOLD_GAP))
}

/// Font name for a font file: the file name up to the first dot.
pub fn font_name_from_path(path: &Path) -> String {
    let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("Imported");
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}
