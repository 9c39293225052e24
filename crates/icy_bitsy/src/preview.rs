//! Thresholded sample text preview.
//!
//! Shows how a font looks after thresholding, before committing to a full
//! conversion. Lines are rendered independently and stacked one font size apart.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::raster::{PixelBuffer, draw_glyph, white_canvas};
use crate::threshold::apply_threshold;
use crate::{Result, VectorFont};

pub const DEFAULT_SAMPLE_TEXT: &str = "the quick brown fox jumps over the lazy dog";

/// Blank rows above the first line
const TOP_MARGIN: usize = 2;

/// Baseline used for preview lines: ascent plus (negative) descent.
pub fn text_baseline<F: VectorFont + ?Sized>(font: &F, font_size: u32) -> f32 {
    font.line_metrics(font_size as f32).map_or(font_size as f32, |m| m.ascent + m.descent)
}

/// Render one line of text, glyph after glyph without kerning, and threshold it.
pub fn render_line<F: VectorFont + ?Sized>(font: &F, text: &str, font_size: u32, baseline: f32, black: u8, white: u8) -> PixelBuffer {
    let px = font_size as f32;
    let advance: f32 = text.chars().map(|ch| font.advance_width(ch, px)).sum();
    let width = ((advance + px).max(px)) as usize;

    let mut canvas = white_canvas(width, font_size as usize);
    let mut pen_x = 0.0;
    for ch in text.chars() {
        pen_x += draw_glyph(&mut canvas, font, ch, px, pen_x, baseline);
    }
    apply_threshold(&mut canvas, black, white);
    canvas
}

/// Render every line of `sample_text` into one image.
pub fn render_preview<F: VectorFont + ?Sized>(font: &F, sample_text: &str, font_size: u32, min_white: u8, max_black: u8) -> PixelBuffer {
    let baseline = text_baseline(font, font_size);
    let line_height = font_size as usize;

    let lines: Vec<Option<PixelBuffer>> = sample_text
        .split('\n')
        .map(|line| (!line.is_empty()).then(|| render_line(font, line, font_size, baseline, max_black, min_white)))
        .collect();

    let width = lines.iter().flatten().map(|l| l.width()).max().unwrap_or(0);
    let mut image = white_canvas(width, TOP_MARGIN + lines.len() * line_height);
    for (i, line) in lines.iter().enumerate() {
        if let Some(line) = line {
            blit(&mut image, line, TOP_MARGIN + i * line_height);
        }
    }
    image
}

fn blit(target: &mut PixelBuffer, source: &PixelBuffer, top: usize) {
    for (y, row) in source.rows().enumerate() {
        let ty = top + y;
        if ty >= target.height() {
            break;
        }
        for (x, &pixel) in row.iter().enumerate().take(target.width()) {
            target[(x, ty)] = pixel;
        }
    }
}

/// Write an image as 8 bit RGB PNG
pub fn save_png(image: &PixelBuffer, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let data: Vec<u8> = image.pixels().flat_map(|p| [p.r, p.g, p.b]).collect();
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}
