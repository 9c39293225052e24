use crate::VectorFont;

/// Baseline for a single glyph: the font size minus the depth of its outline
/// below the baseline.
pub fn glyph_baseline<F: VectorFont + ?Sized>(font: &F, ch: char, font_size: u32) -> f32 {
    let bbox = font.glyph_bounds(ch, font_size as f32);
    font_size as f32 - bbox.y2()
}

/// Running minimum of per glyph baselines, so no descender gets clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedBaseline {
    baseline: Option<f32>,
    font_size: u32,
}

impl SharedBaseline {
    pub fn new(font_size: u32) -> Self {
        Self { baseline: None, font_size }
    }

    pub fn add<F: VectorFont + ?Sized>(&mut self, font: &F, ch: char) {
        let baseline = glyph_baseline(font, ch, self.font_size);
        self.baseline = Some(self.baseline.map_or(baseline, |cur| cur.min(baseline)));
    }

    /// The shared baseline; the font size when no glyph was added.
    pub fn get(&self) -> f32 {
        self.baseline.unwrap_or(self.font_size as f32)
    }
}

/// Smallest box anchored at the top left that holds every set pixel seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub width: usize,
    pub height: usize,
    /// Largest canvas seen, the box never grows past it
    canvas_width: usize,
    canvas_height: usize,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow the box to cover the set bits of one glyph rendered on a
    /// `canvas_width` by `canvas_height` canvas.
    pub fn add_rows(&mut self, rows: &[Vec<bool>], canvas_width: usize, canvas_height: usize) {
        self.canvas_width = self.canvas_width.max(canvas_width);
        self.canvas_height = self.canvas_height.max(canvas_height);
        for (y, row) in rows.iter().enumerate() {
            if let Some(last) = row.iter().rposition(|&bit| bit) {
                self.width = self.width.max(last + 1);
                self.height = self.height.max(y + 1);
            }
        }
    }

    /// Final (width, height) of the glyph grid
    pub fn size(&self) -> (usize, usize) {
        (self.width.min(self.canvas_width), self.height.min(self.canvas_height))
    }
}
