//! Luminance thresholding and reduction to 1 bit per pixel.

use rgb::RGB8;

use crate::raster::{BLACK, PixelBuffer, WHITE};

/// Rec. 709 luma, truncated to an integer.
pub fn luminance(pixel: RGB8) -> u8 {
    (0.2126 * pixel.r as f64 + 0.7152 * pixel.g as f64 + 0.0722 * pixel.b as f64) as u8
}

/// Clamp dark pixels to black and light pixels to white.
///
/// Pixels with a luminance below `black` become black, above `white` become
/// white. Anything in between keeps its anti-aliased color.
pub fn apply_threshold(canvas: &mut PixelBuffer, black: u8, white: u8) {
    for pixel in canvas.pixels_mut() {
        let lum = luminance(*pixel);
        if lum < black {
            *pixel = BLACK;
        } else if lum > white {
            *pixel = WHITE;
        }
    }
}

/// Reduce a thresholded canvas to rows of bits.
///
/// A pixel is set only when its luminance is exactly 0. Gray pixels the
/// threshold left alone therefore count as unset.
pub fn to_bit_rows(canvas: &PixelBuffer) -> Vec<Vec<bool>> {
    canvas.rows().map(|row| row.iter().map(|&p| luminance(p) == 0).collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::white_canvas;

    fn gray(v: u8) -> RGB8 {
        RGB8::new(v, v, v)
    }

    #[test]
    fn test_luminance() {
        assert_eq!(luminance(BLACK), 0);
        assert_eq!(luminance(RGB8::new(255, 0, 0)), 54);
        assert_eq!(luminance(RGB8::new(0, 255, 0)), 182);
        assert_eq!(luminance(RGB8::new(0, 0, 255)), 18);
        assert!(luminance(WHITE) >= 254);
    }

    #[test]
    fn test_threshold_clamps_both_ends() {
        let mut canvas = white_canvas(4, 1);
        canvas[(0usize, 0usize)] = gray(10);
        canvas[(1usize, 0usize)] = gray(100);
        canvas[(2usize, 0usize)] = gray(250);
        apply_threshold(&mut canvas, 64, 192);

        assert_eq!(canvas[(0usize, 0usize)], BLACK);
        assert_eq!(canvas[(1usize, 0usize)], gray(100));
        assert_eq!(canvas[(2usize, 0usize)], WHITE);
        assert_eq!(canvas[(3usize, 0usize)], WHITE);
    }

    #[test]
    fn test_gray_zone_becomes_unset() {
        let mut canvas = white_canvas(3, 1);
        canvas[(0usize, 0usize)] = gray(30);
        canvas[(1usize, 0usize)] = gray(100);
        canvas[(2usize, 0usize)] = BLACK;
        apply_threshold(&mut canvas, 64, 192);

        assert_eq!(to_bit_rows(&canvas), vec![vec![true, false, true]]);
    }

    #[test]
    fn test_bit_rows_shape() {
        let canvas = white_canvas(5, 3);
        let rows = to_bit_rows(&canvas);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == 5 && row.iter().all(|&b| !b)));
    }
}
