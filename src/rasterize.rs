//! Rasterization of rendered text frames into images.
//!
//! Draws each line with a fixed 8×8 bitmap font, white on black, one cell
//! row per text line, for snapshot and clip export of the text-based modes.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};

/// Glyph cell width in pixels.
pub const CELL_W: u32 = 8;
/// Glyph cell height in pixels.
pub const CELL_H: u32 = 8;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Rasterize rendered text into a synthetic frame.
///
/// The canvas is sized to the longest line; characters outside the bitmap
/// font's range are left as background cells.
pub fn text_to_image(text: &str) -> RgbaImage {
    let lines: Vec<&str> = text.lines().collect();
    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    let width = (cols as u32 * CELL_W).max(1);
    let height = (lines.len() as u32 * CELL_H).max(1);
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let ox = col as u32 * CELL_W;
            let oy = row as u32 * CELL_H;
            for (gy, row) in glyph.iter().enumerate() {
                let bits = *row;
                for gx in 0..8u32 {
                    if (bits >> gx) & 1 == 1 {
                        img.put_pixel(ox + gx, oy + gy as u32, FOREGROUND);
                    }
                }
            }
        }
    }
    img
}
