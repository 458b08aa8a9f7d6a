//! Truecolor ANSI block rendering.

use std::fmt::Write;

use image::RgbaImage;

use super::resample::{fit_dimensions, resample, Resampling};

/// Glyph emitted for every colored cell.
pub const BLOCK: char = '█';

/// SGR reset, emitted at the end of every row.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Render a frame as truecolor block rows, at most `max_w`×`max_h` cells.
///
/// Every cell is a `38;2;R;G;B` foreground escape followed by a full block.
/// Channel values are zero-padded so output byte length is deterministic in
/// the cell dimensions alone.
pub fn render(frame: &RgbaImage, max_w: u32, max_h: u32, center: bool) -> String {
    if max_w == 0 || max_h == 0 {
        return String::new();
    }

    let (w, h) = fit_dimensions(frame.width(), frame.height(), max_w, max_h);
    let resized = resample(frame, w, h, Resampling::Nearest);

    let padding = if center { (max_w - w) as usize / 2 } else { 0 };
    // ~20 bytes per cell once the escape sequence is counted.
    let mut out = String::with_capacity((w as usize * 20 + padding + 8) * h as usize);

    for y in 0..h {
        for _ in 0..padding {
            out.push(' ');
        }
        for x in 0..w {
            let px = resized.get_pixel(x, y);
            let _ = write!(
                out,
                "\x1b[38;2;{:03};{:03};{:03}m{}",
                px[0], px[1], px[2], BLOCK
            );
        }
        out.push_str(ANSI_RESET);
        out.push('\n');
    }
    out
}
