//! Luminance-to-glyph ASCII rendering.
//!
//! Maps each resampled pixel to a character from an ordered ramp, darkest to
//! brightest.

use image::RgbaImage;

use super::luminance::luminance_u16;
use super::resample::{fit_dimensions, resample, Resampling};

/// 10-character shading ramp.
pub const STANDARD_RAMP: &str = " .:-=+*#%@";

/// ~70-character shading ramp for high-detail output.
pub const DETAILED_RAMP: &str =
    " .'`^\",:;Il!i><~+_-?][}{1)(|\\/tfjrxnuvczXYUJCLQ0OZmwqpdbkhao*#MW&8%B@$";

/// Map a 16-bit-scale luminance to a ramp glyph.
///
/// The index is always within bounds for any input, including 0 and 65535.
pub fn glyph_for(gray: u32, ramp: &[u8]) -> u8 {
    let idx = gray as usize * ramp.len() / 65536;
    ramp[idx.min(ramp.len() - 1)]
}

/// Render a frame as shaded ASCII rows, at most `max_w`×`max_h` cells.
///
/// When `center` is set, each row is left-padded so the art sits in the
/// middle of the `max_w`-wide viewport; exports render uncentered.
pub fn render(frame: &RgbaImage, max_w: u32, max_h: u32, ramp: &str, center: bool) -> String {
    if max_w == 0 || max_h == 0 {
        return String::new();
    }

    let ramp = ramp.as_bytes();
    let (w, h) = fit_dimensions(frame.width(), frame.height(), max_w, max_h);
    let resized = resample(frame, w, h, Resampling::Nearest);

    let padding = if center { (max_w - w) as usize / 2 } else { 0 };
    let mut out = String::with_capacity((w as usize + padding + 1) * h as usize);

    for y in 0..h {
        for _ in 0..padding {
            out.push(' ');
        }
        for x in 0..w {
            let gray = luminance_u16(*resized.get_pixel(x, y));
            out.push(glyph_for(gray, ramp) as char);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn test_glyph_extremes_stay_in_bounds() {
        let ramp = STANDARD_RAMP.as_bytes();
        assert_eq!(glyph_for(0, ramp), b' ');
        assert_eq!(glyph_for(65535, ramp), b'@');

        let detailed = DETAILED_RAMP.as_bytes();
        assert_eq!(glyph_for(0, detailed), b' ');
        assert_eq!(glyph_for(65535, detailed), b'$');
    }

    #[test]
    fn test_uniform_frame_renders_single_glyph() {
        let frame = solid(640, 480, [128, 128, 128, 255]);
        let art = render(&frame, 80, 20, STANDARD_RAMP, false);

        let glyphs: std::collections::HashSet<char> =
            art.chars().filter(|c| *c != '\n').collect();
        assert_eq!(glyphs.len(), 1);
    }

    #[test]
    fn test_output_fits_viewport() {
        let frame = solid(640, 480, [200, 10, 10, 255]);
        let art = render(&frame, 80, 20, STANDARD_RAMP, false);

        let lines: Vec<&str> = art.lines().collect();
        assert!(lines.len() <= 20 && !lines.is_empty());
        assert!(lines.iter().all(|l| l.len() <= 80));
    }

    #[test]
    fn test_centering_pads_rows() {
        // A tall source fits narrow; centering must pad the left side.
        let frame = solid(100, 400, [255, 255, 255, 255]);
        let centered = render(&frame, 80, 20, STANDARD_RAMP, true);
        let flush = render(&frame, 80, 20, STANDARD_RAMP, false);

        let c_line = centered.lines().next().unwrap();
        let f_line = flush.lines().next().unwrap();
        assert!(c_line.len() > f_line.len());
        assert!(c_line.starts_with(' '));
        assert!(!f_line.starts_with(' '));
    }

    #[test]
    fn test_zero_viewport_yields_empty() {
        let frame = solid(10, 10, [0, 0, 0, 255]);
        assert!(render(&frame, 0, 10, STANDARD_RAMP, true).is_empty());
        assert!(render(&frame, 10, 0, STANDARD_RAMP, true).is_empty());
    }
}
