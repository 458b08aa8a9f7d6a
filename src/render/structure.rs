//! Edge-detected "structure" rendering.
//!
//! Estimates local luminance gradients with clamped-neighbor differences and
//! draws line-art glyphs along edges; smooth areas fall back to a coarse
//! three-level texture.

use image::RgbaImage;

use super::luminance::luminance_norm;
use super::resample::{fit_dimensions, resample, Resampling};

/// Squared-gradient magnitude above which a pixel counts as an edge.
const EDGE_THRESHOLD: f32 = 0.02;

/// Texture breakpoints for non-edge pixels.
const TEXTURE_DARK: f32 = 0.2;
const TEXTURE_MID: f32 = 0.5;

/// Pick the glyph for a gradient pair.
///
/// A strong vertical gradient means a horizontal edge and vice versa;
/// diagonals split on whether the gradient components share a sign.
fn edge_glyph(gx: f32, gy: f32) -> char {
    let ax = gx.abs();
    let ay = gy.abs();

    if ay > ax * 2.0 {
        '-'
    } else if ax > ay * 2.0 {
        '|'
    } else if (gx > 0.0 && gy > 0.0) || (gx < 0.0 && gy < 0.0) {
        '\\'
    } else {
        '/'
    }
}

fn texture_glyph(lum: f32) -> char {
    if lum < TEXTURE_DARK {
        ' '
    } else if lum < TEXTURE_MID {
        '.'
    } else {
        ':'
    }
}

/// Render a frame as edge-art rows, at most `max_w`×`max_h` cells.
pub fn render(frame: &RgbaImage, max_w: u32, max_h: u32, center: bool) -> String {
    if max_w == 0 || max_h == 0 {
        return String::new();
    }

    let (w, h) = fit_dimensions(frame.width(), frame.height(), max_w, max_h);
    let resized = resample(frame, w, h, Resampling::Bilinear);

    // Luminance plane computed up front; the gradient pass reads each cell
    // up to five times.
    let lum: Vec<f32> = resized.pixels().map(|px| luminance_norm(*px)).collect();
    let at = |x: u32, y: u32| lum[(y * w + x) as usize];

    let padding = if center { (max_w - w) as usize / 2 } else { 0 };
    let mut out = String::with_capacity((w as usize + padding + 1) * h as usize);

    for y in 0..h {
        for _ in 0..padding {
            out.push(' ');
        }
        for x in 0..w {
            // Neighbor coordinates clamp at the frame edge.
            let x0 = x.saturating_sub(1);
            let x2 = (x + 1).min(w - 1);
            let y0 = y.saturating_sub(1);
            let y2 = (y + 1).min(h - 1);

            let gx = at(x2, y) - at(x0, y);
            let gy = at(x, y2) - at(x, y0);

            if gx * gx + gy * gy > EDGE_THRESHOLD {
                out.push(edge_glyph(gx, gy));
            } else {
                out.push(texture_glyph(at(x, y)));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Frame with a sharp vertical black/white boundary at the midline.
    fn split_frame(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, _| {
            if x < w / 2 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    #[test]
    fn test_vertical_boundary_draws_vertical_glyphs() {
        let frame = split_frame(160, 160);
        let art = render(&frame, 40, 40, false);

        assert!(art.contains('|'));
        // Away from the boundary only texture glyphs remain.
        for line in art.lines() {
            assert!(line.starts_with(' ') || line.starts_with('.'));
            assert!(line.ends_with(':') || line.ends_with('.'));
        }
    }

    #[test]
    fn test_horizontal_boundary_draws_horizontal_glyphs() {
        let frame = RgbaImage::from_fn(160, 160, |_, y| {
            if y < 80 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let art = render(&frame, 40, 40, false);
        assert!(art.contains('-'));
        assert!(!art.contains('|'));
    }

    #[test]
    fn test_flat_frame_has_no_edges() {
        let frame = RgbaImage::from_pixel(100, 100, Rgba([40, 40, 40, 255]));
        let art = render(&frame, 40, 20, false);
        assert!(art.chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_flat_bright_frame_uses_dense_texture() {
        let frame = RgbaImage::from_pixel(100, 100, Rgba([220, 220, 220, 255]));
        let art = render(&frame, 40, 20, false);
        assert!(art.chars().filter(|c| *c != '\n').all(|c| c == ':'));
    }

    #[test]
    fn test_edge_glyph_directions() {
        assert_eq!(edge_glyph(0.05, 0.5), '-');
        assert_eq!(edge_glyph(0.5, 0.05), '|');
        assert_eq!(edge_glyph(0.3, 0.3), '\\');
        assert_eq!(edge_glyph(0.3, -0.3), '/');
        assert_eq!(edge_glyph(-0.3, -0.3), '\\');
    }
}
