//! Aspect-preserving resize of camera frames onto a character grid.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Character cells are roughly twice as tall as they are wide; the native
/// aspect ratio is divided by this factor before fitting.
pub const CELL_ASPECT: f32 = 0.5;

/// Resampling kind used by the render modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resampling {
    /// Nearest-neighbor, used by the shading modes.
    Nearest,
    /// Bilinear, used by structure mode for smoother gradients.
    Bilinear,
}

/// Fit a `src_w`×`src_h` frame into at most `max_w`×`max_h` character cells,
/// preserving the source aspect ratio under the cell correction.
///
/// Fits width-first and shrinks height-first when the derived height exceeds
/// the bound. The result is clamped so that `1 <= w <= max_w` and
/// `1 <= h <= max_h` for any source dimensions, including degenerate ones.
pub fn fit_dimensions(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    debug_assert!(max_w >= 1 && max_h >= 1);

    let ratio = src_w as f32 / src_h as f32;
    let cell_ratio = ratio / CELL_ASPECT;

    let mut w = max_w;
    let mut h = (max_w as f32 / cell_ratio) as u32;

    if h > max_h {
        h = max_h;
        w = (max_h as f32 * cell_ratio) as u32;
    }

    (w.max(1).min(max_w), h.max(1).min(max_h))
}

/// Resize a frame to exactly `w`×`h`, allocating a new buffer.
pub fn resample(frame: &RgbaImage, w: u32, h: u32, kind: Resampling) -> RgbaImage {
    let filter = match kind {
        Resampling::Nearest => FilterType::Nearest,
        Resampling::Bilinear => FilterType::Triangle,
    };
    imageops::resize(frame, w, h, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_fit_within_bounds() {
        // 640x480 at cell correction 0.5: effective ratio 8/3, so 80 wide
        // derives height 30 > 20 and the fit shrinks height-first.
        let (w, h) = fit_dimensions(640, 480, 80, 20);
        assert!(w >= 1 && w <= 80);
        assert_eq!(h, 20);
    }

    #[test]
    fn test_wide_source_is_width_limited() {
        let (w, h) = fit_dimensions(1920, 200, 80, 40);
        assert_eq!(w, 80);
        assert!(h >= 1 && h <= 40);
    }

    #[test]
    fn test_degenerate_targets_clamp_to_one() {
        let (w, h) = fit_dimensions(10_000, 1, 4, 40);
        assert!(w >= 1 && h >= 1);

        let (w, h) = fit_dimensions(1, 10_000, 80, 2);
        assert!(w >= 1 && h >= 1);
        assert!(w <= 80 && h <= 2);
    }

    #[test]
    fn test_zero_source_dimensions_do_not_panic() {
        let (w, h) = fit_dimensions(0, 0, 80, 24);
        assert!(w >= 1 && w <= 80);
        assert!(h >= 1 && h <= 24);
    }

    #[test]
    fn test_resample_produces_exact_dimensions() {
        let frame = RgbaImage::new(64, 48);
        let out = resample(&frame, 13, 7, Resampling::Nearest);
        assert_eq!(out.dimensions(), (13, 7));

        let out = resample(&frame, 5, 9, Resampling::Bilinear);
        assert_eq!(out.dimensions(), (5, 9));
    }
}
