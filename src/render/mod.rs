//! Frame-to-text render engines.
//!
//! Four fixed modes: two shaded ASCII ramps, a truecolor block mode, and an
//! edge-detected structure mode. All engines are pure functions of the frame
//! and the requested cell bounds.

pub mod ansi;
pub mod ascii;
pub mod luminance;
pub mod resample;
pub mod structure;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Active render mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// 10-character shading ramp.
    #[default]
    Ascii,
    /// ~70-character shading ramp.
    Detailed,
    /// Truecolor ANSI blocks.
    Color,
    /// Edge-detected line art.
    Structure,
}

impl RenderMode {
    pub fn name(&self) -> &'static str {
        match self {
            RenderMode::Ascii => "Standard ASCII",
            RenderMode::Detailed => "High Detail ASCII",
            RenderMode::Color => "Color (ANSI)",
            RenderMode::Structure => "Structure (Edge)",
        }
    }

    /// Advance to the next mode, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            RenderMode::Ascii => RenderMode::Detailed,
            RenderMode::Detailed => RenderMode::Color,
            RenderMode::Color => RenderMode::Structure,
            RenderMode::Structure => RenderMode::Ascii,
        }
    }

    /// Text-based modes are rasterized through the bitmap font on export.
    pub fn is_text(&self) -> bool {
        !matches!(self, RenderMode::Color)
    }
}

/// Render a frame for the active mode into at most `max_w`×`max_h` cells.
pub fn render_view(frame: &RgbaImage, max_w: u32, max_h: u32, mode: RenderMode, center: bool) -> String {
    match mode {
        RenderMode::Ascii => ascii::render(frame, max_w, max_h, ascii::STANDARD_RAMP, center),
        RenderMode::Detailed => ascii::render(frame, max_w, max_h, ascii::DETAILED_RAMP, center),
        RenderMode::Color => ansi::render(frame, max_w, max_h, center),
        RenderMode::Structure => structure::render(frame, max_w, max_h, center),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_mode_cycle_wraps_after_four() {
        let mut mode = RenderMode::Ascii;
        for _ in 0..4 {
            mode = mode.next();
        }
        assert_eq!(mode, RenderMode::Ascii);
    }

    #[test]
    fn test_text_modes() {
        assert!(RenderMode::Ascii.is_text());
        assert!(RenderMode::Detailed.is_text());
        assert!(RenderMode::Structure.is_text());
        assert!(!RenderMode::Color.is_text());
    }

    #[test]
    fn test_dispatch_produces_output_for_every_mode() {
        let frame = RgbaImage::from_pixel(64, 48, Rgba([90, 120, 150, 255]));
        for mode in [
            RenderMode::Ascii,
            RenderMode::Detailed,
            RenderMode::Color,
            RenderMode::Structure,
        ] {
            let art = render_view(&frame, 20, 10, mode, true);
            assert!(!art.is_empty(), "no output for {:?}", mode);
            assert!(art.lines().count() <= 10);
        }
    }
}
