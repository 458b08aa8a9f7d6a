//! Per-pixel color filters, applied before resampling so the downstream
//! luminance and gradient analysis sees filtered values.

use std::borrow::Cow;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Active color filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterKind {
    #[default]
    None,
    Grayscale,
    Invert,
    Sepia,
    RedTint,
    GreenTint,
    BlueTint,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::None => "None",
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Invert => "Invert",
            FilterKind::Sepia => "Sepia",
            FilterKind::RedTint => "Red Tint",
            FilterKind::GreenTint => "Green Tint",
            FilterKind::BlueTint => "Blue Tint",
        }
    }

    /// Advance to the next filter, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            FilterKind::None => FilterKind::Grayscale,
            FilterKind::Grayscale => FilterKind::Invert,
            FilterKind::Invert => FilterKind::Sepia,
            FilterKind::Sepia => FilterKind::RedTint,
            FilterKind::RedTint => FilterKind::GreenTint,
            FilterKind::GreenTint => FilterKind::BlueTint,
            FilterKind::BlueTint => FilterKind::None,
        }
    }

    /// Apply the filter, allocating a new frame.
    ///
    /// `None` borrows the input untouched; every other kind maps each sample
    /// independently with alpha preserved.
    pub fn apply<'a>(&self, frame: &'a RgbaImage) -> Cow<'a, RgbaImage> {
        if *self == FilterKind::None {
            return Cow::Borrowed(frame);
        }

        let mut out = RgbaImage::new(frame.width(), frame.height());
        for (src, dst) in frame.pixels().zip(out.pixels_mut()) {
            *dst = self.map_pixel(*src);
        }
        Cow::Owned(out)
    }

    fn map_pixel(&self, px: Rgba<u8>) -> Rgba<u8> {
        let Rgba([r, g, b, a]) = px;
        match self {
            FilterKind::None => px,
            FilterKind::Grayscale => {
                let gray =
                    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8;
                Rgba([gray, gray, gray, a])
            }
            FilterKind::Invert => Rgba([255 - r, 255 - g, 255 - b, a]),
            FilterKind::Sepia => {
                let (rf, gf, bf) = (r as f32, g as f32, b as f32);
                let tr = 0.393 * rf + 0.769 * gf + 0.189 * bf;
                let tg = 0.349 * rf + 0.686 * gf + 0.168 * bf;
                let tb = 0.272 * rf + 0.534 * gf + 0.131 * bf;
                Rgba([tr.min(255.0) as u8, tg.min(255.0) as u8, tb.min(255.0) as u8, a])
            }
            FilterKind::RedTint => Rgba([r, 0, 0, a]),
            FilterKind::GreenTint => Rgba([0, g, 0, a]),
            FilterKind::BlueTint => Rgba([0, 0, b, a]),
        }
    }
}
