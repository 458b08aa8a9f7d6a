//! Snapshot and clip persistence.
//!
//! Snapshots are JPEG stills (text modes are rasterized through the bitmap
//! font first, with the raw text saved alongside); clips are looping GIFs
//! quantized to a small fixed palette. Both run on the export worker so the
//! acquisition loop never blocks on encoding.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use directories::UserDirs;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use log::debug;
use thiserror::Error;

use crate::filter::FilterKind;
use crate::rasterize;
use crate::render::{self, RenderMode};

/// File-name prefix for all persisted artifacts.
pub const FILE_PREFIX: &str = "glyphcam";

/// Subdirectory under the user's picture directory.
pub const OUTPUT_SUBDIR: &str = "GlyphCam";

const JPEG_QUALITY: u8 = 90;

/// GIF frame delay in hundredths of a second (~25 fps).
const CLIP_FRAME_DELAY: u16 = 4;

/// Fixed clip palette: black, white, red, green, blue, four grays.
pub const CLIP_PALETTE: [[u8; 3]; 9] = [
    [0x00, 0x00, 0x00],
    [0xFF, 0xFF, 0xFF],
    [0xFF, 0x00, 0x00],
    [0x00, 0xFF, 0x00],
    [0x00, 0x00, 0xFF],
    [0x33, 0x33, 0x33],
    [0x66, 0x66, 0x66],
    [0x99, 0x99, 0x99],
    [0xCC, 0xCC, 0xCC],
];

/// Filesystem or encoding failure during export. Surfaced as a transient
/// status message; live rendering is unaffected.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not resolve a pictures directory")]
    NoPicturesDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("gif encoding failed: {0}")]
    Gif(#[from] gif::EncodingError),
}

/// Everything the snapshot operation needs, captured by value so it can run
/// off-thread without references into live session state.
pub struct SnapshotJob {
    pub frame: RgbaImage,
    pub mode: RenderMode,
    pub filter: FilterKind,
    /// Viewport cell bounds at capture time, used for the text render.
    pub width: u32,
    pub height: u32,
}

/// Resolve (and create on demand) the output directory.
pub fn output_dir(override_dir: Option<&Path>) -> Result<PathBuf, ExportError> {
    let dir = match override_dir {
        Some(dir) => dir.to_path_buf(),
        None => UserDirs::new()
            .and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf))
            .ok_or(ExportError::NoPicturesDir)?
            .join(OUTPUT_SUBDIR),
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Persist one processed frame as a JPEG still.
///
/// Text modes render uncentered at the captured viewport, rasterize through
/// the bitmap font, and save the raw text next to the image under the same
/// base name. Returns the image file name.
pub fn save_snapshot(job: &SnapshotJob, dir: &Path) -> Result<String, ExportError> {
    let base = format!("{}_{}", FILE_PREFIX, unix_timestamp());
    let filtered = job.filter.apply(&job.frame);

    let final_image: Cow<'_, RgbaImage> = if job.mode.is_text() {
        let text = render::render_view(filtered.as_ref(), job.width, job.height, job.mode, false);
        fs::write(dir.join(format!("{base}.txt")), &text)?;
        Cow::Owned(rasterize::text_to_image(&text))
    } else {
        filtered
    };

    let name = format!("{base}.jpg");
    let rgb = DynamicImage::ImageRgba8(final_image.into_owned()).to_rgb8();
    let mut out = BufWriter::new(File::create(dir.join(&name))?);
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;

    debug!("snapshot written to {}", name);
    Ok(name)
}

/// Index of the nearest palette color by squared distance.
fn nearest_palette_index(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (idx, [pr, pg, pb]) in CLIP_PALETTE.iter().enumerate() {
        let dr = *pr as i32 - r as i32;
        let dg = *pg as i32 - g as i32;
        let db = *pb as i32 - b as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = idx;
        }
    }
    best as u8
}

/// Encode a recorded sequence as a looping GIF.
///
/// Every frame is quantized to the fixed palette independently; no temporal
/// palette optimization. An empty sequence is a no-op and returns `Ok(None)`.
/// Returns the clip file name otherwise.
pub fn save_clip(frames: &[RgbaImage], dir: &Path) -> Result<Option<String>, ExportError> {
    if frames.is_empty() {
        return Ok(None);
    }

    // Frames recorded across a mode or viewport change may differ in size;
    // the logical screen covers the largest of them.
    let screen_w = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let screen_h = frames.iter().map(|f| f.height()).max().unwrap_or(1);

    let palette: Vec<u8> = CLIP_PALETTE.iter().flatten().copied().collect();

    let name = format!("{}_clip_{}.gif", FILE_PREFIX, unix_timestamp());
    let out = BufWriter::new(File::create(dir.join(&name))?);
    let mut encoder = gif::Encoder::new(out, screen_w as u16, screen_h as u16, &palette)?;
    encoder.set_repeat(gif::Repeat::Infinite)?;

    for src in frames {
        let (w, h) = src.dimensions();
        let indices: Vec<u8> = src
            .pixels()
            .map(|px| nearest_palette_index(px[0], px[1], px[2]))
            .collect();

        let mut frame = gif::Frame::default();
        frame.width = w as u16;
        frame.height = h as u16;
        frame.delay = CLIP_FRAME_DELAY;
        frame.buffer = Cow::Owned(indices);
        encoder.write_frame(&frame)?;
    }

    debug!("clip written to {} ({} frames)", name, frames.len());
    Ok(Some(name))
}
