//! Thumbnails of saved screenshots.

use std::path::Path;

use image::imageops;
use image::RgbaImage;
use snapzone_common::error::{SnapError, SnapResult};

/// Size of `width x height` scaled to fit in a `max_side` square. Never
/// upscales; each side is at least 1.
pub fn preview_size(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || longest == 0 {
        return (width.max(1), height.max(1));
    }
    let scale = |side: u32| ((side as u64 * max_side as u64) / longest as u64).max(1) as u32;
    (scale(width), scale(height))
}

/// Decode the PNG at `path` and shrink it to fit in `max_side`.
pub fn load_preview(path: &Path, max_side: u32) -> SnapResult<RgbaImage> {
    let image = image::open(path)
        .map_err(|e| {
            SnapError::Io(std::io::Error::other(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        })?
        .to_rgba8();
    let (width, height) = preview_size(image.width(), image.height(), max_side);
    if (width, height) == image.dimensions() {
        return Ok(image);
    }
    Ok(imageops::thumbnail(&image, width, height))
}
