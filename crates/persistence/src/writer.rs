//! Encoding and atomic writes.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use snapzone_capture_engine::CaptureEngine;
use snapzone_common::config::QualityPreset;
use snapzone_common::error::{SnapError, SnapResult};

use crate::naming::unique_path;
use crate::preset::PresetParams;

/// A screenshot written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Absolute path of the final file.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Size on disk.
    pub bytes: u64,
}

impl SavedImage {
    /// `"W x H, size"` summary for status lines.
    pub fn summary(&self) -> String {
        format!("{} x {}, {}", self.width, self.height, format_size(self.bytes))
    }
}

/// Human-readable file size: megabytes from 1 MB up, kilobytes below.
pub fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1.0 {
        format!("{mb:.2} MB")
    } else {
        format!("{kb:.1} KB")
    }
}

/// Apply the preset's resize rule.
pub fn apply_preset<'a>(image: &'a RgbaImage, params: &PresetParams) -> Cow<'a, RgbaImage> {
    let (width, height) = image.dimensions();
    let (new_width, new_height) = params.scaled_size(width, height);
    if (new_width, new_height) == (width, height) {
        return Cow::Borrowed(image);
    }
    tracing::debug!(
        width,
        height,
        new_width,
        new_height,
        "Downscaling screenshot for preset"
    );
    Cow::Owned(imageops::resize(
        image,
        new_width,
        new_height,
        FilterType::Lanczos3,
    ))
}

/// Encode RGBA pixels as PNG in memory.
pub fn encode_png(image: &RgbaImage, compression: CompressionType) -> SnapResult<Vec<u8>> {
    let mut buffer = Vec::new();
    PngEncoder::new_with_quality(&mut buffer, compression, PngFilter::Adaptive)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| SnapError::encode(e.to_string()))?;
    Ok(buffer)
}

/// Save `image` under a fresh name in `directory`.
pub fn save(
    image: &RgbaImage,
    preset: QualityPreset,
    directory: &Path,
    prefix: &str,
) -> SnapResult<SavedImage> {
    let directory = absolute(directory)?;
    fs::create_dir_all(&directory)
        .map_err(|e| SnapError::write(&directory, format!("cannot create directory: {e}")))?;
    let path = unique_path(&directory, prefix, &chrono::Local::now());
    save_to(image, preset, &path)
}

/// Save `image` at exactly `path`, replacing any existing file.
pub fn save_to(image: &RgbaImage, preset: QualityPreset, path: &Path) -> SnapResult<SavedImage> {
    let params = PresetParams::for_preset(preset);
    let prepared = apply_preset(image, &params);
    let encoded = encode_png(&prepared, params.compression)?;

    let path = absolute(path)?;
    write_atomically(&path, &encoded)?;

    let saved = SavedImage {
        path,
        width: prepared.width(),
        height: prepared.height(),
        bytes: encoded.len() as u64,
    };
    tracing::info!(
        path = %saved.path.display(),
        preset = preset.as_str(),
        compression_level = params.level,
        width = saved.width,
        height = saved.height,
        size = %format_size(saved.bytes),
        "Screenshot saved"
    );
    Ok(saved)
}

/// Capture a whole display (or every display) and save it without any
/// interactive selection.
pub fn capture_display_to_file(
    engine: &CaptureEngine,
    display_index: Option<usize>,
    preset: QualityPreset,
    directory: &Path,
    prefix: &str,
) -> SnapResult<SavedImage> {
    let layout = engine.enumerate_displays();
    let capture = match display_index {
        Some(index) => engine.capture_display_index(&layout, index)?,
        None => engine.capture_all(&layout)?,
    };
    save(&capture.image, preset, directory, prefix)
}

/// Write through a hidden temp file in the same directory, then rename.
fn write_atomically(path: &Path, contents: &[u8]) -> SnapResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| SnapError::write(path, "path has no parent directory"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| SnapError::write(path, "path has no file name"))?
        .to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(SnapError::write(path, e.to_string()));
    }
    Ok(())
}

fn absolute(path: &Path) -> SnapResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}
