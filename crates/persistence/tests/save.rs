use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use snapzone_common::config::QualityPreset;
use snapzone_persistence::{load_preview, save, save_to};

fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("snapzone_test_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
    })
}

fn leftover_temp_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect()
}

#[test]
fn low_preset_keeps_dimensions_and_creates_directory() {
    let dir = test_dir("save_low").join("nested");
    let image = gradient(640, 480);

    let saved = save(&image, QualityPreset::Low, &dir, "screenshot_").unwrap();

    assert!(saved.path.is_absolute());
    assert!(saved.path.starts_with(&dir));
    let name = saved.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("screenshot_"), "{name}");
    assert!(name.ends_with(".png"), "{name}");
    assert_eq!((saved.width, saved.height), (640, 480));

    let decoded = image::open(&saved.path).unwrap().to_rgba8();
    assert_eq!(decoded, image);
    assert_eq!(std::fs::metadata(&saved.path).unwrap().len(), saved.bytes);
    assert!(leftover_temp_files(&dir).is_empty());

    std::fs::remove_dir_all(dir.parent().unwrap()).ok();
}

#[test]
fn medium_preset_downscales_wide_capture() {
    let dir = test_dir("save_medium");
    let saved = save(&gradient(3000, 2000), QualityPreset::Medium, &dir, "shot_").unwrap();

    assert_eq!((saved.width, saved.height), (2048, 1365));
    let decoded = image::open(&saved.path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (2048, 1365));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn back_to_back_saves_never_overwrite() {
    let dir = test_dir("save_twice");
    let image = gradient(32, 32);
    let first = save(&image, QualityPreset::High, &dir, "s_").unwrap();
    let second = save(&image, QualityPreset::High, &dir, "s_").unwrap();
    assert_ne!(first.path, second.path);
    assert!(first.path.exists() && second.path.exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn failed_write_leaves_no_partial_file() {
    let dir = test_dir("save_fail");
    std::fs::create_dir_all(&dir).unwrap();
    // A directory squatting on the target name makes the rename fail.
    let target = dir.join("blocked.png");
    std::fs::create_dir_all(target.join("inner")).unwrap();

    let err = save_to(&gradient(16, 16), QualityPreset::Low, &target).unwrap_err();
    assert!(
        matches!(err, snapzone_common::error::SnapError::Write { .. }),
        "got {err:?}"
    );
    assert!(leftover_temp_files(&dir).is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn saved_capture_reads_back_as_preview() {
    let dir = test_dir("save_preview");
    let saved = save(&gradient(1200, 600), QualityPreset::High, &dir, "shot_").unwrap();

    let preview = load_preview(&saved.path, 240).unwrap();
    assert_eq!(preview.dimensions(), (240, 120));

    std::fs::remove_dir_all(&dir).ok();
}
