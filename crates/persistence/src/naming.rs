//! Screenshot file names.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Timestamp format used in generated names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{prefix}{YYYYMMDD_HHMMSS}.png`
pub fn file_name(prefix: &str, at: &DateTime<Local>) -> String {
    format!("{prefix}{}.png", at.format(TIMESTAMP_FORMAT))
}

/// First free path in `directory` for a capture taken at `at`.
///
/// Two captures within the same second get `_1`, `_2`, ... suffixes.
pub fn unique_path(directory: &Path, prefix: &str, at: &DateTime<Local>) -> PathBuf {
    let name = file_name(prefix, at);
    let candidate = directory.join(&name);
    if !candidate.exists() {
        return candidate;
    }
    let stem = name.strip_suffix(".png").unwrap_or(&name);
    (1u32..)
        .map(|n| directory.join(format!("{stem}_{n}.png")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn name_uses_prefix_and_timestamp() {
        assert_eq!(
            file_name("screenshot_", &fixed_time()),
            "screenshot_20240309_070502.png"
        );
        assert_eq!(file_name("", &fixed_time()), "20240309_070502.png");
    }

    #[test]
    fn collisions_get_numbered_suffix() {
        let dir = std::env::temp_dir().join("snapzone_test_naming");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let first = unique_path(&dir, "shot_", &fixed_time());
        assert_eq!(first, dir.join("shot_20240309_070502.png"));
        std::fs::write(&first, b"x").unwrap();

        let second = unique_path(&dir, "shot_", &fixed_time());
        assert_eq!(second, dir.join("shot_20240309_070502_1.png"));
        std::fs::write(&second, b"x").unwrap();

        assert_eq!(
            unique_path(&dir, "shot_", &fixed_time()),
            dir.join("shot_20240309_070502_2.png")
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
