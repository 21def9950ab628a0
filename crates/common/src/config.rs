//! Application configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SnapError, SnapResult};

/// Global application configuration.
///
/// Keys missing from the file take their default values, so configs written
/// by older versions keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where screenshots are written.
    pub save_directory: PathBuf,

    /// Prefix of generated file names.
    pub file_prefix: String,

    /// Encoder preset applied on save.
    pub quality_preset: QualityPreset,

    /// Which displays an area capture freezes.
    pub screenshot_mode: ScreenshotMode,

    /// Copy the saved path to the clipboard after a capture.
    pub auto_copy_path: bool,

    /// Show a thumbnail of the last saved screenshot.
    pub show_preview: bool,

    /// Text placed in front of the path on the clipboard.
    #[serde(alias = "custom_prefix")]
    pub clipboard_prefix: String,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "snapzone=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

/// Named bundle of encoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// Smallest files: maximum compression, never resized.
    #[default]
    Low,
    /// Balanced: default compression, wide captures are scaled down.
    Medium,
    /// Largest files: light compression, only very wide captures are scaled.
    High,
}

/// Capture scope used when an area screenshot starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotMode {
    /// Freeze every display.
    #[default]
    Auto,
    /// Freeze only the display under the pointer.
    Mouse,
    /// Freeze every display.
    All,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl ScreenshotMode {
    pub const ALL: [ScreenshotMode; 3] = [Self::Auto, Self::Mouse, Self::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Mouse => "mouse",
            Self::All => "all",
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ScreenshotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown quality preset '{s}' (expected low, medium or high)"))
    }
}

impl FromStr for ScreenshotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown screenshot mode '{s}' (expected auto, mouse or all)"))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            file_prefix: "screenshot_".to_string(),
            quality_preset: QualityPreset::default(),
            screenshot_mode: ScreenshotMode::default(),
            auto_copy_path: true,
            show_preview: true,
            clipboard_prefix: "read image: ".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {e}");
                Self::default()
            }
        }
    }

    /// Strict load: a missing file gives defaults, anything unreadable or
    /// malformed is an error.
    pub fn try_load_from(path: &Path) -> SnapResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            SnapError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| SnapError::config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to `path` as pretty-printed JSON.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("snapzone").join("config.json")
}

/// Default screenshot directory.
fn default_save_directory() -> PathBuf {
    home_dir().join("Screenshots")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir())
}
