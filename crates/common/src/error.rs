//! Error types shared across SnapZone crates.

use std::path::PathBuf;

/// Top-level error type for SnapZone operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("Display enumeration error: {message}")]
    Enumeration { message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error(
        "Selection ({x},{y} {width}x{height}) is empty inside the {buffer_width}x{buffer_height} capture"
    )]
    InvalidCropRegion {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        buffer_width: u32,
        buffer_height: u32,
    },

    #[error("Image encoding failed: {message}")]
    Encode { message: String },

    #[error("Failed to write {}: {}", .path.display(), .message)]
    Write { path: PathBuf, message: String },

    #[error("Platform error: {message}")]
    Platform { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SnapError.
pub type SnapResult<T> = Result<T, SnapError>;

impl SnapError {
    pub fn enumeration(msg: impl Into<String>) -> Self {
        Self::Enumeration {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Write {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_crop_message_names_buffer_size() {
        let err = SnapError::InvalidCropRegion {
            x: 1920,
            y: 0,
            width: 0,
            height: 40,
            buffer_width: 1920,
            buffer_height: 1080,
        };
        let text = err.to_string();
        assert!(text.contains("1920x1080"));
        assert!(text.contains("0x40"));
    }
}
