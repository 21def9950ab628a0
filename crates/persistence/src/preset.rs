//! Quality preset parameters.

use image::codecs::png::CompressionType;
use snapzone_common::config::QualityPreset;

/// Downscale rule: images wider than `threshold` are scaled to `max_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRule {
    pub threshold: u32,
    pub max_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetParams {
    pub compression: CompressionType,
    /// zlib-style level the compression type corresponds to (for reports).
    pub level: u8,
    pub resize: Option<ResizeRule>,
}

impl PresetParams {
    pub fn for_preset(preset: QualityPreset) -> Self {
        match preset {
            QualityPreset::Low => Self {
                compression: CompressionType::Best,
                level: 9,
                resize: None,
            },
            QualityPreset::Medium => Self {
                compression: CompressionType::Default,
                level: 6,
                resize: Some(ResizeRule {
                    threshold: 2560,
                    max_width: 2048,
                }),
            },
            QualityPreset::High => Self {
                compression: CompressionType::Fast,
                level: 3,
                resize: Some(ResizeRule {
                    threshold: 4096,
                    max_width: 3840,
                }),
            },
        }
    }

    /// Output size for a `width x height` input.
    ///
    /// Aspect ratio is kept with `new_h = floor(h * max_width / w)`, never
    /// below one pixel.
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        match self.resize {
            Some(rule) if width > rule.threshold => {
                let new_height = (height as u64 * rule.max_width as u64) / width as u64;
                (rule.max_width, new_height.max(1) as u32)
            }
            _ => (width, height),
        }
    }
}
