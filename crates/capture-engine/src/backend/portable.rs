//! Portable backend built on xcap's per-monitor capture.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use snapzone_common::error::{SnapError, SnapResult};
use snapzone_platform_core::{default_display_name, Display, ScreenRect};
use xcap::Monitor;

use crate::backend::CaptureBackend;

pub struct PortableBackend;

impl PortableBackend {
    pub fn new() -> Self {
        Self
    }

    fn monitors() -> SnapResult<Vec<Monitor>> {
        Monitor::all().map_err(|e| SnapError::enumeration(format!("xcap enumeration failed: {e}")))
    }
}

impl Default for PortableBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn monitor_rect(monitor: &Monitor) -> Option<ScreenRect> {
    Some(ScreenRect::new(
        monitor.x().ok()?,
        monitor.y().ok()?,
        monitor.width().ok()?,
        monitor.height().ok()?,
    ))
}

impl CaptureBackend for PortableBackend {
    fn name(&self) -> &'static str {
        "xcap"
    }

    fn detect_displays(&self) -> SnapResult<Vec<Display>> {
        let monitors = Self::monitors()?;
        let mut displays = Vec::with_capacity(monitors.len());
        for (index, monitor) in monitors.iter().enumerate() {
            let Some(rect) = monitor_rect(monitor) else {
                tracing::warn!(index, "Skipping monitor with unreadable geometry");
                continue;
            };
            let primary = monitor.is_primary().unwrap_or(false);
            let name = monitor
                .name()
                .ok()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| default_display_name(index, primary));
            let mut display = Display::new(
                monitor.id().unwrap_or(index as u32),
                name,
                rect,
                primary,
            );
            display.scale_factor = monitor.scale_factor().map(f64::from).unwrap_or(1.0);
            displays.push(display);
        }
        Ok(displays)
    }

    fn pointer_position(&self) -> Option<(i32, i32)> {
        #[cfg(target_os = "windows")]
        {
            snapzone_platform_windows::cursor_position()
        }
        #[cfg(target_os = "linux")]
        {
            snapzone_platform_linux::x11::X11Session::connect()
                .ok()?
                .pointer_position()
                .ok()
        }
        #[cfg(not(any(target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    fn grab_display(&self, display: &Display) -> SnapResult<RgbaImage> {
        let rect = display.rect();
        let monitor = Self::monitors()?
            .into_iter()
            .find(|m| monitor_rect(m) == Some(rect))
            .ok_or_else(|| SnapError::capture(format!("No monitor at {rect}")))?;
        let image = monitor
            .capture_image()
            .map_err(|e| SnapError::capture(format!("xcap capture failed: {e}")))?;
        Ok(fit_to(image, rect.width, rect.height))
    }

    fn grab_region(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        let mut tiles = Vec::new();
        for monitor in Self::monitors()? {
            let Some(bounds) = monitor_rect(&monitor) else {
                continue;
            };
            if rect.intersection(&bounds).is_none() {
                continue;
            }
            let image = monitor
                .capture_image()
                .map_err(|e| SnapError::capture(format!("xcap capture failed: {e}")))?;
            tiles.push((bounds, image));
        }
        if tiles.is_empty() {
            return Err(SnapError::capture(format!("No monitor overlaps {rect}")));
        }
        Ok(composite_region(rect, tiles))
    }
}

/// Paint per-display captures onto a canvas covering `rect`.
///
/// Tiles whose pixel size differs from their display rect (HiDPI scaling)
/// are resampled first. Uncovered areas stay opaque black.
pub fn composite_region(
    rect: &ScreenRect,
    tiles: impl IntoIterator<Item = (ScreenRect, RgbaImage)>,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(rect.width, rect.height, Rgba([0, 0, 0, 255]));
    for (bounds, image) in tiles {
        let image = fit_to(image, bounds.width, bounds.height);
        imageops::replace(
            &mut canvas,
            &image,
            bounds.left as i64 - rect.left as i64,
            bounds.top as i64 - rect.top as i64,
        );
    }
    canvas
}

fn fit_to(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image;
    }
    tracing::debug!(
        from_width = image.width(),
        from_height = image.height(),
        width,
        height,
        "Resampling monitor capture to display size"
    );
    imageops::resize(&image, width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_land_at_their_virtual_offsets() {
        let rect = ScreenRect::new(-10, 0, 30, 10);
        let left = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let right = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));

        let canvas = composite_region(
            &rect,
            vec![
                (ScreenRect::new(-10, 0, 10, 10), left),
                (ScreenRect::new(10, 0, 10, 10), right),
            ],
        );

        assert_eq!(canvas.dimensions(), (30, 10));
        assert_eq!(canvas.get_pixel(0, 0).0, [255, 0, 0, 255]);
        // Gap between the two tiles.
        assert_eq!(canvas.get_pixel(15, 5).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(29, 9).0, [0, 0, 255, 255]);
    }

    #[test]
    fn hidpi_tile_is_resampled_to_display_rect() {
        let rect = ScreenRect::new(0, 0, 10, 10);
        let doubled = RgbaImage::from_pixel(20, 20, Rgba([0, 255, 0, 255]));
        let canvas = composite_region(&rect, vec![(rect, doubled)]);
        assert_eq!(canvas.dimensions(), (10, 10));
        assert_eq!(canvas.get_pixel(5, 5).0, [0, 255, 0, 255]);
    }
}
