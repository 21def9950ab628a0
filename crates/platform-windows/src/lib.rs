//! Windows platform integration.
//!
//! Monitor enumeration goes through `EnumDisplayMonitors`, the virtual
//! screen comes from the `SM_*VIRTUALSCREEN` metrics and pixels are copied
//! with a GDI `BitBlt` into a top-down 32bpp DIB. On other targets every
//! entry point reports `Unsupported`.

use image::RgbaImage;
use snapzone_common::error::SnapResult;
use snapzone_platform_core::{Display, ScreenRect};

#[cfg(windows)]
mod win32;

/// Detect monitors via Win32.
pub fn detect_monitors() -> SnapResult<Vec<Display>> {
    #[cfg(windows)]
    {
        win32::detect_monitors()
    }
    #[cfg(not(windows))]
    {
        Err(snapzone_common::error::SnapError::unsupported(
            "Win32 monitor enumeration is only available on Windows",
        ))
    }
}

/// The virtual screen as reported by the system metrics.
pub fn virtual_screen() -> Option<ScreenRect> {
    #[cfg(windows)]
    {
        win32::virtual_screen()
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Size of the primary screen, used when monitor enumeration fails.
pub fn primary_screen_size() -> Option<(u32, u32)> {
    #[cfg(windows)]
    {
        win32::primary_screen_size()
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Current cursor position in virtual-desktop pixels.
pub fn cursor_position() -> Option<(i32, i32)> {
    #[cfg(windows)]
    {
        win32::cursor_position()
    }
    #[cfg(not(windows))]
    {
        None
    }
}

/// Copy `rect` of the desktop into an RGBA image.
pub fn blit_rect(rect: &ScreenRect) -> SnapResult<RgbaImage> {
    #[cfg(windows)]
    {
        win32::blit_rect(rect)
    }
    #[cfg(not(windows))]
    {
        Err(snapzone_common::error::SnapError::unsupported(format!(
            "GDI copy of {rect} is only available on Windows"
        )))
    }
}

/// Swap a BGRA buffer to RGBA in place and force every pixel opaque.
///
/// GDI leaves the alpha byte undefined for screen copies.
pub fn bgra_to_rgba_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
        px[3] = 255;
    }
}

/// Trim a NUL-terminated UTF-16 device name.
pub fn device_name_from_wide(raw: &[u16]) -> String {
    let end = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    String::from_utf16_lossy(&raw[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_swap_sets_alpha() {
        let mut pixels = vec![1, 2, 3, 0, 9, 8, 7, 128];
        bgra_to_rgba_in_place(&mut pixels);
        assert_eq!(pixels, vec![3, 2, 1, 255, 7, 8, 9, 255]);
    }

    #[test]
    fn device_name_stops_at_nul() {
        let mut raw = [0u16; 32];
        for (slot, c) in raw.iter_mut().zip(r"\\.\DISPLAY1".encode_utf16()) {
            *slot = c;
        }
        assert_eq!(device_name_from_wide(&raw), r"\\.\DISPLAY1");
    }

    #[cfg(not(windows))]
    #[test]
    fn non_windows_targets_report_unsupported() {
        assert!(detect_monitors().is_err());
        assert!(virtual_screen().is_none());
        assert!(cursor_position().is_none());
        assert!(blit_rect(&ScreenRect::new(0, 0, 10, 10)).is_err());
    }
}
