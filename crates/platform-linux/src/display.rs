//! Display server detection and pixel conversion helpers.

use image::RgbaImage;

/// Display server type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    X11,
    Unknown,
}

impl DisplayServer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wayland => "wayland",
            Self::X11 => "x11",
            Self::Unknown => "unknown",
        }
    }
}

/// Detect the current display server.
pub fn detect_display_server() -> DisplayServer {
    display_server_from_env(
        std::env::var_os("WAYLAND_DISPLAY").is_some(),
        std::env::var_os("DISPLAY").is_some(),
    )
}

fn display_server_from_env(wayland: bool, x11: bool) -> DisplayServer {
    if wayland {
        DisplayServer::Wayland
    } else if x11 {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// Convert a tightly packed 32-bit BGRX buffer into an opaque RGBA image.
///
/// Returns `None` when `data` is shorter than `width * height * 4`.
pub fn bgrx_to_rgba(data: &[u8], width: u32, height: u32) -> Option<RgbaImage> {
    let expected = width as usize * height as usize * 4;
    if data.len() < expected {
        return None;
    }

    let mut rgba = Vec::with_capacity(expected);
    for px in data[..expected].chunks_exact(4) {
        rgba.extend_from_slice(&[px[2], px[1], px[0], 255]);
    }
    RgbaImage::from_raw(width, height, rgba)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wayland_wins_over_xwayland_display() {
        assert_eq!(display_server_from_env(true, true), DisplayServer::Wayland);
        assert_eq!(display_server_from_env(false, true), DisplayServer::X11);
        assert_eq!(display_server_from_env(false, false), DisplayServer::Unknown);
    }

    #[test]
    fn bgrx_pixels_become_opaque_rgba() {
        let data = [10, 20, 30, 0, 1, 2, 3, 99];
        let image = bgrx_to_rgba(&data, 2, 1).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [30, 20, 10, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [3, 2, 1, 255]);
    }

    #[test]
    fn short_buffer_is_rejected() {
        assert!(bgrx_to_rgba(&[0; 7], 2, 1).is_none());
    }
}
