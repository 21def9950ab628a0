use image::RgbaImage;
use snapzone_common::error::SnapResult;
use snapzone_platform_core::{Display, ScreenRect};
use snapzone_platform_windows as platform_windows;

use crate::backend::{CaptureBackend, PortableBackend};

/// Win32 backend: GDI copies for fast paths, xcap for the generic grab.
pub struct WindowsBackend {
    portable: PortableBackend,
}

impl WindowsBackend {
    pub fn new() -> Self {
        Self {
            portable: PortableBackend::new(),
        }
    }
}

impl Default for WindowsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for WindowsBackend {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn detect_displays(&self) -> SnapResult<Vec<Display>> {
        platform_windows::detect_monitors()
    }

    fn reported_virtual_screen(&self) -> Option<ScreenRect> {
        platform_windows::virtual_screen()
    }

    fn fallback_screen_size(&self) -> Option<(u32, u32)> {
        platform_windows::primary_screen_size()
    }

    fn pointer_position(&self) -> Option<(i32, i32)> {
        platform_windows::cursor_position()
    }

    fn grab_virtual_screen(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        platform_windows::blit_rect(rect)
    }

    fn grab_display(&self, display: &Display) -> SnapResult<RgbaImage> {
        platform_windows::blit_rect(&display.rect())
    }

    fn grab_region(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        self.portable.grab_region(rect)
    }
}
