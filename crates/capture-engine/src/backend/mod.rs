use image::RgbaImage;
use snapzone_common::error::{SnapError, SnapResult};
use snapzone_platform_core::{Display, ScreenRect};

/// Abstract interface for platform-specific capture capabilities.
///
/// Every backend must provide `grab_region`, the generic primitive the
/// engine falls back to. `grab_virtual_screen` and `grab_display` are
/// optional fast paths.
pub trait CaptureBackend: Send {
    /// Short identifier for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Enumerate connected displays in platform order.
    fn detect_displays(&self) -> SnapResult<Vec<Display>>;

    /// The platform's own virtual-screen rect, when it reports one.
    fn reported_virtual_screen(&self) -> Option<ScreenRect> {
        None
    }

    /// Screen size to assume when enumeration fails.
    fn fallback_screen_size(&self) -> Option<(u32, u32)> {
        None
    }

    /// Current pointer position in virtual-desktop pixels.
    fn pointer_position(&self) -> Option<(i32, i32)>;

    /// Fast path: copy the whole virtual screen.
    fn grab_virtual_screen(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        Err(SnapError::unsupported(format!(
            "{} has no virtual-screen fast path for {rect}",
            self.name()
        )))
    }

    /// Fast path: copy a single display.
    fn grab_display(&self, display: &Display) -> SnapResult<RgbaImage> {
        Err(SnapError::unsupported(format!(
            "{} has no per-display fast path for {}",
            self.name(),
            display.name
        )))
    }

    /// Copy an arbitrary rect of the virtual desktop. The result must be
    /// exactly `rect.width x rect.height`.
    fn grab_region(&self, rect: &ScreenRect) -> SnapResult<RgbaImage>;
}

#[cfg(target_os = "linux")]
pub mod linux;
pub mod portable;
#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub use linux::X11Backend;
pub use portable::PortableBackend;
#[cfg(target_os = "windows")]
pub use windows::WindowsBackend;

/// Get the platform-specific backend.
pub fn get_backend() -> Box<dyn CaptureBackend> {
    #[cfg(target_os = "linux")]
    {
        linux::select_backend()
    }
    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsBackend::new())
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Box::new(PortableBackend::new())
    }
}
