use image::RgbaImage;
use snapzone_common::error::SnapResult;
use snapzone_platform_core::{Display, ScreenRect};
use snapzone_platform_linux::x11::X11Session;
use snapzone_platform_linux::{detect_display_server, DisplayServer};

use crate::backend::{CaptureBackend, PortableBackend};

/// X11 backend: RandR for layout, root-window GetImage for fast paths.
pub struct X11Backend {
    session: X11Session,
    portable: PortableBackend,
}

impl X11Backend {
    pub fn connect() -> SnapResult<Self> {
        Ok(Self {
            session: X11Session::connect()?,
            portable: PortableBackend::new(),
        })
    }
}

/// Use X11 directly on a plain X session, xcap everywhere else.
pub(crate) fn select_backend() -> Box<dyn CaptureBackend> {
    let server = detect_display_server();
    tracing::info!(display_server = server.as_str(), "Detected display server");

    if server == DisplayServer::X11 {
        match X11Backend::connect() {
            Ok(backend) => return Box::new(backend),
            Err(e) => tracing::warn!("X11 backend unavailable, using xcap: {e}"),
        }
    }
    Box::new(PortableBackend::new())
}

impl CaptureBackend for X11Backend {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn detect_displays(&self) -> SnapResult<Vec<Display>> {
        self.session.monitors()
    }

    fn reported_virtual_screen(&self) -> Option<ScreenRect> {
        Some(self.session.root_rect())
    }

    fn fallback_screen_size(&self) -> Option<(u32, u32)> {
        let root = self.session.root_rect();
        Some((root.width, root.height))
    }

    fn pointer_position(&self) -> Option<(i32, i32)> {
        self.session
            .pointer_position()
            .map_err(|e| tracing::debug!("Pointer query failed: {e}"))
            .ok()
    }

    fn grab_virtual_screen(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        self.session.grab(rect)
    }

    fn grab_display(&self, display: &Display) -> SnapResult<RgbaImage> {
        self.session.grab(&display.rect())
    }

    fn grab_region(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        self.portable.grab_region(rect)
    }
}
