//! X11 session: RandR monitors, pointer position and root-window grabs.

use image::RgbaImage;
use snapzone_common::error::{SnapError, SnapResult};
use snapzone_platform_core::{default_display_name, Display, ScreenRect};
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as _;
use x11rb::protocol::xproto::{ConnectionExt as _, ImageFormat, Window};
use x11rb::rust_connection::RustConnection;

use crate::display::bgrx_to_rgba;

/// An open connection to the X server plus its root window.
pub struct X11Session {
    conn: RustConnection,
    root: Window,
    root_width: u16,
    root_height: u16,
    root_depth: u8,
}

impl X11Session {
    /// Connect to the display named by `$DISPLAY`.
    pub fn connect() -> SnapResult<Self> {
        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| SnapError::platform(format!("X11 connection failed: {e}")))?;
        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| SnapError::platform(format!("X11 screen {screen_num} not found")))?;
        let (root, root_width, root_height, root_depth) = (
            screen.root,
            screen.width_in_pixels,
            screen.height_in_pixels,
            screen.root_depth,
        );
        tracing::debug!(
            screen_num,
            root_width,
            root_height,
            root_depth,
            "Connected to X server"
        );
        Ok(Self {
            conn,
            root,
            root_width,
            root_height,
            root_depth,
        })
    }

    /// The root window extent. X11 roots always start at the origin.
    pub fn root_rect(&self) -> ScreenRect {
        ScreenRect::new(0, 0, self.root_width as u32, self.root_height as u32)
    }

    /// Active monitors reported by RandR.
    pub fn monitors(&self) -> SnapResult<Vec<Display>> {
        let reply = self
            .conn
            .randr_get_monitors(self.root, true)
            .map_err(platform_err)?
            .reply()
            .map_err(|e| SnapError::enumeration(format!("RandR GetMonitors failed: {e}")))?;

        let mut displays = Vec::with_capacity(reply.monitors.len());
        for (index, monitor) in reply.monitors.iter().enumerate() {
            let name = self
                .atom_name(monitor.name)
                .unwrap_or_else(|| default_display_name(index, monitor.primary));
            displays.push(Display::new(
                index as u32,
                name,
                ScreenRect::new(
                    monitor.x as i32,
                    monitor.y as i32,
                    monitor.width as u32,
                    monitor.height as u32,
                ),
                monitor.primary,
            ));
        }
        Ok(displays)
    }

    /// Pointer position relative to the root window.
    pub fn pointer_position(&self) -> SnapResult<(i32, i32)> {
        let reply = self
            .conn
            .query_pointer(self.root)
            .map_err(platform_err)?
            .reply()
            .map_err(platform_err)?;
        Ok((reply.root_x as i32, reply.root_y as i32))
    }

    /// Copy `rect` of the root window into an RGBA image.
    ///
    /// The rect is clipped to the root; parts outside it are left black.
    pub fn grab(&self, rect: &ScreenRect) -> SnapResult<RgbaImage> {
        let mut canvas = RgbaImage::from_pixel(
            rect.width.max(1),
            rect.height.max(1),
            image::Rgba([0, 0, 0, 255]),
        );
        let Some(visible) = rect.intersection(&self.root_rect()) else {
            return Ok(canvas);
        };

        if self.root_depth != 24 && self.root_depth != 32 {
            return Err(SnapError::unsupported(format!(
                "X11 root depth {} is not supported",
                self.root_depth
            )));
        }

        let reply = self
            .conn
            .get_image(
                ImageFormat::Z_PIXMAP,
                self.root,
                visible.left as i16,
                visible.top as i16,
                visible.width as u16,
                visible.height as u16,
                !0,
            )
            .map_err(|e| SnapError::capture(format!("X11 GetImage request failed: {e}")))?
            .reply()
            .map_err(|e| SnapError::capture(format!("X11 GetImage failed: {e}")))?;

        let pixels = bgrx_to_rgba(&reply.data, visible.width, visible.height).ok_or_else(|| {
            SnapError::capture(format!(
                "X11 GetImage returned {} bytes for a {}x{} area",
                reply.data.len(),
                visible.width,
                visible.height
            ))
        })?;

        if visible == *rect {
            return Ok(pixels);
        }
        image::imageops::replace(
            &mut canvas,
            &pixels,
            (visible.left as i64) - (rect.left as i64),
            (visible.top as i64) - (rect.top as i64),
        );
        Ok(canvas)
    }

    fn atom_name(&self, atom: u32) -> Option<String> {
        let reply = self.conn.get_atom_name(atom).ok()?.reply().ok()?;
        let name = String::from_utf8_lossy(&reply.name).trim().to_string();
        (!name.is_empty()).then_some(name)
    }
}

fn platform_err(e: impl std::fmt::Display) -> SnapError {
    SnapError::platform(format!("X11 request failed: {e}"))
}
