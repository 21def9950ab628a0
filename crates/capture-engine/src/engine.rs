//! Capture engine: fast paths with a generic bounding-box fallback.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use snapzone_common::config::ScreenshotMode;
use snapzone_common::error::{SnapError, SnapResult};
use snapzone_platform_core::{Display, DisplayLayout, ScreenRect};

use crate::backend::{get_backend, CaptureBackend};
use crate::displays::{display_list_for_error, enumerate_displays};

/// A captured buffer tagged with where it was taken.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub image: RgbaImage,
    /// Virtual-screen coordinate of the buffer's top-left pixel.
    pub origin: (i32, i32),
}

impl CaptureResult {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Area covered by the buffer in virtual-screen pixels.
    pub fn rect(&self) -> ScreenRect {
        ScreenRect::new(self.origin.0, self.origin.1, self.width(), self.height())
    }
}

/// Capture plus the layout it was taken against.
#[derive(Debug, Clone)]
pub struct CaptureSnapshot {
    pub capture: CaptureResult,
    pub layout: DisplayLayout,
}

pub struct CaptureEngine {
    backend: Box<dyn CaptureBackend>,
}

impl CaptureEngine {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        tracing::debug!(backend = backend.name(), "Capture engine created");
        Self { backend }
    }

    /// Engine over the backend chosen for this platform.
    pub fn with_default_backend() -> Self {
        Self::new(get_backend())
    }

    pub fn backend(&self) -> &dyn CaptureBackend {
        self.backend.as_ref()
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Fresh display layout. Never fails.
    pub fn enumerate_displays(&self) -> DisplayLayout {
        enumerate_displays(self.backend.as_ref())
    }

    /// Capture the whole virtual screen.
    pub fn capture_all(&self, layout: &DisplayLayout) -> SnapResult<CaptureResult> {
        let rect = layout.virtual_screen();
        self.grab_with_fallback(&rect, "virtual screen", |backend| {
            backend.grab_virtual_screen(&rect)
        })
    }

    /// Capture a single display.
    pub fn capture_display(&self, display: &Display) -> SnapResult<CaptureResult> {
        let rect = display.rect();
        self.grab_with_fallback(&rect, &display.name, |backend| {
            backend.grab_display(display)
        })
    }

    /// Capture the display at `index` in layout order.
    pub fn capture_display_index(
        &self,
        layout: &DisplayLayout,
        index: usize,
    ) -> SnapResult<CaptureResult> {
        let display = layout.get(index).ok_or_else(|| {
            SnapError::capture(format!(
                "Invalid display index {index}. Available displays: {}",
                display_list_for_error(layout)
            ))
        })?;
        self.capture_display(display)
    }

    /// Display under the pointer, or the primary display.
    pub fn current_display_under_pointer<'a>(&self, layout: &'a DisplayLayout) -> &'a Display {
        layout.display_under_or_primary(self.backend.pointer_position())
    }

    /// Enumerate displays and capture what `mode` asks for.
    pub fn capture_for_mode(&self, mode: ScreenshotMode) -> SnapResult<CaptureSnapshot> {
        let layout = self.enumerate_displays();
        let capture = match mode {
            ScreenshotMode::Mouse if layout.len() > 1 => {
                let display = self.current_display_under_pointer(&layout);
                let name = &display.name;
                tracing::info!(display = %name, "Capturing display under pointer");
                self.capture_display(display)?
            }
            _ => self.capture_all(&layout)?,
        };
        tracing::info!(
            mode = mode.as_str(),
            width = capture.width(),
            height = capture.height(),
            origin_x = capture.origin.0,
            origin_y = capture.origin.1,
            "Captured screen"
        );
        Ok(CaptureSnapshot { capture, layout })
    }

    fn grab_with_fallback(
        &self,
        rect: &ScreenRect,
        what: &str,
        fast_path: impl FnOnce(&dyn CaptureBackend) -> SnapResult<RgbaImage>,
    ) -> SnapResult<CaptureResult> {
        let origin = (rect.left, rect.top);
        match fast_path(self.backend.as_ref()) {
            Ok(image) if image.dimensions() == (rect.width, rect.height) => {
                return Ok(CaptureResult { image, origin });
            }
            Ok(image) => tracing::warn!(
                target_area = %rect,
                got_width = image.width(),
                got_height = image.height(),
                "Fast-path capture of {what} returned the wrong size; falling back"
            ),
            Err(SnapError::Unsupported { message }) => {
                tracing::debug!("{message}; using bounding-box grab")
            }
            Err(e) => tracing::warn!("Fast-path capture of {what} failed, falling back: {e}"),
        }

        let image = self
            .backend
            .grab_region(rect)
            .map_err(|e| SnapError::capture(format!("Failed to capture {what} ({rect}): {e}")))?;
        let image = if image.dimensions() == (rect.width, rect.height) {
            image
        } else {
            tracing::warn!(
                got_width = image.width(),
                got_height = image.height(),
                "Bounding-box grab of {what} returned the wrong size; resampling"
            );
            imageops::resize(&image, rect.width, rect.height, FilterType::Triangle)
        };
        Ok(CaptureResult { image, origin })
    }
}
