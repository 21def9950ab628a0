//! Overlay-to-buffer coordinate mapping and cropping.

use image::{imageops, RgbaImage};
use snapzone_capture_engine::CaptureResult;
use snapzone_common::error::{SnapError, SnapResult};
use snapzone_platform_core::ScreenRect;

/// Smallest committed selection, in pixels, along each axis.
pub const MIN_SELECTION_SIZE: u32 = 10;

/// A drag rectangle in overlay-local pixels, normalized so `x2 >= x1` and
/// `y2 >= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl SelectionRect {
    /// Rectangle spanned by two drag corners, in any order.
    pub fn from_drag(anchor: (i32, i32), current: (i32, i32)) -> Self {
        Self {
            x1: anchor.0.min(current.0),
            y1: anchor.1.min(current.1),
            x2: anchor.0.max(current.0),
            y2: anchor.1.max(current.1),
        }
    }

    pub fn width(&self) -> u32 {
        (self.x2 as i64 - self.x1 as i64) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 as i64 - self.y1 as i64) as u32
    }

    /// Whether the selection is large enough to commit (inclusive).
    pub fn meets_minimum(&self) -> bool {
        self.width() >= MIN_SELECTION_SIZE && self.height() >= MIN_SELECTION_SIZE
    }

    /// `"W x H"` readout shown while dragging.
    pub fn size_label(&self) -> String {
        format!("{} x {}", self.width(), self.height())
    }
}

/// Area of the capture buffer to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Placement of a capture buffer inside the overlay.
///
/// The overlay covers the virtual screen exactly. The buffer is drawn at
/// `image_offset()` and every overlay point maps back through the same
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGeometry {
    pub virtual_screen: ScreenRect,
    pub capture_origin: (i32, i32),
    pub buffer_size: (u32, u32),
}

impl OverlayGeometry {
    pub fn new(virtual_screen: ScreenRect, capture: &CaptureResult) -> Self {
        Self {
            virtual_screen,
            capture_origin: capture.origin,
            buffer_size: capture.image.dimensions(),
        }
    }

    /// Overlay position of the buffer's top-left pixel.
    pub fn image_offset(&self) -> (i64, i64) {
        (
            self.capture_origin.0 as i64 - self.virtual_screen.left as i64,
            self.capture_origin.1 as i64 - self.virtual_screen.top as i64,
        )
    }

    /// Overlay-local point to buffer coordinates (unclamped).
    pub fn overlay_to_buffer(&self, x: i32, y: i32) -> (i64, i64) {
        let (dx, dy) = self.image_offset();
        (x as i64 - dx, y as i64 - dy)
    }

    /// Virtual-screen point to overlay-local coordinates.
    pub fn virtual_to_overlay(&self, x: i32, y: i32) -> (i32, i32) {
        (
            (x as i64 - self.virtual_screen.left as i64) as i32,
            (y as i64 - self.virtual_screen.top as i64) as i32,
        )
    }

    /// Translate `selection` into the buffer and clamp it to
    /// `[0, W] x [0, H]`.
    pub fn crop_region(&self, selection: &SelectionRect) -> SnapResult<CropRegion> {
        let (width, height) = self.buffer_size;
        let (bx1, by1) = self.overlay_to_buffer(selection.x1, selection.y1);
        let (bx2, by2) = self.overlay_to_buffer(selection.x2, selection.y2);

        let x1 = bx1.clamp(0, width as i64);
        let y1 = by1.clamp(0, height as i64);
        let x2 = bx2.clamp(0, width as i64);
        let y2 = by2.clamp(0, height as i64);

        if x2 <= x1 || y2 <= y1 {
            return Err(SnapError::InvalidCropRegion {
                x: bx1,
                y: by1,
                width: x2 - x1,
                height: y2 - y1,
                buffer_width: width,
                buffer_height: height,
            });
        }

        Ok(CropRegion {
            x: x1 as u32,
            y: y1 as u32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }
}

/// Copy `region` out of `image`.
pub fn crop(image: &RgbaImage, region: &CropRegion) -> RgbaImage {
    imageops::crop_imm(image, region.x, region.y, region.width, region.height).to_image()
}
