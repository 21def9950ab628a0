//! SnapZone platform core contracts.
//!
//! This crate contains cross-platform display geometry used by the capture
//! engine and the selection overlay without coupling to a concrete OS
//! backend. All coordinates are physical pixels in the virtual desktop.

use serde::{Deserialize, Serialize};

pub mod layout;

pub use layout::*;

/// Screen size assumed when nothing better is known.
pub const FALLBACK_SCREEN_SIZE: (u32, u32) = (1920, 1080);

/// An axis-aligned rectangle in virtual-desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges. Inverted edges give an empty rect.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left: clamp_i32(left),
            top: clamp_i32(top),
            width: (right - left).clamp(0, u32::MAX as i64) as u32,
            height: (bottom - top).clamp(0, u32::MAX as i64) as u32,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Half-open containment: `[left, right) x [top, bottom)`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.left as i64 && x < self.right() && y >= self.top as i64 && y < self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &ScreenRect) -> ScreenRect {
        ScreenRect::from_edges(
            (self.left as i64).min(other.left as i64),
            (self.top as i64).min(other.top as i64),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Overlapping area, if any.
    pub fn intersection(&self, other: &ScreenRect) -> Option<ScreenRect> {
        let rect = ScreenRect::from_edges(
            (self.left as i64).max(other.left as i64),
            (self.top as i64).max(other.top as i64),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        (!rect.is_empty()).then_some(rect)
    }
}

impl std::fmt::Display for ScreenRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}@{},{}",
            self.width, self.height, self.left, self.top
        )
    }
}

/// Information about a connected display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Display {
    /// Platform identifier (or enumeration index when the platform has none).
    pub id: u32,
    /// Human-readable name.
    pub name: String,
    /// Position in the virtual desktop (pixels).
    pub left: i32,
    pub top: i32,
    /// Resolution in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Whether this display is primary.
    pub primary: bool,
    /// Usable area excluding taskbars and docks. Equals the display rect
    /// when the platform does not report one.
    pub work_area: ScreenRect,
    /// Scale factor (for example 1.0, 1.25, 2.0).
    pub scale_factor: f64,
}

impl Display {
    /// A display whose work area is its full rect.
    pub fn new(id: u32, name: impl Into<String>, rect: ScreenRect, primary: bool) -> Self {
        Self {
            id,
            name: name.into(),
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
            primary,
            work_area: rect,
            scale_factor: 1.0,
        }
    }

    pub fn rect(&self) -> ScreenRect {
        ScreenRect::new(self.left, self.top, self.width, self.height)
    }

    /// Half-open containment test in virtual-desktop pixels.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect().contains(x, y)
    }
}

/// Name used for displays the platform does not name.
pub fn default_display_name(index: usize, primary: bool) -> String {
    if primary {
        format!("Display {} (primary)", index + 1)
    } else {
        format!("Display {}", index + 1)
    }
}

/// Compute virtual desktop bounds that include all displays.
///
/// An empty list yields the fallback screen at the origin.
pub fn virtual_desktop_bounds(displays: &[Display]) -> ScreenRect {
    let mut rects = displays.iter().map(Display::rect);
    let Some(first) = rects.next() else {
        return ScreenRect::new(0, 0, FALLBACK_SCREEN_SIZE.0, FALLBACK_SCREEN_SIZE.1);
    };
    rects.fold(first, |acc, rect| acc.union(&rect))
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
