//! SnapZone Linux Platform Integration
//!
//! Platform-specific implementations for Linux:
//! - **Display Server Detection:** X11 versus Wayland sessions
//! - **X11:** RandR monitor enumeration, pointer queries and root-window grabs

pub mod display;
#[cfg(target_os = "linux")]
pub mod x11;

pub use display::*;
