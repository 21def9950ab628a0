//! SnapZone Capture Engine
//!
//! Enumerates displays and freezes the virtual desktop (or one display) into
//! an RGBA buffer tagged with the virtual-screen origin it was taken at.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                CaptureEngine                 │
//! │  enumerate_displays ──► DisplayLayout        │
//! │  capture_for_mode   ──► CaptureSnapshot      │
//! │        │                                     │
//! │        ▼                                     │
//! │  ┌─────────────────────────────────────────┐ │
//! │  │      Box<dyn CaptureBackend>            │ │
//! │  │  win32 (GDI)  │  x11 (RandR, GetImage)  │ │
//! │  │        portable (xcap compositing)      │ │
//! │  └─────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod displays;
pub mod engine;

pub use backend::{get_backend, CaptureBackend};
pub use displays::enumerate_displays;
pub use engine::*;
