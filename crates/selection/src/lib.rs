//! SnapZone Selection
//!
//! Drives the full-virtual-screen overlay: maps overlay coordinates onto the
//! frozen capture buffer, runs the drag gesture state machine, and hides and
//! restores the host window around each session.

pub mod controller;
pub mod events;
pub mod geometry;
pub mod handle;
pub mod host;

pub use controller::*;
pub use events::*;
pub use geometry::*;
pub use handle::*;
pub use host::*;
