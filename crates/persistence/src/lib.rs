//! SnapZone Persistence
//!
//! Applies a quality preset to a captured image, encodes it as PNG and
//! writes it under a generated, timestamped name. Saved files can be read
//! back as small previews.

pub mod naming;
pub mod preset;
pub mod preview;
pub mod writer;

pub use naming::*;
pub use preset::*;
pub use preview::*;
pub use writer::*;
