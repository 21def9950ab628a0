//! Input routed to the selection controller.

/// Where an input event was delivered.
///
/// Cancel input is honoured on every channel; whichever arrives first ends
/// the session and the rest are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChannel {
    OverlayWindow,
    Canvas,
    HostWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    Escape,
    Other,
}

/// Pointer coordinates are overlay-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    PointerDown { x: i32, y: i32 },
    PointerMove { x: i32, y: i32 },
    PointerUp { x: i32, y: i32 },
    SecondaryButton { channel: InputChannel },
    Key { channel: InputChannel, key: OverlayKey },
    CloseRequested { channel: InputChannel },
}
