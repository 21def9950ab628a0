//! Host window visibility contract.

/// Visibility of the application's main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostVisibility {
    #[default]
    Visible,
    Minimized,
    Hidden,
}

/// The window that launches captures.
///
/// It is hidden while the screen is frozen and restored to exactly the
/// state it had before, whatever the session outcome.
pub trait HostWindow {
    fn visibility(&self) -> HostVisibility;

    /// Take the window off screen before capturing.
    fn hide(&mut self);

    /// Return to `previous`.
    fn restore(&mut self, previous: HostVisibility);
}

/// A host with no window, for command-line use.
#[derive(Debug, Default)]
pub struct HeadlessHost;

impl HostWindow for HeadlessHost {
    fn visibility(&self) -> HostVisibility {
        HostVisibility::Hidden
    }

    fn hide(&mut self) {}

    fn restore(&mut self, _previous: HostVisibility) {}
}
