//! Selection session state machine.
//!
//! `Idle -> Preparing -> Armed -> Dragging -> (Committed | Cancelled) -> Idle`
//!
//! `Preparing` covers the gap between hiding the host and the capture
//! landing, which a UI toolkit may need a few frames for.

use std::marker::PhantomData;

use image::RgbaImage;
use snapzone_capture_engine::CaptureSnapshot;
use snapzone_common::error::{SnapError, SnapResult};

use crate::events::{InputChannel, OverlayEvent, OverlayKey};
use crate::geometry::{crop, CropRegion, OverlayGeometry, SelectionRect};
use crate::host::{HostVisibility, HostWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Preparing,
    Armed,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Released below the minimum selection size.
    Degenerate,
    /// Escape on any channel.
    Key(InputChannel),
    SecondaryButton(InputChannel),
    CloseRequest(InputChannel),
    /// Cancelled through a `ControllerHandle`.
    Requested,
}

/// How a session ended. The host has already been restored.
#[derive(Debug)]
pub enum SelectionOutcome {
    Committed {
        image: RgbaImage,
        region: CropRegion,
        selection: SelectionRect,
    },
    Cancelled(CancelReason),
    Failed(SnapError),
}

/// Live rectangle and readout while dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragFeedback {
    pub rect: SelectionRect,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    anchor: (i32, i32),
    current: (i32, i32),
}

impl DragState {
    fn rect(&self) -> SelectionRect {
        SelectionRect::from_drag(self.anchor, self.current)
    }
}

/// State of one capture session, from arm to commit or cancel.
#[derive(Debug)]
pub struct CaptureSession {
    snapshot: CaptureSnapshot,
    geometry: OverlayGeometry,
    drag: Option<DragState>,
}

impl CaptureSession {
    fn new(snapshot: CaptureSnapshot) -> Self {
        let geometry =
            OverlayGeometry::new(snapshot.layout.virtual_screen(), &snapshot.capture);
        Self {
            snapshot,
            geometry,
            drag: None,
        }
    }

    pub fn snapshot(&self) -> &CaptureSnapshot {
        &self.snapshot
    }

    pub fn geometry(&self) -> &OverlayGeometry {
        &self.geometry
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Current drag rectangle, if a drag is in progress.
    pub fn feedback(&self) -> Option<DragFeedback> {
        self.drag.map(|drag| {
            let rect = drag.rect();
            DragFeedback {
                label: rect.size_label(),
                rect,
            }
        })
    }

    /// Hint shown on the overlay.
    pub fn instruction_text(&self) -> String {
        let displays = self.snapshot.layout.len();
        if displays > 1 {
            format!(
                "Drag to select an area on any of the {displays} displays. \
                 Esc or right-click to cancel."
            )
        } else {
            "Drag to select an area. Esc or right-click to cancel.".to_string()
        }
    }
}

/// Drives capture sessions for one host window.
///
/// Lives on the UI thread; other threads reach it through a
/// [`ControllerHandle`](crate::handle::ControllerHandle).
pub struct SelectionController<H: HostWindow> {
    host: H,
    host_before: Option<HostVisibility>,
    session: Option<CaptureSession>,
    _ui_thread: PhantomData<*const ()>,
}

impl<H: HostWindow> SelectionController<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            host_before: None,
            session: None,
            _ui_thread: PhantomData,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.session, self.host_before) {
            (Some(session), _) if session.is_dragging() => SessionPhase::Dragging,
            (Some(_), _) => SessionPhase::Armed,
            (None, Some(_)) => SessionPhase::Preparing,
            (None, None) => SessionPhase::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase() != SessionPhase::Idle
    }

    /// Record the host's visibility and hide it.
    ///
    /// An active session is torn down first; the visibility recorded for it
    /// carries over so the host ends up where it started.
    pub fn prepare(&mut self) {
        if self.is_active() {
            tracing::info!(phase = ?self.phase(), "Superseding active capture session");
            self.session = None;
        } else {
            self.host_before = Some(self.host.visibility());
        }
        self.host.hide();
        tracing::debug!(previous = ?self.host_before, "Host hidden for capture");
    }

    /// Install the capture produced after [`prepare`](Self::prepare).
    ///
    /// A capture error restores the host and is returned unchanged.
    pub fn arm(&mut self, capture: SnapResult<CaptureSnapshot>) -> SnapResult<&CaptureSession> {
        if self.host_before.is_none() {
            self.host_before = Some(self.host.visibility());
        }
        match capture {
            Ok(snapshot) => {
                let session = CaptureSession::new(snapshot);
                tracing::info!(
                    offset = ?session.geometry.image_offset(),
                    overlay = %session.geometry.virtual_screen,
                    "Selection overlay armed"
                );
                let session: &CaptureSession = self.session.insert(session);
                Ok(session)
            }
            Err(e) => {
                tracing::error!("Capture failed, aborting session: {e}");
                self.session = None;
                self.restore_host();
                Err(e)
            }
        }
    }

    /// `prepare` then `arm` with the result of `capture`.
    pub fn start_with<F>(&mut self, capture: F) -> SnapResult<&CaptureSession>
    where
        F: FnOnce() -> SnapResult<CaptureSnapshot>,
    {
        self.prepare();
        self.arm(capture())
    }

    /// End a prepared session that captured without an overlay (full-screen
    /// saves). Restores the host. Returns false when nothing was prepared.
    pub fn release(&mut self) -> bool {
        if self.phase() != SessionPhase::Preparing {
            return false;
        }
        self.restore_host();
        true
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.drag.is_some() {
            return false;
        }
        session.drag = Some(DragState {
            anchor: (x, y),
            current: (x, y),
        });
        true
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) -> Option<DragFeedback> {
        let session = self.session.as_mut()?;
        let drag = session.drag.as_mut()?;
        drag.current = (x, y);
        session.feedback()
    }

    /// Finish the drag. Returns `None` when no drag was in progress.
    pub fn pointer_up(&mut self, x: i32, y: i32) -> Option<SelectionOutcome> {
        let session = self.session.as_mut()?;
        let mut drag = session.drag.take()?;
        drag.current = (x, y);
        let selection = drag.rect();

        if !selection.meets_minimum() {
            tracing::debug!(size = %selection.size_label(), "Selection too small");
            return Some(self.finish(SelectionOutcome::Cancelled(CancelReason::Degenerate)));
        }

        let outcome = match session.geometry.crop_region(&selection) {
            Ok(region) => SelectionOutcome::Committed {
                image: crop(&session.snapshot.capture.image, &region),
                region,
                selection,
            },
            Err(e) => SelectionOutcome::Failed(e),
        };
        Some(self.finish(outcome))
    }

    /// End the session without side effects. Ignored when idle.
    pub fn cancel(&mut self, reason: CancelReason) -> Option<SelectionOutcome> {
        if !self.is_active() {
            tracing::trace!(?reason, "Ignoring cancel with no active session");
            return None;
        }
        Some(self.finish(SelectionOutcome::Cancelled(reason)))
    }

    /// Route one overlay event.
    pub fn handle(&mut self, event: OverlayEvent) -> Option<SelectionOutcome> {
        match event {
            OverlayEvent::PointerDown { x, y } => {
                self.pointer_down(x, y);
                None
            }
            OverlayEvent::PointerMove { x, y } => {
                self.pointer_move(x, y);
                None
            }
            OverlayEvent::PointerUp { x, y } => self.pointer_up(x, y),
            OverlayEvent::Key {
                channel,
                key: OverlayKey::Escape,
            } => self.cancel(CancelReason::Key(channel)),
            OverlayEvent::Key { .. } => None,
            OverlayEvent::SecondaryButton { channel } => {
                self.cancel(CancelReason::SecondaryButton(channel))
            }
            OverlayEvent::CloseRequested { channel } => {
                self.cancel(CancelReason::CloseRequest(channel))
            }
        }
    }

    fn finish(&mut self, outcome: SelectionOutcome) -> SelectionOutcome {
        self.session = None;
        self.restore_host();
        match &outcome {
            SelectionOutcome::Committed { region, .. } => tracing::info!(
                x = region.x,
                y = region.y,
                width = region.width,
                height = region.height,
                "Selection committed"
            ),
            SelectionOutcome::Cancelled(reason) => {
                tracing::info!(?reason, "Selection cancelled")
            }
            SelectionOutcome::Failed(e) => tracing::warn!("Selection failed: {e}"),
        }
        outcome
    }

    fn restore_host(&mut self) {
        if let Some(previous) = self.host_before.take() {
            self.host.restore(previous);
            tracing::debug!(?previous, "Host restored");
        }
    }
}
