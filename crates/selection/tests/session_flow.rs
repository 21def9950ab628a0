use std::cell::RefCell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use snapzone_capture_engine::{CaptureResult, CaptureSnapshot};
use snapzone_common::error::SnapError;
use snapzone_platform_core::{Display, DisplayLayout, ScreenRect};
use snapzone_selection::{
    CancelReason, CropRegion, HostVisibility, HostWindow, InputChannel, OverlayEvent, OverlayKey,
    SelectionController, SelectionOutcome, SessionPhase,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostCall {
    Hide,
    Restore(HostVisibility),
}

/// Host that records every call and tracks its own visibility.
#[derive(Clone)]
struct RecordingHost {
    visibility: Rc<RefCell<HostVisibility>>,
    calls: Rc<RefCell<Vec<HostCall>>>,
}

impl RecordingHost {
    fn new(initial: HostVisibility) -> Self {
        Self {
            visibility: Rc::new(RefCell::new(initial)),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    fn current(&self) -> HostVisibility {
        *self.visibility.borrow()
    }
}

impl HostWindow for RecordingHost {
    fn visibility(&self) -> HostVisibility {
        self.current()
    }

    fn hide(&mut self) {
        *self.visibility.borrow_mut() = HostVisibility::Hidden;
        self.calls.borrow_mut().push(HostCall::Hide);
    }

    fn restore(&mut self, previous: HostVisibility) {
        *self.visibility.borrow_mut() = previous;
        self.calls.borrow_mut().push(HostCall::Restore(previous));
    }
}

fn side_by_side_layout() -> DisplayLayout {
    DisplayLayout::from_platform(
        vec![
            Display::new(1, "A", ScreenRect::new(0, 0, 1920, 1080), true),
            Display::new(2, "B", ScreenRect::new(1920, 0, 1080, 1920), false),
        ],
        None,
    )
}

/// Buffer whose pixel at (x, y) encodes its own coordinates.
fn coordinate_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, (x / 256) as u8, 255])
    })
}

fn full_snapshot() -> CaptureSnapshot {
    CaptureSnapshot {
        capture: CaptureResult {
            image: coordinate_image(3000, 1920),
            origin: (0, 0),
        },
        layout: side_by_side_layout(),
    }
}

fn second_display_snapshot() -> CaptureSnapshot {
    CaptureSnapshot {
        capture: CaptureResult {
            image: coordinate_image(1080, 1920),
            origin: (1920, 0),
        },
        layout: side_by_side_layout(),
    }
}

fn drag(
    controller: &mut SelectionController<RecordingHost>,
    from: (i32, i32),
    to: (i32, i32),
) -> SelectionOutcome {
    assert!(controller
        .handle(OverlayEvent::PointerDown {
            x: from.0,
            y: from.1
        })
        .is_none());
    assert!(controller
        .handle(OverlayEvent::PointerMove { x: to.0, y: to.1 })
        .is_none());
    controller
        .handle(OverlayEvent::PointerUp { x: to.0, y: to.1 })
        .expect("drag should finish the session")
}

#[test]
fn committed_drag_crops_buffer_and_restores_host() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());

    controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert_eq!(controller.phase(), SessionPhase::Armed);
    assert_eq!(host.current(), HostVisibility::Hidden);

    match drag(&mut controller, (300, 250), (100, 100)) {
        SelectionOutcome::Committed { image, region, .. } => {
            assert_eq!(image.dimensions(), (200, 150));
            assert_eq!(
                region,
                CropRegion {
                    x: 100,
                    y: 100,
                    width: 200,
                    height: 150
                }
            );
            assert_eq!(image.get_pixel(0, 0).0, [100, 100, 0, 255]);
        }
        other => panic!("expected commit, got {other:?}"),
    }

    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(
        host.calls(),
        vec![HostCall::Hide, HostCall::Restore(HostVisibility::Visible)]
    );
}

#[test]
fn single_display_capture_maps_through_image_offset() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host);
    let session = controller
        .start_with(|| Ok(second_display_snapshot()))
        .unwrap();
    assert_eq!(session.geometry().image_offset(), (1920, 0));

    match drag(&mut controller, (2000, 500), (2100, 600)) {
        SelectionOutcome::Committed { image, region, .. } => {
            assert_eq!(region.x, 80);
            assert_eq!(region.y, 500);
            assert_eq!(image.dimensions(), (100, 100));
            assert_eq!(image.get_pixel(0, 0).0, [80, (500 % 256) as u8, 0, 255]);
        }
        other => panic!("expected commit, got {other:?}"),
    }
}

#[test]
fn small_drag_cancels_without_output() {
    let host = RecordingHost::new(HostVisibility::Minimized);
    let mut controller = SelectionController::new(host.clone());
    controller.start_with(|| Ok(full_snapshot())).unwrap();

    let outcome = drag(&mut controller, (100, 100), (109, 400));
    assert!(matches!(
        outcome,
        SelectionOutcome::Cancelled(CancelReason::Degenerate)
    ));
    assert_eq!(host.current(), HostVisibility::Minimized);
}

#[test]
fn ten_pixel_drag_commits() {
    let mut controller = SelectionController::new(RecordingHost::new(HostVisibility::Visible));
    controller.start_with(|| Ok(full_snapshot())).unwrap();
    let outcome = drag(&mut controller, (0, 0), (10, 10));
    assert!(matches!(outcome, SelectionOutcome::Committed { .. }));
}

#[test]
fn escape_mid_drag_cancels_once_across_channels() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());
    controller.start_with(|| Ok(full_snapshot())).unwrap();

    controller.handle(OverlayEvent::PointerDown { x: 10, y: 10 });
    controller.handle(OverlayEvent::PointerMove { x: 500, y: 500 });
    assert_eq!(controller.phase(), SessionPhase::Dragging);

    let first = controller.handle(OverlayEvent::Key {
        channel: InputChannel::OverlayWindow,
        key: OverlayKey::Escape,
    });
    assert!(matches!(
        first,
        Some(SelectionOutcome::Cancelled(CancelReason::Key(
            InputChannel::OverlayWindow
        )))
    ));

    for channel in [InputChannel::Canvas, InputChannel::HostWindow] {
        assert!(controller
            .handle(OverlayEvent::Key {
                channel,
                key: OverlayKey::Escape,
            })
            .is_none());
    }
    assert!(controller
        .handle(OverlayEvent::PointerUp { x: 500, y: 500 })
        .is_none());

    assert_eq!(
        host.calls(),
        vec![HostCall::Hide, HostCall::Restore(HostVisibility::Visible)]
    );
}

#[test]
fn secondary_button_and_close_request_cancel() {
    let mut controller = SelectionController::new(RecordingHost::new(HostVisibility::Visible));

    controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert!(matches!(
        controller.handle(OverlayEvent::SecondaryButton {
            channel: InputChannel::Canvas
        }),
        Some(SelectionOutcome::Cancelled(CancelReason::SecondaryButton(
            InputChannel::Canvas
        )))
    ));

    controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert!(matches!(
        controller.handle(OverlayEvent::CloseRequested {
            channel: InputChannel::OverlayWindow
        }),
        Some(SelectionOutcome::Cancelled(CancelReason::CloseRequest(_)))
    ));
}

#[test]
fn other_keys_are_ignored() {
    let mut controller = SelectionController::new(RecordingHost::new(HostVisibility::Visible));
    controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert!(controller
        .handle(OverlayEvent::Key {
            channel: InputChannel::Canvas,
            key: OverlayKey::Other,
        })
        .is_none());
    assert_eq!(controller.phase(), SessionPhase::Armed);
}

#[test]
fn selection_off_the_captured_display_fails_and_restores_host() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());
    controller
        .start_with(|| Ok(second_display_snapshot()))
        .unwrap();

    match drag(&mut controller, (100, 100), (400, 400)) {
        SelectionOutcome::Failed(SnapError::InvalidCropRegion { .. }) => {}
        other => panic!("expected invalid crop, got {other:?}"),
    }
    assert_eq!(host.current(), HostVisibility::Visible);
}

#[test]
fn capture_failure_restores_host_and_returns_error() {
    let host = RecordingHost::new(HostVisibility::Minimized);
    let mut controller = SelectionController::new(host.clone());

    let err = controller
        .start_with(|| Err(SnapError::capture("no pixels")))
        .unwrap_err();
    assert!(matches!(err, SnapError::Capture { .. }));
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(
        host.calls(),
        vec![HostCall::Hide, HostCall::Restore(HostVisibility::Minimized)]
    );
}

#[test]
fn restarting_carries_original_visibility_over() {
    let host = RecordingHost::new(HostVisibility::Minimized);
    let mut controller = SelectionController::new(host.clone());

    controller.start_with(|| Ok(full_snapshot())).unwrap();
    controller.handle(OverlayEvent::PointerDown { x: 1, y: 1 });
    controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert_eq!(controller.phase(), SessionPhase::Armed);

    controller.cancel(CancelReason::Requested);
    assert_eq!(host.current(), HostVisibility::Minimized);
    assert_eq!(
        host.calls().last(),
        Some(&HostCall::Restore(HostVisibility::Minimized))
    );
}

#[test]
fn prepare_then_arm_tracks_preparing_phase() {
    let mut controller = SelectionController::new(RecordingHost::new(HostVisibility::Visible));
    controller.prepare();
    assert_eq!(controller.phase(), SessionPhase::Preparing);
    assert!(controller.cancel(CancelReason::Requested).is_some());
    assert_eq!(controller.phase(), SessionPhase::Idle);

    controller.prepare();
    controller.arm(Ok(full_snapshot())).unwrap();
    assert_eq!(controller.phase(), SessionPhase::Armed);
}

#[test]
fn cancel_while_preparing_restores_host() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());

    controller.prepare();
    assert_eq!(host.current(), HostVisibility::Hidden);

    let outcome = controller.cancel(CancelReason::Requested);
    assert!(matches!(
        outcome,
        Some(SelectionOutcome::Cancelled(CancelReason::Requested))
    ));
    assert_eq!(host.current(), HostVisibility::Visible);
    assert_eq!(
        host.calls(),
        vec![HostCall::Hide, HostCall::Restore(HostVisibility::Visible)]
    );
}

#[test]
fn release_restores_host_after_overlay_free_capture() {
    let host = RecordingHost::new(HostVisibility::Minimized);
    let mut controller = SelectionController::new(host.clone());

    assert!(!controller.release());
    controller.prepare();
    assert!(controller.release());
    assert_eq!(controller.phase(), SessionPhase::Idle);
    assert_eq!(host.current(), HostVisibility::Minimized);
    assert!(!controller.release());
    assert_eq!(host.calls().len(), 2);
}

#[test]
fn release_leaves_armed_session_alone() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());

    controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert!(!controller.release());
    assert_eq!(controller.phase(), SessionPhase::Armed);
    assert_eq!(host.current(), HostVisibility::Hidden);
}

#[test]
fn preparing_twice_keeps_first_recorded_visibility() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());

    controller.prepare();
    controller.prepare();
    controller.arm(Ok(full_snapshot())).unwrap();
    controller.cancel(CancelReason::Key(InputChannel::Canvas));
    assert_eq!(host.current(), HostVisibility::Visible);
}

#[test]
fn idle_controller_ignores_input() {
    let host = RecordingHost::new(HostVisibility::Visible);
    let mut controller = SelectionController::new(host.clone());
    assert!(!controller.pointer_down(10, 10));
    assert!(controller.pointer_move(20, 20).is_none());
    assert!(controller.pointer_up(30, 30).is_none());
    assert!(controller.cancel(CancelReason::Requested).is_none());
    assert!(host.calls().is_empty());
}

#[test]
fn drag_feedback_reports_live_size() {
    let mut controller = SelectionController::new(RecordingHost::new(HostVisibility::Visible));
    controller.start_with(|| Ok(full_snapshot())).unwrap();
    controller.pointer_down(50, 60);
    let feedback = controller.pointer_move(10, 260).unwrap();
    assert_eq!(feedback.label, "40 x 200");
    assert_eq!(
        controller.session().and_then(|s| s.feedback()),
        Some(feedback)
    );
}

#[test]
fn instruction_text_mentions_multiple_displays() {
    let mut controller = SelectionController::new(RecordingHost::new(HostVisibility::Visible));
    let session = controller.start_with(|| Ok(full_snapshot())).unwrap();
    assert!(session.instruction_text().contains("2 displays"));
}
