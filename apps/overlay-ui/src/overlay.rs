//! Full-virtual-screen selection viewport.

use eframe::egui::{
    self, pos2, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TextureHandle,
    ViewportBuilder, ViewportCommand, ViewportId,
};
use snapzone_selection::{CaptureSession, InputChannel, OverlayEvent, OverlayGeometry, OverlayKey};

const DIM: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 90);
const SELECTION_STROKE: Color32 = Color32::from_rgb(230, 40, 40);

pub fn viewport_id() -> ViewportId {
    ViewportId::from_hash_of("snapzone-selection-overlay")
}

/// Borderless, always-on-top viewport covering the virtual screen. It asks
/// for focus so Escape reaches it while the host is minimized.
///
/// egui positions viewports in points, so the physical rect is divided by
/// the host's pixels-per-point.
pub fn viewport_builder(geometry: &OverlayGeometry, pixels_per_point: f32) -> ViewportBuilder {
    let vs = geometry.virtual_screen;
    ViewportBuilder::default()
        .with_title("SnapZone selection")
        .with_decorations(false)
        .with_always_on_top()
        .with_resizable(false)
        .with_active(true)
        .with_position([
            vs.left as f32 / pixels_per_point,
            vs.top as f32 / pixels_per_point,
        ])
        .with_inner_size([
            vs.width as f32 / pixels_per_point,
            vs.height as f32 / pixels_per_point,
        ])
}

/// Upload the frozen capture as a texture.
pub fn load_capture_texture(ctx: &egui::Context, session: &CaptureSession) -> TextureHandle {
    let image = &session.snapshot().capture.image;
    let color_image = egui::ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    );
    ctx.load_texture("snapzone-capture", color_image, egui::TextureOptions::LINEAR)
}

/// Draw one overlay frame and collect the input it received.
pub fn show(ctx: &egui::Context, session: &CaptureSession, texture: &TextureHandle) -> Vec<OverlayEvent> {
    let ppp = ctx.pixels_per_point();
    let to_px = |p: Pos2| ((p.x * ppp).round() as i32, (p.y * ppp).round() as i32);
    let mut events = Vec::new();

    ctx.input(|i| {
        if let Some(pos) = i.pointer.interact_pos() {
            let (x, y) = to_px(pos);
            if i.pointer.primary_pressed() {
                events.push(OverlayEvent::PointerDown { x, y });
            } else if i.pointer.primary_down() && i.pointer.delta() != egui::Vec2::ZERO {
                events.push(OverlayEvent::PointerMove { x, y });
            }
            if i.pointer.primary_released() {
                events.push(OverlayEvent::PointerUp { x, y });
            }
        }
        if i.pointer.secondary_pressed() {
            events.push(OverlayEvent::SecondaryButton {
                channel: InputChannel::OverlayWindow,
            });
        }
        if i.key_pressed(egui::Key::Escape) {
            events.push(OverlayEvent::Key {
                channel: InputChannel::OverlayWindow,
                key: OverlayKey::Escape,
            });
        }
        if i.viewport().close_requested() {
            events.push(OverlayEvent::CloseRequested {
                channel: InputChannel::OverlayWindow,
            });
        }
    });
    if events
        .iter()
        .any(|e| matches!(e, OverlayEvent::CloseRequested { .. }))
    {
        // The controller tears the viewport down itself.
        ctx.send_viewport_cmd(ViewportCommand::CancelClose);
    }

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::BLACK))
        .show(ctx, |ui| {
            let full = ui.max_rect();
            let canvas = ui.interact(full, ui.id().with("canvas"), Sense::click_and_drag());
            let painter = ui.painter();

            let geometry = session.geometry();
            let (dx, dy) = geometry.image_offset();
            let (bw, bh) = geometry.buffer_size;
            let image_rect = Rect::from_min_size(
                full.min + vec2(dx as f32 / ppp, dy as f32 / ppp),
                vec2(bw as f32 / ppp, bh as f32 / ppp),
            );
            let full_uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), image_rect, full_uv, Color32::WHITE);
            painter.rect_filled(full, 0.0, DIM);

            if let Some(feedback) = session.feedback() {
                let sel = Rect::from_min_max(
                    full.min + vec2(feedback.rect.x1 as f32 / ppp, feedback.rect.y1 as f32 / ppp),
                    full.min + vec2(feedback.rect.x2 as f32 / ppp, feedback.rect.y2 as f32 / ppp),
                );

                // Undimmed view of the selected pixels.
                let visible = sel.intersect(image_rect);
                if visible.is_positive() {
                    let uv = Rect::from_min_max(
                        pos2(
                            (visible.min.x - image_rect.min.x) / image_rect.width(),
                            (visible.min.y - image_rect.min.y) / image_rect.height(),
                        ),
                        pos2(
                            (visible.max.x - image_rect.min.x) / image_rect.width(),
                            (visible.max.y - image_rect.min.y) / image_rect.height(),
                        ),
                    );
                    painter.image(texture.id(), visible, uv, Color32::WHITE);
                }

                painter.rect_stroke(sel, 0.0, Stroke::new(2.0, SELECTION_STROKE));
                let label_pos = if sel.min.y - full.min.y > 22.0 {
                    sel.left_top() - vec2(0.0, 4.0)
                } else {
                    sel.left_bottom() + vec2(0.0, 18.0)
                };
                painter.text(
                    label_pos,
                    Align2::LEFT_BOTTOM,
                    &feedback.label,
                    FontId::proportional(14.0),
                    Color32::WHITE,
                );
            } else {
                painter.text(
                    full.center_top() + vec2(0.0, 40.0),
                    Align2::CENTER_CENTER,
                    session.instruction_text(),
                    FontId::proportional(18.0),
                    Color32::WHITE,
                );
            }

            if canvas.hovered() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                events.push(OverlayEvent::Key {
                    channel: InputChannel::Canvas,
                    key: OverlayKey::Escape,
                });
            }
            if canvas.secondary_clicked() {
                events.push(OverlayEvent::SecondaryButton {
                    channel: InputChannel::Canvas,
                });
            }
        });

    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
    events
}
