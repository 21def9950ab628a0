use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, ViewportClass};
use snapzone_capture_engine::CaptureEngine;
use snapzone_common::config::{AppConfig, QualityPreset, ScreenshotMode};
use snapzone_persistence::{capture_display_to_file, load_preview, save, SavedImage};
use snapzone_selection::{
    controller_channel, CancelReason, ControllerHandle, ControllerRequest, InputChannel,
    OverlayEvent, OverlayKey, RequestInbox, SelectionController, SelectionOutcome,
};

mod host;
mod overlay;

use host::EguiHost;

/// Time for the host window to leave the screen before pixels are grabbed.
const CAPTURE_DELAY: Duration = Duration::from_millis(250);

/// Longest side of the last-saved thumbnail, in pixels.
const PREVIEW_SIZE: u32 = 240;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    snapzone_common::logging::init_logging(&config.logging);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SnapZone")
            .with_inner_size([400.0, 520.0])
            .with_min_inner_size([320.0, 200.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SnapZone",
        options,
        Box::new(move |cc| Box::new(SnapZoneApp::new(cc, config))),
    )
    .map_err(|e| anyhow::anyhow!("snapzone launch failed: {e}"))
}

#[derive(Debug, Clone, Copy)]
enum CaptureKind {
    /// Interactive area selection.
    Area(ScreenshotMode),
    /// Every display, saved without selection.
    FullScreen,
}

struct PendingCapture {
    kind: CaptureKind,
    requested_at: Instant,
}

struct SnapZoneApp {
    ctx: egui::Context,
    config: AppConfig,
    engine: CaptureEngine,
    controller: SelectionController<EguiHost>,
    handle: ControllerHandle,
    inbox: RequestInbox,
    pending: Option<PendingCapture>,
    texture: Option<egui::TextureHandle>,
    status: String,
    last_saved: Option<SavedImage>,
    preview: Option<egui::TextureHandle>,
}

impl SnapZoneApp {
    fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let waker_ctx = cc.egui_ctx.clone();
        let (handle, inbox) = controller_channel(move || waker_ctx.request_repaint());
        let engine = CaptureEngine::with_default_backend();
        tracing::info!(backend = engine.backend_name(), "SnapZone started");

        Self {
            ctx: cc.egui_ctx.clone(),
            config,
            engine,
            controller: SelectionController::new(EguiHost::new(cc.egui_ctx.clone())),
            handle,
            inbox,
            pending: None,
            texture: None,
            status: "Ready".to_string(),
            last_saved: None,
            preview: None,
        }
    }

    fn poll_requests(&mut self) {
        for request in self.inbox.drain() {
            match request {
                ControllerRequest::StartCapture(mode) => self.begin(CaptureKind::Area(mode)),
                ControllerRequest::Cancel => {
                    self.pending = None;
                    if let Some(outcome) = self.controller.cancel(CancelReason::Requested) {
                        self.finish(outcome);
                    }
                }
            }
        }
    }

    /// Hide the host through the controller and schedule the capture.
    ///
    /// An area request supersedes whatever is pending; the controller keeps
    /// the host visibility recorded first.
    fn begin(&mut self, kind: CaptureKind) {
        if matches!(kind, CaptureKind::FullScreen) && self.controller.is_active() {
            self.status = "Finish the current capture first".to_string();
            return;
        }
        self.controller.prepare();
        self.texture = None;
        self.pending = Some(PendingCapture {
            kind,
            requested_at: Instant::now(),
        });
        self.status = "Capturing...".to_string();
    }

    /// Run the capture once the host has had time to disappear.
    fn poll_pending(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending.as_ref() else {
            return;
        };
        let elapsed = pending.requested_at.elapsed();
        if elapsed < CAPTURE_DELAY {
            ctx.request_repaint_after(CAPTURE_DELAY - elapsed);
            return;
        }
        let kind = pending.kind;
        self.pending = None;

        match kind {
            CaptureKind::Area(mode) => {
                let result = self.engine.capture_for_mode(mode);
                match self.controller.arm(result) {
                    Ok(session) => {
                        self.texture = Some(overlay::load_capture_texture(ctx, session));
                        ctx.send_viewport_cmd_to(
                            overlay::viewport_id(),
                            egui::ViewportCommand::Focus,
                        );
                        self.status = "Select an area".to_string();
                    }
                    Err(e) => self.status = format!("Capture failed: {e}"),
                }
            }
            CaptureKind::FullScreen => {
                let result = capture_display_to_file(
                    &self.engine,
                    None,
                    self.config.quality_preset,
                    &self.config.save_directory,
                    &self.config.file_prefix,
                );
                self.controller.release();
                match result {
                    Ok(saved) => self.report_saved(saved),
                    Err(e) => self.status = format!("Capture failed: {e}"),
                }
            }
        }
    }

    fn show_overlay(&mut self, ctx: &egui::Context) {
        let (Some(session), Some(texture)) = (self.controller.session(), self.texture.as_ref())
        else {
            return;
        };

        let builder = overlay::viewport_builder(session.geometry(), ctx.pixels_per_point());
        let events = ctx.show_viewport_immediate(overlay::viewport_id(), builder, |ctx, class| {
            if class == ViewportClass::Embedded {
                tracing::warn!("Multiple viewports unsupported; overlay drawn inside host");
            }
            overlay::show(ctx, session, texture)
        });
        self.dispatch(events);
    }

    fn dispatch(&mut self, events: Vec<OverlayEvent>) {
        for event in events {
            if let Some(outcome) = self.controller.handle(event) {
                self.finish(outcome);
                break;
            }
        }
    }

    fn finish(&mut self, outcome: SelectionOutcome) {
        self.texture = None;
        match outcome {
            SelectionOutcome::Committed { image, .. } => {
                match save(
                    &image,
                    self.config.quality_preset,
                    &self.config.save_directory,
                    &self.config.file_prefix,
                ) {
                    Ok(saved) => self.report_saved(saved),
                    Err(e) => {
                        tracing::error!("Failed to save screenshot: {e}");
                        self.status = format!("Save failed: {e}");
                    }
                }
            }
            SelectionOutcome::Cancelled(CancelReason::Degenerate) => {
                self.status = "Selection too small, cancelled".to_string();
            }
            SelectionOutcome::Cancelled(_) => self.status = "Cancelled".to_string(),
            SelectionOutcome::Failed(e) => self.status = format!("Selection failed: {e}"),
        }
    }

    fn report_saved(&mut self, saved: SavedImage) {
        self.status = format!("Saved ({})", saved.summary());
        if self.config.auto_copy_path {
            match copy_path(&self.config.clipboard_prefix, &saved.path) {
                Ok(()) => self.status.push_str(", path copied"),
                Err(e) => {
                    tracing::warn!("Clipboard copy failed: {e}");
                    self.status.push_str(", clipboard unavailable");
                }
            }
        }
        self.preview = None;
        if self.config.show_preview {
            match load_preview(&saved.path, PREVIEW_SIZE) {
                Ok(thumbnail) => {
                    let image = egui::ColorImage::from_rgba_unmultiplied(
                        [thumbnail.width() as usize, thumbnail.height() as usize],
                        thumbnail.as_raw(),
                    );
                    self.preview = Some(self.ctx.load_texture(
                        "snapzone-preview",
                        image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                Err(e) => tracing::warn!("Preview unavailable: {e}"),
            }
        }
        self.last_saved = Some(saved);
    }

    fn settings_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("settings").num_columns(2).show(ui, |ui| {
            ui.label("Quality");
            egui::ComboBox::from_id_source("quality")
                .selected_text(self.config.quality_preset.as_str())
                .show_ui(ui, |ui| {
                    for preset in QualityPreset::ALL {
                        ui.selectable_value(
                            &mut self.config.quality_preset,
                            preset,
                            preset.as_str(),
                        );
                    }
                });
            ui.end_row();

            ui.label("Mode");
            egui::ComboBox::from_id_source("mode")
                .selected_text(self.config.screenshot_mode.as_str())
                .show_ui(ui, |ui| {
                    for mode in ScreenshotMode::ALL {
                        ui.selectable_value(&mut self.config.screenshot_mode, mode, mode.as_str());
                    }
                });
            ui.end_row();

            ui.label("Copy path");
            ui.checkbox(&mut self.config.auto_copy_path, "");
            ui.end_row();

            ui.label("Preview");
            ui.checkbox(&mut self.config.show_preview, "");
            ui.end_row();
        });

        if ui.button("Save settings").clicked() {
            match self.config.save() {
                Ok(path) => self.status = format!("Settings saved to {}", path.display()),
                Err(e) => self.status = format!("Failed to save settings: {e}"),
            }
        }
    }
}

impl eframe::App for SnapZoneApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_requests();
        self.poll_pending(ctx);

        if self.controller.session().is_some() {
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.dispatch(vec![OverlayEvent::Key {
                    channel: InputChannel::HostWindow,
                    key: OverlayKey::Escape,
                }]);
            }
            self.show_overlay(ctx);
        }

        let busy = self.controller.is_active() || self.pending.is_some();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(Color32::from_rgb(24, 26, 30))
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.heading("SnapZone");
                ui.separator();

                ui.horizontal(|ui| {
                    let area = egui::Button::new("Area screenshot")
                        .fill(Color32::from_rgb(200, 52, 52))
                        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(230, 120, 120)));
                    if ui.add_enabled(!busy, area).clicked() {
                        self.handle.start_capture(self.config.screenshot_mode);
                    }
                    if ui
                        .add_enabled(!busy, egui::Button::new("Full screen"))
                        .clicked()
                    {
                        self.begin(CaptureKind::FullScreen);
                    }
                    if busy && ui.button("Cancel").clicked() {
                        self.handle.cancel();
                    }
                });

                ui.add_space(6.0);
                self.settings_ui(ui);

                ui.add_space(6.0);
                ui.label(format!("Status: {}", self.status));
                if let Some(saved) = self.last_saved.as_ref() {
                    ui.label(format!("Last: {}", saved.path.display()));
                }
                if let (true, Some(preview)) = (self.config.show_preview, self.preview.as_ref()) {
                    ui.add(egui::Image::from_texture(egui::load::SizedTexture::new(
                        preview.id(),
                        preview.size_vec2(),
                    )));
                }
                ui.label(format!("Folder: {}", self.config.save_directory.display()));
            });
    }
}

fn copy_path(prefix: &str, path: &Path) -> anyhow::Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(format!("{prefix}{}", path.display()))?;
    Ok(())
}
