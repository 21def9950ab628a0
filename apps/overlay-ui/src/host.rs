//! The eframe root viewport as the selection host window.

use eframe::egui::{self, ViewportCommand, ViewportId};
use snapzone_selection::{HostVisibility, HostWindow};

pub struct EguiHost {
    ctx: egui::Context,
}

impl EguiHost {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }

    fn send(&self, command: ViewportCommand) {
        self.ctx.send_viewport_cmd_to(ViewportId::ROOT, command);
    }
}

impl HostWindow for EguiHost {
    fn visibility(&self) -> HostVisibility {
        let minimized = self
            .ctx
            .input_for(ViewportId::ROOT, |i| i.viewport().minimized)
            .unwrap_or(false);
        if minimized {
            HostVisibility::Minimized
        } else {
            HostVisibility::Visible
        }
    }

    fn hide(&mut self) {
        self.send(ViewportCommand::Minimized(true));
    }

    fn restore(&mut self, previous: HostVisibility) {
        match previous {
            HostVisibility::Visible => {
                self.send(ViewportCommand::Minimized(false));
                self.send(ViewportCommand::Focus);
            }
            HostVisibility::Minimized => self.send(ViewportCommand::Minimized(true)),
            HostVisibility::Hidden => self.send(ViewportCommand::Visible(false)),
        }
    }
}
