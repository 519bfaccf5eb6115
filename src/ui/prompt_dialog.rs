//! Modal dialog answering a toolbar prompt.

use crate::editor::{PromptRequest, Ticket};
use crate::engine::FormatCommand;
use eframe::egui::{self, Color32, Key};

/// Result from showing the prompt dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptDialogResult {
    /// Dialog still open
    Open,
    /// Dismissed without an answer
    Cancelled,
    /// The user's answer
    Submitted(String),
}

/// An open prompt and what has been typed so far.
#[derive(Debug, Clone)]
pub struct PromptDialog {
    request: PromptRequest,
    input: String,
}

impl PromptDialog {
    pub fn new(request: PromptRequest) -> Self {
        let input = request.initial.clone().unwrap_or_default();
        Self { request, input }
    }

    pub fn ticket(&self) -> Ticket {
        self.request.ticket
    }

    /// Show the dialog and return the result.
    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool) -> PromptDialogResult {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            return PromptDialogResult::Cancelled;
        }

        let bg_color = if is_dark {
            Color32::from_rgb(40, 40, 45)
        } else {
            Color32::from_rgb(250, 250, 250)
        };
        let border_color = if is_dark {
            Color32::from_rgb(70, 70, 80)
        } else {
            Color32::from_rgb(180, 180, 190)
        };

        let (title, hint) = match self.request.command {
            FormatCommand::CreateLink => ("🔗 Insert Link", "https://"),
            _ => ("Insert", ""),
        };

        let mut result = PromptDialogResult::Open;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .rounding(8.0),
            )
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.add_space(8.0);
                ui.label(self.request.message.as_str());
                ui.add_space(4.0);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.input)
                        .hint_text(hint)
                        .desired_width(300.0),
                );
                if !response.has_focus() && !response.lost_focus() {
                    response.request_focus();
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let ok_enabled = !self.input.is_empty();
                        if ui.add_enabled(ok_enabled, egui::Button::new("OK")).clicked()
                            || (response.lost_focus()
                                && ctx.input(|i| i.key_pressed(Key::Enter))
                                && ok_enabled)
                        {
                            result = PromptDialogResult::Submitted(self.input.clone());
                        }

                        ui.add_space(8.0);
                        if ui.button("Cancel").clicked() {
                            result = PromptDialogResult::Cancelled;
                        }
                    });
                });
                ui.add_space(4.0);
            });

        result
    }
}
