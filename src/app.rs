//! Main application module for Inkline
//!
//! Hosts one inline editor in an eframe window: toolbar and variable
//! buttons on top, the content surface below, and an optional preview of
//! the message with variables filled in.

use inkline::config::{save_config_silent, Settings};
use inkline::editor::{ClickOutcome, InlineEditor};
use inkline::engine::FormatCommand;
use inkline::host::{FormSubmission, Page};
use inkline::template::render_markup;
use inkline::ui::{
    show_toolbar, PromptDialog, PromptDialogResult, SurfaceView, ThemeManager, ToolbarAction,
};
use eframe::egui::{self, RichText};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Keyboard shortcut actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardAction {
    /// Run the toolbar tool bound to a command
    Format(FormatCommand),
    CycleTheme,
    TogglePreview,
}

/// The main application.
pub struct InklineApp {
    settings: Settings,
    page: Page,
    editor: InlineEditor,
    surface: SurfaceView,
    theme_manager: ThemeManager,
    /// Prompt waiting for the user's answer
    dialog: Option<PromptDialog>,
    settings_dirty: bool,
}

impl InklineApp {
    /// Create the application, mounting the editor into a fresh page.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: Settings,
        initial: Option<String>,
    ) -> inkline::Result<Self> {
        let mut page = Page::new();
        page.add_container(settings.container_id.as_str());

        let initial = initial.unwrap_or_else(|| settings.initial_content.clone());
        let editor = InlineEditor::new(
            &mut page,
            &settings.container_id,
            Some(initial.as_str()),
            inkline::MarkupEngine::new(),
            settings.tools.clone(),
        )?;

        info!(
            "Editing '{}' with {} variable(s)",
            settings.container_id,
            settings.variables.len()
        );

        Ok(Self {
            surface: SurfaceView::new(("surface", settings.container_id.as_str())),
            theme_manager: ThemeManager::new(settings.theme),
            settings,
            page,
            editor,
            dialog: None,
            settings_dirty: false,
        })
    }

    /// What a form submission would carry right now.
    pub fn submission(&self) -> FormSubmission {
        self.page.submit()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_toolbar_action(&mut self, ctx: &egui::Context, action: ToolbarAction) {
        match action {
            ToolbarAction::Tool(index) => self.click_tool(index),
            ToolbarAction::Variable(index) => {
                let Some(variable) = self.settings.variables.get(index) else {
                    return;
                };
                let text = inkline::template::placeholder(&variable.label);
                self.editor.insert_var(&text);
                self.surface.request_focus(ctx);
            }
        }
    }

    fn click_tool(&mut self, index: usize) {
        match self.editor.click(index) {
            ClickOutcome::NeedsArgument(request) => {
                debug!("Opening prompt for {}", request.command.name());
                self.dialog = Some(PromptDialog::new(request));
            }
            ClickOutcome::Applied(changed) => debug!("Tool {} applied: {}", index, changed),
            ClickOutcome::Ignored => {}
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let action = ctx.input(|i| {
            if !i.modifiers.command {
                return None;
            }
            if i.modifiers.shift && i.key_pressed(egui::Key::T) {
                return Some(KeyboardAction::CycleTheme);
            }
            if i.modifiers.shift && i.key_pressed(egui::Key::P) {
                return Some(KeyboardAction::TogglePreview);
            }
            if i.key_pressed(egui::Key::B) {
                return Some(KeyboardAction::Format(FormatCommand::Bold));
            }
            if i.key_pressed(egui::Key::I) {
                return Some(KeyboardAction::Format(FormatCommand::Italic));
            }
            if i.key_pressed(egui::Key::K) {
                return Some(KeyboardAction::Format(FormatCommand::CreateLink));
            }
            None
        });

        match action {
            Some(KeyboardAction::Format(command)) => {
                debug!("Keyboard shortcut: {}", command.name());
                if let Some(index) = self.editor.tools().iter().position(|t| t.command == command)
                {
                    self.click_tool(index);
                }
            }
            Some(KeyboardAction::CycleTheme) => {
                let theme = self.theme_manager.cycle();
                self.settings.theme = theme;
                self.settings_dirty = true;
                info!("Theme: {}", theme.label());
            }
            Some(KeyboardAction::TogglePreview) => {
                self.settings.show_preview = !self.settings.show_preview;
                self.settings_dirty = true;
            }
            None => {}
        }
    }

    fn show_dialog(&mut self, ctx: &egui::Context, is_dark: bool) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let ticket = dialog.ticket();
        match dialog.show(ctx, is_dark) {
            PromptDialogResult::Open => {}
            PromptDialogResult::Cancelled => {
                self.editor.complete_prompt(ticket, None);
                self.dialog = None;
            }
            PromptDialogResult::Submitted(answer) => {
                self.editor.complete_prompt(ticket, Some(answer));
                self.dialog = None;
                self.surface.request_focus(ctx);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// The message with sample values filled in.
    fn preview_text(&self) -> String {
        let values: HashMap<String, String> = self
            .settings
            .variables
            .iter()
            .map(|v| (v.label.clone(), v.sample.clone()))
            .collect();
        render_markup(&self.editor.value(), &values)
    }
}

fn render_preview(ui: &mut egui::Ui, preview: &str) {
    ui.separator();
    ui.label(RichText::new("Preview").small().weak());
    egui::ScrollArea::vertical()
        .id_source("preview")
        .max_height(120.0)
        .show(ui, |ui| {
            ui.label(RichText::new(preview).monospace());
        });
}

impl eframe::App for InklineApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let system_dark = frame.info().system_theme.map(|t| t == eframe::Theme::Dark);
        self.theme_manager.apply_if_needed(ctx, system_dark);
        let is_dark = self.theme_manager.is_dark(ctx);
        let modal_open = self.dialog.is_some();
        let preview = self
            .settings
            .show_preview
            .then(|| self.preview_text());

        let mut action = None;
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                action = show_toolbar(
                    ui,
                    self.editor.tools(),
                    &self.editor.formatting_state(),
                    &self.settings.variables,
                    is_dark,
                );
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!modal_open, |ui| {
                self.surface.show(
                    ui,
                    &mut self.editor,
                    self.settings.font_size,
                    self.settings.surface_min_height,
                );
            });
            if let Some(preview) = &preview {
                render_preview(ui, preview);
            }
        });

        if let Some(action) = action {
            self.handle_toolbar_action(ctx, action);
        }
        if !modal_open {
            self.handle_keyboard_shortcuts(ctx);
        }
        self.show_dialog(ctx, is_dark);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        if self.settings_dirty {
            save_config_silent(&self.settings);
        }
        match serde_json::to_string_pretty(&self.submission()) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Failed to serialize form submission: {}", e),
        }
    }
}
