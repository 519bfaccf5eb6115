//! Toolbar rendering
//!
//! One button per tool descriptor, highlighted while its formatting is
//! active over the selection, followed by a row of variable buttons.

use crate::config::Variable;
use crate::editor::ToolDescriptor;
use crate::engine::{FormatCommand, FormattingState};
use crate::template::placeholder;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Size of formatting buttons.
const TOOL_BUTTON_SIZE: Vec2 = Vec2::new(28.0, 24.0);

/// What the user clicked in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Formatting tool, by index into the tool list
    Tool(usize),
    /// Variable button, by index into the variable list
    Variable(usize),
}

/// Show the toolbar. Returns the button clicked this frame, if any.
pub fn show_toolbar(
    ui: &mut Ui,
    tools: &[ToolDescriptor],
    state: &FormattingState,
    variables: &[Variable],
    is_dark: bool,
) -> Option<ToolbarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        for (index, tool) in tools.iter().enumerate() {
            let active = state.is_active(tool.command);
            if tool_button(ui, tool, active, is_dark).clicked() {
                action = Some(ToolbarAction::Tool(index));
            }
        }
    });

    if !variables.is_empty() {
        ui.horizontal_wrapped(|ui| {
            for (index, variable) in variables.iter().enumerate() {
                let response = ui
                    .small_button(placeholder(&variable.label))
                    .on_hover_text(format!("Insert {}", variable.label));
                if response.clicked() {
                    action = Some(ToolbarAction::Variable(index));
                }
            }
        });
    }

    action
}

fn tool_button(ui: &mut Ui, tool: &ToolDescriptor, active: bool, is_dark: bool) -> Response {
    let text_color = if is_dark {
        Color32::from_rgb(220, 220, 220)
    } else {
        Color32::from_rgb(50, 50, 50)
    };
    let active_bg = if is_dark {
        Color32::from_rgb(70, 90, 120)
    } else {
        Color32::from_rgb(200, 220, 240)
    };

    let mut text = RichText::new(&tool.label).size(13.0).color(text_color);
    match tool.command {
        FormatCommand::Bold => text = text.strong(),
        FormatCommand::Italic => text = text.italics(),
        FormatCommand::CreateLink | FormatCommand::InsertText => {}
    }

    let mut button = egui::Button::new(text).min_size(TOOL_BUTTON_SIZE);
    if active {
        button = button.fill(active_bg);
    }

    let mut hover = tool.command.tooltip().to_string();
    if tool.prompt {
        hover.push('…');
    }
    ui.add(button).on_hover_text(hover)
}
