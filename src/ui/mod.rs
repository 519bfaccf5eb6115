//! UI components for Inkline
//!
//! egui views for an [`InlineEditor`](crate::editor::InlineEditor). Views
//! only render and report what the user did; every change is applied
//! through the editor.

mod prompt_dialog;
mod surface;
mod theme;
mod toolbar;

pub use prompt_dialog::{PromptDialog, PromptDialogResult};
pub use surface::{diff_edit, layout_job, SurfaceView};
pub use theme::ThemeManager;
pub use toolbar::{show_toolbar, ToolbarAction};
