//! Editor module for Inkline
//!
//! This module contains the inline editor widget: the toolbar descriptors
//! that configure it, the prompt handshake for commands that need an
//! argument, and the widget that ties a formatting engine to a page.

mod inline;
mod prompt;
mod toolbar;

pub use inline::{InlineEditor, InputEvent};
pub use prompt::{ClickOutcome, PromptRequest, Ticket};
pub use toolbar::{default_tools, ToolDescriptor};
