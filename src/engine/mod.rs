//! Formatting engines
//!
//! An inline editor does not edit content itself. It forwards every
//! formatting command, insertion and selection change to a
//! [`FormattingEngine`], and reads the serialized markup back from it.
//! [`MarkupEngine`] is the engine shipped with the crate, backed by the
//! [`markup`](crate::markup) document model.

mod markup_engine;

pub use markup_engine::MarkupEngine;

use crate::markup::StyledRun;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting commands an engine can run, addressed by name in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatCommand {
    /// Toggle bold on the selection
    Bold,
    /// Toggle italic on the selection
    Italic,
    /// Link the selection to a URL (argument)
    CreateLink,
    /// Insert literal text at the caret (argument)
    InsertText,
}

impl FormatCommand {
    /// All commands, in toolbar order.
    pub fn all() -> &'static [FormatCommand] {
        &[
            FormatCommand::Bold,
            FormatCommand::Italic,
            FormatCommand::CreateLink,
            FormatCommand::InsertText,
        ]
    }

    /// The command's configuration name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::CreateLink => "createLink",
            Self::InsertText => "insertText",
        }
    }

    /// Look up a command by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    /// Whether the command cannot run without an argument.
    pub fn takes_argument(&self) -> bool {
        matches!(self, Self::CreateLink | Self::InsertText)
    }

    /// Hover text for toolbar buttons.
    pub fn tooltip(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::CreateLink => "Insert Link",
            Self::InsertText => "Insert Text",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A selection over the surface's plain text, as byte offsets.
///
/// Always normalized so `start <= end`. A collapsed selection is a caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    #[inline]
    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }
}

/// Which way a single-character deletion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Formatting active over the current selection, for toolbar highlighting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattingState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_link: bool,
    /// Target of the link covering the selection, if uniform
    pub link_target: Option<String>,
}

impl FormattingState {
    /// Whether `command` is currently active, for button highlighting.
    pub fn is_active(&self, command: FormatCommand) -> bool {
        match command {
            FormatCommand::Bold => self.is_bold,
            FormatCommand::Italic => self.is_italic,
            FormatCommand::CreateLink => self.is_link,
            FormatCommand::InsertText => false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine Trait
// ─────────────────────────────────────────────────────────────────────────────

/// The editing capability behind a content surface.
///
/// Commands return whether they changed the content. A command that cannot
/// run (no selection, empty argument, unsupported) returns `false` and
/// leaves everything as it was.
pub trait FormattingEngine {
    /// Replace the content with `markup` and place the caret at its end.
    fn load(&mut self, markup: &str);

    /// Try to give the surface input focus.
    fn focus(&mut self) -> bool {
        true
    }

    fn selection(&self) -> Selection;

    /// Move the selection. Out-of-range offsets are clamped.
    fn set_selection(&mut self, selection: Selection);

    fn select_all(&mut self) {
        let len = self.plain_text().len();
        self.set_selection(Selection::new(0, len));
    }

    fn toggle_bold(&mut self) -> bool;

    fn toggle_italic(&mut self) -> bool;

    /// Link the selection to `url`, or insert a linked `url` at the caret.
    fn create_link(&mut self, url: &str) -> bool;

    /// Insert literal text, replacing the selection.
    fn insert_text(&mut self, text: &str) -> bool;

    /// Delete the selection, or one character next to the caret.
    fn delete(&mut self, direction: Direction) -> bool;

    /// The content as markup.
    fn serialize(&self) -> String;

    /// The content's text, which selection offsets index into.
    fn plain_text(&self) -> String;

    fn formatting_state(&self) -> FormattingState {
        FormattingState::default()
    }

    fn styled_runs(&self) -> Vec<StyledRun> {
        vec![StyledRun {
            text: self.plain_text(),
            ..StyledRun::default()
        }]
    }

    /// Run a command by value. Argument commands without an argument do nothing.
    fn exec(&mut self, command: FormatCommand, argument: Option<&str>) -> bool {
        match (command, argument) {
            (FormatCommand::Bold, _) => self.toggle_bold(),
            (FormatCommand::Italic, _) => self.toggle_italic(),
            (FormatCommand::CreateLink, Some(url)) => self.create_link(url),
            (FormatCommand::InsertText, Some(text)) => self.insert_text(text),
            (FormatCommand::CreateLink | FormatCommand::InsertText, None) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_normalizes() {
        let sel = Selection::new(9, 4);
        assert_eq!((sel.start, sel.end), (4, 9));
        assert_eq!(sel.len(), 5);
        assert!(!sel.is_collapsed());
        assert!(Selection::caret(3).is_collapsed());
    }

    #[test]
    fn command_names_roundtrip() {
        for command in FormatCommand::all() {
            assert_eq!(FormatCommand::from_name(command.name()), Some(*command));
        }
        assert_eq!(FormatCommand::from_name("underline"), None);
    }

    #[test]
    fn command_serde_uses_configuration_names() {
        assert_eq!(
            serde_json::to_string(&FormatCommand::CreateLink).unwrap(),
            "\"createLink\""
        );
        assert_eq!(
            serde_json::from_str::<FormatCommand>("\"bold\"").unwrap(),
            FormatCommand::Bold
        );
    }

    #[test]
    fn argument_requirements() {
        assert!(!FormatCommand::Bold.takes_argument());
        assert!(!FormatCommand::Italic.takes_argument());
        assert!(FormatCommand::CreateLink.takes_argument());
        assert!(FormatCommand::InsertText.takes_argument());
    }

    #[test]
    fn formatting_state_activity() {
        let state = FormattingState {
            is_bold: true,
            ..Default::default()
        };
        assert!(state.is_active(FormatCommand::Bold));
        assert!(!state.is_active(FormatCommand::Italic));
        assert!(!state.is_active(FormatCommand::InsertText));
    }
}
