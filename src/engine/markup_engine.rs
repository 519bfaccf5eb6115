//! Formatting engine backed by the markup document model.

use super::{Direction, FormattingEngine, FormattingState, Selection};
use crate::markup::{Fragment, Mark, StyledRun};
use crate::string_utils::{
    ceil_char_boundary, floor_char_boundary, next_char_boundary, prev_char_boundary,
};
use log::debug;

/// A [`FormattingEngine`] that edits a [`Fragment`] in memory.
///
/// Until the first edit, [`serialize`](FormattingEngine::serialize) returns
/// the loaded markup exactly as given. After that the fragment is
/// re-serialized, which normalizes quoting, entities and letter case.
#[derive(Debug, Clone)]
pub struct MarkupEngine {
    fragment: Fragment,
    selection: Selection,
    /// Loaded markup, kept until the content is edited
    source: Option<String>,
    focused: bool,
    focusable: bool,
}

impl Default for MarkupEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupEngine {
    pub fn new() -> Self {
        Self {
            fragment: Fragment::default(),
            selection: Selection::default(),
            source: Some(String::new()),
            focused: false,
            focusable: true,
        }
    }

    /// Allow or refuse focus. A surface that refuses focus ignores
    /// programmatic insertion.
    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
        if !focusable {
            self.focused = false;
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    fn touch(&mut self) {
        self.source = None;
    }

    fn toggle(&mut self, mark: Mark) -> bool {
        let Selection { start, end } = self.selection;
        if start == end {
            debug!("Ignoring {:?} toggle without a selection", mark);
            return false;
        }

        if self.fragment.has_mark(&mark, start, end) {
            self.fragment.remove_mark(&mark, start, end);
        } else {
            self.fragment.apply_mark(&mark, start, end);
        }
        self.touch();
        true
    }

    /// Remove the selected text and collapse the caret to where it was.
    fn delete_selection(&mut self) {
        let Selection { start, end } = self.selection;
        if start != end {
            self.fragment.delete_range(start, end);
            self.touch();
        }
        self.selection = Selection::caret(start);
    }
}

impl FormattingEngine for MarkupEngine {
    fn load(&mut self, markup: &str) {
        self.fragment = Fragment::parse(markup);
        self.source = Some(markup.to_string());
        self.selection = Selection::caret(self.fragment.text_len());
    }

    fn focus(&mut self) -> bool {
        self.focused = self.focusable;
        self.focused
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        let text = self.fragment.text();
        self.selection = Selection::new(
            floor_char_boundary(&text, selection.start),
            ceil_char_boundary(&text, selection.end),
        );
    }

    fn toggle_bold(&mut self) -> bool {
        self.toggle(Mark::Bold)
    }

    fn toggle_italic(&mut self) -> bool {
        self.toggle(Mark::Italic)
    }

    fn create_link(&mut self, url: &str) -> bool {
        if url.is_empty() {
            debug!("Ignoring link without a target");
            return false;
        }

        let Selection { start, mut end } = self.selection;
        if start == end {
            end = self.fragment.insert_text(start, url);
        }

        let link = Mark::Link(url.to_string());
        self.fragment.remove_mark(&link, start, end);
        self.fragment.apply_mark(&link, start, end);
        self.selection = Selection::new(start, end);
        self.touch();
        true
    }

    fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() && self.selection.is_collapsed() {
            return false;
        }
        self.delete_selection();
        if text.is_empty() {
            return true;
        }
        let caret = self.fragment.insert_text(self.selection.start, text);
        self.selection = Selection::caret(caret);
        self.touch();
        true
    }

    fn delete(&mut self, direction: Direction) -> bool {
        if !self.selection.is_collapsed() {
            self.delete_selection();
            return true;
        }

        let text = self.fragment.text();
        let caret = self.selection.start;
        let (start, end) = match direction {
            Direction::Backward => (prev_char_boundary(&text, caret), caret),
            Direction::Forward => (caret, next_char_boundary(&text, caret)),
        };
        if start == end {
            return false;
        }

        self.fragment.delete_range(start, end);
        self.selection = Selection::caret(start);
        self.touch();
        true
    }

    fn serialize(&self) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => self.fragment.serialize(),
        }
    }

    fn plain_text(&self) -> String {
        self.fragment.text()
    }

    fn formatting_state(&self) -> FormattingState {
        let Selection { start, end } = self.selection;
        let link_target = self.fragment.link_target(start, end);
        FormattingState {
            is_bold: self.fragment.has_mark(&Mark::Bold, start, end),
            is_italic: self.fragment.has_mark(&Mark::Italic, start, end),
            is_link: self.fragment.has_mark(&Mark::Link(String::new()), start, end),
            link_target,
        }
    }

    fn styled_runs(&self) -> Vec<StyledRun> {
        self.fragment.styled_runs()
    }
}
