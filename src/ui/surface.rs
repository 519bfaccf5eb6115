//! Content surface view
//!
//! Shows an editor's plain text in an egui `TextEdit`, styled from the
//! engine's formatting runs. egui edits a copy of the text; after each frame
//! the difference is turned back into an [`InputEvent`] so every change goes
//! through the editor and reaches the mirror field.

use crate::editor::{InlineEditor, InputEvent};
use crate::engine::{FormattingEngine, Selection};
use crate::markup::StyledRun;
use crate::string_utils::{byte_index_to_char_index, char_index_to_byte_index};
use eframe::egui::{
    self,
    text::{CCursor, CCursorRange, LayoutJob, TextFormat},
    text_edit::TextEditState,
    FontId, Stroke, TextEdit, Ui,
};
use log::debug;
use std::hash::Hash;
use std::sync::Arc;

/// The single edit turning `old` into `new`: the replaced byte range of
/// `old` and the text that replaces it. `None` if they are equal.
pub fn diff_edit(old: &str, new: &str) -> Option<(Selection, String)> {
    if old == new {
        return None;
    }

    let mut prefix = 0;
    for (a, b) in old.chars().zip(new.chars()) {
        if a != b {
            break;
        }
        prefix += a.len_utf8();
    }

    let max_suffix = (old.len() - prefix).min(new.len() - prefix);
    let mut suffix = 0;
    for (a, b) in old[prefix..].chars().rev().zip(new[prefix..].chars().rev()) {
        if a != b || suffix + a.len_utf8() > max_suffix {
            break;
        }
        suffix += a.len_utf8();
    }

    Some((
        Selection::new(prefix, old.len() - suffix),
        new[prefix..new.len() - suffix].to_string(),
    ))
}

/// Lay out `text` with the formatting in `runs`.
///
/// `runs` describe the engine's text, which lags one frame behind what egui
/// is editing. If they no longer spell out `text`, it is laid out plain.
pub fn layout_job(
    text: &str,
    runs: &[StyledRun],
    font_id: FontId,
    visuals: &egui::Visuals,
    wrap_width: f32,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;

    let plain = TextFormat {
        font_id: font_id.clone(),
        color: visuals.text_color(),
        ..Default::default()
    };

    if !runs_spell(runs, text) {
        job.append(text, 0.0, plain);
        return job;
    }

    for run in runs {
        let mut format = plain.clone();
        if run.bold {
            format.color = visuals.strong_text_color();
        }
        format.italics = run.italic;
        if run.link.is_some() {
            format.color = visuals.hyperlink_color;
            format.underline = Stroke::new(1.0, visuals.hyperlink_color);
        }
        job.append(&run.text, 0.0, format);
    }
    job
}

fn runs_spell(runs: &[StyledRun], text: &str) -> bool {
    let mut rest = text;
    for run in runs {
        match rest.strip_prefix(run.text.as_str()) {
            Some(tail) => rest = tail,
            None => return false,
        }
    }
    rest.is_empty()
}

/// Displays one editor's content surface.
pub struct SurfaceView {
    id: egui::Id,
    /// Selection last written into or read from the `TextEdit`
    shown_selection: Option<Selection>,
}

impl SurfaceView {
    pub fn new(id_source: impl Hash) -> Self {
        Self {
            id: egui::Id::new(id_source),
            shown_selection: None,
        }
    }

    /// Give the surface keyboard focus.
    pub fn request_focus(&self, ctx: &egui::Context) {
        ctx.memory_mut(|m| m.request_focus(self.id));
    }

    /// Show the surface. Returns whether the content changed.
    pub fn show<E: FormattingEngine>(
        &mut self,
        ui: &mut Ui,
        editor: &mut InlineEditor<E>,
        font_size: f32,
        min_height: f32,
    ) -> bool {
        let text = editor.plain_text();
        let runs = editor.styled_runs();

        // Commands move the selection; carry that into the widget
        let selection = editor.selection();
        if self.shown_selection != Some(selection) {
            self.push_selection(ui.ctx(), &text, selection);
        }

        let font_id = FontId::proportional(font_size);
        let mut layouter = |ui: &Ui, s: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let job = layout_job(s, &runs, font_id.clone(), ui.visuals(), wrap_width);
            ui.fonts(|f| f.layout_job(job))
        };

        let mut buffer = text.clone();
        let output = TextEdit::multiline(&mut buffer)
            .id(self.id)
            .font(font_id.clone())
            .desired_width(f32::INFINITY)
            .min_size(egui::vec2(0.0, min_height))
            .layouter(&mut layouter)
            .show(ui);

        let mut changed = false;
        if let Some((range, inserted)) = diff_edit(&text, &buffer) {
            debug!("Surface edit {:?} -> {:?}", range, inserted);
            changed = editor.handle_input(InputEvent::Replace {
                range,
                text: inserted,
            });
        }

        if let Some(cursor_range) = output.cursor_range {
            let current = editor.plain_text();
            let primary = char_index_to_byte_index(&current, cursor_range.primary.ccursor.index);
            let secondary =
                char_index_to_byte_index(&current, cursor_range.secondary.ccursor.index);
            let selection = Selection::new(primary, secondary);
            if selection != editor.selection() {
                editor.handle_input(InputEvent::Select(selection));
            }
        }

        self.shown_selection = Some(editor.selection());
        changed
    }

    fn push_selection(&self, ctx: &egui::Context, text: &str, selection: Selection) {
        let mut state = TextEditState::load(ctx, self.id).unwrap_or_default();
        let start = byte_index_to_char_index(text, selection.start);
        let end = byte_index_to_char_index(text, selection.end);
        state
            .cursor
            .set_char_range(Some(CCursorRange::two(CCursor::new(start), CCursor::new(end))));
        state.store(ctx, self.id);
    }
}
