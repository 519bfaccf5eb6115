//! The inline editor widget.

use super::prompt::{accepted_answer, ClickOutcome, PendingPrompt, PromptRequest, Ticket};
use super::toolbar::{default_tools, ToolDescriptor};
use crate::engine::{
    Direction, FormatCommand, FormattingEngine, FormattingState, MarkupEngine, Selection,
};
use crate::error::{Error, Result};
use crate::host::{FieldHandle, Id, Mounted, Page};
use crate::markup::StyledRun;
use log::{debug, info};

/// A user edit on the content surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Typed or pasted text, replacing the selection
    Insert(String),
    DeleteBackward,
    DeleteForward,
    /// Replace a range with text; empty text deletes the range
    Replace { range: Selection, text: String },
    /// Move the selection without editing
    Select(Selection),
    SelectAll,
}

impl InputEvent {
    /// Whether the event can change content.
    pub fn is_edit(&self) -> bool {
        !matches!(self, InputEvent::Select(_) | InputEvent::SelectAll)
    }
}

/// Rich-text editor mounted into a page container.
///
/// Mounting appends three elements to the container, in order: a hidden
/// mirror field named after the container, the toolbar, and the content
/// surface. The mirror holds the serialized content and is rewritten after
/// every edit, toolbar command and programmatic insertion, so a form
/// submission always sees what [`value`](Self::value) returns.
///
/// Dropping the editor leaves the mounted elements on the page; remove the
/// container to tear them down.
pub struct InlineEditor<E: FormattingEngine = MarkupEngine> {
    engine: E,
    tools: Vec<ToolDescriptor>,
    container_id: String,
    mirror: FieldHandle,
    mirror_id: Id,
    toolbar_id: Id,
    surface_id: Id,
    pending: Option<PendingPrompt>,
    next_ticket: u64,
}

impl InlineEditor<MarkupEngine> {
    /// Mount an editor with the markup engine and the default toolbar.
    pub fn with_defaults(page: &mut Page, container_id: &str, initial: Option<&str>) -> Result<Self> {
        Self::new(page, container_id, initial, MarkupEngine::new(), default_tools())
    }
}

impl<E: FormattingEngine> InlineEditor<E> {
    /// Mount an editor into `container_id`, showing `initial` (or nothing).
    pub fn new(
        page: &mut Page,
        container_id: &str,
        initial: Option<&str>,
        mut engine: E,
        tools: Vec<ToolDescriptor>,
    ) -> Result<Self> {
        if page.container(container_id).is_none() {
            return Err(Error::ContainerNotFound(container_id.to_string()));
        }
        let missing = || Error::ContainerNotFound(container_id.to_string());

        engine.load(initial.unwrap_or_default());
        let mirror = FieldHandle::new(engine.serialize());

        let mirror_id = page
            .mount(container_id, |id| Mounted::HiddenField {
                id,
                name: container_id.to_string(),
                value: mirror.clone(),
            })
            .ok_or_else(missing)?;
        let labels: Vec<String> = tools.iter().map(|t| t.label.clone()).collect();
        let toolbar_id = page
            .mount(container_id, |id| Mounted::Toolbar { id, labels })
            .ok_or_else(missing)?;
        let surface_id = page
            .mount(container_id, |id| Mounted::Surface { id })
            .ok_or_else(missing)?;

        for tool in tools.iter().filter(|t| !t.is_usable()) {
            debug!(
                "Tool '{}' runs {} without prompting; it will be ignored",
                tool.label,
                tool.command.name()
            );
        }
        info!(
            "Mounted inline editor in '{}' with {} tool(s)",
            container_id,
            tools.len()
        );

        Ok(Self {
            engine,
            tools,
            container_id: container_id.to_string(),
            mirror,
            mirror_id,
            toolbar_id,
            surface_id,
            pending: None,
            next_ticket: 0,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// The live content as markup.
    pub fn value(&self) -> String {
        self.engine.serialize()
    }

    /// Focus the surface and insert `text` literally at the caret, replacing
    /// the selection. Nothing happens if the surface cannot take focus.
    pub fn insert_var(&mut self, text: &str) -> bool {
        if !self.engine.focus() {
            debug!("Surface in '{}' refused focus; nothing inserted", self.container_id);
            return false;
        }
        let changed = self.engine.insert_text(text);
        self.sync_mirror();
        changed
    }

    /// Apply a user edit. Returns whether the content changed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let is_edit = event.is_edit();
        let changed = match event {
            InputEvent::Insert(text) => self.engine.insert_text(&text),
            InputEvent::DeleteBackward => self.engine.delete(Direction::Backward),
            InputEvent::DeleteForward => self.engine.delete(Direction::Forward),
            InputEvent::Replace { range, text } => {
                self.engine.set_selection(range);
                if !text.is_empty() {
                    self.engine.insert_text(&text)
                } else if !self.engine.selection().is_collapsed() {
                    self.engine.delete(Direction::Backward)
                } else {
                    false
                }
            }
            InputEvent::Select(selection) => {
                self.engine.set_selection(selection);
                false
            }
            InputEvent::SelectAll => {
                self.engine.select_all();
                false
            }
        };
        if is_edit {
            self.sync_mirror();
        }
        changed
    }

    /// Copy the serialized content into the mirror field.
    pub fn sync_mirror(&mut self) {
        self.mirror.set(self.engine.serialize());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toolbar
    // ─────────────────────────────────────────────────────────────────────────

    /// Click the toolbar button at `index`.
    ///
    /// Prompting tools return [`ClickOutcome::NeedsArgument`]; answer with
    /// [`complete_prompt`](Self::complete_prompt). A new prompt replaces any
    /// unanswered one.
    pub fn click(&mut self, index: usize) -> ClickOutcome {
        let Some(tool) = self.tools.get(index) else {
            debug!("No toolbar button at index {}", index);
            return ClickOutcome::Ignored;
        };
        if !tool.is_usable() {
            return ClickOutcome::Ignored;
        }
        let command = tool.command;

        if tool.prompt {
            let request = PromptRequest {
                ticket: Ticket(self.next_ticket),
                command,
                message: tool.prompt_message().to_string(),
                initial: match command {
                    FormatCommand::CreateLink => self.engine.formatting_state().link_target,
                    _ => None,
                },
            };
            self.next_ticket += 1;
            self.pending = Some(PendingPrompt {
                request: request.clone(),
                selection: self.engine.selection(),
            });
            return ClickOutcome::NeedsArgument(request);
        }

        let changed = self.engine.exec(command, None);
        if !changed {
            debug!("{} had no effect", command.name());
        }
        self.sync_mirror();
        ClickOutcome::Applied(changed)
    }

    /// Click a button, answering any prompt synchronously with `respond`.
    pub fn click_with<F>(&mut self, index: usize, respond: F) -> bool
    where
        F: FnOnce(&PromptRequest) -> Option<String>,
    {
        match self.click(index) {
            ClickOutcome::Applied(changed) => changed,
            ClickOutcome::NeedsArgument(request) => {
                let answer = respond(&request);
                self.complete_prompt(request.ticket, answer)
            }
            ClickOutcome::Ignored => false,
        }
    }

    /// Answer an outstanding prompt. `None` or empty input cancels it.
    ///
    /// The command runs against the selection saved when the button was
    /// clicked. Answers to stale tickets are ignored.
    pub fn complete_prompt(&mut self, ticket: Ticket, answer: Option<String>) -> bool {
        if self.pending.as_ref().map(PendingPrompt::ticket) != Some(ticket) {
            debug!("Ignoring answer to stale prompt {:?}", ticket);
            return false;
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let command = pending.request.command;
        let Some(answer) = accepted_answer(answer) else {
            debug!("Prompt for {} cancelled", command.name());
            return false;
        };

        self.engine.set_selection(pending.selection);
        let changed = self.engine.exec(command, Some(&answer));
        self.sync_mirror();
        changed
    }

    /// Drop the outstanding prompt, if any.
    pub fn cancel_prompt(&mut self) {
        self.pending = None;
    }

    pub fn pending_prompt(&self) -> Option<&PromptRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn formatting_state(&self) -> FormattingState {
        self.engine.formatting_state()
    }

    pub fn selection(&self) -> Selection {
        self.engine.selection()
    }

    pub fn plain_text(&self) -> String {
        self.engine.plain_text()
    }

    pub fn styled_runs(&self) -> Vec<StyledRun> {
        self.engine.styled_runs()
    }

    /// Last value written to the mirror field.
    pub fn mirror_value(&self) -> String {
        self.mirror.get()
    }

    pub fn mirror_name(&self) -> &str {
        &self.container_id
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Ids of the mirror field, toolbar and surface, in mount order.
    pub fn element_ids(&self) -> [Id; 3] {
        [self.mirror_id, self.toolbar_id, self.surface_id]
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
