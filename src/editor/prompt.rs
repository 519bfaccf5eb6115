//! Argument prompts raised by toolbar clicks.
//!
//! A prompting tool does not block. The click hands back a
//! [`PromptRequest`]; whoever hosts the editor shows a dialog and answers it
//! later with the request's ticket.

use crate::engine::{FormatCommand, Selection};

/// Identifies an outstanding prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

/// A question the host must answer before a command can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub ticket: Ticket,
    pub command: FormatCommand,
    /// Question to show, e.g. "URL:"
    pub message: String,
    /// Suggested answer, such as the link already under the selection
    pub initial: Option<String>,
}

/// What a toolbar click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The command ran. `true` if the content changed.
    Applied(bool),
    /// The command needs an argument first.
    NeedsArgument(PromptRequest),
    /// No tool at that index, or the tool cannot run.
    Ignored,
}

/// A prompt waiting for its answer, with the selection it applies to.
#[derive(Debug, Clone)]
pub(crate) struct PendingPrompt {
    pub request: PromptRequest,
    pub selection: Selection,
}

impl PendingPrompt {
    pub fn ticket(&self) -> Ticket {
        self.request.ticket
    }
}

/// Accept a prompt answer. Cancelled and empty answers mean "do nothing";
/// anything else reaches the command as typed.
pub(crate) fn accepted_answer(answer: Option<String>) -> Option<String> {
    answer.filter(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_and_empty_answers_are_rejected() {
        assert_eq!(accepted_answer(None), None);
        assert_eq!(accepted_answer(Some(String::new())), None);
    }

    #[test]
    fn answers_pass_through_untrimmed() {
        assert_eq!(accepted_answer(Some("  \t".into())).as_deref(), Some("  \t"));
        assert_eq!(
            accepted_answer(Some(" https://a.test ".into())).as_deref(),
            Some(" https://a.test ")
        );
    }
}
