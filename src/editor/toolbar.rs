//! Toolbar button descriptors.

use crate::engine::FormatCommand;
use serde::{Deserialize, Serialize};

/// One toolbar control: what it shows, what it runs, and whether it has to
/// ask the user for an argument first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Text shown on the button
    pub label: String,
    pub command: FormatCommand,
    /// Ask the user for the command's argument before running it
    #[serde(default)]
    pub prompt: bool,
}

impl ToolDescriptor {
    pub fn new(label: impl Into<String>, command: FormatCommand) -> Self {
        Self {
            label: label.into(),
            command,
            prompt: false,
        }
    }

    pub fn prompting(label: impl Into<String>, command: FormatCommand) -> Self {
        Self {
            prompt: true,
            ..Self::new(label, command)
        }
    }

    /// Whether this descriptor can ever run: argument commands must prompt.
    pub fn is_usable(&self) -> bool {
        self.prompt || !self.command.takes_argument()
    }

    /// Question asked when the tool prompts.
    pub fn prompt_message(&self) -> &'static str {
        match self.command {
            FormatCommand::CreateLink => "URL:",
            FormatCommand::InsertText => "Text:",
            FormatCommand::Bold | FormatCommand::Italic => "",
        }
    }
}

/// Bold, italic, link.
pub fn default_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new("B", FormatCommand::Bold),
        ToolDescriptor::new("I", FormatCommand::Italic),
        ToolDescriptor::prompting("🔗", FormatCommand::CreateLink),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tools_are_bold_italic_link() {
        let tools = default_tools();
        let commands: Vec<_> = tools.iter().map(|t| t.command).collect();
        assert_eq!(
            commands,
            vec![
                FormatCommand::Bold,
                FormatCommand::Italic,
                FormatCommand::CreateLink
            ]
        );
        assert_eq!(tools[0].label, "B");
        assert!(!tools[0].prompt);
        assert!(tools[2].prompt);
        assert!(tools.iter().all(ToolDescriptor::is_usable));
    }

    #[test]
    fn argument_commands_without_prompt_are_unusable() {
        assert!(!ToolDescriptor::new("L", FormatCommand::CreateLink).is_usable());
        assert!(ToolDescriptor::prompting("B", FormatCommand::Bold).is_usable());
    }

    #[test]
    fn descriptor_deserializes_with_optional_prompt() {
        let json = r#"[{"label":"B","command":"bold"},{"label":"L","command":"createLink","prompt":true}]"#;
        let tools: Vec<ToolDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(tools[0], ToolDescriptor::new("B", FormatCommand::Bold));
        assert_eq!(tools[1], ToolDescriptor::prompting("L", FormatCommand::CreateLink));
    }
}
