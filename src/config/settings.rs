//! User settings and preferences for Inkline
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::editor::{default_tools, ToolDescriptor};
use log::debug;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the operating system
    System,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 480.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Variables
// ─────────────────────────────────────────────────────────────────────────────

/// A variable the user can insert as a `{label}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub label: String,
    /// Value substituted in the preview
    #[serde(default)]
    pub sample: String,
}

impl Variable {
    pub fn new(label: impl Into<String>, sample: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sample: sample.into(),
        }
    }
}

fn default_variables() -> Vec<Variable> {
    vec![
        Variable::new("Name", "Alex"),
        Variable::new("Link", "https://example.com"),
        Variable::new("Region", "North"),
        Variable::new("Price", "100"),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,
    /// Content font size in points
    pub font_size: f32,
    /// Minimum height of the content surface in points
    pub surface_min_height: f32,
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor
    // ─────────────────────────────────────────────────────────────────────────
    /// Container the editor mounts into; also the submitted field name
    pub container_id: String,
    /// Toolbar buttons, in order
    pub tools: Vec<ToolDescriptor>,
    /// Variable buttons shown under the toolbar
    pub variables: Vec<Variable>,
    /// Markup the surface starts with when none is given on the command line
    pub initial_content: String,
    /// Show the preview with variables filled in
    pub show_preview: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            font_size: 14.0,
            surface_min_height: 150.0,
            window_size: WindowSize::default(),

            // Editor
            container_id: Self::DEFAULT_CONTAINER_ID.to_string(),
            tools: default_tools(),
            variables: default_variables(),
            initial_content: String::new(),
            show_preview: true,
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Container id used when none is configured.
    pub const DEFAULT_CONTAINER_ID: &'static str = "message";
    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum surface height.
    pub const MIN_SURFACE_HEIGHT: f32 = 40.0;
    /// Maximum surface height.
    pub const MAX_SURFACE_HEIGHT: f32 = 2000.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);
        self.surface_min_height = self
            .surface_min_height
            .clamp(Self::MIN_SURFACE_HEIGHT, Self::MAX_SURFACE_HEIGHT);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        let container_id = self.container_id.trim();
        self.container_id = if container_id.is_empty() {
            Self::DEFAULT_CONTAINER_ID.to_string()
        } else {
            container_id.to_string()
        };

        // Argument commands can only run through a prompt
        self.tools.retain(|tool| {
            let usable = tool.is_usable();
            if !usable {
                debug!("Dropping tool '{}': {} needs a prompt", tool.label, tool.command.name());
            }
            usable
        });

        // Blank and repeated variable labels
        let mut seen: Vec<String> = Vec::new();
        self.variables.retain(|v| {
            let label = v.label.trim();
            if label.is_empty() || seen.iter().any(|s| s == label) {
                return false;
            }
            seen.push(label.to_string());
            true
        });
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FormatCommand;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.surface_min_height, 150.0);
        assert_eq!(settings.container_id, "message");
        assert_eq!(settings.tools, default_tools());
        assert_eq!(settings.variables.len(), 4);
        assert!(settings.initial_content.is_empty());
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(
            serde_json::from_str::<Theme>("\"system\"").unwrap(),
            Theme::System
        );
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings::default();
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"theme": "dark"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.tools, default_tools());
    }

    #[test]
    fn test_custom_toolbar_from_json() {
        let json = r#"{"tools": [{"label": "I", "command": "italic"}]}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(
            settings.tools,
            vec![ToolDescriptor::new("I", FormatCommand::Italic)]
        );
    }

    #[test]
    fn test_sanitize_clamps_sizes() {
        let mut settings = Settings {
            font_size: 2.0,
            surface_min_height: 1e6,
            window_size: WindowSize {
                width: 10.0,
                height: 50000.0,
            },
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.surface_min_height, Settings::MAX_SURFACE_HEIGHT);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_sanitize_drops_unusable_tools() {
        let mut settings = Settings {
            tools: vec![
                ToolDescriptor::new("B", FormatCommand::Bold),
                ToolDescriptor::new("L", FormatCommand::CreateLink),
            ],
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.tools.len(), 1);
        assert_eq!(settings.tools[0].command, FormatCommand::Bold);
    }

    #[test]
    fn test_sanitize_cleans_variables_and_container() {
        let mut settings = Settings {
            container_id: "  ".into(),
            variables: vec![
                Variable::new("Name", "a"),
                Variable::new(" ", "b"),
                Variable::new("Name", "c"),
                Variable::new("City", ""),
            ],
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.container_id, Settings::DEFAULT_CONTAINER_ID);
        let labels: Vec<_> = settings.variables.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["Name", "City"]);
        assert_eq!(settings.variables[0].sample, "a");
    }

    #[test]
    fn test_from_json_sanitized_rejects_bad_json() {
        assert!(Settings::from_json_sanitized("{ nope").is_err());
        assert!(Settings::from_json_sanitized(r#"{"font_size": "big"}"#).is_err());
    }
}
