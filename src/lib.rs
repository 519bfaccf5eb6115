//! Inkline
//!
//! A small inline rich-text editor widget. An [`InlineEditor`] mounts a
//! hidden mirror field, a toolbar and a content surface into a container of
//! a host [`Page`], and forwards every edit to an injected
//! [`FormattingEngine`]. The mirror field always carries the serialized
//! content, so a form submission sees what [`InlineEditor::value`] returns.
//!
//! ```
//! use inkline::{InlineEditor, Page};
//!
//! let mut page = Page::new();
//! page.add_container("message");
//!
//! let mut editor = InlineEditor::with_defaults(&mut page, "message", Some("<p>hello</p>"))?;
//! editor.insert_var(" world");
//!
//! assert_eq!(editor.value(), "<p>hello world</p>");
//! assert_eq!(page.submit().get("message"), Some("<p>hello world</p>"));
//! # Ok::<(), inkline::Error>(())
//! ```

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod host;
pub mod markup;
pub mod string_utils;
pub mod template;
pub mod ui;

pub use editor::{ClickOutcome, InlineEditor, InputEvent, PromptRequest, ToolDescriptor};
pub use engine::{FormatCommand, FormattingEngine, MarkupEngine, Selection};
pub use error::{Error, Result};
pub use host::{FormSubmission, Page};
