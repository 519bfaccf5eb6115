//! Markup document model
//!
//! A small, forgiving model of the rich content held by a content surface:
//! a fragment parser, a node tree that serializes back to markup, and
//! text-offset edits (insert, delete, wrap and unwrap inline formatting).
//!
//! # Example
//! ```
//! use inkline::markup::{Fragment, Mark};
//!
//! let mut doc = Fragment::parse("<p>hello world</p>");
//! doc.apply_mark(&Mark::Bold, 0, 5);
//! assert_eq!(doc.serialize(), "<p><b>hello</b> world</p>");
//! ```

mod entities;
mod fragment;
mod node;
mod parser;

pub use entities::{decode_entities, escape_attribute, escape_text};
pub use fragment::{Fragment, Mark, StyledRun};
pub use node::{
    breaks_before, is_block_element, is_void_element, Attribute, Element, Node, LINE_BREAK,
};
pub use parser::parse_fragment;
