//! Headless host page
//!
//! A [`Page`] is the region an editor is mounted into: a set of named
//! containers, each holding the elements that widgets append to it. Hidden
//! fields share their value through a [`FieldHandle`], so whoever owns the
//! page can read what a widget last synchronized without going through the
//! widget. [`Page::submit`] collects every hidden field the way a form
//! submission would.

use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

pub type ElementId = u32;

/// Identifier of an element mounted on a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id(pub ElementId);

// ─────────────────────────────────────────────────────────────────────────────
// Field Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Shared value of a hidden field.
///
/// Cloning the handle shares the value; it does not copy it.
#[derive(Debug, Clone, Default)]
pub struct FieldHandle(Rc<RefCell<String>>);

impl FieldHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(value.into())))
    }

    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.0.borrow_mut() = value.into();
    }

    /// Whether two handles share the same value.
    pub fn ptr_eq(&self, other: &FieldHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mounted Elements
// ─────────────────────────────────────────────────────────────────────────────

/// An element appended to a container.
#[derive(Debug, Clone)]
pub enum Mounted {
    /// Non-interactive field carried by form submission
    HiddenField {
        id: Id,
        name: String,
        value: FieldHandle,
    },
    /// Row of buttons, by label
    Toolbar { id: Id, labels: Vec<String> },
    /// Editable rich content region
    Surface { id: Id },
}

impl Mounted {
    pub fn id(&self) -> Id {
        match self {
            Mounted::HiddenField { id, .. } => *id,
            Mounted::Toolbar { id, .. } => *id,
            Mounted::Surface { id } => *id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Mounted::HiddenField { .. } => "hidden-field",
            Mounted::Toolbar { .. } => "toolbar",
            Mounted::Surface { .. } => "surface",
        }
    }
}

/// A pre-existing region of the page, addressed by id.
#[derive(Debug, Clone)]
pub struct Container {
    id: String,
    children: Vec<Mounted>,
}

impl Container {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[Mounted] {
        &self.children
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page
// ─────────────────────────────────────────────────────────────────────────────

/// The page widgets are mounted into. The caller owns it, and with it the
/// lifetime of every container.
#[derive(Debug, Default)]
pub struct Page {
    containers: Vec<Container>,
    next_id: ElementId,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty container. Returns `false` if the id is taken.
    pub fn add_container(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.container(&id).is_some() {
            return false;
        }
        self.containers.push(Container {
            id,
            children: Vec::new(),
        });
        true
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Detach a container and everything mounted in it.
    pub fn remove_container(&mut self, id: &str) -> Option<Container> {
        let index = self.containers.iter().position(|c| c.id == id)?;
        debug!("Removing container '{}'", id);
        Some(self.containers.remove(index))
    }

    /// Append an element to a container, assigning its id.
    ///
    /// `build` receives the new element's id. Returns `None` if the
    /// container does not exist.
    pub fn mount(&mut self, container_id: &str, build: impl FnOnce(Id) -> Mounted) -> Option<Id> {
        let id = Id(self.next_id);
        let container = self.containers.iter_mut().find(|c| c.id == container_id)?;
        container.children.push(build(id));
        self.next_id += 1;
        Some(id)
    }

    /// Every hidden field on the page, in mount order.
    pub fn hidden_fields(&self) -> impl Iterator<Item = (&str, &FieldHandle)> {
        self.containers
            .iter()
            .flat_map(|c| c.children.iter())
            .filter_map(|m| match m {
                Mounted::HiddenField { name, value, .. } => Some((name.as_str(), value)),
                _ => None,
            })
    }

    /// Current value of the first hidden field called `name`.
    pub fn field_value(&self, name: &str) -> Option<String> {
        self.hidden_fields()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.get())
    }

    /// Snapshot every hidden field as a form submission would see it.
    pub fn submit(&self) -> FormSubmission {
        FormSubmission {
            fields: self
                .hidden_fields()
                .map(|(name, value)| (name.to_string(), value.get()))
                .collect(),
        }
    }
}

/// Name/value pairs read from a page's hidden fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub fields: Vec<(String, String)>,
}

impl FormSubmission {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden<'a>(name: &str, value: &'a FieldHandle) -> impl FnOnce(Id) -> Mounted + 'a {
        let name = name.to_string();
        move |id| Mounted::HiddenField {
            id,
            name,
            value: value.clone(),
        }
    }

    #[test]
    fn container_ids_are_unique() {
        let mut page = Page::new();
        assert!(page.add_container("body"));
        assert!(!page.add_container("body"));
        assert_eq!(page.container("body").map(Container::id), Some("body"));
    }

    #[test]
    fn mount_requires_existing_container() {
        let mut page = Page::new();
        assert!(page.mount("missing", |id| Mounted::Surface { id }).is_none());

        page.add_container("a");
        let first = page.mount("a", |id| Mounted::Surface { id });
        let second = page.mount("a", |id| Mounted::Surface { id });
        assert_eq!(first, Some(Id(0)));
        assert_eq!(second, Some(Id(1)));
        assert_eq!(page.container("a").map(|c| c.children().len()), Some(2));
    }

    #[test]
    fn field_handles_share_values() {
        let mut page = Page::new();
        page.add_container("form");
        let field = FieldHandle::new("one");
        page.mount("form", hidden("body", &field));

        field.set("two");
        assert_eq!(page.field_value("body").as_deref(), Some("two"));
        assert_eq!(page.field_value("other"), None);
    }

    #[test]
    fn submit_collects_fields_in_mount_order() {
        let mut page = Page::new();
        page.add_container("a");
        page.add_container("b");
        let first = FieldHandle::new("<b>x</b>");
        let second = FieldHandle::new("y");
        page.mount("b", hidden("second", &second));
        page.mount("a", hidden("first", &first));
        page.mount("a", |id| Mounted::Toolbar {
            id,
            labels: vec!["B".into()],
        });

        let submission = page.submit();
        assert_eq!(
            submission.fields,
            vec![
                ("first".to_string(), "<b>x</b>".to_string()),
                ("second".to_string(), "y".to_string()),
            ]
        );
        assert_eq!(submission.get("second"), Some("y"));

        let json = serde_json::to_string(&submission).unwrap();
        let back: FormSubmission = serde_json::from_str(&json).unwrap();
        assert_eq!(back, submission);
    }

    #[test]
    fn removing_a_container_drops_its_fields() {
        let mut page = Page::new();
        page.add_container("a");
        let field = FieldHandle::new("v");
        page.mount("a", hidden("f", &field));

        let removed = page.remove_container("a");
        assert_eq!(removed.map(|c| c.children().len()), Some(1));
        assert!(page.submit().fields.is_empty());
        assert!(page.remove_container("a").is_none());
    }
}
