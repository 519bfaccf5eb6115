//! Variable placeholders
//!
//! Variable buttons insert a `{Label}` placeholder into the content
//! surface. When a message is produced from the editor's value, each
//! placeholder is replaced with a value looked up by its label; any
//! placeholder left without a value is removed.

use crate::markup::escape_text;
use log::warn;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

const PLACEHOLDER_PATTERN: &str = r"\{(.*?)\}";

fn placeholder_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| match Regex::new(PLACEHOLDER_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("Invalid placeholder pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// The text a variable button inserts for `label`.
pub fn placeholder(label: &str) -> String {
    format!("{{{}}}", label)
}

/// Labels referenced by `template`, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<String> {
    let Some(re) = placeholder_regex() else {
        return Vec::new();
    };
    let mut labels: Vec<String> = Vec::new();
    for caps in re.captures_iter(template) {
        let label = &caps[1];
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

/// Replace every `{label}` in `template` with its value. Placeholders with
/// no value are removed. Values are inserted literally.
pub fn render(template: &str, values: &HashMap<String, String>) -> String {
    substitute(template, |label| values.get(label).cloned())
}

/// Like [`render`], but escapes values so they read as text inside markup.
pub fn render_markup(template: &str, values: &HashMap<String, String>) -> String {
    substitute(template, |label| {
        values.get(label).map(|value| {
            let mut out = String::with_capacity(value.len());
            escape_text(value, &mut out);
            out
        })
    })
}

fn substitute(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let Some(re) = placeholder_regex() else {
        return template.to_string();
    };
    re.replace_all(template, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn placeholder_wraps_label_in_braces() {
        assert_eq!(placeholder("Nickname"), "{Nickname}");
        assert_eq!(placeholder(""), "{}");
    }

    #[test]
    fn lists_labels_once_in_order() {
        let template = "{City} · {Name} ({City}) {}";
        assert_eq!(placeholders(template), vec!["City", "Name", ""]);
        assert!(placeholders("no variables").is_empty());
    }

    #[test]
    fn renders_known_and_strips_unknown() {
        let template = "<b>{Name}</b> from {City}{Missing}!";
        let out = render(template, &values(&[("Name", "Ann"), ("City", "Oslo")]));
        assert_eq!(out, "<b>Ann</b> from Oslo!");
    }

    #[test]
    fn values_are_not_rescanned() {
        let out = render("{A}", &values(&[("A", "{B}"), ("B", "x")]));
        assert_eq!(out, "{B}");
    }

    #[test]
    fn render_markup_escapes_values() {
        let out = render_markup("<p>{Name}</p>", &values(&[("Name", "Tom & <Jerry>")]));
        assert_eq!(out, "<p>Tom &amp; &lt;Jerry&gt;</p>");
    }

    #[test]
    fn placeholders_do_not_span_lines() {
        assert_eq!(render("{a\nb}", &HashMap::new()), "{a\nb}");
    }
}
