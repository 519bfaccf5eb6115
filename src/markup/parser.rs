//! Markup fragment tokenizer and tree builder.
//!
//! This is a forgiving fragment parser, not an HTML5 parser: unmatched end
//! tags are dropped, unclosed elements are closed at end of input, and no
//! implicit elements are inserted.

use super::entities::decode_entities;
use super::node::{is_void_element, Attribute, Element, Node};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

#[derive(Debug, PartialEq, Eq)]
enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Split markup into tokens. Text tokens are entity-decoded.
fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut text_start = 0;
    let mut i = 0;

    // Slice endpoints are only ever taken at ASCII structural bytes, so they
    // stay on UTF-8 boundaries.
    let flush_text = |out: &mut Vec<Token>, from: usize, to: usize| {
        if from < to {
            out.push(Token::Text(decode_entities(&input[from..to])));
        }
    };

    while i < len {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }

        if input[i..].starts_with(COMMENT_START) {
            flush_text(&mut out, text_start, i);
            let body_start = i + COMMENT_START.len();
            match input[body_start..].find(COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(input[body_start..body_start + end].to_string()));
                    i = body_start + end + COMMENT_END.len();
                }
                None => {
                    out.push(Token::Comment(input[body_start..].to_string()));
                    i = len;
                }
            }
            text_start = i;
            continue;
        }

        let next = bytes.get(i + 1).copied();

        // Doctype and other declarations carry nothing a fragment keeps.
        if next == Some(b'!') || next == Some(b'?') {
            flush_text(&mut out, text_start, i);
            i = input[i..].find('>').map(|end| i + end + 1).unwrap_or(len);
            text_start = i;
            continue;
        }

        if next == Some(b'/') {
            let name_start = i + 2;
            let mut j = name_start;
            while j < len && is_name_byte(bytes[j]) {
                j += 1;
            }
            if j == name_start {
                // "</" not followed by a name is literal text
                i += 1;
                continue;
            }
            flush_text(&mut out, text_start, i);
            let name = input[name_start..j].to_ascii_lowercase();
            while j < len && bytes[j] != b'>' {
                j += 1;
            }
            out.push(Token::EndTag(name));
            i = (j + 1).min(len);
            text_start = i;
            continue;
        }

        if !next.is_some_and(|b| b.is_ascii_alphabetic()) {
            // A bare '<' such as "a < b" stays in the text
            i += 1;
            continue;
        }

        flush_text(&mut out, text_start, i);
        let (token, end) = scan_start_tag(input, i + 1);
        out.push(token);
        i = end;
        text_start = i;
    }

    flush_text(&mut out, text_start, len);
    out
}

/// Scan a start tag whose name begins at `start`. Returns the token and the
/// offset just past the closing `>`.
fn scan_start_tag(input: &str, start: usize) -> (Token, usize) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut k = start;
    while k < len && is_name_byte(bytes[k]) {
        k += 1;
    }
    let name = input[start..k].to_ascii_lowercase();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut self_closing = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    loop {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }

        let name_start = k;
        while k < len && is_name_byte(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            // Skip a whole (possibly multi-byte) character we can't use
            k += input[k..].chars().next().map(char::len_utf8).unwrap_or(1);
            continue;
        }
        let attribute_name = input[name_start..k].to_ascii_lowercase();

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let value_start = k;
                while k < len && bytes[k] != quote {
                    k += 1;
                }
                let raw = &input[value_start..k];
                if k < len {
                    k += 1;
                }
                Some(decode_entities(raw))
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                Some(decode_entities(&input[value_start..k]))
            }
        } else {
            None
        };
        attributes.push((attribute_name, value));
    }

    if is_void_element(&name) {
        self_closing = true;
    }

    (
        Token::StartTag {
            name,
            attributes,
            self_closing,
        },
        k,
    )
}

/// Parse a markup fragment into a node list.
pub fn parse_fragment(input: &str) -> Vec<Node> {
    let mut root: Vec<Node> = Vec::new();
    // Open elements, innermost last. Each is attached to its parent when closed.
    let mut open: Vec<Element> = Vec::new();

    fn attach(root: &mut Vec<Node>, open: &mut [Element], node: Node) {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root.push(node),
        }
    }

    for token in tokenize(input) {
        match token {
            Token::Text(text) => attach(&mut root, &mut open, Node::Text(text)),
            Token::Comment(text) => attach(&mut root, &mut open, Node::Comment(text)),
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = Element {
                    name,
                    attributes,
                    children: Vec::new(),
                };
                if self_closing {
                    attach(&mut root, &mut open, Node::Element(element));
                } else {
                    open.push(element);
                }
            }
            Token::EndTag(name) => {
                let Some(depth) = open.iter().rposition(|el| el.name == name) else {
                    continue;
                };
                while open.len() > depth {
                    if let Some(element) = open.pop() {
                        attach(&mut root, &mut open, Node::Element(element));
                    }
                }
            }
        }
    }

    while let Some(element) = open.pop() {
        attach(&mut root, &mut open, Node::Element(element));
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::node::serialize_nodes;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    fn roundtrip(input: &str) -> String {
        let mut out = String::new();
        serialize_nodes(&parse_fragment(input), &mut out);
        out
    }

    #[test]
    fn tokenizes_tags_text_and_comments() {
        let tokens = tokenize("<P class=x>hi<!-- c --></p>");
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "p".into(),
                    attributes: vec![("class".into(), Some("x".into()))],
                    self_closing: false,
                },
                Token::Text("hi".into()),
                Token::Comment(" c ".into()),
                Token::EndTag("p".into()),
            ]
        );
    }

    #[test]
    fn parses_attribute_forms() {
        let nodes = parse_fragment(r#"<a href='u?a=1&amp;b=2' data-x=plain disabled>t</a>"#);
        let Node::Element(a) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(a.attribute("href"), Some("u?a=1&b=2"));
        assert_eq!(a.attribute("data-x"), Some("plain"));
        assert_eq!(a.attributes[2], ("disabled".to_string(), None));
        assert_eq!(a.children, vec![text("t")]);
    }

    #[test]
    fn void_and_self_closing_elements_take_no_children() {
        let nodes = parse_fragment("a<br>b<span/>c");
        assert_eq!(nodes.len(), 5);
        assert!(matches!(&nodes[1], Node::Element(el) if el.name == "br" && el.children.is_empty()));
        assert!(matches!(&nodes[3], Node::Element(el) if el.name == "span" && el.children.is_empty()));
    }

    #[test]
    fn recovers_from_mismatched_tags() {
        assert_eq!(roundtrip("<b>x</i>y</b>"), "<b>xy</b>");
        assert_eq!(roundtrip("<p><b>open"), "<p><b>open</b></p>");
        assert_eq!(roundtrip("<b><i>x</b>y"), "<b><i>x</i></b>y");
    }

    #[test]
    fn bare_angle_brackets_are_text() {
        let nodes = parse_fragment("a < b </ c");
        assert_eq!(nodes, vec![text("a < b </ c")]);
    }

    #[test]
    fn decodes_text_entities() {
        assert_eq!(parse_fragment("&lt;b&gt; &amp;"), vec![text("<b> &")]);
    }

    #[test]
    fn drops_doctype_declarations() {
        assert_eq!(roundtrip("<!DOCTYPE html><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn keeps_utf8_text_intact() {
        assert_eq!(parse_fragment("<i>på 中文 🔗</i>").len(), 1);
        assert_eq!(roundtrip("<i>på 中文 🔗</i>"), "<i>på 中文 🔗</i>");
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert!(parse_fragment("").is_empty());
    }
}
