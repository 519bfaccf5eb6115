//! Markup tree nodes and serialization.

use super::entities::{escape_attribute, escape_text};

/// An attribute as written: name plus optional value (`<input disabled>`).
pub type Attribute = (String, Option<String>);

/// A node in a markup fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Decoded text; escaped again on serialization
    Text(String),
    Comment(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), Some(value.into())));
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Value of the first attribute with this name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// A copy of this element without its children.
    pub fn shell(&self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }

    pub fn is_block(&self) -> bool {
        is_block_element(&self.name)
    }

    /// `<br>`, which reads as a newline in the plain text.
    pub fn is_line_break(&self) -> bool {
        self.name == "br"
    }

    /// A block holding only `<br>`: an empty line with no text of its own.
    pub fn is_placeholder(&self) -> bool {
        self.is_block()
            && matches!(self.children.as_slice(), [Node::Element(br)] if br.is_line_break())
    }
}

impl Node {
    /// Length in bytes of the text this node contributes to the plain text.
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(text) => text.len(),
            Node::Element(el) if el.is_line_break() => LINE_BREAK.len_utf8(),
            Node::Element(el) if el.is_placeholder() => 0,
            Node::Element(el) => children_text_len(&el.children),
            Node::Comment(_) => 0,
        }
    }

    /// Append this node's plain text to `out`.
    pub fn push_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.is_line_break() => out.push(LINE_BREAK),
            Node::Element(el) if el.is_placeholder() => {}
            Node::Element(el) => push_children_text(&el.children, out),
            Node::Comment(_) => {}
        }
    }

    /// Whether this node may sit inside an inline wrapper such as `<b>`.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Element(el) => !el.is_block(),
            Node::Text(_) | Node::Comment(_) => true,
        }
    }

    fn is_block(&self) -> bool {
        matches!(self, Node::Element(el) if el.is_block())
    }
}

/// What `<br>` and block boundaries read as in the plain text.
pub const LINE_BREAK: char = '\n';

/// Whether a line break separates `nodes[i]` from the sibling before it.
///
/// Blocks start and end lines: a break sits between two siblings when
/// either is a block. Comments are skipped.
pub fn breaks_before(nodes: &[Node], i: usize) -> bool {
    let Some(node) = nodes.get(i) else {
        return false;
    };
    if matches!(node, Node::Comment(_)) {
        return false;
    }
    let prev = nodes[..i]
        .iter()
        .rev()
        .find(|n| !matches!(n, Node::Comment(_)));
    match prev {
        Some(prev) => prev.is_block() || node.is_block(),
        None => false,
    }
}

/// Plain text length of a sibling list, counting the breaks between blocks.
pub fn children_text_len(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .enumerate()
        .map(|(i, n)| usize::from(breaks_before(nodes, i)) * LINE_BREAK.len_utf8() + n.text_len())
        .sum()
}

/// Append the plain text of a sibling list to `out`.
pub fn push_children_text(nodes: &[Node], out: &mut String) {
    for (i, node) in nodes.iter().enumerate() {
        if breaks_before(nodes, i) {
            out.push(LINE_BREAK);
        }
        node.push_text(out);
    }
}

/// Elements that never have children or a closing tag.
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements that inline formatting must not wrap.
pub fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "dl"
            | "dd"
            | "dt"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

/// Serialize a node list as markup.
pub fn serialize_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => escape_text(text, out),
            Node::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        escape_attribute(value, out);
                        out.push('"');
                    }
                }
                out.push('>');
                if el.is_void() {
                    continue;
                }
                serialize_nodes(&el.children, out);
                out.push_str("</");
                out.push_str(&el.name);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(nodes: &[Node]) -> String {
        let mut out = String::new();
        serialize_nodes(nodes, &mut out);
        out
    }

    #[test]
    fn serializes_nested_elements() {
        let link = Element::new("a")
            .with_attribute("href", "https://example.com/?a&b")
            .with_children(vec![Node::Text("x < y".into())]);
        let p = Element::new("p").with_children(vec![
            Node::Text("see ".into()),
            Node::Element(link),
        ]);
        assert_eq!(
            render(&[Node::Element(p)]),
            "<p>see <a href=\"https://example.com/?a&amp;b\">x &lt; y</a></p>"
        );
    }

    #[test]
    fn void_elements_have_no_close_tag() {
        let nodes = vec![
            Node::Text("a".into()),
            Node::Element(Element::new("br")),
            Node::Comment(" note ".into()),
        ];
        assert_eq!(render(&nodes), "a<br><!-- note -->");
    }

    #[test]
    fn valueless_attributes_serialize_bare() {
        let mut el = Element::new("span");
        el.attributes.push(("hidden".into(), None));
        assert_eq!(render(&[Node::Element(el)]), "<span hidden></span>");
    }

    #[test]
    fn line_breaks_and_blocks_read_as_newlines() {
        let nodes = vec![
            Node::Element(Element::new("p").with_children(vec![Node::Text("a".into())])),
            Node::Comment("x".into()),
            Node::Element(Element::new("p").with_children(vec![
                Node::Text("b".into()),
                Node::Element(Element::new("br")),
                Node::Text("c".into()),
            ])),
            Node::Text("d".into()),
        ];
        let mut text = String::new();
        push_children_text(&nodes, &mut text);
        assert_eq!(text, "a\nb\nc\nd");
        assert_eq!(children_text_len(&nodes), text.len());

        assert!(!breaks_before(&nodes, 0));
        assert!(!breaks_before(&nodes, 1));
        assert!(breaks_before(&nodes, 2));
        assert!(breaks_before(&nodes, 3));
    }

    #[test]
    fn lone_br_block_is_an_empty_line() {
        let empty = Element::new("p").with_children(vec![Node::Element(Element::new("br"))]);
        assert!(empty.is_placeholder());
        assert!(!Element::new("b")
            .with_children(vec![Node::Element(Element::new("br"))])
            .is_placeholder());

        let nodes = vec![
            Node::Element(Element::new("p").with_children(vec![Node::Text("a".into())])),
            Node::Element(empty),
        ];
        let mut text = String::new();
        push_children_text(&nodes, &mut text);
        assert_eq!(text, "a\n");
        assert_eq!(children_text_len(&nodes), 2);
    }

    #[test]
    fn inline_siblings_share_a_line() {
        let nodes = vec![
            Node::Text("a".into()),
            Node::Element(Element::new("b").with_children(vec![Node::Text("b".into())])),
        ];
        assert!(!breaks_before(&nodes, 1));
        assert_eq!(children_text_len(&nodes), 2);
    }

    #[test]
    fn text_len_ignores_comments_and_tags() {
        let p = Element::new("p").with_children(vec![
            Node::Text("hé".into()),
            Node::Comment("ignored".into()),
            Node::Element(Element::new("b").with_children(vec![Node::Text("llo".into())])),
        ]);
        let node = Node::Element(p);
        assert_eq!(node.text_len(), "héllo".len());

        let mut text = String::new();
        node.push_text(&mut text);
        assert_eq!(text, "héllo");
    }

    #[test]
    fn attribute_lookup_and_classification() {
        let a = Element::new("a").with_attribute("href", "u");
        assert_eq!(a.attribute("href"), Some("u"));
        assert_eq!(a.attribute("title"), None);
        assert!(!a.is_block());
        assert!(Element::new("p").is_block());
        assert!(Element::new("br").is_void());
        assert!(!Node::Element(Element::new("div")).is_inline());
    }
}
