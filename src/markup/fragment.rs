//! Text-offset editing over a markup fragment.
//!
//! Offsets are byte positions in the fragment's plain text: every text node
//! in document order, with a newline for each `<br>` and between a block
//! and its siblings. Tags and comments occupy no offsets. A block holding
//! only `<br>` is an empty line. Every edit splits text nodes at the range
//! boundaries first, then restructures whole nodes, then normalizes.

use super::node::{
    breaks_before, children_text_len, push_children_text, serialize_nodes, Element, Node,
    LINE_BREAK,
};
use super::parser::parse_fragment;
use crate::string_utils::{ceil_char_boundary, floor_char_boundary};

// ─────────────────────────────────────────────────────────────────────────────
// Marks
// ─────────────────────────────────────────────────────────────────────────────

/// Inline formatting that can be applied over a text range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    /// `<b>`, also recognizes `<strong>`
    Bold,
    /// `<i>`, also recognizes `<em>`
    Italic,
    /// `<a href="...">`
    Link(String),
}

impl Mark {
    /// Whether `el` carries this kind of formatting. Links match any `<a>`.
    pub fn matches(&self, el: &Element) -> bool {
        match self {
            Mark::Bold => matches!(el.name.as_str(), "b" | "strong"),
            Mark::Italic => matches!(el.name.as_str(), "i" | "em"),
            Mark::Link(_) => el.name == "a",
        }
    }

    /// The element used to wrap text when this mark is applied.
    fn wrapper(&self) -> Element {
        match self {
            Mark::Bold => Element::new("b"),
            Mark::Italic => Element::new("i"),
            Mark::Link(url) => Element::new("a").with_attribute("href", url.as_str()),
        }
    }

    fn is_set(&self, run: &StyledRun) -> bool {
        match self {
            Mark::Bold => run.bold,
            Mark::Italic => run.italic,
            Mark::Link(_) => run.link.is_some(),
        }
    }
}

/// A stretch of plain text with uniform formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Target of the innermost enclosing link
    pub link: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Fragment
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed markup fragment that can be edited by text offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn parse(markup: &str) -> Self {
        Self {
            nodes: parse_fragment(markup),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        serialize_nodes(&self.nodes, &mut out);
        out
    }

    /// The plain text that offsets index into.
    pub fn text(&self) -> String {
        let mut out = String::new();
        push_children_text(&self.nodes, &mut out);
        out
    }

    pub fn text_len(&self) -> usize {
        children_text_len(&self.nodes)
    }

    /// The plain text split into runs of uniform formatting.
    pub fn styled_runs(&self) -> Vec<StyledRun> {
        let mut runs = Vec::new();
        collect_runs(&self.nodes, false, false, None, &mut runs);
        runs
    }

    /// Whether every character in `start..end` carries `mark`.
    ///
    /// For a collapsed range this reports the character before the caret,
    /// or the first character when the caret is at the start.
    pub fn has_mark(&self, mark: &Mark, start: usize, end: usize) -> bool {
        let (start, end) = self.clamp(start, end);
        let runs = self.styled_runs();

        if start == end {
            let mut pos = 0;
            let mut at_start = None;
            for run in &runs {
                let run_end = pos + run.text.len();
                if is_line_only(run) {
                    pos = run_end;
                    continue;
                }
                if pos < start && start <= run_end {
                    return mark.is_set(run);
                }
                if pos == start && at_start.is_none() {
                    at_start = Some(mark.is_set(run));
                }
                pos = run_end;
            }
            return at_start.unwrap_or(false);
        }

        let mut pos = 0;
        let mut covered = false;
        for run in &runs {
            let run_end = pos + run.text.len();
            if is_line_only(run) {
                pos = run_end;
                continue;
            }
            if pos < end && run_end > start {
                if !mark.is_set(run) {
                    return false;
                }
                covered = true;
            }
            pos = run_end;
        }
        covered
    }

    /// Link target of the text at `start..end`, if it is all linked.
    pub fn link_target(&self, start: usize, end: usize) -> Option<String> {
        let (start, end) = self.clamp(start, end);
        let mut pos = 0;
        let mut target = None;
        for run in self.styled_runs() {
            let run_end = pos + run.text.len();
            if is_line_only(&run) {
                pos = run_end;
                continue;
            }
            let touches = if start == end {
                pos < start && start <= run_end
            } else {
                pos < end && run_end > start
            };
            if touches {
                match (&target, &run.link) {
                    (_, None) => return None,
                    (None, Some(link)) => target = Some(link.clone()),
                    (Some(seen), Some(link)) if seen != link => return None,
                    _ => {}
                }
            }
            pos = run_end;
        }
        target
    }

    /// Insert text at `offset`. Returns the offset just past it.
    ///
    /// Text is literal except for newlines: a newline inside a block splits
    /// the block, anywhere else it becomes `<br>`.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> usize {
        let (mut caret, _) = self.clamp(offset, offset);
        if text.is_empty() {
            return caret;
        }

        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, line) in text.split(LINE_BREAK).enumerate() {
            if i > 0 {
                self.break_line(caret);
                caret += LINE_BREAK.len_utf8();
            }
            if !line.is_empty() {
                self.insert_literal(caret, line);
                caret += line.len();
            }
        }
        normalize(&mut self.nodes);
        caret
    }

    fn insert_literal(&mut self, offset: usize, text: &str) {
        match locate_insertion(&self.nodes, offset) {
            Some(Insertion::Text(path, at)) => {
                if let Some(target) = text_at_mut(&mut self.nodes, &path) {
                    target.insert_str(at, text);
                }
            }
            Some(Insertion::Child(path, index)) => {
                let placeholder = element_at(&self.nodes, &path).is_some_and(Element::is_placeholder);
                if let Some(children) = children_at_mut(&mut self.nodes, &path) {
                    if placeholder {
                        children.clear();
                    }
                    let index = index.min(children.len());
                    children.insert(index, Node::Text(text.to_string()));
                }
            }
            None => self.nodes.push(Node::Text(text.to_string())),
        }
    }

    /// Start a new line at `offset`.
    fn break_line(&mut self, offset: usize) {
        if let Some((path, block_start)) = enclosing_block(&self.nodes, offset) {
            split_block(&mut self.nodes, &path, offset - block_start);
            return;
        }

        let br = Node::Element(Element::new("br"));
        match locate_insertion(&self.nodes, offset) {
            Some(Insertion::Text(path, at)) => {
                let Some((&index, parent)) = path.split_last() else {
                    return;
                };
                if let Some(siblings) = children_at_mut(&mut self.nodes, parent) {
                    let tail = match siblings.get_mut(index) {
                        Some(Node::Text(text)) => text.split_off(at),
                        _ => return,
                    };
                    siblings.insert(index + 1, Node::Text(tail));
                    siblings.insert(index + 1, br);
                }
            }
            Some(Insertion::Child(path, index)) => {
                if let Some(children) = children_at_mut(&mut self.nodes, &path) {
                    let index = index.min(children.len());
                    children.insert(index, br);
                }
            }
            None => self.nodes.push(br),
        }
    }

    /// Remove the text in `start..end`, pruning wrappers it empties.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let (start, end) = self.clamp(start, end);
        if start == end {
            return;
        }
        delete_in(&mut self.nodes, 0, start, end);
        normalize(&mut self.nodes);
    }

    /// Wrap `start..end` in `mark`, leaving already-marked text alone.
    pub fn apply_mark(&mut self, mark: &Mark, start: usize, end: usize) {
        let (start, end) = self.clamp(start, end);
        if start == end {
            return;
        }
        split_text_at(&mut self.nodes, 0, start);
        split_text_at(&mut self.nodes, 0, end);
        wrap_in(&mut self.nodes, 0, start, end, mark);
        normalize(&mut self.nodes);
    }

    /// Strip `mark` from `start..end`, splitting enclosing elements around it.
    pub fn remove_mark(&mut self, mark: &Mark, start: usize, end: usize) {
        let (start, end) = self.clamp(start, end);
        if start == end {
            return;
        }
        unwrap_in(&mut self.nodes, 0, start, end, mark);
        normalize(&mut self.nodes);
    }

    /// Order the range and snap it to character boundaries of the text.
    fn clamp(&self, a: usize, b: usize) -> (usize, usize) {
        let text = self.text();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        (floor_char_boundary(&text, lo), ceil_char_boundary(&text, hi))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reading
// ─────────────────────────────────────────────────────────────────────────────

/// Start offset of each node's own text in a sibling list beginning at
/// `base`, after any line break before it, and the offset the list ends at.
fn child_offsets(nodes: &[Node], base: usize) -> (Vec<usize>, usize) {
    let mut starts = Vec::with_capacity(nodes.len());
    let mut pos = base;
    for (i, node) in nodes.iter().enumerate() {
        if breaks_before(nodes, i) {
            pos += LINE_BREAK.len_utf8();
        }
        starts.push(pos);
        pos += node.text_len();
    }
    (starts, pos)
}

fn is_line_only(run: &StyledRun) -> bool {
    !run.text.is_empty() && run.text.chars().all(|c| c == LINE_BREAK)
}

fn push_run(out: &mut Vec<StyledRun>, text: &str, bold: bool, italic: bool, link: Option<&str>) {
    match out.last_mut() {
        Some(last) if last.bold == bold && last.italic == italic && last.link.as_deref() == link => {
            last.text.push_str(text)
        }
        _ => out.push(StyledRun {
            text: text.to_string(),
            bold,
            italic,
            link: link.map(str::to_string),
        }),
    }
}

fn collect_runs<'a>(
    nodes: &'a [Node],
    bold: bool,
    italic: bool,
    link: Option<&'a str>,
    out: &mut Vec<StyledRun>,
) {
    let mut buf = [0; 4];
    let newline: &str = LINE_BREAK.encode_utf8(&mut buf);

    for (i, node) in nodes.iter().enumerate() {
        if breaks_before(nodes, i) {
            push_run(out, newline, bold, italic, link);
        }
        match node {
            Node::Text(text) if !text.is_empty() => push_run(out, text, bold, italic, link),
            Node::Element(el) if el.is_line_break() => push_run(out, newline, bold, italic, link),
            Node::Element(el) if !el.is_placeholder() => {
                let bold = bold || Mark::Bold.matches(el);
                let italic = italic || Mark::Italic.matches(el);
                let link = if el.name == "a" {
                    el.attribute("href").or(link)
                } else {
                    link
                };
                collect_runs(&el.children, bold, italic, link, out);
            }
            _ => {}
        }
    }
}

/// Where new text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Insertion {
    /// Inside the text node at this child-index path, at a byte offset
    Text(Vec<usize>, usize),
    /// As a new child at this index of the element at this path
    Child(Vec<usize>, usize),
}

/// Find where an insertion at `offset` belongs.
///
/// The node ending at or containing `offset` wins, so typing continues the
/// formatting of the preceding text. Failing that, a node starting exactly
/// at `offset` is used, then an empty element sitting at `offset`.
fn locate_insertion(nodes: &[Node], offset: usize) -> Option<Insertion> {
    fn walk(
        nodes: &[Node],
        base: usize,
        offset: usize,
        path: &mut Vec<usize>,
        at_start: &mut Option<Insertion>,
    ) -> Option<Insertion> {
        let (starts, _) = child_offsets(nodes, base);
        for (i, node) in nodes.iter().enumerate() {
            let start = starts[i];
            let end = start + node.text_len();
            match node {
                Node::Text(_) => {
                    if start < offset && offset <= end {
                        let mut hit = path.clone();
                        hit.push(i);
                        return Some(Insertion::Text(hit, offset - start));
                    }
                    if start == offset && at_start.is_none() {
                        let mut hit = path.clone();
                        hit.push(i);
                        *at_start = Some(Insertion::Text(hit, 0));
                    }
                }
                Node::Element(el) if el.is_line_break() => {
                    if start < offset && offset <= end {
                        return Some(Insertion::Child(path.clone(), i + 1));
                    }
                    if start == offset && at_start.is_none() {
                        *at_start = Some(Insertion::Child(path.clone(), i));
                    }
                }
                Node::Element(el) => {
                    path.push(i);
                    if !el.is_placeholder() {
                        if let Some(hit) = walk(&el.children, start, offset, path, at_start) {
                            return Some(hit);
                        }
                    }
                    if start == offset && end == offset && !el.is_void() && at_start.is_none() {
                        *at_start = Some(Insertion::Child(path.clone(), 0));
                    }
                    path.pop();
                }
                Node::Comment(_) => {}
            }
        }
        None
    }

    let mut at_start = None;
    walk(nodes, 0, offset, &mut Vec::new(), &mut at_start).or(at_start)
}

/// The innermost block whose text spans `offset`, as a child-index path
/// plus the block's start offset.
fn enclosing_block(nodes: &[Node], offset: usize) -> Option<(Vec<usize>, usize)> {
    fn walk(
        nodes: &[Node],
        base: usize,
        offset: usize,
        path: &mut Vec<usize>,
    ) -> Option<(Vec<usize>, usize)> {
        let (starts, _) = child_offsets(nodes, base);
        for (i, node) in nodes.iter().enumerate() {
            let Node::Element(el) = node else {
                continue;
            };
            let start = starts[i];
            if offset < start || offset > start + node.text_len() {
                continue;
            }
            path.push(i);
            if !el.is_placeholder() {
                if let Some(hit) = walk(&el.children, start, offset, path) {
                    return Some(hit);
                }
            }
            if el.is_block() {
                return Some((path.clone(), start));
            }
            path.pop();
        }
        None
    }

    walk(nodes, 0, offset, &mut Vec::new())
}

fn text_at_mut<'a>(nodes: &'a mut [Node], path: &[usize]) -> Option<&'a mut String> {
    let (&first, rest) = path.split_first()?;
    match nodes.get_mut(first)? {
        Node::Text(text) if rest.is_empty() => Some(text),
        Node::Element(el) => text_at_mut(&mut el.children, rest),
        _ => None,
    }
}

fn element_at<'a>(nodes: &'a [Node], path: &[usize]) -> Option<&'a Element> {
    let (&first, rest) = path.split_first()?;
    match nodes.get(first)? {
        Node::Element(el) if rest.is_empty() => Some(el),
        Node::Element(el) => element_at(&el.children, rest),
        _ => None,
    }
}

/// The children of the element at `path`; the top-level list for an empty path.
fn children_at_mut<'a>(nodes: &'a mut Vec<Node>, path: &[usize]) -> Option<&'a mut Vec<Node>> {
    let Some((&first, rest)) = path.split_first() else {
        return Some(nodes);
    };
    match nodes.get_mut(first)? {
        Node::Element(el) => children_at_mut(&mut el.children, rest),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Restructuring
// ─────────────────────────────────────────────────────────────────────────────

/// Split any text node strictly straddling `offset`.
fn split_text_at(nodes: &mut Vec<Node>, base: usize, offset: usize) {
    let (starts, _) = child_offsets(nodes, base);
    // Back to front, so inserted tails leave earlier indices alone
    for i in (0..nodes.len()).rev() {
        let start = starts[i];
        let tail = match &mut nodes[i] {
            Node::Text(text) if start < offset && offset < start + text.len() => {
                Some(text.split_off(offset - start))
            }
            Node::Element(el) if !el.is_placeholder() => {
                split_text_at(&mut el.children, start, offset);
                None
            }
            _ => None,
        };
        if let Some(tail) = tail {
            nodes.insert(i + 1, Node::Text(tail));
        }
    }
}

/// Wrap maximal runs of inline siblings lying inside `start..end`.
/// Text nodes must already be split at the boundaries.
fn wrap_in(nodes: &mut Vec<Node>, base: usize, start: usize, end: usize, mark: &Mark) {
    let (starts, _) = child_offsets(nodes, base);
    let old = std::mem::take(nodes);
    let mut run: Vec<Node> = Vec::new();

    for (mut node, node_start) in old.into_iter().zip(starts) {
        let len = node.text_len();
        let node_end = node_start + len;

        if len > 0 && node_start >= start && node_end <= end && node.is_inline() {
            run.push(node);
            continue;
        }
        flush_run(&mut run, nodes, mark);

        if let Node::Element(el) = &mut node {
            let intersects = len > 0 && node_start < end && node_end > start;
            if intersects && !mark.matches(el) {
                wrap_in(&mut el.children, node_start, start, end, mark);
            }
        }
        nodes.push(node);
    }
    flush_run(&mut run, nodes, mark);
}

fn flush_run(run: &mut Vec<Node>, out: &mut Vec<Node>, mark: &Mark) {
    if run.is_empty() {
        return;
    }
    let children = unwrap_marks(std::mem::take(run), mark);
    out.push(Node::Element(mark.wrapper().with_children(children)));
}

/// Replace every element carrying `mark` with its children.
fn unwrap_marks(nodes: Vec<Node>, mark: &Mark) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(el) if mark.matches(&el) => out.extend(unwrap_marks(el.children, mark)),
            Node::Element(mut el) => {
                el.children = unwrap_marks(std::mem::take(&mut el.children), mark);
                out.push(Node::Element(el));
            }
            other => out.push(other),
        }
    }
    out
}

/// Remove `mark` from `start..end`. A marked element crossing the range is
/// split into a marked left part, the unmarked middle, and a marked right part.
fn unwrap_in(nodes: &mut Vec<Node>, base: usize, start: usize, end: usize, mark: &Mark) {
    let (starts, _) = child_offsets(nodes, base);
    let old = std::mem::take(nodes);

    for (node, node_start) in old.into_iter().zip(starts) {
        let node_end = node_start + node.text_len();
        let overlaps = node_end > node_start && node_start < end && node_end > start;

        match node {
            Node::Element(el) if overlaps && mark.matches(&el) => {
                let cut_start = start.max(node_start) - node_start;
                let cut_end = end.min(node_end) - node_start;
                let (left, rest) = split_element(el, cut_start);
                let (middle, right) = split_element(rest, cut_end - cut_start);
                if !left.children.is_empty() {
                    nodes.push(Node::Element(left));
                }
                nodes.extend(unwrap_marks(middle.children, mark));
                if !right.children.is_empty() {
                    nodes.push(Node::Element(right));
                }
            }
            Node::Element(mut el) if overlaps => {
                unwrap_in(&mut el.children, node_start, start, end, mark);
                nodes.push(Node::Element(el));
            }
            other => nodes.push(other),
        }
    }
}

/// Split an element at a text offset relative to its own start. Both halves
/// keep the element's name and attributes.
fn split_element(el: Element, at: usize) -> (Element, Element) {
    let mut left = el.shell();
    let mut right = el.shell();
    let (starts, _) = child_offsets(&el.children, 0);

    for (child, start) in el.children.into_iter().zip(starts) {
        let len = child.text_len();
        if start + len <= at {
            left.children.push(child);
        } else if start >= at {
            right.children.push(child);
        } else {
            let (l, r) = split_node(child, at - start);
            left.children.push(l);
            right.children.push(r);
        }
    }
    (left, right)
}

fn split_node(node: Node, at: usize) -> (Node, Node) {
    match node {
        Node::Text(mut text) => {
            let tail = text.split_off(at);
            (Node::Text(text), Node::Text(tail))
        }
        Node::Element(el) => {
            let (l, r) = split_element(el, at);
            (Node::Element(l), Node::Element(r))
        }
        // Comments have no text and are never straddled
        comment @ Node::Comment(_) => (comment, Node::Text(String::new())),
    }
}

/// Split the block at `path` in two at a text offset relative to its start.
/// A half left without text becomes an empty line.
fn split_block(nodes: &mut Vec<Node>, path: &[usize], at: usize) {
    let Some((&index, parent)) = path.split_last() else {
        return;
    };
    let Some(siblings) = children_at_mut(nodes, parent) else {
        return;
    };
    if !matches!(siblings.get(index), Some(Node::Element(_))) {
        return;
    }
    let Node::Element(block) = siblings.remove(index) else {
        return;
    };

    let (mut left, mut right) = if block.is_placeholder() {
        (block.clone(), block)
    } else {
        split_element(block, at)
    };
    for half in [&mut left, &mut right] {
        if children_text_len(&half.children) == 0 {
            half.children = vec![Node::Element(Element::new("br"))];
        }
    }
    siblings.insert(index, Node::Element(right));
    siblings.insert(index, Node::Element(left));
}

/// Delete text in `start..end`. Returns whether anything was removed.
///
/// Inline elements emptied by the deletion are dropped. Emptied blocks are
/// dropped too, except one that contains the start of the range, which is
/// left as an empty line. Deleting the line break before a sibling joins it
/// onto the line before.
fn delete_in(nodes: &mut Vec<Node>, base: usize, start: usize, end: usize) -> bool {
    let (starts, _) = child_offsets(nodes, base);
    let breaks: Vec<bool> = (0..nodes.len()).map(|i| breaks_before(nodes, i)).collect();
    let old = std::mem::take(nodes);
    let mut removed_any = false;
    // Inline siblings following a line joined into a block go with it
    let mut absorbing = false;

    for (i, mut node) in old.into_iter().enumerate() {
        let node_start = starts[i];
        let len = node.text_len();
        let node_end = node_start + len;
        let joins = breaks[i] && {
            let gap = node_start - LINE_BREAK.len_utf8();
            start <= gap && gap < end
        };
        removed_any |= joins;

        if len > 0 && node_start < end && node_end > start {
            removed_any = true;
            let dropped = match &mut node {
                Node::Text(text) => {
                    let from = start.max(node_start) - node_start;
                    let to = end.min(node_end) - node_start;
                    text.replace_range(from..to, "");
                    text.is_empty()
                }
                Node::Element(el) if el.is_line_break() => true,
                Node::Element(el) => {
                    let removed = delete_in(&mut el.children, node_start, start, end);
                    let hollow = removed && is_hollow(&el.children);
                    if hollow && el.is_block() && node_start <= start {
                        el.children = vec![Node::Element(Element::new("br"))];
                    }
                    hollow && (!el.is_block() || node_start > start)
                }
                Node::Comment(_) => false,
            };
            if dropped {
                continue;
            }
        }

        if joins {
            absorbing = join_line(nodes, node);
        } else if absorbing && node.is_inline() {
            match last_block_mut(nodes) {
                Some(block) => block.children.push(node),
                None => nodes.push(node),
            }
        } else {
            absorbing = false;
            nodes.push(node);
        }
    }
    removed_any
}

/// Move `node` onto the line before it after the break between them was
/// deleted. Returns whether the inline siblings after `node` must follow it
/// into the preceding block.
fn join_line(nodes: &mut Vec<Node>, node: Node) -> bool {
    if let Some(prev) = last_block_mut(nodes) {
        let (content, absorbs) = match node {
            Node::Element(next) if next.is_block() => (line_content(next), false),
            inline => (vec![inline], true),
        };
        if prev.is_placeholder() {
            prev.children.clear();
        }
        prev.children.extend(content);
        return absorbs;
    }

    match node {
        Node::Element(next) if next.is_block() => nodes.extend(line_content(next)),
        node => nodes.push(node),
    }
    false
}

/// The last sibling other than a comment, if it is a block.
fn last_block_mut(nodes: &mut [Node]) -> Option<&mut Element> {
    match nodes.iter_mut().rev().find(|n| !matches!(n, Node::Comment(_)))? {
        Node::Element(el) if el.is_block() => Some(el),
        _ => None,
    }
}

/// The content a block contributes to the line it is joined onto.
fn line_content(block: Element) -> Vec<Node> {
    if block.is_placeholder() {
        Vec::new()
    } else {
        block.children
    }
}

fn is_hollow(nodes: &[Node]) -> bool {
    nodes
        .iter()
        .all(|n| matches!(n, Node::Text(text) if text.is_empty()))
}

/// Inline formatting elements that can be merged when adjacent and identical.
fn is_mergeable(prev: &Element, next: &Element) -> bool {
    matches!(
        prev.name.as_str(),
        "a" | "b" | "em" | "i" | "s" | "strong" | "u"
    ) && prev.name == next.name
        && prev.attributes == next.attributes
}

/// Drop empty text nodes, join adjacent text nodes, and merge adjacent
/// identical formatting elements.
fn normalize(nodes: &mut Vec<Node>) {
    let old = std::mem::take(nodes);
    for node in old {
        let node = match node {
            Node::Text(text) if text.is_empty() => continue,
            Node::Element(mut el) => {
                normalize(&mut el.children);
                Node::Element(el)
            }
            other => other,
        };

        let mergeable = match (nodes.last(), &node) {
            (Some(Node::Text(_)), Node::Text(_)) => true,
            (Some(Node::Element(prev)), Node::Element(el)) => is_mergeable(prev, el),
            _ => false,
        };
        if !mergeable {
            nodes.push(node);
            continue;
        }

        match (nodes.last_mut(), node) {
            (Some(Node::Text(prev)), Node::Text(text)) => prev.push_str(&text),
            (Some(Node::Element(prev)), Node::Element(el)) => {
                prev.children.extend(el.children);
                normalize(&mut prev.children);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edited(markup: &str, edit: impl FnOnce(&mut Fragment)) -> String {
        let mut fragment = Fragment::parse(markup);
        edit(&mut fragment);
        fragment.serialize()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Insertion
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn insert_at_end_of_paragraph() {
        let mut fragment = Fragment::parse("<p>hello</p>");
        let caret = fragment.insert_text(5, " world");
        assert_eq!(caret, 11);
        assert_eq!(fragment.serialize(), "<p>hello world</p>");
    }

    #[test]
    fn insert_continues_preceding_formatting() {
        assert_eq!(
            edited("<b>bold</b> plain", |f| {
                f.insert_text(4, "er");
            }),
            "<b>bolder</b> plain"
        );
    }

    #[test]
    fn insert_at_start_uses_first_text_node() {
        assert_eq!(
            edited("<i>x</i>y", |f| {
                f.insert_text(0, "A");
            }),
            "<i>Ax</i>y"
        );
    }

    #[test]
    fn insert_into_empty_fragment() {
        assert_eq!(
            edited("", |f| {
                f.insert_text(0, "abc");
            }),
            "abc"
        );
    }

    #[test]
    fn insert_replaces_br_placeholder() {
        assert_eq!(
            edited("<p><br></p>", |f| {
                f.insert_text(0, "abc");
            }),
            "<p>abc</p>"
        );
    }

    #[test]
    fn inserted_markup_is_literal_text() {
        let mut fragment = Fragment::parse("<p></p>");
        fragment.insert_text(0, "<b>&");
        assert_eq!(fragment.serialize(), "<p>&lt;b&gt;&amp;</p>");
        assert_eq!(fragment.text(), "<b>&");
    }

    #[test]
    fn newline_splits_paragraph() {
        let mut fragment = Fragment::parse("<p>a<b>bc</b></p>");
        let caret = fragment.insert_text(2, "\n");
        assert_eq!(caret, 3);
        assert_eq!(fragment.serialize(), "<p>a<b>b</b></p><p><b>c</b></p>");
        assert_eq!(fragment.text(), "ab\nc");
    }

    #[test]
    fn newline_at_end_of_paragraph_opens_empty_line() {
        let mut fragment = Fragment::parse("<p>hello</p>");
        let caret = fragment.insert_text(5, "\n");
        assert_eq!(fragment.serialize(), "<p>hello</p><p><br></p>");
        assert_eq!(fragment.text(), "hello\n");

        fragment.insert_text(caret, "x");
        assert_eq!(fragment.serialize(), "<p>hello</p><p>x</p>");
    }

    #[test]
    fn newline_outside_blocks_becomes_br() {
        let mut fragment = Fragment::parse("ab");
        assert_eq!(fragment.insert_text(1, "\n"), 2);
        assert_eq!(fragment.serialize(), "a<br>b");
        assert_eq!(fragment.text(), "a\nb");
    }

    #[test]
    fn pasted_lines_become_breaks() {
        let mut fragment = Fragment::parse("");
        assert_eq!(fragment.insert_text(0, "one\r\ntwo\n"), 8);
        assert_eq!(fragment.serialize(), "one<br>two<br>");
        assert_eq!(fragment.text(), "one\ntwo\n");

        fragment.insert_text(8, "three");
        assert_eq!(fragment.serialize(), "one<br>two<br>three");
    }

    #[test]
    fn text_reads_breaks_as_newlines() {
        assert_eq!(Fragment::parse("<p>a</p><p>b</p>").text(), "a\nb");
        assert_eq!(Fragment::parse("a<br>b").text(), "a\nb");
        assert_eq!(Fragment::parse("<p>a</p><!-- c --><p>b</p>").text(), "a\nb");
        assert_eq!(Fragment::parse("<p>a</p>b").text(), "a\nb");
        assert_eq!(Fragment::parse("<p>a</p><p><br></p>").text(), "a\n");
    }

    #[test]
    fn insert_at_start_of_second_paragraph() {
        assert_eq!(
            edited("<p>a</p><p>b</p>", |f| {
                f.insert_text(2, "x");
            }),
            "<p>a</p><p>xb</p>"
        );
    }

    #[test]
    fn insert_offset_is_snapped_to_char_boundary() {
        let mut fragment = Fragment::parse("på");
        // Offset 2 is inside 'å'
        let caret = fragment.insert_text(2, "!");
        assert_eq!(fragment.text(), "p!å");
        assert_eq!(caret, 2);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Deletion
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn delete_prunes_emptied_inline_wrappers() {
        assert_eq!(edited("a<b>bc</b>d", |f| f.delete_range(1, 3)), "ad");
    }

    #[test]
    fn delete_partial_text() {
        assert_eq!(edited("<p>hello world</p>", |f| f.delete_range(5, 11)), "<p>hello</p>");
    }

    #[test]
    fn delete_across_paragraphs_keeps_first_block() {
        let mut fragment = Fragment::parse("<p>a</p><p>b</p>");
        fragment.delete_range(0, 3);
        assert_eq!(fragment.serialize(), "<p><br></p>");
        assert_eq!(fragment.text(), "");
        fragment.insert_text(0, "x");
        assert_eq!(fragment.serialize(), "<p>x</p>");
    }

    #[test]
    fn deleting_paragraph_break_joins_blocks() {
        assert_eq!(edited("<p>a</p><p>b</p>", |f| f.delete_range(1, 2)), "<p>ab</p>");
        assert_eq!(edited("<p>a</p><p>b</p>", |f| f.delete_range(0, 2)), "<p>b</p>");
    }

    #[test]
    fn deleting_break_after_block_pulls_inline_text_in() {
        assert_eq!(
            edited("<p>a</p>b<i>c</i><p>d</p>", |f| f.delete_range(1, 2)),
            "<p>ab<i>c</i></p><p>d</p>"
        );
        assert_eq!(edited("a<p>b</p>", |f| f.delete_range(1, 2)), "ab");
    }

    #[test]
    fn deleting_line_break_element() {
        assert_eq!(edited("a<br>b", |f| f.delete_range(1, 2)), "ab");
    }

    #[test]
    fn deleting_into_an_empty_line() {
        let mut fragment = Fragment::parse("<p><br></p><p>b</p>");
        assert_eq!(fragment.text(), "\nb");
        fragment.delete_range(0, 1);
        assert_eq!(fragment.serialize(), "<p>b</p>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Marks
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn apply_bold_wraps_selection() {
        assert_eq!(
            edited("hello world", |f| f.apply_mark(&Mark::Bold, 0, 5)),
            "<b>hello</b> world"
        );
    }

    #[test]
    fn apply_extends_existing_wrapper() {
        assert_eq!(
            edited("<b>hello</b> world", |f| f.apply_mark(&Mark::Bold, 3, 8)),
            "<b>hello wo</b>rld"
        );
    }

    #[test]
    fn apply_wraps_inline_elements_whole() {
        assert_eq!(
            edited("a<i>b</i>c", |f| f.apply_mark(&Mark::Bold, 0, 3)),
            "<b>a<i>b</i>c</b>"
        );
    }

    #[test]
    fn apply_does_not_wrap_blocks() {
        assert_eq!(
            edited("<p>a</p><p>b</p>", |f| f.apply_mark(&Mark::Italic, 0, 3)),
            "<p><i>a</i></p><p><i>b</i></p>"
        );
    }

    #[test]
    fn apply_flattens_nested_duplicates() {
        assert_eq!(
            edited("x<strong>y</strong>z", |f| f.apply_mark(&Mark::Bold, 0, 3)),
            "<b>xyz</b>"
        );
    }

    #[test]
    fn remove_mark_from_prefix() {
        assert_eq!(
            edited("<b>hello world</b>", |f| f.remove_mark(&Mark::Bold, 0, 5)),
            "hello<b> world</b>"
        );
    }

    #[test]
    fn remove_mark_from_middle_splits_wrapper() {
        assert_eq!(
            edited("<b>abc</b>", |f| f.remove_mark(&Mark::Bold, 1, 2)),
            "<b>a</b>b<b>c</b>"
        );
    }

    #[test]
    fn remove_mark_reaches_through_other_elements() {
        assert_eq!(
            edited("<p><em>x<b>y</b></em></p>", |f| f.remove_mark(&Mark::Italic, 0, 2)),
            "<p>x<b>y</b></p>"
        );
    }

    #[test]
    fn link_wraps_with_href() {
        assert_eq!(
            edited("go here", |f| f.apply_mark(&Mark::Link("https://x.test".into()), 3, 7)),
            "go <a href=\"https://x.test\">here</a>"
        );
    }

    #[test]
    fn collapsed_range_is_a_no_op() {
        assert_eq!(edited("abc", |f| f.apply_mark(&Mark::Bold, 1, 1)), "abc");
        assert_eq!(edited("<b>abc</b>", |f| f.remove_mark(&Mark::Bold, 1, 1)), "<b>abc</b>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reading
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn has_mark_over_ranges_and_carets() {
        let fragment = Fragment::parse("<b>ab</b>c");
        assert!(fragment.has_mark(&Mark::Bold, 0, 2));
        assert!(!fragment.has_mark(&Mark::Bold, 0, 3));
        assert!(fragment.has_mark(&Mark::Bold, 2, 2));
        assert!(!fragment.has_mark(&Mark::Bold, 3, 3));
        assert!(fragment.has_mark(&Mark::Bold, 0, 0));
        assert!(!Fragment::default().has_mark(&Mark::Bold, 0, 0));
    }

    #[test]
    fn styled_runs_follow_nesting() {
        let fragment = Fragment::parse("a<b>b<i>c</i></b><a href=\"u\">d</a>");
        let runs = fragment.styled_runs();
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0].text, "a");
        assert!(runs[1].bold && !runs[1].italic);
        assert!(runs[2].bold && runs[2].italic);
        assert_eq!(runs[3].link.as_deref(), Some("u"));
    }

    #[test]
    fn styled_runs_spell_the_text() {
        let fragment = Fragment::parse("<p><b>a</b></p><p>b<br><i>c</i></p>");
        let spelled: String = fragment.styled_runs().iter().map(|r| r.text.as_str()).collect();
        assert_eq!(spelled, fragment.text());
        assert_eq!(spelled, "a\nb\nc");
    }

    #[test]
    fn marks_across_paragraphs_ignore_the_break() {
        let mut fragment = Fragment::parse("<p>a</p><p>b</p>");
        fragment.apply_mark(&Mark::Bold, 0, 3);
        assert_eq!(fragment.serialize(), "<p><b>a</b></p><p><b>b</b></p>");
        assert!(fragment.has_mark(&Mark::Bold, 0, 3));
        assert!(fragment.has_mark(&Mark::Bold, 2, 2));

        fragment.remove_mark(&Mark::Bold, 0, 3);
        assert_eq!(fragment.serialize(), "<p>a</p><p>b</p>");
    }

    #[test]
    fn link_target_requires_uniform_link() {
        let fragment = Fragment::parse("<a href=\"u\">ab</a>c");
        assert_eq!(fragment.link_target(0, 2).as_deref(), Some("u"));
        assert_eq!(fragment.link_target(1, 1).as_deref(), Some("u"));
        assert_eq!(fragment.link_target(0, 3), None);
    }
}
