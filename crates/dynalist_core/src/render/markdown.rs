//! Markdown rendering of an outline subtree.
//!
//! # Responsibility
//! - Render nodes as ATX headers until a collapsed ancestor is reached.
//! - Render everything below a collapsed node as a nested bullet list.
//!
//! # Invariants
//! - The start node always renders as a header, even when collapsed.
//! - A collapsed node still renders as a header itself; only its
//!   descendants drop into list mode.
//! - List items indent by four spaces per collapsed level beyond the first.
//! - A collapsed header is followed by one extra blank line after its block.
//! - Notes split into lines on every Unicode line boundary, not only `\n`.

use crate::document::{AncestorPath, Document, DocumentResult};
use crate::model::node::Node;
use log::debug;

const HEADER_MARKER: &str = "#";
const INDENT_UNIT: &str = "    ";
const LIST_BULLET: &str = "- ";

/// Per-call state handed from a node to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderState {
    is_root: bool,
    header_level: usize,
    collapsed_level: usize,
}

impl RenderState {
    fn start() -> Self {
        Self {
            is_root: true,
            header_level: 1,
            collapsed_level: 0,
        }
    }

    fn for_children(self, rendered_as_header: bool, collapsed: bool) -> Self {
        Self {
            is_root: false,
            header_level: self.header_level + usize::from(rendered_as_header),
            collapsed_level: self.collapsed_level + usize::from(collapsed),
        }
    }
}

/// Renders the subtree rooted at `start_node_id` as markdown.
///
/// # Errors
/// - `NotFound` when the start node or any reachable child id is missing.
/// - `CycleDetected` when `children` references loop back on themselves.
pub fn render(doc: &Document, start_node_id: &str) -> DocumentResult<String> {
    let start = doc.get(start_node_id)?;
    let mut markdown = String::new();
    render_node(
        doc,
        start,
        RenderState::start(),
        &mut AncestorPath::default(),
        &mut markdown,
    )?;
    debug!(
        "event=render_markdown module=render status=ok start={} bytes={}",
        start_node_id,
        markdown.len()
    );
    Ok(markdown)
}

/// Converts outline emphasis (`__x__`) to markdown emphasis (`*x*`).
pub fn convert_styling(text: &str) -> String {
    text.replace("__", "*")
}

fn render_node<'a>(
    doc: &'a Document,
    node: &'a Node,
    state: RenderState,
    path: &mut AncestorPath<'a>,
    markdown: &mut String,
) -> DocumentResult<()> {
    path.enter(node)?;
    let content = convert_styling(node.content());
    let note = node.non_empty_note().map(convert_styling);

    let this_node_collapsed = node.is_collapsed() && !state.is_root;
    let ancestor_collapsed = state.collapsed_level > 0 && !state.is_root;
    let collapsed = this_node_collapsed || ancestor_collapsed;
    let as_header = !ancestor_collapsed;

    if as_header {
        push_header(markdown, state.header_level, &content, note.as_deref());
    } else {
        push_list_item(markdown, state.collapsed_level, &content, note.as_deref());
    }

    let child_state = state.for_children(as_header, collapsed);
    for child in doc.children(&node.id)? {
        render_node(doc, child, child_state, path, markdown)?;
    }
    if as_header && this_node_collapsed {
        markdown.push('\n');
    }
    path.leave(node);

    Ok(())
}

fn push_header(markdown: &mut String, level: usize, content: &str, note: Option<&str>) {
    markdown.push_str(&HEADER_MARKER.repeat(level));
    markdown.push(' ');
    markdown.push_str(content);
    markdown.push_str("\n\n");
    if let Some(note) = note {
        markdown.push_str(note);
        markdown.push_str("\n\n");
    }
}

fn push_list_item(
    markdown: &mut String,
    collapsed_level: usize,
    content: &str,
    note: Option<&str>,
) {
    let mut indent = INDENT_UNIT.repeat(collapsed_level.saturating_sub(1));
    markdown.push_str(&indent);
    markdown.push_str(LIST_BULLET);
    markdown.push_str(content);
    markdown.push('\n');

    let Some(note) = note else {
        return;
    };
    indent.push_str(INDENT_UNIT);
    push_indented_line(markdown, &indent, "");
    for line in note_lines(note) {
        push_indented_line(markdown, &indent, line);
    }
    push_indented_line(markdown, &indent, "");
}

/// Splits on `\n`, `\r\n`, lone `\r` and the other Unicode line
/// boundaries (`\x0b`, `\x0c`, `\x1c`-`\x1e`, `\u{85}`, `\u{2028}`, `\u{2029}`).
/// A trailing boundary does not yield an empty last line.
fn note_lines(note: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = note.char_indices().peekable();
    while let Some((position, ch)) = chars.next() {
        if !is_line_boundary(ch) {
            continue;
        }
        lines.push(&note[start..position]);
        start = position + ch.len_utf8();
        if ch == '\r' {
            if let Some(&(next_position, '\n')) = chars.peek() {
                chars.next();
                start = next_position + 1;
            }
        }
    }
    if start < note.len() {
        lines.push(&note[start..]);
    }
    lines
}

fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

fn push_indented_line(markdown: &mut String, indent: &str, line: &str) {
    markdown.push_str(indent);
    markdown.push_str(line);
    markdown.push('\n');
}
