//! Document consistency checks.
//!
//! # Responsibility
//! - Report internal links whose zoom target does not exist in the document.
//!
//! # Invariants
//! - Only links that parse as document URLs for this document are checked.
//! - Links without a zoom node point at the document itself and are valid.
//! - Checks never modify the document.

use crate::document::{Document, DocumentResult, NodeOrder};
use crate::links::{find_links, Link};
use crate::model::node::Node;
use crate::url::parse_url;
use log::warn;
use std::fmt::{Display, Formatter};

/// Severity of one lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl Display for LintLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintMessage {
    pub level: LintLevel,
    /// One-line description of the problem class.
    pub summary: String,
    /// Multi-line context: node id, node content, offending link.
    pub details: String,
}

impl Display for LintMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}\n{}", self.level, self.summary, self.details)
    }
}

/// Checks every node (tree order) for internal links to missing nodes.
///
/// A link is internal when its URL parses and its doc id equals the
/// document's `file_id`. Documents without a `file_id` have no internal links.
///
/// # Errors
/// Propagates traversal failures (dangling child ids, cycles).
pub fn check_bad_internal_links(doc: &Document) -> DocumentResult<Vec<LintMessage>> {
    let mut messages = Vec::new();
    let Some(file_id) = doc.file_id() else {
        return Ok(messages);
    };

    for node in doc.all_nodes(NodeOrder::Tree)? {
        for link in node_links(node) {
            let Ok(url) = parse_url(&link.url) else {
                continue;
            };
            if url.doc_id != file_id {
                continue;
            }
            let Some(target) = url.zoom_node() else {
                continue;
            };
            if doc.has(target) {
                continue;
            }

            warn!(
                "event=lint_bad_internal_link module=lint status=error node={} target={}",
                node.id, target
            );
            messages.push(LintMessage {
                level: LintLevel::Error,
                summary: "Bad internal link (target node does not exist)".to_string(),
                details: format!(
                    "Node id: {}\nContent: {}\nBad link: {}",
                    node.id, node.content(), link.url
                ),
            });
        }
    }

    Ok(messages)
}

fn node_links(node: &Node) -> Vec<Link> {
    let mut links = find_links(node.content());
    if let Some(note) = &node.note {
        links.extend(find_links(note));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::{LintLevel, LintMessage};

    #[test]
    fn message_display_puts_details_on_following_lines() {
        let message = LintMessage {
            level: LintLevel::Error,
            summary: "summary".to_string(),
            details: "a\nb".to_string(),
        };
        assert_eq!(message.to_string(), "ERROR: summary\na\nb");
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(LintLevel::Debug < LintLevel::Info);
        assert!(LintLevel::Warning < LintLevel::Error);
    }
}
