//! Document URL parsing.
//!
//! # Responsibility
//! - Split a document link into document id, zoom node id and query.
//!
//! # Invariants
//! - Exactly four shapes are accepted: plain, zoom, query, zoom + query.
//! - `doc_id` and `zoom_node_id` only contain `[a-zA-Z0-9_-]`.
//! - Absent parts are empty strings, never missing.

use crate::model::node::ROOT_NODE_ID;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static PLAIN_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/#\s]+/d/([a-zA-Z0-9_-]+)$").expect("valid plain url regex")
});
static ZOOM_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/#\s]+/d/([a-zA-Z0-9_-]+)#z=([a-zA-Z0-9_-]+)?$")
        .expect("valid zoom url regex")
});
static QUERY_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/#\s]+/d/([a-zA-Z0-9_-]+)#q=(.*)$").expect("valid query url regex")
});
static ZOOM_QUERY_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://[^/#\s]+/d/([a-zA-Z0-9_-]+)#z=([a-zA-Z0-9_-]+)&q=(.*)$")
        .expect("valid zoom query url regex")
});

/// URL does not match any accepted document link shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParseError {
    /// The rejected input, verbatim.
    pub input: String,
}

impl Display for UrlParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a document URL: `{}`", self.input)
    }
}

impl Error for UrlParseError {}

/// Parsed document link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUrl {
    pub doc_id: String,
    /// Empty when the link is not zoomed.
    pub zoom_node_id: String,
    /// Raw text after `q=`, empty when absent.
    pub query: String,
}

impl DocumentUrl {
    pub fn zoom_node(&self) -> Option<&str> {
        non_empty(&self.zoom_node_id)
    }

    pub fn query_text(&self) -> Option<&str> {
        non_empty(&self.query)
    }

    /// Node a renderer should start from: the zoom target, else the root.
    pub fn start_node(&self) -> &str {
        self.zoom_node().unwrap_or(ROOT_NODE_ID)
    }
}

impl FromStr for DocumentUrl {
    type Err = UrlParseError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        parse_url(url)
    }
}

/// Parses a document link.
///
/// Shapes, tried in order:
/// - `<base>/d/<doc>`
/// - `<base>/d/<doc>#z=<zoom>` (zoom may be empty)
/// - `<base>/d/<doc>#q=<query>`
/// - `<base>/d/<doc>#z=<zoom>&q=<query>`
///
/// where `<base>` is an `http(s)` scheme and host.
///
/// # Errors
/// Returns `UrlParseError` carrying the input when no shape matches,
/// including for an empty string.
pub fn parse_url(url: &str) -> Result<DocumentUrl, UrlParseError> {
    if let Some(caps) = PLAIN_URL_RE.captures(url) {
        return Ok(DocumentUrl {
            doc_id: capture(&caps, 1),
            ..DocumentUrl::default()
        });
    }
    if let Some(caps) = ZOOM_URL_RE.captures(url) {
        return Ok(DocumentUrl {
            doc_id: capture(&caps, 1),
            zoom_node_id: capture(&caps, 2),
            ..DocumentUrl::default()
        });
    }
    if let Some(caps) = QUERY_URL_RE.captures(url) {
        return Ok(DocumentUrl {
            doc_id: capture(&caps, 1),
            query: capture(&caps, 2),
            ..DocumentUrl::default()
        });
    }
    if let Some(caps) = ZOOM_QUERY_URL_RE.captures(url) {
        return Ok(DocumentUrl {
            doc_id: capture(&caps, 1),
            zoom_node_id: capture(&caps, 2),
            query: capture(&caps, 3),
        });
    }

    Err(UrlParseError {
        input: url.to_string(),
    })
}

fn capture(caps: &regex::Captures<'_>, group: usize) -> String {
    caps.get(group)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::{parse_url, DocumentUrl};

    #[test]
    fn empty_zoom_parses_as_absent() {
        let url = parse_url("https://dynalist.io/d/abc#z=").unwrap();
        assert_eq!(url.doc_id, "abc");
        assert_eq!(url.zoom_node_id, "");
        assert_eq!(url.zoom_node(), None);
        assert_eq!(url.start_node(), "root");
    }

    #[test]
    fn query_keeps_trailing_text_verbatim() {
        let url = parse_url("https://dynalist.io/d/abc#q=tag:#todo & more").unwrap();
        assert_eq!(url.query, "tag:#todo & more");
        assert_eq!(url.zoom_node_id, "");
    }

    #[test]
    fn from_str_delegates_to_parse_url() {
        let url: DocumentUrl = "https://dynalist.io/d/abc#z=n1".parse().unwrap();
        assert_eq!(url.start_node(), "n1");
    }

    #[test]
    fn invalid_id_characters_are_rejected() {
        let err = parse_url("https://dynalist.io/d/a.b").unwrap_err();
        assert_eq!(err.input, "https://dynalist.io/d/a.b");
        assert!(parse_url("https://dynalist.io/d/abc#z=x y").is_err());
    }
}
