//! Link extraction from node text.
//!
//! # Responsibility
//! - Find markdown links `[title](url)` in free text.
//! - Optionally find bare `http(s)://` URLs alongside them.
//!
//! # Invariants
//! - Results are ordered by position in the source text.
//! - No nesting: the first `]` ends a title and the first `)` ends a url.
//! - Empty input yields an empty list.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://[^\s<>\[\]()]+").expect("valid bare url regex"));

/// One link found in node text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Bracketed text; empty for bare URLs.
    pub title: String,
    pub url: String,
    /// Byte offset of the link in the scanned text.
    pub offset: usize,
}

impl Link {
    pub fn new(title: impl Into<String>, url: impl Into<String>, offset: usize) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            offset,
        }
    }
}

/// Finds markdown-style links in order of appearance.
pub fn find_links(text: &str) -> Vec<Link> {
    MARKDOWN_LINK_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Link::new(&caps[1], &caps[2], whole.start()))
        })
        .collect()
}

/// Finds markdown links and bare URLs in order of appearance.
///
/// Bare URLs that sit inside a markdown link are not reported twice.
pub fn find_all_links(text: &str) -> Vec<Link> {
    let mut links = find_links(text);
    let spans = MARKDOWN_LINK_RE
        .find_iter(text)
        .map(|m| m.range())
        .collect::<Vec<_>>();

    for bare in BARE_URL_RE.find_iter(text) {
        let inside_markdown = spans
            .iter()
            .any(|span| span.start <= bare.start() && bare.end() <= span.end);
        if !inside_markdown {
            links.push(Link::new("", bare.as_str(), bare.start()));
        }
    }

    links.sort_by_key(|link| link.offset);
    links
}

#[cfg(test)]
mod tests {
    use super::{find_all_links, find_links};

    #[test]
    fn first_closing_bracket_ends_title() {
        let links = find_links("[a]b](u)");
        assert!(links.is_empty());

        let links = find_links("[t](a)b)");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "a");
    }

    #[test]
    fn empty_title_or_url_is_not_a_link() {
        assert!(find_links("[](u)").is_empty());
        assert!(find_links("[t]()").is_empty());
    }

    #[test]
    fn bare_url_inside_markdown_link_is_reported_once() {
        let links = find_all_links("see [Example](https://www.example.com)");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Example");
    }

    #[test]
    fn offsets_point_at_link_start() {
        let text = "ab [x](y)";
        let links = find_links(text);
        assert_eq!(links[0].offset, 3);
        assert!(text[links[0].offset..].starts_with('['));
    }
}
