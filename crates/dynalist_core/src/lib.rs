//! Core logic for working with Dynalist outline documents.
//! This crate only reads documents; fetching and writing them back is left
//! to callers.

pub mod document;
pub mod links;
pub mod lint;
pub mod logging;
pub mod model;
pub mod render;
pub mod url;

pub use document::{Document, DocumentError, DocumentResult, NodeOrder};
pub use links::{find_all_links, find_links, Link};
pub use lint::{check_bad_internal_links, LintLevel, LintMessage};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::node::{Node, NodeId, ROOT_NODE_ID};
pub use render::markdown::{convert_styling, render};
pub use url::{parse_url, DocumentUrl, UrlParseError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
