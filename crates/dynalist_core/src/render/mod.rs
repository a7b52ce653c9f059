//! Document renderers.
//!
//! # Responsibility
//! - Turn a document subtree into human-readable text.
//!
//! # Invariants
//! - Rendering only reads the document; unresolved child ids are hard errors.

pub mod markdown;
