//! Outline domain model.
//!
//! # Responsibility
//! - Define the node record exactly as delivered by the outline API.
//! - Keep unknown node attributes intact so documents round-trip.
//!
//! # Invariants
//! - Every node is identified by a string `id` unique within its document.
//! - Model types are read-only to core; nothing here mutates a document.

pub mod node;
