//! Outline node model.
//!
//! # Responsibility
//! - Define the canonical node record read from a document's `nodes` array.
//! - Preserve absent-vs-empty distinctions for optional fields.
//!
//! # Invariants
//! - `id` is required; every other field is optional on the wire.
//! - Attributes core does not interpret are kept verbatim in `extra`.
//! - Absent optional fields are never emitted on serialization.
//! - An explicit `null` on a typed field is kept in `extra` as `null`, so it
//!   is written back as `null` rather than dropped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier of one node inside a document.
///
/// The API uses opaque strings; the tree root is always [`ROOT_NODE_ID`].
pub type NodeId = String;

/// Id of the canonical tree root.
pub const ROOT_NODE_ID: &str = "root";

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Node {
    /// Unique id within the owning document.
    pub id: NodeId,
    /// Primary text. May contain inline links and `__emphasis__`.
    ///
    /// Absent on the wire is `None`; read it through [`Node::content`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Secondary text shown below the node.
    ///
    /// `None` (absent) and `Some("")` are different states on the wire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Ordered child ids. Absent means no children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeId>>,
    /// Folded state as set by the outline UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Opaque passthrough attributes (`color`, `heading`, `checked`, timestamps).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Creates a node with only `id` and `content` set.
    pub fn new(id: impl Into<NodeId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Some(content.into()),
            note: None,
            children: None,
            collapsed: None,
            extra: Map::new(),
        }
    }

    /// Primary text; `""` when the field is absent.
    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Returns child ids in order; empty when the field is absent.
    pub fn child_ids(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns the note only when it is present and non-empty.
    pub fn non_empty_note(&self) -> Option<&str> {
        self.note.as_deref().filter(|note| !note.is_empty())
    }

    /// Returns whether the node is explicitly folded.
    pub fn is_collapsed(&self) -> bool {
        self.collapsed.unwrap_or(false)
    }
}

impl TryFrom<Map<String, Value>> for Node {
    type Error = String;

    fn try_from(mut raw: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match raw.remove("id") {
            Some(Value::String(id)) => id,
            Some(other) => return Err(format!("`id` must be a string, got {other}")),
            None => return Err("missing `id`".to_string()),
        };
        let content = take_typed(&mut raw, "content")?;
        let note = take_typed(&mut raw, "note")?;
        let children = take_typed(&mut raw, "children")?;
        let collapsed = take_typed(&mut raw, "collapsed")?;

        Ok(Self {
            id,
            content,
            note,
            children,
            collapsed,
            extra: raw,
        })
    }
}

/// Moves `key` out of `raw` as a `T`. A `null` value is left in `raw`.
fn take_typed<T: DeserializeOwned>(
    raw: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<T>, String> {
    match raw.remove(key) {
        None => Ok(None),
        Some(Value::Null) => {
            raw.insert(key.to_string(), Value::Null);
            Ok(None)
        }
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|err| format!("invalid `{key}`: {err}")),
    }
}
