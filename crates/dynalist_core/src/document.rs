//! Read-only tree view over a flat outline document.
//!
//! # Responsibility
//! - Build the `id -> node` index once at construction.
//! - Serve parent/child lookups and the two traversal orders.
//! - Round-trip the document back to JSON without adding or dropping keys.
//!
//! # Invariants
//! - The index holds every node exactly once; duplicate ids are rejected.
//! - Dangling child ids are tolerated at construction and surface as
//!   `NotFound` only when a traversal reaches them.
//! - A `Document` is never mutated after construction.
//! - Walks fail with `CycleDetected` as soon as a node reappears on its own
//!   ancestor path; a node shared by two parents is visited once per parent.

use crate::model::node::{Node, NodeId, ROOT_NODE_ID};
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Read;
use std::str::FromStr;

/// Result type used by document queries.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Envelope key holding the flat node array.
const NODES_KEY: &str = "nodes";

/// Errors from document construction and traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Input does not have the shape of an outline document.
    Malformed(String),
    /// Two nodes share the same id.
    DuplicateNode(NodeId),
    /// Requested or referenced node id is not in the index.
    NotFound(NodeId),
    /// Traversal order name is neither `tree` nor `api`.
    InvalidOrder(String),
    /// A traversal revisited one of its own ancestors.
    CycleDetected(NodeId),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "malformed document: {message}"),
            Self::DuplicateNode(id) => write!(f, "duplicate node id: {id}"),
            Self::NotFound(id) => write!(f, "node not found: {id}"),
            Self::InvalidOrder(order) => {
                write!(f, "invalid node order `{order}`; expected tree|api")
            }
            Self::CycleDetected(id) => write!(f, "cycle detected at node: {id}"),
        }
    }
}

impl Error for DocumentError {}

/// Traversal order for [`Document::all_nodes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodeOrder {
    /// Root first, then a pre-order walk of `children`.
    #[default]
    Tree,
    /// Raw array order as delivered by the API.
    Api,
}

impl NodeOrder {
    /// Wire name of this order.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Api => "api",
        }
    }
}

impl Display for NodeOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeOrder {
    type Err = DocumentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tree" => Ok(Self::Tree),
            "api" => Ok(Self::Api),
            other => Err(DocumentError::InvalidOrder(other.to_string())),
        }
    }
}

/// Outline document: envelope metadata plus an indexed node array.
#[derive(Debug, Clone)]
pub struct Document {
    metadata: Map<String, Value>,
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl Document {
    /// Builds a document from already-decoded JSON.
    ///
    /// # Errors
    /// - `Malformed` when the top level is not an object, `nodes` is missing
    ///   or not an array, or an entry is not an object with a string `id`.
    /// - `DuplicateNode` when two entries share an id.
    pub fn from_value(raw: Value) -> DocumentResult<Self> {
        let Value::Object(mut metadata) = raw else {
            return Err(DocumentError::Malformed(
                "top level must be a JSON object".to_string(),
            ));
        };
        let items = match metadata.remove(NODES_KEY) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(DocumentError::Malformed(
                    "`nodes` must be an array".to_string(),
                ))
            }
            None => {
                return Err(DocumentError::Malformed(
                    "missing `nodes` array".to_string(),
                ))
            }
        };

        let mut nodes = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                return Err(DocumentError::Malformed(format!(
                    "node at position {position} is not an object"
                )));
            }
            let node = serde_json::from_value::<Node>(item).map_err(|err| {
                DocumentError::Malformed(format!("node at position {position}: {err}"))
            })?;
            nodes.push(node);
        }

        let index = build_index(&nodes)?;
        debug!(
            "event=document_index module=document status=ok nodes={}",
            nodes.len()
        );
        Ok(Self {
            metadata,
            nodes,
            index,
        })
    }

    /// Decodes a JSON payload and builds a document from it.
    ///
    /// Decoding failures surface as `Malformed`.
    pub fn from_json_str(payload: &str) -> DocumentResult<Self> {
        let raw = serde_json::from_str::<Value>(payload)
            .map_err(|err| DocumentError::Malformed(format!("invalid JSON: {err}")))?;
        Self::from_value(raw)
    }

    /// Decodes a JSON stream (file, stdin) and builds a document from it.
    pub fn from_reader(reader: impl Read) -> DocumentResult<Self> {
        let raw = serde_json::from_reader::<_, Value>(reader)
            .map_err(|err| DocumentError::Malformed(format!("invalid JSON: {err}")))?;
        Self::from_value(raw)
    }

    /// Returns envelope fields (`file_id`, `title`, `_code`, ...) verbatim.
    ///
    /// The `nodes` array is not part of the envelope; use [`Self::all_nodes`].
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Document id from the envelope, when the API supplied one.
    pub fn file_id(&self) -> Option<&str> {
        self.metadata.get("file_id").and_then(Value::as_str)
    }

    /// Document title from the envelope, when present.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns whether `id` is indexed. Never fails.
    pub fn has(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up one node by id.
    pub fn get(&self, id: &str) -> DocumentResult<&Node> {
        self.index
            .get(id)
            .map(|&position| &self.nodes[position])
            .ok_or_else(|| DocumentError::NotFound(id.to_string()))
    }

    /// Returns the canonical tree root.
    pub fn root(&self) -> DocumentResult<&Node> {
        self.get(ROOT_NODE_ID)
    }

    /// Resolves the node's `children` ids, in order.
    ///
    /// Fails with `NotFound` on the node itself or on the first dangling
    /// child id; callers that need tolerance should pre-check with [`Self::has`].
    pub fn children(&self, id: &str) -> DocumentResult<Vec<&Node>> {
        self.get(id)?
            .child_ids()
            .iter()
            .map(|child_id| self.get(child_id))
            .collect()
    }

    /// Pre-order walk below `id`, excluding `id` itself.
    pub fn descendants(&self, id: &str) -> DocumentResult<Vec<&Node>> {
        let start = self.get(id)?;
        let mut collected = Vec::new();
        self.collect_descendants(start, &mut AncestorPath::default(), &mut collected)?;
        Ok(collected)
    }

    /// Returns every node in the requested order.
    ///
    /// `Api` copies the raw array order. `Tree` is the root followed by its
    /// descendants, so nodes unreachable from the root are not included.
    pub fn all_nodes(&self, order: NodeOrder) -> DocumentResult<Vec<&Node>> {
        match order {
            NodeOrder::Api => Ok(self.nodes.iter().collect()),
            NodeOrder::Tree => {
                let root = self.root()?;
                let mut collected = vec![root];
                self.collect_descendants(root, &mut AncestorPath::default(), &mut collected)?;
                Ok(collected)
            }
        }
    }

    /// Rebuilds the decoded JSON structure this document was built from.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Encodes the document back to a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn collect_descendants<'a>(
        &'a self,
        node: &'a Node,
        path: &mut AncestorPath<'a>,
        collected: &mut Vec<&'a Node>,
    ) -> DocumentResult<()> {
        path.enter(node)?;
        for child in self.children(&node.id)? {
            collected.push(child);
            self.collect_descendants(child, path, collected)?;
        }
        path.leave(node);
        Ok(())
    }
}

/// Ids on the current walk from its start node down to the node being visited.
#[derive(Debug, Default)]
pub(crate) struct AncestorPath<'a> {
    ids: HashSet<&'a str>,
}

impl<'a> AncestorPath<'a> {
    /// Pushes `node`; fails when it is already one of its own ancestors.
    pub(crate) fn enter(&mut self, node: &'a Node) -> DocumentResult<()> {
        if !self.ids.insert(node.id.as_str()) {
            return Err(DocumentError::CycleDetected(node.id.clone()));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self, node: &Node) {
        self.ids.remove(node.id.as_str());
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metadata.len() + 1))?;
        for (key, value) in &self.metadata {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(NODES_KEY, &self.nodes)?;
        map.end()
    }
}

fn build_index(nodes: &[Node]) -> DocumentResult<HashMap<NodeId, usize>> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        if index.insert(node.id.clone(), position).is_some() {
            return Err(DocumentError::DuplicateNode(node.id.clone()));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentError, NodeOrder};
    use serde_json::json;

    fn ids(nodes: &[&crate::Node]) -> Vec<String> {
        nodes.iter().map(|node| node.id.clone()).collect()
    }

    #[test]
    fn node_order_parses_known_names_only() {
        assert_eq!("tree".parse::<NodeOrder>().unwrap(), NodeOrder::Tree);
        assert_eq!("api".parse::<NodeOrder>().unwrap(), NodeOrder::Api);
        assert_eq!(
            "invalid_order".parse::<NodeOrder>().unwrap_err(),
            DocumentError::InvalidOrder("invalid_order".to_string())
        );
    }

    #[test]
    fn self_referencing_node_is_reported_as_cycle() {
        let doc = Document::from_value(json!({
            "nodes": [
                { "id": "root", "content": "r", "children": ["a"] },
                { "id": "a", "content": "a", "children": ["a"] }
            ]
        }))
        .unwrap();

        let err = doc.descendants("root").unwrap_err();
        assert!(matches!(err, DocumentError::CycleDetected(_)));
    }

    #[test]
    fn shared_child_is_not_mistaken_for_cycle() {
        let doc = Document::from_value(json!({
            "nodes": [
                { "id": "root", "content": "r", "children": ["a", "b"] },
                { "id": "a", "content": "a", "children": ["c"] },
                { "id": "b", "content": "b", "children": ["c"] },
                { "id": "c", "content": "c" }
            ]
        }))
        .unwrap();

        let nodes = doc.all_nodes(NodeOrder::Tree).unwrap();
        assert_eq!(ids(&nodes), vec!["root", "a", "c", "b", "c"]);
    }

    #[test]
    fn diamond_below_a_node_is_not_a_cycle() {
        let doc = Document::from_value(json!({
            "nodes": [
                { "id": "root", "content": "r", "children": ["a", "b"] },
                { "id": "a", "content": "a", "children": ["c"] },
                { "id": "b", "content": "b", "children": ["c"] },
                { "id": "c", "content": "c", "children": ["d"] },
                { "id": "d", "content": "d" }
            ]
        }))
        .unwrap();

        assert_eq!(ids(&doc.descendants("a").unwrap()), vec!["c", "d"]);
        assert_eq!(
            ids(&doc.descendants("root").unwrap()),
            vec!["a", "c", "d", "b", "c", "d"]
        );
    }

    #[test]
    fn to_value_matches_serde_encoding() {
        let doc = Document::from_value(json!({
            "file_id": "f",
            "nodes": [{ "id": "root", "content": "r", "note": "", "color": 2 }]
        }))
        .unwrap();

        let via_serde = serde_json::to_value(&doc).unwrap();
        assert_eq!(via_serde, doc.to_value().unwrap());
    }
}
