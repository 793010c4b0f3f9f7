//! Dataset model
//!
//! A dataset is a directed decision graph: question nodes branch through
//! answer options into other nodes until an outcome or link node is reached.
//!
//! The model is deliberately tolerant: unknown fields are kept in each
//! record's `extra` map and written back on serialization, and fields the
//! original authoring format treats as optional (titles, labels, the version)
//! default instead of failing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use super::id::NodeId;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset does not match the expected shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Branches through its options
    Question,
    /// Terminal result
    Outcome,
    /// Terminal cross-reference to external material
    Link,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Question => "question",
            NodeType::Outcome => "outcome",
            NodeType::Link => "link",
        }
    }

    /// Outcome and link nodes end a walk
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NodeType::Question)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answer choice of a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    #[serde(default)]
    pub label: String,

    pub next: NodeId,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnswerOption {
    pub fn new(label: impl Into<String>, next: impl Into<NodeId>) -> Self {
        Self {
            label: label.into(),
            next: next.into(),
            extra: Map::new(),
        }
    }
}

/// External reference shown alongside a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoLink {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub href: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Presentation hints attached to a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badges: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<InfoLink>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A vertex of the decision graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Filled from the map key on promotion when the body omits it
    #[serde(default)]
    pub id: NodeId,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub kind: NodeType,

    /// Only meaningful for questions; absent and empty are kept apart so the
    /// record round-trips unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<NodeInfo>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TreeNode {
    fn with_kind(id: impl Into<NodeId>, title: impl Into<String>, kind: NodeType) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            kind,
            options: None,
            info: None,
            extra: Map::new(),
        }
    }

    /// Creates a question node with the given options
    pub fn question(
        id: impl Into<NodeId>,
        title: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        let mut node = Self::with_kind(id, title, NodeType::Question);
        node.options = Some(options);
        node
    }

    /// Creates an outcome node
    pub fn outcome(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self::with_kind(id, title, NodeType::Outcome)
    }

    /// Creates a link node
    pub fn link(id: impl Into<NodeId>, title: impl Into<String>) -> Self {
        Self::with_kind(id, title, NodeType::Link)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_question(&self) -> bool {
        self.kind == NodeType::Question
    }

    /// Options a walk may follow from this node.
    ///
    /// Terminal nodes never expose options, even when the record carries some.
    pub fn answer_options(&self) -> &[AnswerOption] {
        match (&self.kind, &self.options) {
            (NodeType::Question, Some(options)) => options,
            _ => &[],
        }
    }

    /// A question without usable options
    pub fn is_dead_end(&self) -> bool {
        self.is_question() && self.answer_options().is_empty()
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.id.as_str()
        } else {
            &self.title
        }
    }
}

/// A complete decision graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,

    pub root_id: NodeId,

    pub nodes: IndexMap<NodeId, TreeNode>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// Creates an empty dataset rooted at `root_id`
    pub fn new(root_id: impl Into<NodeId>) -> Self {
        Self {
            version: Some(1),
            root_id: root_id.into(),
            nodes: IndexMap::new(),
            extra: Map::new(),
        }
    }

    /// Adds a node, keyed by its id
    pub fn with_node(mut self, node: TreeNode) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    /// Promotes an untyped candidate into the typed model.
    ///
    /// Callers run the structural check first; this only fails on shape
    /// problems that check does not look at (unknown node types, non-list
    /// options and the like).
    pub fn from_value(value: Value) -> Result<Self, DatasetError> {
        let mut dataset: Dataset = serde_json::from_value(value)?;
        for (key, node) in dataset.nodes.iter_mut() {
            if node.id.is_empty() {
                node.id = key.clone();
            }
        }
        Ok(dataset)
    }

    /// Serializes back to the exchange format
    pub fn to_value(&self) -> Result<Value, DatasetError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Looks up a node by id
    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// The entry node, if the root id resolves
    pub fn root(&self) -> Option<&TreeNode> {
        self.node(self.root_id.as_str())
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in declaration order
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.keys()
    }

    /// Stem used for report filenames
    pub fn filename_stem(&self) -> &str {
        if self.root_id.is_empty() {
            "dataset"
        } else {
            self.root_id.as_str()
        }
    }

    /// Short content hash identifying this exact dataset
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let hash = blake3::hash(&bytes);
        hash.to_hex()[..16].to_string()
    }
}
