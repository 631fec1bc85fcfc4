//! # Editor State
//!
//! One explicit, versioned value bundling the tree snapshot with selection,
//! hover, the active viewport and the editing mode. Operations take a state
//! and return a new one; nothing here is shared mutable.

use crate::errors::EditorError;
use crate::index::NodeIndex;
use pagesmith_document::{Node, ViewportClass};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Immutable tree plus its id index. Cloning is cheap (two `Arc`s).
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: Arc<Node>,
    index: Arc<NodeIndex>,
}

impl Snapshot {
    /// Wrap a full tree, validating its invariants
    pub fn new(root: Node) -> Result<Self, EditorError> {
        let index = NodeIndex::build(&root)?;
        Ok(Self {
            root: Arc::new(root),
            index: Arc::new(index),
        })
    }

    /// Put a forest under a fresh root
    pub fn from_forest(nodes: Vec<Node>) -> Result<Self, EditorError> {
        Self::new(Node::root(nodes))
    }

    /// A root with no children
    pub fn empty() -> Self {
        let root = Node::root(Vec::new());
        let index = NodeIndex::childless_root(&root.id);
        Self {
            root: Arc::new(root),
            index: Arc::new(index),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn index(&self) -> &NodeIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.index.find(&self.root, id)
    }

    pub fn find_parent(&self, id: &str) -> Option<&Node> {
        let parent = self.index.parent_of(id)?;
        self.find(parent)
    }

    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        self.index.path_to(id)
    }

    pub fn is_descendant(&self, ancestor_id: &str, candidate_id: &str) -> bool {
        self.index.is_descendant(ancestor_id, candidate_id)
    }

    /// Children of `id` (empty for leaves and unknown ids)
    pub fn children_of(&self, id: &str) -> &[Node] {
        self.find(id).map(Node::children).unwrap_or(&[])
    }

    /// Owned copy of the tree
    pub fn to_node(&self) -> Node {
        (*self.root).clone()
    }

    /// Whether two snapshots share the same allocation
    pub fn ptr_eq(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.root == other.root
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let root = Node::deserialize(deserializer)?;
        Snapshot::new(root).map_err(serde::de::Error::custom)
    }
}

/// Editing mode. Preview disables selection and hover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Edit,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    version: u64,
    snapshot: Snapshot,
    selected: Option<String>,
    hovered: Option<String>,
    viewport: ViewportClass,
    mode: EditorMode,
}

impl EditorState {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The selected node, if it is still in the tree
    pub fn selected_node(&self) -> Option<&Node> {
        self.snapshot.find(self.selected.as_deref()?)
    }

    // Transitions. Each returns a new state with the version bumped.

    pub(crate) fn with_snapshot(&self, snapshot: Snapshot) -> Self {
        Self {
            version: self.version + 1,
            snapshot,
            ..self.clone()
        }
    }

    pub(crate) fn with_selected(&self, selected: Option<String>) -> Self {
        Self {
            version: self.version + 1,
            selected,
            ..self.clone()
        }
    }

    pub(crate) fn with_hovered(&self, hovered: Option<String>) -> Self {
        Self {
            version: self.version + 1,
            hovered,
            ..self.clone()
        }
    }

    pub(crate) fn with_viewport(&self, viewport: ViewportClass) -> Self {
        Self {
            version: self.version + 1,
            viewport,
            ..self.clone()
        }
    }

    pub(crate) fn with_mode(&self, mode: EditorMode) -> Self {
        Self {
            version: self.version + 1,
            mode,
            ..self.clone()
        }
    }
}
