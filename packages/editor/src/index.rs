//! # Node Index
//!
//! Maps every node id to its parent, type and route (child positions from
//! the root). Rebuilt for each committed snapshot so lookups, parent queries
//! and ancestry checks cost O(1)/O(depth) instead of a full tree walk.
//!
//! Building the index also enforces the tree invariants: unique ids, a single
//! `root` at the top, and content shape matching the node type.

use crate::errors::EditorError;
use pagesmith_common::{walk_node, Visitor};
use pagesmith_document::{Node, NodeType};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub kind: NodeType,
    pub parent: Option<String>,
    /// Child positions from the root down to this node
    pub route: Vec<usize>,
}

impl IndexEntry {
    pub fn depth(&self) -> usize {
        self.route.len()
    }

    /// Position among the parent's children (`None` for the root)
    pub fn position(&self) -> Option<usize> {
        self.route.last().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIndex {
    root_id: String,
    entries: HashMap<String, IndexEntry>,
}

impl NodeIndex {
    /// Index a full tree, validating its invariants
    pub fn build(root: &Node) -> Result<Self, EditorError> {
        if root.kind != NodeType::Root {
            return Err(EditorError::invalid_node(
                &root.id,
                format!("tree must start at a root node, found {}", root.kind),
            ));
        }

        let mut builder = IndexBuilder::default();
        builder.visit_node(root);

        match builder.error {
            Some(err) => Err(err),
            None => Ok(Self {
                root_id: root.id.clone(),
                entries: builder.entries,
            }),
        }
    }

    /// Index of a root without children
    pub(crate) fn childless_root(root_id: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            root_id.to_string(),
            IndexEntry {
                kind: NodeType::Root,
                parent: None,
                route: Vec::new(),
            },
        );
        Self {
            root_id: root_id.to_string(),
            entries,
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entry(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    pub fn kind_of(&self, id: &str) -> Option<NodeType> {
        self.entries.get(id).map(|entry| entry.kind)
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.entries.get(id)?.parent.as_deref()
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.entries.get(id).map(IndexEntry::depth)
    }

    /// Resolve `id` inside the tree this index was built from
    pub fn find<'a>(&self, root: &'a Node, id: &str) -> Option<&'a Node> {
        root.node_at(&self.entries.get(id)?.route)
    }

    /// Ids from the root down to `id`, both inclusive
    pub fn path_to(&self, id: &str) -> Option<Vec<String>> {
        let mut path = vec![id.to_string()];
        let mut current = self.entries.get(id)?;

        while let Some(parent) = &current.parent {
            path.push(parent.clone());
            current = self.entries.get(parent)?;
        }

        path.reverse();
        Some(path)
    }

    /// Whether `candidate_id` lies strictly below `ancestor_id`
    pub fn is_descendant(&self, ancestor_id: &str, candidate_id: &str) -> bool {
        if !self.entries.contains_key(ancestor_id) {
            return false;
        }

        let mut current = self.parent_of(candidate_id);
        while let Some(parent) = current {
            if parent == ancestor_id {
                return true;
            }
            current = self.parent_of(parent);
        }

        false
    }
}

#[derive(Default)]
struct IndexBuilder {
    entries: HashMap<String, IndexEntry>,
    /// (id, next child position) for each open container
    stack: Vec<(String, usize)>,
    route: Vec<usize>,
    error: Option<EditorError>,
}

impl IndexBuilder {
    fn check(&self, node: &Node, parent: Option<&String>) -> Result<(), EditorError> {
        if self.entries.contains_key(&node.id) {
            return Err(EditorError::DuplicateId(node.id.clone()));
        }

        if node.kind == NodeType::Root && parent.is_some() {
            return Err(EditorError::invalid_node(&node.id, "root nodes cannot be nested"));
        }

        if !node.content_matches_kind() {
            let expected = if node.kind.is_container() {
                "a list of children"
            } else {
                "a leaf content record"
            };
            return Err(EditorError::invalid_node(
                &node.id,
                format!("{} nodes must hold {}", node.kind, expected),
            ));
        }

        Ok(())
    }
}

impl Visitor for IndexBuilder {
    fn visit_node(&mut self, node: &Node) {
        if self.error.is_some() {
            return;
        }

        let position = self.stack.last_mut().map(|(_, next)| {
            let position = *next;
            *next += 1;
            position
        });
        let parent = self.stack.last().map(|(id, _)| id.clone());

        if let Err(err) = self.check(node, parent.as_ref()) {
            self.error = Some(err);
            return;
        }

        if let Some(position) = position {
            self.route.push(position);
        }

        self.entries.insert(
            node.id.clone(),
            IndexEntry {
                kind: node.kind,
                parent,
                route: self.route.clone(),
            },
        );

        self.stack.push((node.id.clone(), 0));
        walk_node(self, node);
        self.stack.pop();

        if position.is_some() {
            self.route.pop();
        }
    }
}
