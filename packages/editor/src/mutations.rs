//! # Page Mutations
//!
//! The closed set of operations on editor state.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` reads a state and returns a new one; the input is never touched
//! 2. **Validated**: structural constraints are checked before anything is built
//! 3. **Atomic**: an error means nothing changed
//!
//! ## Mutation Semantics
//!
//! ### MoveNode
//! - Detach then insert, on a private copy of the tree
//! - Fails if the target is the node itself or one of its descendants
//! - `index` is read after detaching and clamped to the child count
//!
//! ### UpdateNode
//! - Merges partial maps into the layer of the active viewport
//! - Keys are replaced, never removed
//!
//! ### DeleteNode
//! - Removes the node and all descendants
//! - Selection/hover pointing into the removed subtree are cleared by post-effects

use crate::errors::EditorError;
use crate::policy::ContainmentPolicy;
use crate::state::{EditorMode, EditorState, Snapshot};
use pagesmith_common::{walk_node_mut, VisitorMut};
use pagesmith_document::{Node, NodeType, Props, ViewportClass, ROOT_ID};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Replace the whole tree with a forest under a fresh root
    Load { nodes: Vec<Node> },

    /// Insert a caller-built node (ids already unique) into a container
    #[serde(rename_all = "camelCase")]
    AddChild {
        container_id: String,
        node: Node,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },

    /// Merge partial styles/content into the active viewport's layer
    UpdateNode {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        styles: Option<Props>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Props>,
    },

    RenameNode { id: String, name: String },

    DeleteNode { id: String },

    #[serde(rename_all = "camelCase")]
    MoveNode {
        id: String,
        container_id: String,
        index: usize,
    },

    SelectNode { id: Option<String> },

    HoverNode { id: Option<String> },

    SetViewport { viewport: ViewportClass },

    SetMode { mode: EditorMode },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::Load { .. } => "load",
            Mutation::AddChild { .. } => "addChild",
            Mutation::UpdateNode { .. } => "updateNode",
            Mutation::RenameNode { .. } => "renameNode",
            Mutation::DeleteNode { .. } => "deleteNode",
            Mutation::MoveNode { .. } => "moveNode",
            Mutation::SelectNode { .. } => "selectNode",
            Mutation::HoverNode { .. } => "hoverNode",
            Mutation::SetViewport { .. } => "setViewport",
            Mutation::SetMode { .. } => "setMode",
        }
    }

    /// Whether a successful application changes the tree (and so commits history)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::Load { .. }
                | Mutation::AddChild { .. }
                | Mutation::UpdateNode { .. }
                | Mutation::RenameNode { .. }
                | Mutation::DeleteNode { .. }
                | Mutation::MoveNode { .. }
        )
    }

    /// Apply to `state`, returning the next state
    pub fn apply(
        &self,
        state: &EditorState,
        policy: &ContainmentPolicy,
    ) -> Result<EditorState, EditorError> {
        self.validate(state, policy)?;

        match self {
            Mutation::Load { nodes } => {
                let snapshot = Self::apply_load(nodes)?;
                Ok(state
                    .with_snapshot(snapshot)
                    .with_selected(None)
                    .with_hovered(None))
            }

            Mutation::AddChild {
                container_id,
                node,
                index,
            } => {
                let root = Self::apply_add_child(state.snapshot(), container_id, node, *index)?;
                Ok(state.with_snapshot(Snapshot::new(root)?))
            }

            Mutation::UpdateNode { id, styles, content } => {
                let root = Self::apply_update(
                    state.snapshot(),
                    id,
                    styles.as_ref(),
                    content.as_ref(),
                    state.viewport(),
                )?;
                Ok(state.with_snapshot(Snapshot::new(root)?))
            }

            Mutation::RenameNode { id, name } => {
                let mut root = state.snapshot().to_node();
                let node = Self::node_mut(state.snapshot(), &mut root, id)?;
                node.name = name.clone();
                Ok(state.with_snapshot(Snapshot::new(root)?))
            }

            Mutation::DeleteNode { id } => {
                let mut root = state.snapshot().to_node();
                let removed = Self::detach(state.snapshot(), &mut root, id)?;
                debug!(node_id = %id, removed = removed.subtree_size(), "Deleted subtree");
                Ok(state.with_snapshot(Snapshot::new(root)?))
            }

            Mutation::MoveNode {
                id,
                container_id,
                index,
            } => {
                let root = Self::apply_move(state.snapshot(), id, container_id, *index)?;
                Ok(state.with_snapshot(Snapshot::new(root)?))
            }

            Mutation::SelectNode { id } => {
                if state.mode() == EditorMode::Preview || state.selected() == id.as_deref() {
                    return Ok(state.clone());
                }
                Ok(state.with_selected(id.clone()))
            }

            Mutation::HoverNode { id } => {
                if state.mode() == EditorMode::Preview || state.hovered() == id.as_deref() {
                    return Ok(state.clone());
                }
                Ok(state.with_hovered(id.clone()))
            }

            Mutation::SetViewport { viewport } => {
                if state.viewport() == *viewport {
                    return Ok(state.clone());
                }
                Ok(state.with_viewport(*viewport))
            }

            Mutation::SetMode { mode } => {
                if state.mode() == *mode {
                    return Ok(state.clone());
                }
                let next = state.with_mode(*mode);
                if *mode == EditorMode::Preview {
                    // Preview shows the page as published: no selection chrome
                    return Ok(next.with_selected(None).with_hovered(None));
                }
                Ok(next)
            }
        }
    }

    /// Validate without applying
    pub fn validate(&self, state: &EditorState, policy: &ContainmentPolicy) -> Result<(), EditorError> {
        let snapshot = state.snapshot();
        let index = snapshot.index();

        match self {
            // Shape problems in the forest surface when it is indexed
            Mutation::Load { .. } => Ok(()),

            Mutation::AddChild {
                container_id, node, ..
            } => {
                let container_kind = index
                    .kind_of(container_id)
                    .ok_or_else(|| EditorError::NotFound(container_id.clone()))?;

                if !container_kind.is_container() {
                    return Err(EditorError::not_container(container_id, container_kind));
                }

                policy.check_subtree(node, container_kind)?;

                if let Some(existing) = node.subtree_ids().into_iter().find(|id| index.contains(id)) {
                    return Err(EditorError::DuplicateId(existing));
                }

                Ok(())
            }

            Mutation::UpdateNode { id, content, .. } => {
                let kind = index
                    .kind_of(id)
                    .ok_or_else(|| EditorError::NotFound(id.clone()))?;

                if content.is_some() && kind.is_container() {
                    return Err(EditorError::invalid_target(
                        id,
                        format!("{} nodes hold children, not leaf content", kind),
                    ));
                }

                Ok(())
            }

            Mutation::RenameNode { id, .. } => Self::require(state, id),

            Mutation::DeleteNode { id } => {
                let kind = index
                    .kind_of(id)
                    .ok_or_else(|| EditorError::NotFound(id.clone()))?;

                if kind == NodeType::Root {
                    return Err(EditorError::invalid_target(id, "the root cannot be deleted"));
                }

                Ok(())
            }

            Mutation::MoveNode {
                id, container_id, ..
            } => {
                let kind = index
                    .kind_of(id)
                    .ok_or_else(|| EditorError::NotFound(id.clone()))?;
                let container_kind = index
                    .kind_of(container_id)
                    .ok_or_else(|| EditorError::NotFound(container_id.clone()))?;

                if kind == NodeType::Root {
                    return Err(EditorError::invalid_target(id, "the root cannot be reparented"));
                }

                if id == container_id || index.is_descendant(id, container_id) {
                    return Err(EditorError::cyclic_move(id, container_id));
                }

                if !container_kind.is_container() {
                    return Err(EditorError::not_container(container_id, container_kind));
                }

                policy.check(kind, container_kind)
            }

            Mutation::SelectNode { id } | Mutation::HoverNode { id } => match id {
                Some(id) => Self::require(state, id),
                None => Ok(()),
            },

            Mutation::SetViewport { .. } | Mutation::SetMode { .. } => Ok(()),
        }
    }

    fn require(state: &EditorState, id: &str) -> Result<(), EditorError> {
        if state.snapshot().contains(id) {
            Ok(())
        } else {
            Err(EditorError::NotFound(id.to_string()))
        }
    }

    fn apply_load(nodes: &[Node]) -> Result<Snapshot, EditorError> {
        let mut root = Node::root(nodes.to_vec());
        DefaultNames.visit_node_mut(&mut root);
        Snapshot::new(root)
    }

    fn apply_add_child(
        snapshot: &Snapshot,
        container_id: &str,
        node: &Node,
        index: Option<usize>,
    ) -> Result<Node, EditorError> {
        let mut root = snapshot.to_node();
        let container = Self::node_mut(snapshot, &mut root, container_id)?;
        let kind = container.kind;
        let children = container
            .children_mut()
            .ok_or_else(|| EditorError::not_container(container_id, kind))?;

        let insert_index = index.unwrap_or(children.len()).min(children.len());
        let mut node = node.clone();
        DefaultNames.visit_node_mut(&mut node);
        children.insert(insert_index, node);

        Ok(root)
    }

    fn apply_update(
        snapshot: &Snapshot,
        id: &str,
        styles: Option<&Props>,
        content: Option<&Props>,
        viewport: ViewportClass,
    ) -> Result<Node, EditorError> {
        let mut root = snapshot.to_node();
        let node = Self::node_mut(snapshot, &mut root, id)?;

        if let Some(styles) = styles {
            node.styles.merge(viewport, styles);
        }

        if let Some(content) = content {
            let kind = node.kind;
            node.leaf_content_mut()
                .ok_or_else(|| EditorError::invalid_target(id, format!("{} nodes have no leaf content", kind)))?
                .merge(viewport, content);
        }

        Ok(root)
    }

    fn apply_move(
        snapshot: &Snapshot,
        id: &str,
        container_id: &str,
        index: usize,
    ) -> Result<Node, EditorError> {
        let index_entry = snapshot
            .index()
            .entry(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        let container_route = snapshot
            .index()
            .entry(container_id)
            .map(|entry| entry.route.clone())
            .ok_or_else(|| EditorError::NotFound(container_id.to_string()))?;
        let container_route = route_after_removal(&container_route, &index_entry.route);

        let mut root = snapshot.to_node();
        let moved = Self::detach(snapshot, &mut root, id)?;

        let container = root
            .node_at_mut(&container_route)
            .ok_or_else(|| EditorError::NotFound(container_id.to_string()))?;
        let kind = container.kind;
        let children = container
            .children_mut()
            .ok_or_else(|| EditorError::not_container(container_id, kind))?;

        let insert_index = index.min(children.len());
        children.insert(insert_index, moved);

        Ok(root)
    }

    /// Locate `id` in a private copy of the snapshot's tree via the index
    fn node_mut<'a>(snapshot: &Snapshot, root: &'a mut Node, id: &str) -> Result<&'a mut Node, EditorError> {
        let route = &snapshot
            .index()
            .entry(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?
            .route;
        root.node_at_mut(route)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))
    }

    /// Remove `id` from its parent in a private copy of the tree
    fn detach(snapshot: &Snapshot, root: &mut Node, id: &str) -> Result<Node, EditorError> {
        let entry = snapshot
            .index()
            .entry(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        let (position, parent_route) = entry
            .route
            .split_last()
            .ok_or_else(|| EditorError::invalid_target(id, "the root cannot be detached"))?;

        let parent = root
            .node_at_mut(parent_route)
            .and_then(Node::children_mut)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;

        if *position >= parent.len() {
            return Err(EditorError::NotFound(id.to_string()));
        }

        Ok(parent.remove(*position))
    }
}

/// Adjust `route` for the removal of the node at `removed`
///
/// `route` must not point into the removed subtree.
fn route_after_removal(route: &[usize], removed: &[usize]) -> Vec<usize> {
    let mut adjusted = route.to_vec();

    if let Some((removed_position, removed_parent)) = removed.split_last() {
        let depth = removed_parent.len();
        if route.len() > depth
            && route[..depth] == *removed_parent
            && route[depth] > *removed_position
        {
            adjusted[depth] -= 1;
        }
    }

    adjusted
}

/// Gives unnamed nodes their type name as a label
struct DefaultNames;

impl VisitorMut for DefaultNames {
    fn visit_node_mut(&mut self, node: &mut Node) {
        if node.name.trim().is_empty() {
            node.name = if node.id == ROOT_ID && node.kind == NodeType::Root {
                "Body".to_string()
            } else {
                node.kind.as_str().to_string()
            };
        }
        walk_node_mut(self, node);
    }
}

/// Result of applying a mutation through the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    /// New state version
    pub version: u64,

    /// Whether a history entry was committed
    pub committed: bool,
}
