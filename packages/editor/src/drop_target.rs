//! # Drop-Target Resolution
//!
//! Turns a pointer position over a hit-tested candidate node into a single
//! drop proposal, or a rejection.
//!
//! ## Rules
//!
//! - **Leaf candidate**: the drop lands in the candidate's parent, before or
//!   after it depending on which half of the candidate (along the parent's
//!   axis) the pointer is in.
//! - **Container candidate**: bands at the leading and trailing edges (along
//!   the container's own axis) mean before/after the container; the central
//!   zone means into it. The root has no parent and always takes the drop.
//!
//! A proposal is only produced if the resulting move is legal: no cycles, and
//! the containment policy allows the pair.

use crate::config::{DirectDropPlacement, EditorConfig};
use crate::errors::EditorError;
use crate::mutations::Mutation;
use crate::policy::ContainmentPolicy;
use crate::state::Snapshot;
use pagesmith_document::{Layout, Node, NodeType};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Pointer position in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rendered bounds of a node, origin at top-left
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// (start, extent) along the axis a layout stacks children on
    fn span(&self, axis: Layout) -> (f64, f64) {
        match axis {
            Layout::Horizontal => (self.x, self.width),
            Layout::Vertical => (self.y, self.height),
        }
    }
}

fn coordinate(point: Point, axis: Layout) -> f64 {
    match axis {
        Layout::Horizontal => point.x,
        Layout::Vertical => point.y,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertionMode {
    Into,
    Before,
    After,
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A node already in the tree
    Existing(String),
    /// A freshly built node from the palette (ids assigned by the caller)
    Palette(Node),
}

impl DragSource {
    pub fn id(&self) -> &str {
        match self {
            DragSource::Existing(id) => id,
            DragSource::Palette(node) => &node.id,
        }
    }
}

/// Node under the pointer, as reported by the canvas hit test
#[derive(Debug, Clone, PartialEq)]
pub struct DropCandidate {
    pub id: String,
    pub rect: Rect,
}

impl DropCandidate {
    pub fn new(id: impl Into<String>, rect: Rect) -> Self {
        Self { id: id.into(), rect }
    }
}

/// A legal drop location. `index` is in the container's current child
/// coordinates, before the dragged node is detached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropProposal {
    pub container_id: String,
    pub index: usize,
    pub mode: InsertionMode,
    pub dragged_id: String,
}

impl DropProposal {
    /// Mutation that commits this proposal
    pub fn into_mutation(self, source: &DragSource, snapshot: &Snapshot) -> Mutation {
        match source {
            DragSource::Palette(node) => Mutation::AddChild {
                container_id: self.container_id,
                node: node.clone(),
                index: Some(self.index),
            },
            DragSource::Existing(id) => {
                let mut index = self.index;
                let entry = snapshot.index().entry(id);
                let same_parent = entry.and_then(|e| e.parent.as_deref()) == Some(self.container_id.as_str());

                // Detaching an earlier sibling shifts the target left by one
                if let Some(position) = entry.and_then(|e| e.position()) {
                    if same_parent && position < index {
                        index -= 1;
                    }
                }

                Mutation::MoveNode {
                    id: id.clone(),
                    container_id: self.container_id,
                    index,
                }
            }
        }
    }
}

/// Resolves drop proposals against one snapshot
#[derive(Debug)]
pub struct DropResolver<'a> {
    snapshot: &'a Snapshot,
    policy: &'a ContainmentPolicy,
    config: &'a EditorConfig,
}

impl<'a> DropResolver<'a> {
    pub fn new(snapshot: &'a Snapshot, policy: &'a ContainmentPolicy, config: &'a EditorConfig) -> Self {
        Self {
            snapshot,
            policy,
            config,
        }
    }

    pub fn resolve(
        &self,
        pointer: Point,
        candidate: &DropCandidate,
        source: &DragSource,
    ) -> Result<DropProposal, EditorError> {
        let index = self.snapshot.index();
        let candidate_node = self
            .snapshot
            .find(&candidate.id)
            .ok_or_else(|| EditorError::NotFound(candidate.id.clone()))?;

        let dragged_kind = self.dragged_kind(source)?;
        let dragged_id = source.id();

        if let DragSource::Existing(id) = source {
            if id == &candidate.id || index.is_descendant(id, &candidate.id) {
                return Err(EditorError::cyclic_move(id, &candidate.id));
            }
        }

        let mode = self.insertion_mode(pointer, candidate, candidate_node)?;
        let (container_id, insert_index) = match mode {
            InsertionMode::Into => {
                let insert_index = match self.config.direct_drop {
                    DirectDropPlacement::First => 0,
                    DirectDropPlacement::Last => candidate_node.children().len(),
                };
                (candidate.id.clone(), insert_index)
            }
            InsertionMode::Before | InsertionMode::After => {
                let entry = index
                    .entry(&candidate.id)
                    .ok_or_else(|| EditorError::NotFound(candidate.id.clone()))?;
                let parent = entry
                    .parent
                    .clone()
                    .ok_or_else(|| EditorError::invalid_target(&candidate.id, "the root has no siblings"))?;
                let position = entry.position().unwrap_or(0);
                let insert_index = if mode == InsertionMode::After {
                    position + 1
                } else {
                    position
                };
                (parent, insert_index)
            }
        };

        if let DragSource::Existing(id) = source {
            if id == &container_id || index.is_descendant(id, &container_id) {
                return Err(EditorError::cyclic_move(id, &container_id));
            }
        }

        let container_kind = index
            .kind_of(&container_id)
            .ok_or_else(|| EditorError::NotFound(container_id.clone()))?;
        if !container_kind.is_container() {
            return Err(EditorError::not_container(&container_id, container_kind));
        }
        match source {
            DragSource::Palette(node) => self.policy.check_subtree(node, container_kind)?,
            DragSource::Existing(_) => self.policy.check(dragged_kind, container_kind)?,
        }

        trace!(
            dragged = %dragged_id,
            container = %container_id,
            index = insert_index,
            mode = ?mode,
            "Drop proposal"
        );

        Ok(DropProposal {
            container_id,
            index: insert_index,
            mode,
            dragged_id: dragged_id.to_string(),
        })
    }

    fn dragged_kind(&self, source: &DragSource) -> Result<NodeType, EditorError> {
        match source {
            DragSource::Existing(id) => {
                let kind = self
                    .snapshot
                    .index()
                    .kind_of(id)
                    .ok_or_else(|| EditorError::NotFound(id.clone()))?;
                if kind == NodeType::Root {
                    return Err(EditorError::invalid_target(id, "the root cannot be dragged"));
                }
                Ok(kind)
            }
            DragSource::Palette(node) => {
                if let Some(existing) = node
                    .subtree_ids()
                    .into_iter()
                    .find(|id| self.snapshot.contains(id))
                {
                    return Err(EditorError::DuplicateId(existing));
                }
                Ok(node.kind)
            }
        }
    }

    fn insertion_mode(
        &self,
        pointer: Point,
        candidate: &DropCandidate,
        node: &Node,
    ) -> Result<InsertionMode, EditorError> {
        let parent = self.snapshot.find_parent(&candidate.id);

        if node.is_container() {
            if parent.is_none() {
                return Ok(InsertionMode::Into);
            }

            let axis = node.orientation();
            let (start, extent) = candidate.rect.span(axis);
            let band = self.config.edge_threshold.max(0.0).min(extent / 4.0);
            let position = coordinate(pointer, axis);

            return Ok(if position < start + band {
                InsertionMode::Before
            } else if position > start + extent - band {
                InsertionMode::After
            } else {
                InsertionMode::Into
            });
        }

        let parent = parent.ok_or_else(|| EditorError::invalid_target(&candidate.id, "leaf node without a parent"))?;
        let axis = parent.orientation();
        let (start, extent) = candidate.rect.span(axis);

        Ok(if coordinate(pointer, axis) < start + extent / 2.0 {
            InsertionMode::Before
        } else {
            InsertionMode::After
        })
    }
}
