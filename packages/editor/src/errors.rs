//! Error types for the editor

use pagesmith_document::NodeType;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

/// Every condition the engine reports. All are recoverable: the editor state
/// is unchanged when an operation returns one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Node not found: {0}")]
    NotFound(String),

    #[error("Invalid target {id}: {reason}")]
    InvalidTarget { id: String, reason: String },

    #[error("Cannot move {node_id} into {target_id}: target is the node itself or one of its descendants")]
    CyclicMove { node_id: String, target_id: String },

    #[error("A {child} node cannot be placed inside a {parent} node ({rule})")]
    IncompatibleContainment {
        child: NodeType,
        parent: NodeType,
        rule: &'static str,
    },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// Contract violation: callers must supply unique ids
    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    /// Contract violation: malformed node handed to `load` or `add_child`
    #[error("Invalid node {id}: {reason}")]
    InvalidNode { id: String, reason: String },

    #[error("A drag is already in progress")]
    DragInProgress,

    #[error("No drag in progress")]
    NoActiveDrag,
}

impl EditorError {
    pub fn invalid_target(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_node(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNode {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn cyclic_move(node_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self::CyclicMove {
            node_id: node_id.into(),
            target_id: target_id.into(),
        }
    }

    pub fn not_container(id: &str, kind: NodeType) -> Self {
        Self::invalid_target(id, format!("{} nodes cannot have children", kind))
    }

    /// Whether this is a caller contract violation rather than a user-level rejection
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::DuplicateId(_) | Self::InvalidNode { .. })
    }
}
