//! # Pagesmith Editor
//!
//! Editing engine for a visual page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: node tree, overrides, JSON        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorState lifecycle + mutations   │
//! │  - Validate and apply mutations             │
//! │  - Undo/redo over immutable snapshots       │
//! │  - Drop-target resolution + drag lifecycle  │
//! │  - Selection/hover hierarchy queries        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host: canvas, layers panel, properties      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **State is a value**: every operation maps one `EditorState` to the next
//! 2. **Snapshots are immutable**: history stores them, undo is a cursor move
//! 3. **One policy**: drops and direct mutations pass the same containment rules
//! 4. **Explicit viewport**: resolution and edits name the viewport they target
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesmith_editor::{Editor, EditorConfig, Mutation};
//!
//! let mut editor = Editor::from_nodes(nodes, EditorConfig::default())?;
//!
//! editor.dispatch(Mutation::MoveNode {
//!     id: "hero".to_string(),
//!     container_id: "root".to_string(),
//!     index: 0,
//! })?;
//!
//! editor.undo()?;
//! ```

mod config;
mod drag;
mod drop_target;
mod engine;
mod errors;
mod history;
mod index;
mod mutations;
mod policy;
mod post_effects;
mod resolver;
mod selection;
mod state;

pub use config::{DirectDropPlacement, EditorConfig, NestingRule, DEFAULT_EDGE_THRESHOLD, DEFAULT_HISTORY_LIMIT};
pub use drag::{DragPhase, DragSession};
pub use drop_target::{DragSource, DropCandidate, DropProposal, DropResolver, InsertionMode, Point, Rect};
pub use engine::{ChangeKind, Editor, StateChange, SubscriptionId};
pub use errors::{EditorError, EditorResult};
pub use history::{History, HistoryEntry};
pub use index::{IndexEntry, NodeIndex};
pub use mutations::{Mutation, MutationResult};
pub use policy::{
    ContainmentPolicy, ContainmentRule, ForbiddenPair, NestingViolation, NoNestedColumns, RootIsTopLevel,
};
pub use post_effects::{ClearDanglingHover, ClearDanglingSelection, PostEffect, PostEffectEngine};
pub use resolver::{
    cascade, origin_of, resolve, resolve_content, resolve_style, resolve_subtree, EffectiveContent,
    EffectiveStyle, Resolved,
};
pub use selection::{HierarchyView, Highlight};
pub use state::{EditorMode, EditorState, Snapshot};

// Re-export document types for convenience
pub use pagesmith_document::{Layout, Node, NodeType, Overrides, Props, ViewportClass};
