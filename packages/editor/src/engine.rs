//! # Editor
//!
//! Owns the current [`EditorState`] and everything that moves it forward:
//! mutation dispatch, history, post-effects, drop resolution and the drag
//! lifecycle. Subscribers are told about every state change.
//!
//! ## Lifecycle
//!
//! ```text
//! pointer move → resolve_drop → proposal ─┐
//! release ────────────────────────────────┴→ dispatch → post-effects → history → notify
//! ```

use crate::config::EditorConfig;
use crate::drag::DragSession;
use crate::drop_target::{DragSource, DropCandidate, DropProposal, DropResolver, Point};
use crate::errors::EditorError;
use crate::history::History;
use crate::mutations::{Mutation, MutationResult};
use crate::policy::ContainmentPolicy;
use crate::post_effects::PostEffectEngine;
use crate::resolver::{resolve, Resolved};
use crate::selection::HierarchyView;
use crate::state::{EditorState, Snapshot};
use pagesmith_document::Node;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, instrument, warn};

pub type SubscriptionId = u64;

/// What kind of change a notification describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Load,
    Structure,
    Selection,
    Hover,
    Viewport,
    Mode,
    Undo,
    Redo,
}

impl ChangeKind {
    fn of(mutation: &Mutation) -> Self {
        match mutation {
            Mutation::Load { .. } => ChangeKind::Load,
            Mutation::SelectNode { .. } => ChangeKind::Selection,
            Mutation::HoverNode { .. } => ChangeKind::Hover,
            Mutation::SetViewport { .. } => ChangeKind::Viewport,
            Mutation::SetMode { .. } => ChangeKind::Mode,
            _ => ChangeKind::Structure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChange {
    pub version: u64,
    pub kind: ChangeKind,
}

type Listener = Box<dyn FnMut(&StateChange)>;

/// Single-user page editor
pub struct Editor {
    state: EditorState,
    history: History,
    policy: ContainmentPolicy,
    effects: PostEffectEngine,
    config: EditorConfig,
    drag: DragSession,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl Editor {
    /// Empty page with default configuration
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let state = EditorState::new(Snapshot::empty());
        let history = History::with_max_levels(state.snapshot().clone(), config.history_limit);

        Self {
            state,
            history,
            policy: ContainmentPolicy::from_config(&config),
            effects: PostEffectEngine::new(),
            config,
            drag: DragSession::new(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Open a page. The loaded tree is the first history entry, so it
    /// cannot be undone.
    pub fn from_nodes(nodes: Vec<Node>, config: EditorConfig) -> Result<Self, EditorError> {
        let mut editor = Self::with_config(config);
        let snapshot = Snapshot::from_forest(nodes)?;
        editor.history.reset(snapshot.clone());
        editor.state = EditorState::new(snapshot);
        info!(nodes = editor.state.snapshot().len(), "Opened page");
        Ok(editor)
    }

    /// Replace the page (undoable)
    pub fn load(&mut self, nodes: Vec<Node>) -> Result<MutationResult, EditorError> {
        self.dispatch(Mutation::Load { nodes })
    }

    /// Apply one mutation. Errors leave the editor untouched.
    #[instrument(skip(self, mutation), fields(op = mutation.name(), version = self.state.version()))]
    pub fn dispatch(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        let (next, applied) = match self.effects.apply_with_effects(&mutation, &self.state, &self.policy) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "Mutation rejected");
                return Err(err);
            }
        };

        if next.version() == self.state.version() {
            debug!("Mutation was a no-op");
            return Ok(MutationResult {
                version: next.version(),
                committed: false,
            });
        }

        let committed = mutation.is_structural();
        if committed {
            self.history
                .commit(next.snapshot().clone(), Some(mutation.name().to_string()));
        }

        debug!(
            new_version = next.version(),
            committed,
            secondary = applied.len() - 1,
            "Mutation applied"
        );

        self.state = next;
        self.notify(ChangeKind::of(&mutation));

        Ok(MutationResult {
            version: self.state.version(),
            committed,
        })
    }

    /// Step back one history entry and return the restored snapshot
    pub fn undo(&mut self) -> Result<Snapshot, EditorError> {
        let snapshot = self.history.undo()?.clone();
        self.restore(snapshot, ChangeKind::Undo)
    }

    pub fn redo(&mut self) -> Result<Snapshot, EditorError> {
        let snapshot = self.history.redo()?.clone();
        self.restore(snapshot, ChangeKind::Redo)
    }

    fn restore(&mut self, snapshot: Snapshot, kind: ChangeKind) -> Result<Snapshot, EditorError> {
        let next = self.effects.settle(self.state.with_snapshot(snapshot), &self.policy)?;
        debug!(version = next.version(), kind = ?kind, "Restored snapshot");
        self.state = next;
        self.notify(kind);
        Ok(self.state.snapshot().clone())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Fold every mutation until `end_batch` into one undo step
    pub fn begin_batch(&mut self, description: Option<String>) {
        self.history.begin_batch(description);
    }

    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // Drag and drop

    /// Evaluate one pointer position without touching any state
    pub fn resolve_drop(
        &self,
        pointer: Point,
        candidate: &DropCandidate,
        source: &DragSource,
    ) -> Result<DropProposal, EditorError> {
        DropResolver::new(self.state.snapshot(), &self.policy, &self.config).resolve(pointer, candidate, source)
    }

    pub fn begin_drag(&mut self, source: DragSource) -> Result<(), EditorError> {
        debug!(source = %source.id(), "Drag started");
        self.drag.begin(source)
    }

    /// Re-resolve on pointer move. A rejected position is not an error; it
    /// clears the held proposal and returns `None`.
    pub fn drag_over(&mut self, pointer: Point, candidate: &DropCandidate) -> Result<Option<DropProposal>, EditorError> {
        let source = self.drag.source().cloned().ok_or(EditorError::NoActiveDrag)?;
        let outcome = self.resolve_drop(pointer, candidate, &source);

        if let Err(err) = &outcome {
            debug!(candidate = %candidate.id, reason = %err, "Drop rejected");
        }

        Ok(self.drag.update(outcome)?.cloned())
    }

    /// Commit the held proposal. `None` means nothing was dropped.
    pub fn release_drag(&mut self) -> Result<Option<MutationResult>, EditorError> {
        let Some((source, proposal)) = self.drag.begin_commit()? else {
            debug!("Drag released without a proposal");
            return Ok(None);
        };

        let mutation = proposal.into_mutation(&source, self.state.snapshot());
        let result = self.dispatch(mutation);
        self.drag.finish();
        result.map(Some)
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    // Queries

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.state.snapshot()
    }

    pub fn selection(&self) -> Option<&str> {
        self.state.selected()
    }

    pub fn hover(&self) -> Option<&str> {
        self.state.hovered()
    }

    pub fn path(&self, id: &str) -> Option<Vec<String>> {
        self.state.snapshot().path_to(id)
    }

    pub fn hierarchy(&self) -> HierarchyView<'_> {
        HierarchyView::from_state(&self.state)
    }

    /// Effective styles/content of `id` at the active viewport
    pub fn resolved(&self, id: &str) -> Option<Resolved> {
        let node = self.state.snapshot().find(id)?;
        Some(resolve(node, self.state.viewport()))
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn policy(&self) -> &ContainmentPolicy {
        &self.policy
    }

    // Subscriptions

    pub fn subscribe(&mut self, listener: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, kind: ChangeKind) {
        let change = StateChange {
            version: self.state.version(),
            kind,
        };
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("policy", &self.policy)
            .field("config", &self.config)
            .field("drag", &self.drag)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
