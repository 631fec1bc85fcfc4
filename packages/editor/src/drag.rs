//! Drag lifecycle.
//!
//! ```text
//! Idle ──begin──▶ Dragging ──update(ok)──▶ Proposing ──release──▶ Committing ──finish──▶ Idle
//!                    ▲                          │
//!                    └──────update(rejected)────┘
//! ```
//!
//! `cancel` returns to `Idle` from any phase. Releasing while no proposal is
//! held also ends in `Idle` without producing a mutation.

use crate::drop_target::{DragSource, DropProposal};
use crate::errors::EditorError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        source: DragSource,
    },
    Proposing {
        source: DragSource,
        proposal: DropProposal,
    },
    Committing {
        source: DragSource,
        proposal: DropProposal,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragSession {
    phase: DragPhase,
    /// Why the latest pointer move produced no proposal
    last_rejection: Option<EditorError>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    pub fn source(&self) -> Option<&DragSource> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { source }
            | DragPhase::Proposing { source, .. }
            | DragPhase::Committing { source, .. } => Some(source),
        }
    }

    pub fn proposal(&self) -> Option<&DropProposal> {
        match &self.phase {
            DragPhase::Proposing { proposal, .. } | DragPhase::Committing { proposal, .. } => Some(proposal),
            _ => None,
        }
    }

    pub fn last_rejection(&self) -> Option<&EditorError> {
        self.last_rejection.as_ref()
    }

    pub fn begin(&mut self, source: DragSource) -> Result<(), EditorError> {
        if self.is_active() {
            return Err(EditorError::DragInProgress);
        }
        self.phase = DragPhase::Dragging { source };
        self.last_rejection = None;
        Ok(())
    }

    /// Record the outcome of resolving the latest pointer position.
    /// A later outcome always supersedes an earlier one.
    pub fn update(&mut self, outcome: Result<DropProposal, EditorError>) -> Result<Option<&DropProposal>, EditorError> {
        let source = match std::mem::take(&mut self.phase) {
            DragPhase::Dragging { source } | DragPhase::Proposing { source, .. } => source,
            other => {
                self.phase = other;
                return Err(EditorError::NoActiveDrag);
            }
        };

        match outcome {
            Ok(proposal) => {
                self.phase = DragPhase::Proposing { source, proposal };
                self.last_rejection = None;
            }
            Err(err) => {
                self.phase = DragPhase::Dragging { source };
                self.last_rejection = Some(err);
            }
        }

        Ok(self.proposal())
    }

    /// Start committing the held proposal. Returns `None` (and goes idle)
    /// when there is nothing to commit.
    pub fn begin_commit(&mut self) -> Result<Option<(DragSource, DropProposal)>, EditorError> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => Err(EditorError::NoActiveDrag),
            DragPhase::Dragging { .. } => Ok(None),
            DragPhase::Proposing { source, proposal } => {
                self.phase = DragPhase::Committing {
                    source: source.clone(),
                    proposal: proposal.clone(),
                };
                Ok(Some((source, proposal)))
            }
            committing @ DragPhase::Committing { .. } => {
                self.phase = committing;
                Err(EditorError::DragInProgress)
            }
        }
    }

    pub fn finish(&mut self) {
        self.phase = DragPhase::Idle;
        self.last_rejection = None;
    }

    /// Abort the drag. Returns whether one was active.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        self.finish();
        was_active
    }
}
