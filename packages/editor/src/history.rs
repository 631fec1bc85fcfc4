//! # Undo/Redo History
//!
//! Snapshot history with a cursor.
//!
//! ## Design
//!
//! - Each committed change stores the full snapshot it produced (snapshots share
//!   structure through `Arc`, so this is cheap)
//! - Undo/redo move the cursor; nothing is re-applied
//! - A commit after undo discards the redo branch
//! - Oldest entries are evicted once `max_levels` undo steps are stored
//! - Batches fold several commits into one undo step
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(Snapshot::empty());
//! history.commit(next_snapshot, Some("Add hero".into()));
//!
//! let previous = history.undo()?;
//! let restored = history.redo()?;
//! ```

use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::errors::EditorError;
use crate::state::Snapshot;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Monotonic step counter, never reused after eviction
    pub step: u64,

    pub snapshot: Snapshot,

    /// What produced this entry (mutation name or batch label)
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct OpenBatch {
    description: Option<String>,
    /// Whether a commit in this batch already pushed its entry
    started: bool,
}

/// Undo/redo history for one editor
#[derive(Debug, Clone)]
pub struct History {
    /// Entries oldest first; never empty
    entries: VecDeque<HistoryEntry>,

    /// Position of the current snapshot in `entries`
    cursor: usize,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    next_step: u64,

    batch: Option<OpenBatch>,
}

impl History {
    /// Create a history at `initial` with the default limit
    pub fn new(initial: Snapshot) -> Self {
        Self::with_max_levels(initial, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_max_levels(initial: Snapshot, max_levels: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(HistoryEntry {
            step: 0,
            snapshot: initial,
            description: None,
        });

        Self {
            entries,
            cursor: 0,
            max_levels,
            next_step: 1,
            batch: None,
        }
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor].snapshot
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Record a new snapshot, discarding any redo branch
    pub fn commit(&mut self, snapshot: Snapshot, description: Option<String>) {
        self.entries.truncate(self.cursor + 1);

        if let Some(batch) = &mut self.batch {
            if batch.started {
                // Fold into the batch's entry
                if let Some(entry) = self.entries.back_mut() {
                    entry.snapshot = snapshot;
                }
                return;
            }
            batch.started = true;
            let description = batch.description.clone().or(description);
            self.push(snapshot, description);
            return;
        }

        self.push(snapshot, description);
    }

    fn push(&mut self, snapshot: Snapshot, description: Option<String>) {
        self.entries.push_back(HistoryEntry {
            step: self.next_step,
            snapshot,
            description,
        });
        self.next_step += 1;

        // Trim if exceeded max levels
        if self.max_levels > 0 {
            while self.entries.len() > self.max_levels + 1 {
                self.entries.pop_front();
            }
        }

        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry. An open batch is closed first.
    pub fn undo(&mut self) -> Result<&Snapshot, EditorError> {
        self.end_batch();

        if !self.can_undo() {
            return Err(EditorError::NothingToUndo);
        }

        self.cursor -= 1;
        Ok(self.current())
    }

    pub fn redo(&mut self) -> Result<&Snapshot, EditorError> {
        if !self.can_redo() {
            return Err(EditorError::NothingToRedo);
        }

        self.cursor += 1;
        Ok(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn undo_levels(&self) -> usize {
        self.cursor
    }

    pub fn redo_levels(&self) -> usize {
        self.entries.len() - self.cursor - 1
    }

    /// Start folding commits into one undo step
    pub fn begin_batch(&mut self, description: Option<String>) {
        self.batch = Some(OpenBatch {
            description,
            started: false,
        });
    }

    pub fn end_batch(&mut self) {
        self.batch = None;
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    /// Description of the step `undo` would revert
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.entries[self.cursor].description.as_deref()
    }

    /// Description of the step `redo` would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.entries.get(self.cursor + 1)?.description.as_deref()
    }

    /// Drop all history, keeping `snapshot` as the only entry
    pub fn reset(&mut self, snapshot: Snapshot) {
        let max_levels = self.max_levels;
        *self = Self::with_max_levels(snapshot, max_levels);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
