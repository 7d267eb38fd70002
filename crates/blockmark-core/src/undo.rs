//! Undo/redo history.
//!
//! Provides:
//! - `UndoManager` trait for abstracting undo implementations
//! - `UndoStack` - snapshot-based history of (document, selection) pairs

use crate::document::Document;
use crate::types::Selection;

/// Trait for managing undo/redo operations.
///
/// The editor is generic over this so a different history (a CRDT's own undo
/// manager, say) can stand in for the snapshot stack.
pub trait UndoManager {
    /// Record the state as it was before a destructive edit.
    fn record(&mut self, entry: UndoEntry);

    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Check if redo is available.
    fn can_redo(&self) -> bool;

    /// Swap `current` for the most recent recorded state.
    /// Returns the restored state, or `None` if there is nothing to undo.
    fn undo(&mut self, current: UndoEntry) -> Option<UndoEntry>;

    /// Reverse the most recent undo.
    fn redo(&mut self, current: UndoEntry) -> Option<UndoEntry>;

    /// Clear all undo/redo history.
    fn clear_history(&mut self);
}

/// A full snapshot of the editable state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoEntry {
    pub document: Document,
    pub selection: Selection,
}

impl UndoEntry {
    pub fn new(document: Document, selection: Selection) -> Self {
        Self {
            document,
            selection,
        }
    }
}

/// Snapshot stack. Unbounded unless a limit is set.
#[derive(Clone, Debug, Default)]
pub struct UndoStack {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    max_steps: Option<usize>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_steps` undo entries, evicting the oldest.
    pub fn with_limit(max_steps: Option<usize>) -> Self {
        Self {
            max_steps,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Most recent undo entry.
    pub fn peek(&self) -> Option<&UndoEntry> {
        self.undo_stack.last()
    }

    fn push_undo(&mut self, entry: UndoEntry) {
        self.undo_stack.push(entry);

        // Trim if over max
        if let Some(max) = self.max_steps {
            let excess = self.undo_stack.len().saturating_sub(max);
            if excess > 0 {
                self.undo_stack.drain(..excess);
            }
        }
    }
}

impl UndoManager for UndoStack {
    fn record(&mut self, entry: UndoEntry) {
        // Clear redo stack on new edit
        self.redo_stack.clear();
        self.push_undo(entry);
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self, current: UndoEntry) -> Option<UndoEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(entry)
    }

    fn redo(&mut self, current: UndoEntry) -> Option<UndoEntry> {
        let entry = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(entry)
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
