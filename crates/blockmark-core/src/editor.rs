//! The editor state container.
//!
//! `PlainEditor` owns everything an intent can change: the document, the
//! selection, the undo history, and the remembered goal column for vertical
//! caret movement. All mutation goes through [`execute_action`].

use crate::actions::EditorAction;
use crate::config::EditorConfig;
use crate::document::Document;
use crate::error::Result;
use crate::execute::{EditOutcome, execute_action};
use crate::types::{EditInfo, Selection};
use crate::undo::{UndoManager, UndoStack};

/// Simple field-based editor.
///
/// Generic over the undo manager so another history implementation can be
/// plugged in; the default is the snapshot [`UndoStack`].
#[derive(Clone, Debug)]
pub struct PlainEditor<U: UndoManager = UndoStack> {
    pub(crate) document: Document,
    pub(crate) selection: Selection,
    pub(crate) undo: U,
    /// Column that Up/Down aim for. Cleared by any other intent.
    pub(crate) goal_column: Option<usize>,
    pub(crate) last_edit: Option<EditInfo>,
    config: EditorConfig,
}

impl Default for PlainEditor<UndoStack> {
    fn default() -> Self {
        Self::new()
    }
}

impl PlainEditor<UndoStack> {
    /// An editor over a single empty block.
    pub fn new() -> Self {
        Self::with_config(Document::new(), EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        let undo = UndoStack::with_limit(config.undo_limit);
        Self::with_undo(document, undo, config)
    }

    /// Load serialized text, caret at the start of the document.
    pub fn from_text(text: &str) -> Self {
        Self::with_config(Document::from_text(text), EditorConfig::default())
    }
}

impl<U: UndoManager> PlainEditor<U> {
    /// Create an editor with a caller-supplied undo manager.
    pub fn with_undo(document: Document, undo: U, config: EditorConfig) -> Self {
        Self {
            document,
            selection: Selection::default(),
            undo,
            goal_column: None,
            last_edit: None,
            config,
        }
    }

    /// Apply one intent. See [`execute_action`].
    pub fn apply(&mut self, action: &EditorAction) -> Result<EditOutcome> {
        execute_action(self, action)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The most recent document change, if any.
    pub fn last_edit(&self) -> Option<&EditInfo> {
        self.last_edit.as_ref()
    }

    pub fn goal_column(&self) -> Option<usize> {
        self.goal_column
    }

    pub fn undo_manager(&self) -> &U {
        &self.undo
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.undo.clear_history();
    }

    /// The document serialized with the configured line separator.
    pub fn content_string(&self) -> String {
        self.document.to_text(self.config.line_separator)
    }
}
