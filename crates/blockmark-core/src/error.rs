//! Error types for document and selection operations.

use thiserror::Error;

/// Errors that can occur while applying an edit.
///
/// Every variant aborts the offending operation before any state is touched,
/// so a caller that receives one still holds the pre-edit document and selection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// A block splice reached outside the document.
    #[error("block splice {start}+{count} out of range for document of {len} blocks")]
    Index {
        start: usize,
        count: usize,
        len: usize,
    },

    /// A position pointed outside the current document.
    #[error("position ({block}, {offset}) out of range: {reason}")]
    Range {
        block: usize,
        offset: usize,
        reason: &'static str,
    },

    /// A node path did not resolve against the parse tree it was used with.
    #[error("node path {path:?} does not resolve in this tree")]
    InvalidPath { path: Vec<usize> },

    /// A splice would have left the document without any blocks.
    #[error("a document must keep at least one block")]
    EmptyDocument,
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
