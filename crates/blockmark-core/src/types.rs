//! Core editor types: block positions, selection, and edit tracking.

use std::cmp::Ordering;
use std::ops::Range;

use web_time::Instant;

use crate::document::Document;
use crate::error::{EditorError, Result};

/// A caret position: block index plus char offset inside that block's raw text.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPosition {
    pub block: usize,
    /// Character offset in the block (NOT byte offset!)
    pub offset: usize,
}

impl BlockPosition {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }

    /// Build a position, rejecting anything outside `doc`.
    pub fn checked(doc: &Document, block: usize, offset: usize) -> Result<Self> {
        let pos = Self { block, offset };
        pos.validate(doc)?;
        Ok(pos)
    }

    /// Check the position against the document bounds.
    pub fn validate(&self, doc: &Document) -> Result<()> {
        let Some(len) = doc.block_len(self.block) else {
            return Err(EditorError::Range {
                block: self.block,
                offset: self.offset,
                reason: "block index past end of document",
            });
        };
        if self.offset > len {
            return Err(EditorError::Range {
                block: self.block,
                offset: self.offset,
                reason: "offset past end of block",
            });
        }
        Ok(())
    }

    /// Clamp into `doc`: block index to the last block, offset to that block's length.
    pub fn clamp_to(self, doc: &Document) -> Self {
        let block = self.block.min(doc.last_index());
        let len = doc.block_len(block).unwrap_or(0);
        Self {
            block,
            offset: self.offset.min(len),
        }
    }
}

impl PartialOrd for BlockPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.block, self.offset).cmp(&(other.block, other.offset))
    }
}

/// Focus plus optional anchor.
///
/// The focus is where the caret is now, the anchor is where a range selection
/// started. They may be in any order; use `normalized()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub focus: BlockPosition,
    pub anchor: Option<BlockPosition>,
}

impl Selection {
    /// A collapsed caret.
    pub fn caret(focus: BlockPosition) -> Self {
        Self {
            focus,
            anchor: None,
        }
    }

    /// A range from `anchor` to `focus`.
    pub fn range(anchor: BlockPosition, focus: BlockPosition) -> Self {
        Self {
            focus,
            anchor: Some(anchor),
        }
    }

    /// True for a caret, including an anchor sitting on the focus.
    pub fn is_collapsed(&self) -> bool {
        self.anchor.is_none_or(|anchor| anchor == self.focus)
    }

    /// `(earlier, later)` bounds. A caret gives the focus twice.
    pub fn normalized(&self) -> (BlockPosition, BlockPosition) {
        crate::selection::normalize(self.focus, self.anchor.unwrap_or(self.focus))
    }

    pub fn start(&self) -> BlockPosition {
        self.normalized().0
    }

    pub fn end(&self) -> BlockPosition {
        self.normalized().1
    }

    /// Check if the selection runs backwards (focus before anchor).
    pub fn is_backwards(&self) -> bool {
        self.anchor.is_some_and(|anchor| self.focus < anchor)
    }

    /// Check whether a position falls inside the selected range (end exclusive).
    pub fn contains(&self, pos: BlockPosition) -> bool {
        let (start, end) = self.normalized();
        pos >= start && pos < end
    }

    /// Reject positions outside the document.
    pub fn validate(&self, doc: &Document) -> Result<()> {
        self.focus.validate(doc)?;
        if let Some(anchor) = self.anchor {
            anchor.validate(doc)?;
        }
        Ok(())
    }

    pub fn clamp_to(self, doc: &Document) -> Self {
        Self {
            focus: self.focus.clamp_to(doc),
            anchor: self.anchor.map(|a| a.clamp_to(doc)),
        }
    }
}

/// Information about the most recent edit, used for incremental re-parsing.
///
/// Blocks outside `before` were left untouched by the edit; `after` is where
/// the replacement blocks landed.
#[derive(Clone, Debug)]
pub struct EditInfo {
    /// Block range replaced, in pre-edit indices.
    pub before: Range<usize>,
    /// Block range holding the new blocks, in post-edit indices.
    pub after: Range<usize>,
    /// Document length (in blocks) after this edit was applied.
    /// Used to detect stale edit info - if the current block count doesn't
    /// match, the edit info is from a previous render cycle.
    pub doc_len_after: usize,
    /// When this edit occurred.
    pub timestamp: Instant,
}

impl PartialEq for EditInfo {
    fn eq(&self, other: &Self) -> bool {
        // Compare all fields except timestamp (not meaningful for equality)
        self.before == other.before
            && self.after == other.after
            && self.doc_len_after == other.doc_len_after
    }
}

impl EditInfo {
    pub fn new(before: Range<usize>, after: Range<usize>, doc_len_after: usize) -> Self {
        Self {
            before,
            after,
            doc_len_after,
            timestamp: Instant::now(),
        }
    }

    /// An edit that replaced everything, e.g. undo.
    pub fn whole(doc_len_before: usize, doc_len_after: usize) -> Self {
        Self::new(0..doc_len_before, 0..doc_len_after, doc_len_after)
    }

    /// Check if this edit info is stale (doc has changed since this edit).
    pub fn is_stale(&self, current_doc_len: usize) -> bool {
        self.doc_len_after != current_doc_len
    }

    /// Change in block count.
    pub fn block_delta(&self) -> isize {
        self.after.len() as isize - self.before.len() as isize
    }
}
