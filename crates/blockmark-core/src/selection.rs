//! Selection helpers that need the document.

use crate::document::Document;
use crate::types::{BlockPosition, Selection};

/// Order two positions into `(earlier, later)` by block, then offset.
pub fn normalize(focus: BlockPosition, anchor: BlockPosition) -> (BlockPosition, BlockPosition) {
    if focus <= anchor {
        (focus, anchor)
    } else {
        (anchor, focus)
    }
}

/// Select the whole document: focus at the very start, anchor at the very end.
pub fn select_all(doc: &Document) -> Selection {
    let last = doc.last_index();
    let len = doc.block_len(last).unwrap_or(0);
    Selection {
        focus: BlockPosition::new(0, 0),
        anchor: Some(BlockPosition::new(last, len)),
    }
}
