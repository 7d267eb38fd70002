//! Block-level render units for incremental updates.
//!
//! Each block of the document is parsed on its own, so a renderer can update
//! only the blocks whose source changed.

use smol_str::{SmolStr, format_smolstr};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::node::{BlockKind, BlockNode};
use crate::offset_map::{NodePath, position_from_offset};
use crate::parse::parse_block;

/// A parsed block with a stable identity.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRender {
    /// Stable ID for DOM diffing (format: `b-{counter}`)
    pub id: SmolStr,

    /// Hash of the raw block text for quick change detection
    pub source_hash: u64,

    /// Parse tree of the block
    pub node: BlockNode,
}

impl BlockRender {
    /// Parse `source` and tag the result with `id`.
    pub fn parse(id: SmolStr, source: &str) -> Self {
        Self {
            id,
            source_hash: hash_source(source),
            node: parse_block(source),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.node.kind
    }

    /// Get the length in chars.
    pub fn char_len(&self) -> usize {
        self.node.len()
    }

    /// Node path for a char offset inside this block.
    pub fn path_at(&self, offset: usize) -> NodePath {
        position_from_offset(&self.node, offset)
    }
}

/// Simple hash function for source text comparison.
///
/// Used to quickly detect if block content has changed.
pub fn hash_source(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Generate a block ID from a monotonic counter.
///
/// IDs follow a block through edits elsewhere in the document; only the block
/// an edit touches can get a new one.
pub fn make_block_id(counter: usize) -> SmolStr {
    format_smolstr!("b-{}", counter)
}
