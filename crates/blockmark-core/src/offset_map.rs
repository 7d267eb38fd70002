//! Mapping between flat char offsets in a block and positions in its parse tree.
//!
//! A `NodePath` is a list of child indices from the block root plus a local
//! offset inside the node it points at. The two directions agree exactly:
//! `offset_from_position(tree, &position_from_offset(tree, o)) == o` for every
//! `o` in `0..=tree.len()`.

use std::borrow::Borrow;

use crate::error::{EditorError, Result};
use crate::node::{BlockNode, NodeRef};
use crate::types::{BlockPosition, Selection};

/// A position inside a parse tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    /// Child indices from the block root. Empty means the block itself.
    pub indices: Vec<usize>,
    /// Char offset inside the node the indices lead to.
    pub offset: usize,
}

impl NodePath {
    pub fn new(indices: Vec<usize>, offset: usize) -> Self {
        Self { indices, offset }
    }

    /// Path pointing at the start of the block itself.
    pub fn block_start() -> Self {
        Self::default()
    }

    /// Follow the indices. `None` if any index is out of range.
    pub fn node<'a>(&self, tree: &'a BlockNode) -> Option<NodeRef<'a>> {
        let mut node = NodeRef::Block(tree);
        for &index in &self.indices {
            node = node.child(index)?;
        }
        Some(node)
    }
}

/// Which edges of a node a local offset touches.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct NodeSide {
    pub is_at_start: bool,
    pub is_at_end: bool,
}

/// Resolve a flat char offset to a node path.
///
/// Walks down from the root, subtracting sibling lengths until the child that
/// contains the offset is found. At a boundary between two siblings the
/// earlier one wins. A non-leaf reached with offset 0 resolves to itself, so a
/// caret at the start of a block attaches to the block rather than to its first
/// leaf. Offsets past the end of the tree are clamped.
pub fn position_from_offset(tree: &BlockNode, offset: usize) -> NodePath {
    let mut offset = offset.min(tree.len());
    let mut indices = Vec::new();
    let mut node = NodeRef::Block(tree);

    loop {
        if node.is_leaf() || offset == 0 {
            return NodePath { indices, offset };
        }

        let mut next = None;
        for (index, child) in node.children().iter().enumerate() {
            let len = child.len();
            if offset <= len {
                next = Some(index);
                break;
            }
            offset -= len;
        }

        match next.and_then(|index| node.child(index).map(|child| (index, child))) {
            Some((index, child)) => {
                indices.push(index);
                node = child;
            }
            // Only reachable if the children do not cover the node.
            None => return NodePath { indices, offset },
        }
    }
}

/// Turn a node path back into a flat char offset.
///
/// Sums the lengths of all preceding siblings at every level, plus the local
/// offset. A local offset past the node's length is clamped; an index that
/// does not exist is an error.
pub fn offset_from_position(tree: &BlockNode, path: &NodePath) -> Result<usize> {
    let mut total = 0;
    let mut node = NodeRef::Block(tree);

    for &index in &path.indices {
        let children = node.children();
        let Some(child) = children.get(index) else {
            return Err(EditorError::InvalidPath {
                path: path.indices.clone(),
            });
        };
        total += children[..index].iter().map(|c| c.len()).sum::<usize>();
        node = NodeRef::Inline(child);
    }

    Ok(total + path.offset.min(node.len()))
}

/// Report whether a local offset sits at the left or right edge of `node`.
pub fn side_of_node(node: NodeRef<'_>, offset: usize) -> NodeSide {
    NodeSide {
        is_at_start: offset == 0,
        is_at_end: offset == node.len(),
    }
}

/// A block position resolved against that block's tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub block: usize,
    pub path: NodePath,
}

/// Selection in node-path form, ready for a renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSelection {
    pub focus: ResolvedPosition,
    pub anchor: Option<ResolvedPosition>,
}

/// Resolve one block position against the parsed blocks of a document.
pub fn resolve_position<N: Borrow<BlockNode>>(
    trees: &[N],
    pos: BlockPosition,
) -> Result<ResolvedPosition> {
    let Some(tree): Option<&BlockNode> = trees.get(pos.block).map(Borrow::borrow) else {
        return Err(EditorError::Range {
            block: pos.block,
            offset: pos.offset,
            reason: "block index past end of document",
        });
    };
    Ok(ResolvedPosition {
        block: pos.block,
        path: position_from_offset(tree, pos.offset),
    })
}

/// Resolve focus and anchor of a selection.
pub fn resolve_selection<N: Borrow<BlockNode>>(
    trees: &[N],
    selection: &Selection,
) -> Result<ResolvedSelection> {
    Ok(ResolvedSelection {
        focus: resolve_position(trees, selection.focus)?,
        anchor: selection
            .anchor
            .map(|anchor| resolve_position(trees, anchor))
            .transpose()?,
    })
}
