//! Block storage.
//!
//! A `Document` is an ordered list of raw markdown blocks. Blocks are stored as
//! `SmolStr` so that cloning a whole document for an undo snapshot only copies
//! inline strings and bumps refcounts, and no edit can reach into a snapshot:
//! every mutation builds a new string for the block it touches.

use smol_str::SmolStr;

use crate::config::LineSeparator;
use crate::error::{EditorError, Result};
use crate::text_helpers::char_len;

/// Ordered sequence of raw text blocks. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Document {
    blocks: Vec<SmolStr>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A document holding a single empty block.
    pub fn new() -> Self {
        Self {
            blocks: vec![SmolStr::default()],
        }
    }

    /// Build a document from block strings. An empty iterator gives one empty block.
    ///
    /// A string holding line breaks becomes one block per line.
    pub fn from_blocks<I, S>(blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        let blocks = single_line_blocks(blocks.into_iter().map(Into::into));
        if blocks.is_empty() {
            return Self::new();
        }
        Self { blocks }
    }

    /// Parse the serialized form, accepting `\n`, `\r\n` and a lone `\r` as separators.
    pub fn from_text(text: &str) -> Self {
        Self::from_blocks(split_lines(text))
    }

    /// Serialize with the given separator.
    pub fn to_text(&self, separator: LineSeparator) -> String {
        self.blocks.join(separator.as_str())
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, index: usize) -> Option<&SmolStr> {
        self.blocks.get(index)
    }

    /// Length of a block in chars.
    pub fn block_len(&self, index: usize) -> Option<usize> {
        self.blocks.get(index).map(|b| char_len(b))
    }

    pub fn last_index(&self) -> usize {
        self.blocks.len() - 1
    }

    pub fn blocks(&self) -> &[SmolStr] {
        &self.blocks
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.blocks.iter()
    }

    /// Splice: remove `delete_count` blocks at `start` and insert `new_blocks` there.
    /// New blocks holding line breaks are split into one block per line.
    ///
    /// Fails without touching the document if the range is out of bounds or if
    /// the result would have no blocks.
    pub fn replace<I>(&mut self, start: usize, delete_count: usize, new_blocks: I) -> Result<()>
    where
        I: IntoIterator<Item = SmolStr>,
    {
        let len = self.blocks.len();
        let end = start.checked_add(delete_count);
        if start > len || end.is_none_or(|end| end > len) {
            return Err(EditorError::Index {
                start,
                count: delete_count,
                len,
            });
        }
        let new_blocks = single_line_blocks(new_blocks);
        if new_blocks.is_empty() && delete_count == len {
            return Err(EditorError::EmptyDocument);
        }
        self.blocks.splice(start..start + delete_count, new_blocks);
        Ok(())
    }

    /// Replace the text of a single block.
    pub fn set_block(&mut self, index: usize, text: impl Into<SmolStr>) -> Result<()> {
        let text: SmolStr = text.into();
        self.replace(index, 1, [text])
    }
}

/// Split text into block lines on `\r\n`, `\n` or a lone `\r`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|line| line.split(['\r', '\n']))
}

fn single_line_blocks(blocks: impl IntoIterator<Item = SmolStr>) -> Vec<SmolStr> {
    let mut out = Vec::new();
    for block in blocks {
        if block.contains(['\r', '\n']) {
            out.extend(split_lines(&block).map(SmolStr::new));
        } else {
            out.push(block);
        }
    }
    out
}

impl<S: Into<SmolStr>> FromIterator<S> for Document {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_blocks(iter)
    }
}
