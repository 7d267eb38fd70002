//! Render caching and incremental block parsing.
//!
//! The cache keeps one parsed [`BlockRender`] per document block. After an
//! edit only the blocks the edit touched (or whose source hash no longer
//! matches) are parsed again; everything else is reused with its ID intact.

use crate::document::Document;
use crate::error::Result;
use crate::node::BlockNode;
use crate::offset_map::{ResolvedSelection, resolve_selection};
use crate::paragraph::{BlockRender, hash_source, make_block_id};
use crate::types::{EditInfo, Selection};

/// Cache for incremental block parsing.
#[derive(Clone, Debug, Default)]
pub struct RenderCache {
    /// One entry per document block, in order.
    pub blocks: Vec<BlockRender>,
    /// Next available block ID (monotonic counter).
    pub next_block_id: usize,
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub blocks: Vec<BlockRender>,
    pub selection: ResolvedSelection,
}

/// How many blocks an update parsed versus reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateStats {
    pub parsed: usize,
    pub reused: usize,
}

impl RenderCache {
    /// Parse every block of `doc`.
    pub fn new(doc: &Document) -> Self {
        let mut cache = Self::default();
        cache.update(doc, None);
        cache
    }

    /// Bring the cache in line with `doc`.
    ///
    /// With a fresh `edit` the blocks before and after its range are matched to
    /// their old positions and the blocks inside it take over the IDs of the
    /// blocks they replaced, as far as there are enough to go round. Without
    /// one (or with a stale one) blocks are matched by index. A matched block
    /// is reused when its source hash is unchanged and parsed again otherwise.
    pub fn update(&mut self, doc: &Document, edit: Option<&EditInfo>) -> UpdateStats {
        let edit = edit.filter(|edit| self.edit_applies(doc, edit));

        tracing::debug!(
            target: "blockmark::render",
            cached = self.blocks.len(),
            doc_len = doc.len(),
            incremental = edit.is_some(),
            "render cache update"
        );

        let mut old: Vec<Option<BlockRender>> = std::mem::take(&mut self.blocks)
            .into_iter()
            .map(Some)
            .collect();
        let mut stats = UpdateStats::default();
        let mut blocks = Vec::with_capacity(doc.len());

        for (index, source) in doc.iter().enumerate() {
            let old_index = match edit {
                Some(edit) if edit.after.contains(&index) => {
                    let replaced = edit.before.start + (index - edit.after.start);
                    Some(replaced).filter(|i| edit.before.contains(i))
                }
                Some(edit) if index >= edit.after.end => {
                    Some(index - edit.after.end + edit.before.end)
                }
                _ => Some(index),
            };
            let cached = old_index.and_then(|i| old.get_mut(i)).and_then(Option::take);

            let block = match cached {
                Some(cached) if cached.source_hash == hash_source(source) => {
                    tracing::trace!(target: "blockmark::render", index, id = %cached.id, "reuse");
                    stats.reused += 1;
                    cached
                }
                Some(cached) => {
                    tracing::trace!(target: "blockmark::render", index, id = %cached.id, "reparse");
                    stats.parsed += 1;
                    BlockRender::parse(cached.id, source)
                }
                None => {
                    let id = make_block_id(self.next_block_id);
                    self.next_block_id += 1;
                    tracing::trace!(target: "blockmark::render", index, id = %id, "fresh parse");
                    stats.parsed += 1;
                    BlockRender::parse(id, source)
                }
            };
            blocks.push(block);
        }

        self.blocks = blocks;
        tracing::debug!(
            target: "blockmark::render",
            parsed = stats.parsed,
            reused = stats.reused,
            "render cache updated"
        );
        stats
    }

    /// Resolve `selection` against the cached trees, refreshing the cache first
    /// if it has fallen out of step with `doc`.
    pub fn render(&mut self, doc: &Document, selection: &Selection) -> Result<RenderResult> {
        if !self.is_current(doc) {
            self.update(doc, None);
        }
        let trees: Vec<&BlockNode> = self.blocks.iter().map(|b| &b.node).collect();
        let selection = resolve_selection(&trees, selection)?;
        Ok(RenderResult {
            blocks: self.blocks.clone(),
            selection,
        })
    }

    /// Check every cached block against the document by hash.
    pub fn is_current(&self, doc: &Document) -> bool {
        self.blocks.len() == doc.len()
            && self
                .blocks
                .iter()
                .zip(doc.iter())
                .all(|(block, source)| block.source_hash == hash_source(source))
    }

    /// An edit describes the step from the cached layout to `doc` only if the
    /// block counts line up on both sides.
    fn edit_applies(&self, doc: &Document, edit: &EditInfo) -> bool {
        !edit.is_stale(doc.len())
            && edit.before.end <= self.blocks.len()
            && self.blocks.len() - edit.before.len() + edit.after.len() == doc.len()
    }
}
