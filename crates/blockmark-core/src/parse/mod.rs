//! Markdown grammar for one block of raw text.
//!
//! Two layers: the block layer decides the block kind from the line prefix,
//! the inline layer splits the rest into text runs, emphasis, code, links and
//! images. Both are total: every input parses, and the resulting leaves cover
//! the input with no gaps and no overlaps.

mod block;
mod inline;


pub use block::parse_block;
pub use inline::parse_inline;

/// Parse every block of a document.
pub fn parse_document(doc: &crate::Document) -> Vec<crate::BlockNode> {
    doc.iter().map(|raw| parse_block(raw)).collect()
}
