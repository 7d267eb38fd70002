//! blockmark-core: block-based markdown editing without framework dependencies.
//!
//! This crate provides:
//! - `Document` - an ordered list of raw markdown blocks
//! - `parse` - the block and inline grammar, producing `BlockNode` trees
//! - `offset_map` - mapping between flat char offsets and tree positions
//! - `EditorAction` / `execute_action` - edit intents and their transitions
//! - `UndoStack` - snapshot undo/redo history
//! - `RenderCache` - incremental per-block parsing for renderers

pub mod actions;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod execute;
pub mod node;
pub mod offset_map;
pub mod paragraph;
pub mod parse;
pub mod render_cache;
pub mod selection;
pub mod text_helpers;
pub mod types;
pub mod undo;

pub use actions::{Direction, EditorAction, Key, KeyCombo, Modifiers, action_for_key};
pub use config::{EditorConfig, LineSeparator};
pub use document::Document;
pub use editor::PlainEditor;
pub use error::{EditorError, Result};
pub use execute::{EditOutcome, execute_action};
pub use node::{BlockKind, BlockNode, EmphasisKind, InlineNode, NodeRef};
pub use offset_map::{
    NodePath, NodeSide, ResolvedPosition, ResolvedSelection, offset_from_position,
    position_from_offset, resolve_position, resolve_selection, side_of_node,
};
pub use paragraph::{BlockRender, hash_source, make_block_id};
pub use parse::{parse_block, parse_document, parse_inline};
pub use render_cache::{RenderCache, RenderResult, UpdateStats};
pub use selection::{normalize, select_all};
pub use smol_str::SmolStr;
pub use types::{BlockPosition, EditInfo, Selection};
pub use undo::{UndoEntry, UndoManager, UndoStack};
