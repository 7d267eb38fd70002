//! Editor actions and keyboard input types.
//!
//! `EditorAction` is the closed set of intents the edit engine understands.
//! `Key`/`KeyCombo` are a platform-agnostic description of a keydown, and
//! `action_for_key` is the default keymap from one to the other.

use smol_str::SmolStr;

use crate::types::BlockPosition;

/// Caret movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Up and Down keep the remembered goal column.
    pub fn is_vertical(&self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// All possible editor actions.
///
/// These represent semantic operations on the document, decoupled from
/// how they're triggered (keyboard, mouse, clipboard, IME).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    // === Text Insertion ===
    /// Insert one typed character, replacing any selected content.
    InsertChar(char),

    /// Insert a run of text without line breaks (IME commit).
    InsertText(String),

    /// Split the block at the caret (Enter).
    Split,

    /// Replace the selection with lines of pasted or dropped text.
    ReplaceRange(Vec<String>),

    // === Deletion ===
    /// Delete content backward (Backspace).
    DeleteBackward,

    /// Delete content forward (Delete key).
    DeleteForward,

    // === History ===
    /// Undo the last change.
    Undo,

    /// Redo the last undone change.
    Redo,

    // === Selection ===
    /// Select all content.
    SelectAll,

    /// Place a collapsed caret (click).
    SetCaret(BlockPosition),

    /// Set focus and anchor directly (mouse drag).
    SetSelection {
        focus: BlockPosition,
        anchor: Option<BlockPosition>,
    },

    // === Navigation ===
    /// Move the caret one step, optionally extending the selection.
    MoveCaret { direction: Direction, extend: bool },
}

impl EditorAction {
    /// Build a paste action from clipboard text, one line per block.
    pub fn paste(text: &str) -> Self {
        Self::ReplaceRange(
            crate::document::split_lines(text)
                .map(str::to_string)
                .collect(),
        )
    }

    /// Whether this action may change the document (and so records undo).
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::InsertChar(_)
                | Self::InsertText(_)
                | Self::Split
                | Self::ReplaceRange(_)
                | Self::DeleteBackward
                | Self::DeleteForward
        )
    }

    /// Whether this action only moves the caret or selection.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::SelectAll | Self::SetCaret(_) | Self::SetSelection { .. } | Self::MoveCaret { .. }
        )
    }
}

/// Key values for keyboard input.
///
/// Only the keys the default keymap cares about get their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A key that produces a single character.
    Character(SmolStr),

    // === Editing ===
    Backspace,
    Delete,
    Enter,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,

    /// Anything else.
    Other(SmolStr),
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Check if this is a navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Self::ArrowLeft | Self::ArrowRight | Self::ArrowUp | Self::ArrowDown
        )
    }

    fn direction(&self) -> Option<Direction> {
        match self {
            Self::ArrowLeft => Some(Direction::Left),
            Self::ArrowRight => Some(Direction::Right),
            Self::ArrowUp => Some(Direction::Up),
            Self::ArrowDown => Some(Direction::Down),
            _ => None,
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };

    /// Ctrl or Cmd.
    pub fn is_primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::CTRL)
    }

    pub fn shift(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::SHIFT)
    }
}

/// Default keymap. `None` means the key is not an editor binding and the
/// platform should handle it.
pub fn action_for_key(combo: &KeyCombo) -> Option<EditorAction> {
    let mods = combo.modifiers;

    if let Some(direction) = combo.key.direction() {
        return Some(EditorAction::MoveCaret {
            direction,
            extend: mods.shift,
        });
    }

    match &combo.key {
        Key::Character(s) if mods.is_primary() => match s.to_lowercase().as_str() {
            "a" => Some(EditorAction::SelectAll),
            "z" if mods.shift => Some(EditorAction::Redo),
            "z" => Some(EditorAction::Undo),
            "y" => Some(EditorAction::Redo),
            _ => None,
        },
        Key::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(EditorAction::InsertChar(c)),
                _ => None,
            }
        }
        Key::Enter => Some(EditorAction::Split),
        Key::Backspace => Some(EditorAction::DeleteBackward),
        Key::Delete => Some(EditorAction::DeleteForward),
        _ => None,
    }
}
