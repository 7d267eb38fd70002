//! Action execution for the editor.
//!
//! `execute_action` is the central dispatch point: it applies one
//! `EditorAction` to a `PlainEditor` and reports what changed. Every edit is
//! computed against a scratch copy of the document and committed only once it
//! has fully succeeded, so an error leaves the editor exactly as it was.

use smol_str::SmolStr;

use crate::actions::{Direction, EditorAction};
use crate::document::{Document, split_lines};
use crate::editor::PlainEditor;
use crate::error::{EditorError, Result};
use crate::selection::select_all;
use crate::text_helpers::{after, before, char_len, concat};
use crate::types::{BlockPosition, EditInfo, Selection};
use crate::undo::{UndoEntry, UndoManager};

/// What an action did to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Nothing changed.
    Unchanged,
    /// Only the selection moved.
    SelectionChanged,
    /// The document changed.
    Edited(EditInfo),
}

impl EditOutcome {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edited(_))
    }

    /// True unless the action was a no-op.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    pub fn edit_info(&self) -> Option<&EditInfo> {
        match self {
            Self::Edited(info) => Some(info),
            _ => None,
        }
    }
}

/// Execute an editor action.
///
/// Destructive actions record the pre-edit state in the undo history, but only
/// when they actually change the document. Any action other than a vertical
/// caret move forgets the goal column.
pub fn execute_action<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    action: &EditorAction,
) -> Result<EditOutcome> {
    tracing::trace!(target: "blockmark::edit", ?action, "execute_action");

    let outcome = match action {
        EditorAction::InsertChar(c) => {
            let mut buf = [0u8; 4];
            execute_insert(editor, c.encode_utf8(&mut buf))
        }
        EditorAction::InsertText(text) => execute_insert(editor, text),
        EditorAction::Split => execute_split(editor),
        EditorAction::ReplaceRange(lines) => execute_replace_range(editor, lines),
        EditorAction::DeleteBackward => execute_delete_backward(editor),
        EditorAction::DeleteForward => execute_delete_forward(editor),
        EditorAction::Undo => Ok(execute_undo(editor)),
        EditorAction::Redo => Ok(execute_redo(editor)),
        EditorAction::SelectAll => {
            let selection = select_all(&editor.document);
            Ok(set_selection(editor, selection))
        }
        EditorAction::SetCaret(pos) => execute_set_selection(editor, Selection::caret(*pos)),
        EditorAction::SetSelection { focus, anchor } => execute_set_selection(
            editor,
            Selection {
                focus: *focus,
                anchor: *anchor,
            },
        ),
        EditorAction::MoveCaret { direction, extend } => {
            Ok(execute_move_caret(editor, *direction, *extend))
        }
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(target: "blockmark::edit", ?action, %err, "action rejected");
            return Err(err);
        }
    };

    if !matches!(action, EditorAction::MoveCaret { direction, .. } if direction.is_vertical()) {
        editor.goal_column = None;
    }

    Ok(outcome)
}

fn execute_insert<U: UndoManager>(editor: &mut PlainEditor<U>, text: &str) -> Result<EditOutcome> {
    replace_selection(editor, &[text])
}

fn execute_split<U: UndoManager>(editor: &mut PlainEditor<U>) -> Result<EditOutcome> {
    replace_selection(editor, &["", ""])
}

fn execute_replace_range<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    lines: &[String],
) -> Result<EditOutcome> {
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    replace_selection(editor, &lines)
}

fn execute_delete_backward<U: UndoManager>(editor: &mut PlainEditor<U>) -> Result<EditOutcome> {
    if !editor.selection.is_collapsed() {
        return replace_selection(editor, &[]);
    }

    let focus = editor.selection.focus;
    let start = if focus.offset > 0 {
        BlockPosition::new(focus.block, focus.offset - 1)
    } else if focus.block > 0 {
        // Merge with the previous block.
        let prev = focus.block - 1;
        BlockPosition::new(prev, block_len(&editor.document, prev)?)
    } else {
        return Ok(EditOutcome::Unchanged);
    };

    replace_span(editor, start, focus, &[])
}

fn execute_delete_forward<U: UndoManager>(editor: &mut PlainEditor<U>) -> Result<EditOutcome> {
    if !editor.selection.is_collapsed() {
        return replace_selection(editor, &[]);
    }

    let focus = editor.selection.focus;
    let len = block_len(&editor.document, focus.block)?;
    let end = if focus.offset < len {
        BlockPosition::new(focus.block, focus.offset + 1)
    } else if focus.block < editor.document.last_index() {
        // Pull the next block up into this one.
        BlockPosition::new(focus.block + 1, 0)
    } else {
        return Ok(EditOutcome::Unchanged);
    };

    replace_span(editor, focus, end, &[])
}

fn execute_undo<U: UndoManager>(editor: &mut PlainEditor<U>) -> EditOutcome {
    let current = UndoEntry::new(editor.document.clone(), editor.selection);
    match editor.undo.undo(current) {
        Some(entry) => {
            tracing::debug!(target: "blockmark::edit", blocks = entry.document.len(), "undo");
            restore(editor, entry)
        }
        None => EditOutcome::Unchanged,
    }
}

fn execute_redo<U: UndoManager>(editor: &mut PlainEditor<U>) -> EditOutcome {
    let current = UndoEntry::new(editor.document.clone(), editor.selection);
    match editor.undo.redo(current) {
        Some(entry) => {
            tracing::debug!(target: "blockmark::edit", blocks = entry.document.len(), "redo");
            restore(editor, entry)
        }
        None => EditOutcome::Unchanged,
    }
}

fn execute_set_selection<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    selection: Selection,
) -> Result<EditOutcome> {
    selection.validate(&editor.document)?;
    Ok(set_selection(editor, selection))
}

fn execute_move_caret<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    direction: Direction,
    extend: bool,
) -> EditOutcome {
    let doc = &editor.document;
    let selection = editor.selection;
    let focus = selection.focus;
    let len_of = |block: usize| doc.block_len(block).unwrap_or(0);

    let new_focus = if !extend && !selection.is_collapsed() && !direction.is_vertical() {
        // Collapse to the edge of the range in the direction of travel.
        let (earlier, later) = selection.normalized();
        match direction {
            Direction::Left => earlier,
            _ => later,
        }
    } else {
        match direction {
            Direction::Left if focus.offset > 0 => {
                BlockPosition::new(focus.block, focus.offset - 1)
            }
            Direction::Left if focus.block > 0 => {
                BlockPosition::new(focus.block - 1, len_of(focus.block - 1))
            }
            Direction::Right if focus.offset < len_of(focus.block) => {
                BlockPosition::new(focus.block, focus.offset + 1)
            }
            Direction::Right if focus.block < doc.last_index() => {
                BlockPosition::new(focus.block + 1, 0)
            }
            Direction::Left | Direction::Right => focus,
            Direction::Up => {
                let goal = *editor.goal_column.get_or_insert(focus.offset);
                if focus.block == 0 {
                    BlockPosition::new(0, 0)
                } else {
                    BlockPosition::new(focus.block - 1, goal.min(len_of(focus.block - 1)))
                }
            }
            Direction::Down => {
                let goal = *editor.goal_column.get_or_insert(focus.offset);
                if focus.block == doc.last_index() {
                    BlockPosition::new(focus.block, len_of(focus.block))
                } else {
                    BlockPosition::new(focus.block + 1, goal.min(len_of(focus.block + 1)))
                }
            }
        }
    };

    let anchor = extend.then(|| selection.anchor.unwrap_or(focus));
    set_selection(
        editor,
        Selection {
            focus: new_focus,
            anchor,
        },
    )
}

/// Replace the current selection (or nothing, for a caret) with `lines`.
fn replace_selection<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    lines: &[&str],
) -> Result<EditOutcome> {
    let (earlier, later) = editor.selection.normalized();
    replace_span(editor, earlier, later, lines)
}

/// Replace the text between `earlier` and `later` with `lines`.
///
/// The first line is joined to the text before `earlier` and the last line to
/// the text after `later`; lines in between become blocks of their own. No
/// lines deletes the span. A line holding line breaks counts as several lines.
/// The caret lands at the end of the last inserted line.
fn replace_span<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    earlier: BlockPosition,
    later: BlockPosition,
    lines: &[&str],
) -> Result<EditOutcome> {
    let lines: Vec<&str> = lines.iter().flat_map(|&line| split_lines(line)).collect();
    let doc = &editor.document;
    earlier.validate(doc)?;
    later.validate(doc)?;

    let head = before(block_text(doc, earlier.block)?, earlier.offset);
    let tail = after(block_text(doc, later.block)?, later.offset);
    let (first, rest) = lines.split_first().unwrap_or((&"", &[]));

    let mut new_blocks: Vec<SmolStr> = Vec::with_capacity(rest.len() + 1);
    let caret = match rest.split_last() {
        None => {
            new_blocks.push(concat(&concat(head, first), tail));
            BlockPosition::new(earlier.block, char_len(head) + char_len(first))
        }
        Some((last, middle)) => {
            new_blocks.push(concat(head, first));
            new_blocks.extend(middle.iter().map(SmolStr::new));
            new_blocks.push(concat(last, tail));
            BlockPosition::new(earlier.block + rest.len(), char_len(last))
        }
    };

    let inserted = new_blocks.len();
    let removed = later.block - earlier.block + 1;
    let mut scratch = doc.clone();
    scratch.replace(earlier.block, removed, new_blocks)?;

    let info = EditInfo::new(
        earlier.block..earlier.block + removed,
        earlier.block..earlier.block + inserted,
        scratch.len(),
    );
    Ok(commit(editor, scratch, Selection::caret(caret), info))
}

/// Install an edited document, recording the previous state for undo.
fn commit<U: UndoManager>(
    editor: &mut PlainEditor<U>,
    document: Document,
    selection: Selection,
    info: EditInfo,
) -> EditOutcome {
    if document == editor.document {
        return set_selection(editor, selection);
    }

    let previous = std::mem::replace(&mut editor.document, document);
    editor.undo.record(UndoEntry::new(previous, editor.selection));
    editor.selection = selection;
    editor.last_edit = Some(info.clone());

    tracing::debug!(
        target: "blockmark::edit",
        before = ?info.before,
        after = ?info.after,
        doc_len = info.doc_len_after,
        "applied edit"
    );
    EditOutcome::Edited(info)
}

fn restore<U: UndoManager>(editor: &mut PlainEditor<U>, entry: UndoEntry) -> EditOutcome {
    let len_before = editor.document.len();
    editor.document = entry.document;
    editor.selection = entry.selection.clamp_to(&editor.document);
    let info = EditInfo::whole(len_before, editor.document.len());
    editor.last_edit = Some(info.clone());
    EditOutcome::Edited(info)
}

fn set_selection<U: UndoManager>(editor: &mut PlainEditor<U>, selection: Selection) -> EditOutcome {
    if selection == editor.selection {
        return EditOutcome::Unchanged;
    }
    editor.selection = selection;
    EditOutcome::SelectionChanged
}

fn block_text(doc: &Document, block: usize) -> Result<&SmolStr> {
    doc.block(block).ok_or(EditorError::Range {
        block,
        offset: 0,
        reason: "block index past end of document",
    })
}

fn block_len(doc: &Document, block: usize) -> Result<usize> {
    block_text(doc, block).map(|text| char_len(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_editor(blocks: &[&str]) -> PlainEditor {
        PlainEditor::with_config(
            Document::from_blocks(blocks.iter().copied()),
            Default::default(),
        )
    }

    fn pos(block: usize, offset: usize) -> BlockPosition {
        BlockPosition::new(block, offset)
    }

    fn at(blocks: &[&str], block: usize, offset: usize) -> PlainEditor {
        let mut editor = make_editor(blocks);
        editor.selection = Selection::caret(pos(block, offset));
        editor
    }

    fn blocks(editor: &PlainEditor) -> Vec<&str> {
        editor.document().iter().map(|b| b.as_str()).collect()
    }

    // === Scenarios ===

    #[test]
    fn test_split_at_block_end() {
        let mut editor = at(&["Hello", "World"], 0, 5);
        let outcome = execute_action(&mut editor, &EditorAction::Split).unwrap();
        assert_eq!(blocks(&editor), vec!["Hello", "", "World"]);
        assert_eq!(editor.selection(), Selection::caret(pos(1, 0)));
        assert_eq!(
            outcome,
            EditOutcome::Edited(EditInfo::new(0..1, 0..2, 3))
        );
    }

    #[test]
    fn test_insert_char_at_start() {
        let mut editor = at(&["Hello World"], 0, 0);
        execute_action(&mut editor, &EditorAction::InsertChar('X')).unwrap();
        assert_eq!(blocks(&editor), vec!["XHello World"]);
        assert_eq!(editor.selection(), Selection::caret(pos(0, 1)));
    }

    #[test]
    fn test_backspace_merges_blocks() {
        let mut editor = at(&["Hello", "World"], 1, 0);
        execute_action(&mut editor, &EditorAction::DeleteBackward).unwrap();
        assert_eq!(blocks(&editor), vec!["HelloWorld"]);
        assert_eq!(editor.selection(), Selection::caret(pos(0, 5)));
    }

    #[test]
    fn test_insert_replaces_backwards_range() {
        let mut editor = make_editor(&["abcdef"]);
        editor.selection = Selection::range(pos(0, 0), pos(0, 3));
        execute_action(&mut editor, &EditorAction::InsertChar('Z')).unwrap();
        assert_eq!(blocks(&editor), vec!["Zdef"]);
        assert_eq!(editor.selection(), Selection::caret(pos(0, 1)));
    }

    // === Insertion ===

    #[test]
    fn test_insert_char_advances_by_one() {
        for (text, offset) in [("", 0), ("abc", 1), ("héllo", 5), ("日本", 2)] {
            let mut editor = at(&[text], 0, offset);
            execute_action(&mut editor, &EditorAction::InsertChar('ß')).unwrap();
            let block = &editor.document().blocks()[0];
            assert_eq!(char_len(block), char_len(text) + 1);
            assert_eq!(editor.selection().focus, pos(0, offset + 1));
            assert_eq!(before(block, offset), before(text, offset));
            assert_eq!(after(block, offset + 1), after(text, offset));
        }
    }

    #[test]
    fn test_insert_text_commit() {
        let mut editor = at(&["ab"], 0, 1);
        execute_action(&mut editor, &EditorAction::InsertText("日本語".into())).unwrap();
        assert_eq!(blocks(&editor), vec!["a日本語b"]);
        assert_eq!(editor.selection().focus, pos(0, 4));

        // An empty commit changes nothing.
        let outcome = execute_action(&mut editor, &EditorAction::InsertText(String::new()));
        assert_eq!(outcome, Ok(EditOutcome::Unchanged));
    }

    #[test]
    fn test_insert_text_with_newlines_splits() {
        let mut editor = at(&["ab"], 0, 1);
        execute_action(&mut editor, &EditorAction::InsertText("x\r\ny".into())).unwrap();
        assert_eq!(blocks(&editor), vec!["ax", "yb"]);
        assert_eq!(editor.selection().focus, pos(1, 1));
    }

    #[test]
    fn test_carriage_return_splits() {
        let mut editor = at(&["ab"], 0, 1);
        let outcome = execute_action(&mut editor, &EditorAction::InsertChar('\r')).unwrap();
        assert!(outcome.is_edit());
        assert_eq!(blocks(&editor), vec!["a", "b"]);
        assert_eq!(editor.selection(), Selection::caret(pos(1, 0)));

        let mut editor = make_editor(&["abcd"]);
        editor.selection = Selection::range(pos(0, 1), pos(0, 3));
        execute_action(&mut editor, &EditorAction::InsertChar('\r')).unwrap();
        assert_eq!(blocks(&editor), vec!["a", "d"]);
        assert_eq!(editor.selection(), Selection::caret(pos(1, 0)));
    }

    // === Split ===

    #[test]
    fn test_split_mid_block_and_over_range() {
        let mut editor = at(&["abcd"], 0, 2);
        execute_action(&mut editor, &EditorAction::Split).unwrap();
        assert_eq!(blocks(&editor), vec!["ab", "cd"]);

        let mut editor = make_editor(&["one", "two", "three"]);
        editor.selection = Selection::range(pos(2, 2), pos(0, 1));
        execute_action(&mut editor, &EditorAction::Split).unwrap();
        assert_eq!(blocks(&editor), vec!["o", "ree"]);
        assert_eq!(editor.selection(), Selection::caret(pos(1, 0)));
    }

    #[test]
    fn test_split_then_merge_is_identity() {
        for (text, offset) in [("abc", 0), ("abc", 2), ("abc", 3), ("", 0), ("日本語", 1)] {
            let mut editor = at(&["before", text, "after"], 1, offset);
            execute_action(&mut editor, &EditorAction::Split).unwrap();
            execute_action(&mut editor, &EditorAction::DeleteBackward).unwrap();
            assert_eq!(blocks(&editor), vec!["before", text, "after"]);
            assert_eq!(editor.selection(), Selection::caret(pos(1, offset)));
        }
    }

    // === Deletion ===

    #[test]
    fn test_backspace_mid_block() {
        let mut editor = at(&["héllo"], 0, 2);
        execute_action(&mut editor, &EditorAction::DeleteBackward).unwrap();
        assert_eq!(blocks(&editor), vec!["hllo"]);
        assert_eq!(editor.selection().focus, pos(0, 1));
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let mut editor = at(&["abc"], 0, 0);
        let outcome = execute_action(&mut editor, &EditorAction::DeleteBackward).unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert!(!editor.can_undo());
        assert_eq!(blocks(&editor), vec!["abc"]);
    }

    #[test]
    fn test_delete_forward() {
        let mut editor = at(&["abc", "def"], 0, 1);
        execute_action(&mut editor, &EditorAction::DeleteForward).unwrap();
        assert_eq!(blocks(&editor), vec!["ac", "def"]);
        assert_eq!(editor.selection().focus, pos(0, 1));

        // At block end the next block is pulled up.
        editor.selection = Selection::caret(pos(0, 2));
        execute_action(&mut editor, &EditorAction::DeleteForward).unwrap();
        assert_eq!(blocks(&editor), vec!["acdef"]);
        assert_eq!(editor.selection().focus, pos(0, 2));

        // At document end nothing happens.
        editor.selection = Selection::caret(pos(0, 5));
        let outcome = execute_action(&mut editor, &EditorAction::DeleteForward).unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(blocks(&editor), vec!["acdef"]);
    }

    #[test]
    fn test_delete_range_across_blocks() {
        for action in [EditorAction::DeleteBackward, EditorAction::DeleteForward] {
            let mut editor = make_editor(&["# Title", "middle", "**end**"]);
            editor.selection = Selection::range(pos(0, 2), pos(2, 2));
            execute_action(&mut editor, &action).unwrap();
            assert_eq!(blocks(&editor), vec!["# end**"]);
            assert_eq!(editor.selection(), Selection::caret(pos(0, 2)));
        }
    }

    #[test]
    fn test_delete_whole_document_keeps_one_block() {
        let mut editor = make_editor(&["a", "b", "c"]);
        execute_action(&mut editor, &EditorAction::SelectAll).unwrap();
        execute_action(&mut editor, &EditorAction::DeleteBackward).unwrap();
        assert_eq!(blocks(&editor), vec![""]);
        assert_eq!(editor.selection(), Selection::caret(pos(0, 0)));
    }

    // === Paste ===

    #[test]
    fn test_paste_lines_at_caret() {
        let mut editor = at(&["start end"], 0, 6);
        execute_action(&mut editor, &EditorAction::paste("one\ntwo\r\nthree ")).unwrap();
        assert_eq!(blocks(&editor), vec!["start one", "two", "three end"]);
        assert_eq!(editor.selection(), Selection::caret(pos(2, 6)));
    }

    #[test]
    fn test_paste_single_line_over_range() {
        let mut editor = make_editor(&["hello world"]);
        editor.selection = Selection::range(pos(0, 6), pos(0, 11));
        execute_action(&mut editor, &EditorAction::paste("there")).unwrap();
        assert_eq!(blocks(&editor), vec!["hello there"]);
        assert_eq!(editor.selection().focus, pos(0, 11));
    }

    #[test]
    fn test_replace_range_lines_with_breaks_become_blocks() {
        let mut editor = at(&["ab"], 0, 1);
        execute_action(&mut editor, &EditorAction::ReplaceRange(vec!["x\ny".into()])).unwrap();
        assert_eq!(blocks(&editor), vec!["ax", "yb"]);
        assert_eq!(editor.selection(), Selection::caret(pos(1, 1)));
        assert_eq!(editor.last_edit().map(|info| info.after.clone()), Some(0..2));
        assert_eq!(&Document::from_text(&editor.content_string()), editor.document());

        let lines = vec!["1\r\n2".to_string(), "3\r".to_string()];
        let mut editor = at(&["ab"], 0, 2);
        execute_action(&mut editor, &EditorAction::ReplaceRange(lines)).unwrap();
        assert_eq!(blocks(&editor), vec!["ab1", "2", "3", ""]);
        assert_eq!(editor.selection(), Selection::caret(pos(3, 0)));
    }

    #[test]
    fn test_empty_replace_range_deletes() {
        let mut editor = make_editor(&["abc", "def"]);
        editor.selection = Selection::range(pos(0, 1), pos(1, 2));
        execute_action(&mut editor, &EditorAction::ReplaceRange(vec![])).unwrap();
        assert_eq!(blocks(&editor), vec!["af"]);
        assert_eq!(editor.selection().focus, pos(0, 1));
    }

    // === Navigation ===

    fn move_caret(editor: &mut PlainEditor, direction: Direction, extend: bool) {
        execute_action(editor, &EditorAction::MoveCaret { direction, extend }).unwrap();
    }

    #[test]
    fn test_left_right_cross_blocks() {
        let mut editor = at(&["ab", "cd"], 1, 0);
        move_caret(&mut editor, Direction::Left, false);
        assert_eq!(editor.selection().focus, pos(0, 2));
        move_caret(&mut editor, Direction::Right, false);
        assert_eq!(editor.selection().focus, pos(1, 0));

        let mut editor = at(&["ab"], 0, 0);
        let outcome = execute_action(
            &mut editor,
            &EditorAction::MoveCaret {
                direction: Direction::Left,
                extend: false,
            },
        );
        assert_eq!(outcome, Ok(EditOutcome::Unchanged));

        let mut editor = at(&["ab", "cd"], 1, 2);
        move_caret(&mut editor, Direction::Right, false);
        assert_eq!(editor.selection().focus, pos(1, 2));
    }

    #[test]
    fn test_arrow_collapses_range() {
        let mut editor = make_editor(&["abcdef"]);
        editor.selection = Selection::range(pos(0, 4), pos(0, 1));
        move_caret(&mut editor, Direction::Right, false);
        assert_eq!(editor.selection(), Selection::caret(pos(0, 4)));

        editor.selection = Selection::range(pos(0, 4), pos(0, 1));
        move_caret(&mut editor, Direction::Left, false);
        assert_eq!(editor.selection(), Selection::caret(pos(0, 1)));
    }

    #[test]
    fn test_shift_arrow_extends() {
        let mut editor = at(&["abc", "def"], 0, 2);
        move_caret(&mut editor, Direction::Right, true);
        move_caret(&mut editor, Direction::Right, true);
        assert_eq!(editor.selection(), Selection::range(pos(0, 2), pos(1, 0)));
        move_caret(&mut editor, Direction::Down, true);
        assert_eq!(editor.selection(), Selection::range(pos(0, 2), pos(1, 3)));
    }

    #[test]
    fn test_vertical_moves_keep_goal_column() {
        let mut editor = at(&["long line here", "ab", "another long line"], 0, 9);
        move_caret(&mut editor, Direction::Down, false);
        assert_eq!(editor.selection().focus, pos(1, 2));
        assert_eq!(editor.goal_column(), Some(9));
        move_caret(&mut editor, Direction::Down, false);
        assert_eq!(editor.selection().focus, pos(2, 9));
        move_caret(&mut editor, Direction::Up, false);
        move_caret(&mut editor, Direction::Up, false);
        assert_eq!(editor.selection().focus, pos(0, 9));

        // Horizontal movement forgets the goal.
        move_caret(&mut editor, Direction::Down, false);
        move_caret(&mut editor, Direction::Left, false);
        assert_eq!(editor.goal_column(), None);
        move_caret(&mut editor, Direction::Down, false);
        assert_eq!(editor.selection().focus, pos(2, 1));
    }

    #[test]
    fn test_vertical_moves_at_document_edges() {
        let mut editor = at(&["abc", "def"], 0, 2);
        move_caret(&mut editor, Direction::Up, false);
        assert_eq!(editor.selection().focus, pos(0, 0));

        let mut editor = at(&["abc", "def"], 1, 1);
        move_caret(&mut editor, Direction::Down, false);
        assert_eq!(editor.selection().focus, pos(1, 3));
    }

    #[test]
    fn test_select_all_and_set_selection() {
        let mut editor = make_editor(&["ab", "", "xyz"]);
        let outcome = execute_action(&mut editor, &EditorAction::SelectAll).unwrap();
        assert_eq!(outcome, EditOutcome::SelectionChanged);
        assert_eq!(editor.selection(), Selection::range(pos(2, 3), pos(0, 0)));

        execute_action(&mut editor, &EditorAction::SetCaret(pos(2, 1))).unwrap();
        assert_eq!(editor.selection(), Selection::caret(pos(2, 1)));

        execute_action(
            &mut editor,
            &EditorAction::SetSelection {
                focus: pos(0, 1),
                anchor: Some(pos(2, 0)),
            },
        )
        .unwrap();
        assert!(editor.selection().is_backwards());
        assert!(!editor.can_undo());
    }

    // === Errors ===

    #[test]
    fn test_invalid_positions_leave_state_unchanged() {
        let mut editor = at(&["abc", "de"], 1, 1);
        let before_doc = editor.document().clone();
        let before_sel = editor.selection();

        let err = execute_action(&mut editor, &EditorAction::SetCaret(pos(0, 4))).unwrap_err();
        assert!(matches!(err, EditorError::Range { block: 0, offset: 4, .. }));

        let err = execute_action(
            &mut editor,
            &EditorAction::SetSelection {
                focus: pos(1, 0),
                anchor: Some(pos(5, 0)),
            },
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::Range { block: 5, .. }));

        assert_eq!(editor.document(), &before_doc);
        assert_eq!(editor.selection(), before_sel);
        assert!(!editor.can_undo());
    }

    // === History ===

    #[test]
    fn test_undo_restores_exact_state() {
        let mut editor = make_editor(&["# Title", "body"]);
        editor.selection = Selection::range(pos(0, 2), pos(1, 2));
        let before_doc = editor.document().clone();
        let before_sel = editor.selection();

        execute_action(&mut editor, &EditorAction::Split).unwrap();
        assert_ne!(editor.document(), &before_doc);

        let outcome = execute_action(&mut editor, &EditorAction::Undo).unwrap();
        assert!(outcome.is_edit());
        assert_eq!(editor.document(), &before_doc);
        assert_eq!(editor.selection(), before_sel);
    }

    #[test]
    fn test_undo_restores_document_and_selection() {
        let cases = [
            (Selection::caret(pos(0, 1)), EditorAction::InsertChar('x')),
            (Selection::caret(pos(0, 2)), EditorAction::DeleteBackward),
            (Selection::caret(pos(1, 0)), EditorAction::DeleteBackward),
            (Selection::caret(pos(0, 1)), EditorAction::DeleteForward),
            (Selection::caret(pos(0, 3)), EditorAction::DeleteForward),
            (
                Selection::caret(pos(0, 2)),
                EditorAction::ReplaceRange(vec!["1".into(), "2".into()]),
            ),
            (
                Selection::range(pos(1, 2), pos(0, 1)),
                EditorAction::DeleteBackward,
            ),
            (
                Selection::range(pos(0, 1), pos(1, 2)),
                EditorAction::DeleteForward,
            ),
        ];

        for (selection, action) in cases {
            let mut editor = make_editor(&["abc", "def"]);
            editor.selection = selection;
            let before_doc = editor.document().clone();

            execute_action(&mut editor, &action).unwrap();
            assert_ne!(editor.document(), &before_doc, "{action:?}");

            execute_action(&mut editor, &EditorAction::Undo).unwrap();
            assert_eq!(editor.document(), &before_doc, "{action:?}");
            assert_eq!(editor.selection(), selection, "{action:?}");
            assert!(!editor.can_undo());
        }
    }

    #[test]
    fn test_undo_every_step_of_typing() {
        let mut editor = make_editor(&[""]);
        let mut states = vec![editor.content_string()];
        for action in [
            EditorAction::InsertChar('a'),
            EditorAction::Split,
            EditorAction::InsertChar('b'),
            EditorAction::DeleteBackward,
            EditorAction::DeleteBackward,
        ] {
            execute_action(&mut editor, &action).unwrap();
            states.push(editor.content_string());
        }
        assert_eq!(states, vec!["", "a", "a\n", "a\nb", "a\n", "a"]);

        states.pop();
        while let Some(expected) = states.pop() {
            execute_action(&mut editor, &EditorAction::Undo).unwrap();
            assert_eq!(editor.content_string(), expected);
        }
        assert_eq!(
            execute_action(&mut editor, &EditorAction::Undo),
            Ok(EditOutcome::Unchanged)
        );
    }

    #[test]
    fn test_redo_and_new_edit_clears_redo() {
        let mut editor = at(&["ab"], 0, 2);
        execute_action(&mut editor, &EditorAction::InsertChar('c')).unwrap();
        execute_action(&mut editor, &EditorAction::Undo).unwrap();
        assert_eq!(editor.content_string(), "ab");
        assert!(editor.can_redo());

        execute_action(&mut editor, &EditorAction::Redo).unwrap();
        assert_eq!(editor.content_string(), "abc");
        assert_eq!(editor.selection().focus, pos(0, 3));

        execute_action(&mut editor, &EditorAction::Undo).unwrap();
        execute_action(&mut editor, &EditorAction::InsertChar('x')).unwrap();
        assert!(!editor.can_redo());
        assert_eq!(
            execute_action(&mut editor, &EditorAction::Redo),
            Ok(EditOutcome::Unchanged)
        );
    }

    #[test]
    fn test_navigation_never_records_undo() {
        let mut editor = at(&["abc", "def"], 0, 0);
        move_caret(&mut editor, Direction::Right, true);
        move_caret(&mut editor, Direction::Down, false);
        execute_action(&mut editor, &EditorAction::SelectAll).unwrap();
        execute_action(&mut editor, &EditorAction::SetCaret(pos(1, 1))).unwrap();
        assert!(!editor.can_undo());
        assert!(editor.last_edit().is_none());
    }

    #[test]
    fn test_last_edit_tracks_touched_blocks() {
        let mut editor = at(&["a", "b", "c"], 2, 0);
        execute_action(&mut editor, &EditorAction::DeleteBackward).unwrap();
        let info = editor.last_edit().unwrap();
        assert_eq!(info.before, 1..3);
        assert_eq!(info.after, 1..2);
        assert_eq!(info.block_delta(), -1);
        assert!(!info.is_stale(2));
    }
}
