//! Char-offset string helpers.
//!
//! All offsets in this crate count Unicode scalar values (chars), not bytes.
//! These helpers do the char -> byte conversion in one place.

use smol_str::SmolStr;

/// Length of a string in chars.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the char at `char_offset`, clamped to the end of the string.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Split text at a char offset.
pub fn split_at_char(text: &str, char_offset: usize) -> (&str, &str) {
    text.split_at(char_to_byte(text, char_offset))
}

/// Text before a char offset.
pub fn before(text: &str, char_offset: usize) -> &str {
    split_at_char(text, char_offset).0
}

/// Text from a char offset to the end.
pub fn after(text: &str, char_offset: usize) -> &str {
    split_at_char(text, char_offset).1
}

/// Join two pieces into a new block string.
pub fn concat(head: &str, tail: &str) -> SmolStr {
    let mut out = String::with_capacity(head.len() + tail.len());
    out.push_str(head);
    out.push_str(tail);
    out.into()
}
