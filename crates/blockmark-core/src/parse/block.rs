use std::sync::LazyLock;

use regex::Regex;

use crate::node::{BlockKind, BlockNode, InlineNode};
use crate::text_helpers::char_len;

use super::inline::parse_inline_at;

static RULE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---$").unwrap());
static CHECKBOX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ - \[([xX ])\] ").unwrap());
static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) ").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^> ").unwrap());

/// Parse one block of raw text.
///
/// Block kinds are tried in a fixed order and the first match wins:
/// rule, checkbox, heading, quote, paragraph, break.
pub fn parse_block(raw: &str) -> BlockNode {
    let len = char_len(raw);
    let (kind, prefix) = classify(raw);

    let mut children = Vec::new();
    if !prefix.is_empty() {
        let prefix_chars = char_len(prefix);
        children.push(InlineNode::Marker {
            range: 0..prefix_chars,
            text: prefix.into(),
        });
        children.extend(parse_inline_at(&raw[prefix.len()..], prefix_chars));
    } else if kind != BlockKind::Break {
        children = parse_inline_at(raw, 0);
    }

    BlockNode {
        kind,
        range: 0..len,
        children,
    }
}

/// Decide the block kind and return the prefix that belongs to the block syntax.
fn classify(raw: &str) -> (BlockKind, &str) {
    if RULE.is_match(raw) {
        // The whole line is syntax.
        return (BlockKind::Rule, raw);
    }
    if let Some(caps) = CHECKBOX.captures(raw) {
        let checked = matches!(&caps[1], "x" | "X");
        let prefix = caps.get(0).map_or("", |m| m.as_str());
        return (BlockKind::Checkbox { checked }, prefix);
    }
    if let Some(caps) = HEADING.captures(raw) {
        let level = caps[1].len() as u8;
        let prefix = caps.get(0).map_or("", |m| m.as_str());
        return (BlockKind::Heading { level }, prefix);
    }
    if let Some(m) = QUOTE.find(raw) {
        return (BlockKind::Quote, m.as_str());
    }
    if raw.is_empty() {
        (BlockKind::Break, "")
    } else {
        (BlockKind::Paragraph, "")
    }
}
