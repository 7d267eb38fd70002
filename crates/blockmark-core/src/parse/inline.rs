use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::node::{EmphasisKind, InlineNode};
use crate::text_helpers::char_len;

// All patterns are anchored and run against the unparsed tail of the input.
// Paired delimiters are greedy (closing delimiter is the last one on the line);
// images and links stop at the first `](` ... `)` that completes them.
// Italic has no pattern: its delimiters must not touch another `*`, which the
// regex crate cannot express without lookaround. See `find_italic`.
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!\[(.*?)\]\((.+?)\)").unwrap());
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[(.*?)\]\((.+?)\)").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*(.+)\*\*").unwrap());
static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^__(.+)__").unwrap());
static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^==(.+)==").unwrap());
static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^~~(.+)~~").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^`(.+)`").unwrap());

/// Inline constructs in match priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    Image,
    Link,
    Emphasis(EmphasisKind),
    Code,
}

const PRIORITY: [Rule; 8] = [
    Rule::Image,
    Rule::Link,
    Rule::Emphasis(EmphasisKind::Bold),
    Rule::Emphasis(EmphasisKind::Underline),
    Rule::Emphasis(EmphasisKind::Highlight),
    Rule::Emphasis(EmphasisKind::Strikethrough),
    Rule::Emphasis(EmphasisKind::Italic),
    Rule::Code,
];

/// A successful match: the whole span and up to two capture groups.
struct Found<'a> {
    whole: &'a str,
    first: &'a str,
    second: &'a str,
}

impl<'a> Found<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        Some(Self {
            whole: caps.get(0)?.as_str(),
            first: caps.get(1).map_or("", |m| m.as_str()),
            second: caps.get(2).map_or("", |m| m.as_str()),
        })
    }
}

impl Rule {
    fn pattern(self) -> Option<&'static Regex> {
        let pattern: &'static Regex = match self {
            Rule::Image => &IMAGE,
            Rule::Link => &LINK,
            Rule::Emphasis(EmphasisKind::Bold) => &BOLD,
            Rule::Emphasis(EmphasisKind::Underline) => &UNDERLINE,
            Rule::Emphasis(EmphasisKind::Highlight) => &HIGHLIGHT,
            Rule::Emphasis(EmphasisKind::Strikethrough) => &STRIKETHROUGH,
            Rule::Emphasis(EmphasisKind::Italic) => return None,
            Rule::Code => &CODE,
        };
        Some(pattern)
    }

    fn find(self, rest: &str) -> Option<Found<'_>> {
        match self.pattern() {
            Some(pattern) => Found::from_captures(&pattern.captures(rest)?),
            None => find_italic(rest),
        }
    }

    /// First char of the construct; lets the scanner skip rules cheaply.
    fn opener(self) -> char {
        match self {
            Rule::Image => '!',
            Rule::Link => '[',
            Rule::Emphasis(kind) => kind.delimiter().chars().next().unwrap_or('*'),
            Rule::Code => '`',
        }
    }

    /// Build the node for a match starting at char offset `base`.
    fn build(self, found: &Found<'_>, base: usize) -> InlineNode {
        let whole = found.whole;
        let group = found.first;
        let range = base..base + char_len(whole);

        match self {
            Rule::Image => InlineNode::Image {
                range,
                alt: group.into(),
                src: found.second.into(),
                raw: whole.into(),
            },
            Rule::Link => {
                let href = found.second;
                let label_start = base + 1;
                let label_end = label_start + char_len(group);
                let close = &whole[1 + group.len()..];
                InlineNode::Link {
                    range: range.clone(),
                    label: group.into(),
                    href: href.into(),
                    children: vec![
                        InlineNode::Marker {
                            range: base..label_start,
                            text: "[".into(),
                        },
                        InlineNode::Text {
                            range: label_start..label_end,
                            text: group.into(),
                        },
                        InlineNode::Marker {
                            range: label_end..range.end,
                            text: close.into(),
                        },
                    ],
                }
            }
            Rule::Emphasis(kind) => {
                let delimiter = kind.delimiter();
                let width = delimiter.chars().count();
                let content_start = base + width;
                let content_end = range.end - width;

                let mut children = Vec::with_capacity(3);
                children.push(InlineNode::Marker {
                    range: base..content_start,
                    text: delimiter.into(),
                });
                children.extend(parse_inline_at(group, content_start));
                children.push(InlineNode::Marker {
                    range: content_end..range.end,
                    text: delimiter.into(),
                });
                InlineNode::Emphasis {
                    kind,
                    range,
                    children,
                }
            }
            Rule::Code => InlineNode::Code {
                range,
                raw: whole.into(),
                literal: group.into(),
            },
        }
    }
}

/// Parse inline markdown into sibling nodes covering the whole input.
pub fn parse_inline(raw: &str) -> Vec<InlineNode> {
    parse_inline_at(raw, 0)
}

/// Parse inline markdown whose first char sits at char offset `base` in its block.
pub(crate) fn parse_inline_at(raw: &str, base: usize) -> Vec<InlineNode> {
    let mut nodes = Vec::new();

    let mut byte = 0;
    let mut char_pos = base;
    // Start of the pending text run, as (byte, char).
    let mut run: Option<(usize, usize)> = None;

    while byte < raw.len() {
        let rest = &raw[byte..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if let Some((node, matched_bytes)) = match_construct(rest, ch, char_pos) {
            if let Some((run_byte, run_char)) = run.take() {
                nodes.push(text_node(&raw[run_byte..byte], run_char));
            }
            char_pos = node.range().end;
            byte += matched_bytes;
            nodes.push(node);
            continue;
        }

        // Nothing starts here: the char joins the current text run.
        if run.is_none() {
            run = Some((byte, char_pos));
        }
        byte += ch.len_utf8();
        char_pos += 1;
    }

    if let Some((run_byte, run_char)) = run {
        nodes.push(text_node(&raw[run_byte..], run_char));
    }

    debug_assert!(
        covers(&nodes, base, base + char_len(raw)),
        "inline parse left a gap or overlap in {raw:?}"
    );
    nodes
}

fn match_construct(rest: &str, first: char, char_pos: usize) -> Option<(InlineNode, usize)> {
    PRIORITY
        .iter()
        .filter(|rule| rule.opener() == first)
        .find_map(|rule| {
            let found = rule.find(rest)?;
            Some((rule.build(&found, char_pos), found.whole.len()))
        })
}

/// `*content*` where neither delimiter is part of a `**` run.
///
/// The opening `*` must not be followed by another `*`; the closing one is the
/// last `*` on the line that has no `*` on either side.
fn find_italic(rest: &str) -> Option<Found<'_>> {
    let bytes = rest.as_bytes();
    if bytes.first() != Some(&b'*') || bytes.get(1).is_none_or(|b| *b == b'*') {
        return None;
    }
    // Closing delimiter leaves at least one byte of content.
    let close = (2..bytes.len()).rev().find(|&i| {
        bytes[i] == b'*' && bytes[i - 1] != b'*' && bytes.get(i + 1) != Some(&b'*')
    })?;
    Some(Found {
        whole: &rest[..=close],
        first: &rest[1..close],
        second: "",
    })
}

fn text_node(text: &str, start: usize) -> InlineNode {
    InlineNode::Text {
        range: start..start + char_len(text),
        text: text.into(),
    }
}

/// Siblings must tile `start..end` exactly.
pub(crate) fn covers(nodes: &[InlineNode], start: usize, end: usize) -> bool {
    let mut pos = start;
    for node in nodes {
        if node.range().start != pos {
            return false;
        }
        let children = node.children();
        if !children.is_empty() && !covers(children, node.range().start, node.range().end) {
            return false;
        }
        pos = node.range().end;
    }
    pos == end
}
