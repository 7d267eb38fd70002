//! Parse tree for a single block.
//!
//! Every node records the char range it covers in its block's raw text.
//! Delimiters and block prefixes are kept as `Marker` leaves, so the leaves of
//! a tree, read left to right, spell out the raw block text exactly. The offset
//! mapper relies on that: a node's length is always `range.len()`.

use std::ops::Range;

use smol_str::SmolStr;

/// Block-level construct, decided by the block's prefix.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading { level: u8 },
    Quote,
    Checkbox { checked: bool },
    Rule,
    Break,
}

/// Paired inline formatting.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash)]
pub enum EmphasisKind {
    Bold,
    Italic,
    Underline,
    Highlight,
    Strikethrough,
}

impl EmphasisKind {
    /// Delimiter used on both sides of the content.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
            Self::Underline => "__",
            Self::Highlight => "==",
            Self::Strikethrough => "~~",
        }
    }
}

/// Root of a block's parse tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockNode {
    pub kind: BlockKind,
    /// Always `0..len(raw)`.
    pub range: Range<usize>,
    pub children: Vec<InlineNode>,
}

impl BlockNode {
    /// Length of the block's text in chars.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Rebuild the raw text from the leaves.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out);
        }
        out
    }

    /// Children that carry content, i.e. everything except the block prefix marker.
    pub fn content(&self) -> &[InlineNode] {
        match self.children.first() {
            Some(InlineNode::Marker { .. }) => &self.children[1..],
            _ => &self.children,
        }
    }
}

/// Inline node. Text, Marker, Code and Image are leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain run of characters.
    Text { range: Range<usize>, text: SmolStr },
    /// Syntax characters: delimiters, block prefixes, link punctuation.
    Marker { range: Range<usize>, text: SmolStr },
    /// `open marker, content..., close marker`.
    Emphasis {
        kind: EmphasisKind,
        range: Range<usize>,
        children: Vec<InlineNode>,
    },
    /// Backtick span. `raw` includes the backticks, `literal` is what sits between them.
    Code {
        range: Range<usize>,
        raw: SmolStr,
        literal: SmolStr,
    },
    /// `![alt](src)`.
    Image {
        range: Range<usize>,
        alt: SmolStr,
        src: SmolStr,
        raw: SmolStr,
    },
    /// `[label](href)`, children are `[`, the label text, and `](href)`.
    Link {
        range: Range<usize>,
        label: SmolStr,
        href: SmolStr,
        children: Vec<InlineNode>,
    },
}

impl InlineNode {
    pub fn range(&self) -> &Range<usize> {
        match self {
            Self::Text { range, .. }
            | Self::Marker { range, .. }
            | Self::Emphasis { range, .. }
            | Self::Code { range, .. }
            | Self::Image { range, .. }
            | Self::Link { range, .. } => range,
        }
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.range().is_empty()
    }

    pub fn children(&self) -> &[InlineNode] {
        match self {
            Self::Emphasis { children, .. } | Self::Link { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Emphasis { .. } | Self::Link { .. })
    }

    /// Raw text of a leaf; `None` for containers.
    pub fn leaf_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } | Self::Marker { text, .. } => Some(text.as_str()),
            Self::Code { raw, .. } | Self::Image { raw, .. } => Some(raw.as_str()),
            Self::Emphasis { .. } | Self::Link { .. } => None,
        }
    }

    pub(crate) fn push_text(&self, out: &mut String) {
        match self.leaf_text() {
            Some(text) => out.push_str(text),
            None => {
                for child in self.children() {
                    child.push_text(out);
                }
            }
        }
    }

    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }
}

/// Borrowed view of any node in a block tree.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Block(&'a BlockNode),
    Inline(&'a InlineNode),
}

impl<'a> NodeRef<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Block(node) => node.len(),
            Self::Inline(node) => node.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        match self {
            Self::Block(node) => node.range.clone(),
            Self::Inline(node) => node.range().clone(),
        }
    }

    pub fn children(&self) -> &'a [InlineNode] {
        match self {
            Self::Block(node) => &node.children,
            Self::Inline(node) => node.children(),
        }
    }

    /// Blocks are never leaves, even when they have no children.
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Block(_) => false,
            Self::Inline(node) => node.is_leaf(),
        }
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.children().get(index).map(NodeRef::Inline)
    }
}

impl<'a> From<&'a BlockNode> for NodeRef<'a> {
    fn from(node: &'a BlockNode) -> Self {
        Self::Block(node)
    }
}

impl<'a> From<&'a InlineNode> for NodeRef<'a> {
    fn from(node: &'a InlineNode) -> Self {
        Self::Inline(node)
    }
}
