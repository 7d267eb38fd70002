//! Editor configuration.

/// Separator written between blocks when a document is serialized.
///
/// Reading always accepts both forms.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum LineSeparator {
    #[default]
    Lf,
    CrLf,
}

impl LineSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Knobs for a [`PlainEditor`](crate::PlainEditor).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EditorConfig {
    /// Separator used by `PlainEditor::content_string`.
    pub line_separator: LineSeparator,
    /// Maximum number of undo entries kept. `None` keeps everything.
    pub undo_limit: Option<usize>,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_separator(mut self, separator: LineSeparator) -> Self {
        self.line_separator = separator;
        self
    }

    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_limit = Some(limit);
        self
    }
}
