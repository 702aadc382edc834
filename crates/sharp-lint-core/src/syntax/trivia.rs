//! Trivia attached to tokens.

use serde::{Deserialize, Serialize};

use super::node::{LineSpan, TextRange};

/// Kind of a trivia item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriviaKind {
    /// Run of spaces and tabs.
    Whitespace,
    /// `\n` or `\r\n`.
    EndOfLine,
    /// `// ...`
    SingleLineComment,
    /// `/* ... */`
    MultiLineComment,
    /// `/// ...`
    DocumentationComment,
    /// `#region ...`
    RegionDirective,
    /// `#endregion`
    EndRegionDirective,
    /// Any other `#...` directive line.
    PreprocessorDirective,
    /// Text not covered by any token that is not recognisable trivia.
    Skipped,
}

impl TriviaKind {
    /// Returns true for the three comment kinds.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::SingleLineComment | Self::MultiLineComment | Self::DocumentationComment
        )
    }
}

/// A single trivia item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trivia {
    kind: TriviaKind,
    text: String,
    range: TextRange,
    span: LineSpan,
}

impl Trivia {
    /// Creates a trivia item.
    #[must_use]
    pub fn new(kind: TriviaKind, text: impl Into<String>, range: TextRange, span: LineSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            range,
            span,
        }
    }

    /// Kind of this trivia.
    #[must_use]
    pub fn kind(&self) -> TriviaKind {
        self.kind
    }

    /// Source text of this trivia.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range in the source file.
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Line span in the source file.
    #[must_use]
    pub fn span(&self) -> LineSpan {
        self.span
    }
}
