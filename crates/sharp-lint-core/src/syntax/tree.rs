//! A parsed file.

use std::path::{Path, PathBuf};

use super::node::{SyntaxNode, TextRange};

/// Source text of one file plus its syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    path: PathBuf,
    source: String,
    root: SyntaxNode,
}

impl SyntaxTree {
    /// Creates a tree.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: impl Into<String>, root: SyntaxNode) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            root,
        }
    }

    /// Path the file was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node, always a [`SyntaxKind::CompilationUnit`](super::SyntaxKind::CompilationUnit)
    /// when produced by a parser.
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Source text covered by `range`; empty if out of bounds.
    #[must_use]
    pub fn text(&self, range: TextRange) -> &str {
        self.source.get(range.start..range.end).unwrap_or("")
    }
}
