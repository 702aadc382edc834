//! Context types for rule execution.

use std::path::{Component, Path};

use crate::document::{Document, DocumentSet};
use crate::semantic::{Compilation, SemanticModel};
use crate::syntax::{LineSpan, SyntaxNode, TextRange};
use crate::types::Location;

/// Context provided to per-document rules.
///
/// Wraps the document being analyzed with metadata rules can use to make
/// context-aware decisions (e.g., skip checks in test projects).
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// The document under analysis.
    pub document: &'a Document,
    /// Whether this document is detected as a test file.
    pub is_test: bool,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            is_test: detect_test_file(document.relative_path()),
        }
    }

    /// Path relative to the analyzed root.
    #[must_use]
    pub fn relative_path(&self) -> &'a Path {
        self.document.relative_path()
    }

    /// Root node of the syntax tree.
    #[must_use]
    pub fn root(&self) -> &'a SyntaxNode {
        self.document.root()
    }

    /// Source text of the document.
    #[must_use]
    pub fn content(&self) -> &'a str {
        self.document.source()
    }

    /// Semantic model, `None` for syntax-only runs.
    #[must_use]
    pub fn semantic_model(&self) -> Option<&'a SemanticModel> {
        self.document.semantic_model()
    }

    /// Location of `node` in this document.
    #[must_use]
    pub fn location(&self, node: &SyntaxNode) -> Location {
        self.location_of(node.range(), node.span())
    }

    /// Location of an arbitrary range in this document.
    #[must_use]
    pub fn location_of(&self, range: TextRange, span: LineSpan) -> Location {
        Location::from_span(self.relative_path().to_path_buf(), range, span)
    }
}

/// Context provided to project-wide rules.
///
/// Gives access to every loaded document and the shared compilation.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    /// All documents of the run.
    pub documents: &'a DocumentSet,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(documents: &'a DocumentSet) -> Self {
        Self { documents }
    }

    /// Root directory of the analyzed code base.
    #[must_use]
    pub fn root(&self) -> &'a Path {
        self.documents.root()
    }

    /// The shared compilation, `None` for syntax-only runs.
    #[must_use]
    pub fn compilation(&self) -> Option<&'a Compilation> {
        self.documents.compilation()
    }

    /// File contexts for every document.
    pub fn files(&self) -> impl Iterator<Item = FileContext<'a>> + 'a {
        self.documents.iter().map(FileContext::new)
    }

    /// Location of `node` declared in `document`.
    #[must_use]
    pub fn location(&self, document: &Document, node: &SyntaxNode) -> Location {
        FileContext::new(document).location(node)
    }
}

/// Detects if a file belongs to a test project based on path conventions.
///
/// Matches `test`/`tests` directories, project directories ending in
/// `.Tests`/`.Test`, and files named `*Tests.cs`/`*Test.cs`.
#[must_use]
pub fn detect_test_file(path: &Path) -> bool {
    let in_test_dir = path.components().any(|component| {
        let Component::Normal(s) = component else {
            return false;
        };
        let s = s.to_string_lossy();
        s.eq_ignore_ascii_case("tests")
            || s.eq_ignore_ascii_case("test")
            || s.ends_with(".Tests")
            || s.ends_with(".Test")
            || s.ends_with(".UnitTests")
    });
    if in_test_dir {
        return true;
    }

    path.file_stem()
        .and_then(|n| n.to_str())
        .is_some_and(|stem| stem.ends_with("Tests") || stem.ends_with("Test"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_test_file() {
        assert!(detect_test_file(Path::new("tests/OrderTests.cs")));
        assert!(detect_test_file(Path::new("src/Shop.Tests/Checkout.cs")));
        assert!(detect_test_file(Path::new("src/Shop/OrderServiceTest.cs")));
        assert!(detect_test_file(Path::new("Test/Helpers.cs")));
        assert!(!detect_test_file(Path::new("src/Shop/OrderService.cs")));
        assert!(!detect_test_file(Path::new("src/Contest/Entry.cs")));
    }
}
