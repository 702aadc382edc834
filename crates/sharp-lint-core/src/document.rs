//! Documents handed to the analyzer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::semantic::{Compilation, SemanticModel};
use crate::syntax::{SyntaxNode, SyntaxTree};

/// Index of a document within its [`DocumentSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub(crate) usize);

impl DocumentId {
    /// Raw index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One parsed source file, with its semantic model when the set was bound.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    tree: SyntaxTree,
    relative_path: PathBuf,
    semantic: Option<SemanticModel>,
}

impl Document {
    /// Identity within the set.
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Path the file was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.tree.path()
    }

    /// Path relative to the set's root, used in violations.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Syntax tree.
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Root node of the syntax tree.
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        self.tree.root()
    }

    /// Source text.
    #[must_use]
    pub fn source(&self) -> &str {
        self.tree.source()
    }

    /// Semantic model, `None` for syntax-only loads.
    #[must_use]
    pub fn semantic_model(&self) -> Option<&SemanticModel> {
        self.semantic.as_ref()
    }
}

/// The collection of documents analyzed in one run.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    root: PathBuf,
    documents: Vec<Document>,
    compilation: Option<Arc<Compilation>>,
}

impl DocumentSet {
    /// Creates a set from parsed trees, sorted by path.
    ///
    /// With `semantic` set, all trees are bound into one [`Compilation`]
    /// and every document gets a [`SemanticModel`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, mut trees: Vec<SyntaxTree>, semantic: bool) -> Self {
        let root = root.into();
        trees.sort_by(|a, b| a.path().cmp(b.path()));

        let compilation = semantic.then(|| {
            Arc::new(Compilation::build(
                trees.iter().enumerate().map(|(i, t)| (DocumentId(i), t)),
            ))
        });

        let documents: Vec<Document> = trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| {
                let id = DocumentId(i);
                let relative_path = tree
                    .path()
                    .strip_prefix(&root)
                    .map_or_else(|_| tree.path().to_path_buf(), Path::to_path_buf);
                Document {
                    id,
                    relative_path,
                    semantic: compilation
                        .as_ref()
                        .map(|c| SemanticModel::new(Arc::clone(c), id)),
                    tree,
                }
            })
            .collect();

        debug!(
            "Document set at {} with {} documents (semantic: {})",
            root.display(),
            documents.len(),
            semantic
        );

        Self {
            root,
            documents,
            compilation,
        }
    }

    /// An empty set.
    #[must_use]
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: Vec::new(),
            compilation: None,
        }
    }

    /// Directory violations are reported relative to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All documents, sorted by path.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Iterates over the documents.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Looks up a document by id.
    #[must_use]
    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.0)
    }

    /// Looks up a document by its load path or relative path.
    #[must_use]
    pub fn find(&self, path: &Path) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.path() == path || d.relative_path() == path)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if there are no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The shared compilation, `None` for syntax-only loads.
    #[must_use]
    pub fn compilation(&self) -> Option<&Compilation> {
        self.compilation.as_deref()
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{LineSpan, SyntaxKind, TextRange};

    fn tree(path: &str) -> SyntaxTree {
        let root = SyntaxNode::node(
            SyntaxKind::CompilationUnit,
            TextRange::default(),
            LineSpan::default(),
            Vec::new(),
        );
        SyntaxTree::new(path, "", root)
    }

    #[test]
    fn documents_are_sorted_and_relative() {
        let set = DocumentSet::new(
            "/repo",
            vec![tree("/repo/src/B.cs"), tree("/repo/src/A.cs")],
            false,
        );
        let paths: Vec<&Path> = set.iter().map(Document::relative_path).collect();
        assert_eq!(paths, vec![Path::new("src/A.cs"), Path::new("src/B.cs")]);
        assert_eq!(set.get(DocumentId(1)).map(Document::id), Some(DocumentId(1)));
        assert!(set.compilation().is_none());
        assert!(set.documents()[0].semantic_model().is_none());
    }

    #[test]
    fn semantic_sets_share_one_compilation() {
        let set = DocumentSet::new("/repo", vec![tree("/repo/A.cs")], true);
        assert!(set.compilation().is_some());
        assert!(set.documents()[0].semantic_model().is_some());
    }

    #[test]
    fn empty_set() {
        let set = DocumentSet::empty("/repo");
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }
}
