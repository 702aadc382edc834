//! Per-document view of a compilation.

use std::sync::Arc;

use crate::document::DocumentId;
use crate::syntax::SyntaxNode;

use super::compilation::Compilation;
use super::symbol::{Symbol, SymbolId};

/// Resolves declarations and type names of one document against the
/// shared [`Compilation`].
#[derive(Debug, Clone)]
pub struct SemanticModel {
    compilation: Arc<Compilation>,
    document: DocumentId,
}

impl SemanticModel {
    /// Creates a model for `document`.
    #[must_use]
    pub fn new(compilation: Arc<Compilation>, document: DocumentId) -> Self {
        Self {
            compilation,
            document,
        }
    }

    /// The shared compilation.
    #[must_use]
    pub fn compilation(&self) -> &Compilation {
        &self.compilation
    }

    /// Symbol declared by `node`, `None` if the node declares nothing or
    /// could not be bound.
    #[must_use]
    pub fn declared_symbol(&self, node: &SyntaxNode) -> Option<&Symbol> {
        self.compilation.declared_symbol(self.document, node)
    }

    /// Resolves a type name written inside `node`.
    #[must_use]
    pub fn resolve_type(&self, node: &SyntaxNode, name: &str) -> Option<SymbolId> {
        self.compilation
            .resolve_type(self.document, node.range().start, name)
    }
}
