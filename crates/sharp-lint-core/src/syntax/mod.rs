//! Syntax layer of the document model.
//!
//! A [`SyntaxTree`] owns the source text of one file and an immutable tree of
//! [`SyntaxNode`]s. Leaves are tokens and carry [`Trivia`]; interior nodes
//! expose the leading trivia of their first token.

mod kind;
mod node;
mod tree;
mod trivia;

pub use kind::SyntaxKind;
pub use node::{Descendants, LinePosition, LineSpan, SyntaxNode, TextRange};
pub use tree::SyntaxTree;
pub use trivia::{Trivia, TriviaKind};
