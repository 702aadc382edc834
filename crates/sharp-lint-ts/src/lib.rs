//! # sharp-lint-ts
//!
//! Tree-sitter based C# front end for sharp-lint.
//!
//! This crate turns C# source into the `sharp-lint-core` document model:
//!
//! - [`CSharpParser`] converts a Tree-sitter C# tree into a
//!   [`SyntaxTree`](sharp_lint_core::SyntaxTree), rebuilding token trivia
//! - [`WorkspaceLoader`] loads a solution, project, file or directory into a
//!   [`DocumentSet`](sharp_lint_core::DocumentSet)
//! - [`parse_solution`] reads the project list of a `.sln` or `.slnx`

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod loader;
pub mod parser;
pub mod solution;
mod trivia;

pub use loader::{Descriptor, LoadError, WorkspaceLoader};
pub use parser::{CSharpParser, ParseError};
pub use solution::{compile_items, parse_solution, SolutionProject};
