//! # sharp-lint-core
//!
//! Core framework for checking C# code-quality conventions.
//!
//! This crate provides the document model and the rule engine. It includes:
//!
//! - [`SyntaxTree`] / [`SyntaxNode`] with token trivia, and the semantic
//!   layer ([`Compilation`], [`SemanticModel`], [`Symbol`])
//! - [`Rule`] trait for per-document rules
//! - [`ProjectRule`] trait for rules over the whole code base
//! - [`Analyzer`] for running rules in parallel and building a [`Report`]
//! - [`Violation`] for representing lint findings
//!
//! Parsing C# is left to a front end (see `sharp-lint-ts`), which produces a
//! [`DocumentSet`].
//!
//! ## Example
//!
//! ```ignore
//! use sharp_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let report = analyzer.run_all(&documents);
//! assert!(report.is_clean(Severity::Error), "{}", report.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod document;
mod rule;
mod types;

/// Semantic layer: symbols and their resolution.
pub mod semantic;
/// Syntax trees, nodes and trivia.
pub mod syntax;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{detect_test_file, FileContext, ProjectContext};
pub use document::{Document, DocumentId, DocumentSet};
pub use rule::{ProjectRule, ProjectRuleBox, RegisteredRule, Rule, RuleBox};
pub use semantic::{
    Accessibility, Compilation, SemanticModel, Symbol, SymbolId, SymbolKind, TypeKind,
};
pub use syntax::{SyntaxKind, SyntaxNode, SyntaxTree, Trivia, TriviaKind};
pub use types::{
    Location, Report, RuleOutcome, RuleStatus, Severity, Suggestion, Violation,
    ViolationDiagnostic,
};
