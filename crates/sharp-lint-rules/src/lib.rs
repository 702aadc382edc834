//! # sharp-lint-rules
//!
//! Built-in C# convention rules for sharp-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CQ001 | `private-field-underscore` | Private fields must start with `_` |
//! | CQ002 | `public-method-capitalization` | Public methods must start with an uppercase letter |
//! | CQ003 | `no-tabs` | Flags whitespace trivia spanning a line break |
//! | CQ004 | `no-regions` | Forbids `#region` directives |
//! | CQ005 | `method-length` | Limits methods to 50 lines |
//! | CQ006 | `interface-prefix` | Interfaces must start with `I` |
//! | CQ007 | `inject-services` | Forbids constructing classes that implement a declared interface |
//! | CQ008 | `immutable-marker` | Types implementing `ICalculationResult` must not expose public setters |
//! | CQ009 | `public-method-test-coverage` | Public methods should be called from a test (opt-in) |
//!
//! ## Usage
//!
//! ```ignore
//! use sharp_lint_core::Analyzer;
//! use sharp_lint_rules::{MethodLength, NoRegions};
//!
//! let analyzer = Analyzer::builder()
//!     .rule(NoRegions::new())
//!     .rule(MethodLength::new().max_lines(80))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod immutable_marker;
pub mod inject_services;
pub mod interface_prefix;
pub mod method_length;
pub mod no_regions;
pub mod no_tabs;
pub mod private_field_underscore;
pub mod public_method_capitalization;
pub mod test_coverage;

mod presets;

pub use immutable_marker::ImmutableMarker;
pub use inject_services::{InjectServices, MatchMode};
pub use interface_prefix::InterfacePrefix;
pub use method_length::MethodLength;
pub use no_regions::NoRegions;
pub use no_tabs::NoTabs;
pub use presets::{all_rules, minimal_rules, recommended_rules, rule_by_id, strict_rules, Preset};
pub use private_field_underscore::PrivateFieldUnderscore;
pub use public_method_capitalization::PublicMethodCapitalization;
pub use test_coverage::TestCoverage;

/// Re-export core types for convenience.
pub use sharp_lint_core::{ProjectRule, Rule, Severity, Violation};

use sharp_lint_core::{SyntaxKind, SyntaxNode};

/// The identifier token naming a declaration, or the declaration itself.
pub(crate) fn name_token(node: &SyntaxNode) -> &SyntaxNode {
    node.children_of_kind(SyntaxKind::Identifier)
        .find(|t| t.identifier() == node.identifier())
        .unwrap_or(node)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use sharp_lint_core::{DocumentSet, FileContext, ProjectContext, ProjectRule, Rule, Violation};
    use sharp_lint_ts::WorkspaceLoader;

    /// Parses and binds `(relative path, source)` pairs under `/repo`.
    pub(crate) fn documents(sources: &[(&str, &str)]) -> DocumentSet {
        WorkspaceLoader::new()
            .load_sources(
                "/repo",
                sources
                    .iter()
                    .map(|(path, source)| (PathBuf::from("/repo").join(path), (*source).to_string())),
            )
            .expect("Failed to load test sources")
    }

    pub(crate) fn check<R: Rule>(rule: &R, source: &str) -> Vec<Violation> {
        let set = documents(&[("Test.cs", source)]);
        set.iter()
            .flat_map(|document| rule.check(&FileContext::new(document)))
            .collect()
    }

    pub(crate) fn check_project<R: ProjectRule>(rule: &R, sources: &[(&str, &str)]) -> Vec<Violation> {
        let set = documents(sources);
        rule.check_project(&ProjectContext::new(&set))
    }
}
