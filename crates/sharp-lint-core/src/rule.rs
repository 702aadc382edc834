//! Rule traits for defining lint rules.

use crate::context::{FileContext, ProjectContext};
use crate::types::{Severity, Violation};

/// A per-document lint rule.
///
/// Implement this trait to create rules that analyze one source file at a
/// time. The analyzer runs document rules over every document in parallel,
/// so a rule must only look at the context it is given.
///
/// # Example
///
/// ```ignore
/// use sharp_lint_core::{FileContext, Rule, Severity, SyntaxKind, Violation};
///
/// pub struct NoGoto;
///
/// impl Rule for NoGoto {
///     fn name(&self) -> &'static str { "no-goto" }
///     fn code(&self) -> &'static str { "CQ100" }
///
///     fn check(&self, ctx: &FileContext) -> Vec<Violation> {
///         ctx.root()
///             .descendants_of_kind(SyntaxKind::Other)
///             .filter(|n| n.text() == Some("goto"))
///             .map(|n| Violation::new(self.code(), self.name(), Severity::Warning,
///                 ctx.location(n), "goto is not allowed"))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-regions").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CQ004").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule needs the semantic model.
    ///
    /// Rules that return true are skipped on syntax-only runs.
    fn requires_semantics(&self) -> bool {
        false
    }

    /// Checks a single document and returns any violations found.
    fn check(&self, ctx: &FileContext) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// A rule that looks at all documents at once.
///
/// Use this for checks that aggregate over the code base, such as naming
/// rules that report one result for every type, or rules that need to see
/// both the declaration and the users of a type.
pub trait ProjectRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CQ006").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule needs the semantic model.
    fn requires_semantics(&self) -> bool {
        false
    }

    /// Checks the whole document set and returns any violations found.
    fn check_project(&self, ctx: &ProjectContext) -> Vec<Violation>;
}

/// Type alias for boxed `ProjectRule` trait objects.
pub type ProjectRuleBox = Box<dyn ProjectRule>;

/// A rule registered with the analyzer, of either shape.
pub enum RegisteredRule {
    /// Runs once per document.
    Document(RuleBox),
    /// Runs once per document set.
    Project(ProjectRuleBox),
}

impl RegisteredRule {
    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document(r) => r.name(),
            Self::Project(r) => r.name(),
        }
    }

    /// Rule code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Document(r) => r.code(),
            Self::Project(r) => r.code(),
        }
    }

    /// Rule description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Document(r) => r.description(),
            Self::Project(r) => r.description(),
        }
    }

    /// Default severity.
    #[must_use]
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::Document(r) => r.default_severity(),
            Self::Project(r) => r.default_severity(),
        }
    }

    /// Whether the rule needs the semantic model.
    #[must_use]
    pub fn requires_semantics(&self) -> bool {
        match self {
            Self::Document(r) => r.requires_semantics(),
            Self::Project(r) => r.requires_semantics(),
        }
    }

    /// Returns true if `id` is this rule's name or code.
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.name() == id || self.code().eq_ignore_ascii_case(id)
    }
}

impl std::fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("code", &self.code())
            .field("name", &self.name())
            .finish()
    }
}

impl From<RuleBox> for RegisteredRule {
    fn from(rule: RuleBox) -> Self {
        Self::Document(rule)
    }
}

impl From<ProjectRuleBox> for RegisteredRule {
    fn from(rule: ProjectRuleBox) -> Self {
        Self::Project(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, ctx: &FileContext) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                ctx.location(ctx.root()),
                "Test violation",
            )]
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert!(!rule.requires_semantics());
    }

    #[test]
    fn registered_rule_matches_name_or_code() {
        let rule = RegisteredRule::from(Box::new(TestRule) as RuleBox);
        assert!(rule.matches("test-rule"));
        assert!(rule.matches("test001"));
        assert!(!rule.matches("other"));
        assert_eq!(rule.description(), "A test rule");
    }
}
