//! Heuristic rule asking for a test of every public method.
//!
//! A test method is a method carrying one of the configured test attributes
//! (`[Test]`, `[Fact]`, ...). A public method is covered when some test
//! method invokes a member with the same name. Names are not resolved, so
//! overloads and same-named methods of different types share coverage.
//!
//! Documents detected as test files and classes declaring test methods are
//! not checked themselves. The rule is off in the default preset.
//!
//! ```toml
//! [rules.public-method-test-coverage]
//! test_attributes = ["Test", "TestCase", "Fact", "Theory", "TestMethod"]
//! ```

use std::collections::HashSet;

use sharp_lint_core::{
    ProjectContext, ProjectRule, RuleConfig, Severity, Suggestion, SyntaxKind, SyntaxNode,
    Violation,
};

use crate::name_token;

/// Rule code for public-method-test-coverage.
pub const CODE: &str = "CQ009";

/// Rule name for public-method-test-coverage.
pub const NAME: &str = "public-method-test-coverage";

/// Attributes marking test methods in NUnit, xUnit and MSTest.
pub const DEFAULT_TEST_ATTRIBUTES: &[&str] = &["Test", "TestCase", "Fact", "Theory", "TestMethod"];

/// Flags public methods that no test method calls.
#[derive(Debug, Clone)]
pub struct TestCoverage {
    /// Severity level.
    pub severity: Severity,
    /// Attribute names marking test methods, without the `Attribute` suffix.
    pub test_attributes: Vec<String>,
}

impl Default for TestCoverage {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCoverage {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            test_attributes: DEFAULT_TEST_ATTRIBUTES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    /// Creates the rule from its `[rules.public-method-test-coverage]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        let Some(config) = config else {
            return rule;
        };
        let attributes = config.get_str_array("test_attributes");
        if attributes.is_empty() {
            rule
        } else {
            rule.test_attributes(attributes)
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Replaces the test attribute names.
    #[must_use]
    pub fn test_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.test_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    fn is_test_method(&self, method: &SyntaxNode) -> bool {
        method.attributes().any(|attribute| {
            let name = attribute.strip_suffix("Attribute").unwrap_or(attribute);
            self.test_attributes.iter().any(|a| a == name)
        })
    }

    fn is_test_class(&self, declaration: &SyntaxNode) -> bool {
        declaration
            .members()
            .into_iter()
            .any(|m| m.kind() == SyntaxKind::MethodDeclaration && self.is_test_method(m))
    }
}

impl ProjectRule for TestCoverage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Public methods should be invoked by at least one test method"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<Violation> {
        let invoked: HashSet<&str> = ctx
            .files()
            .flat_map(|file| file.root().descendants_of_kind(SyntaxKind::MethodDeclaration))
            .filter(|method| self.is_test_method(method))
            .flat_map(|method| method.descendants_of_kind(SyntaxKind::InvocationExpression))
            .filter_map(SyntaxNode::identifier)
            .collect();

        let mut violations = Vec::new();
        for file in ctx.files().filter(|file| !file.is_test) {
            let types = file
                .root()
                .descendants()
                .filter(|n| n.kind().is_type_declaration() && n.kind() != SyntaxKind::InterfaceDeclaration);
            for declaration in types {
                if self.is_test_class(declaration) {
                    continue;
                }
                let owner = declaration.identifier().unwrap_or_default();
                for method in declaration.members() {
                    if method.kind() != SyntaxKind::MethodDeclaration || !method.has_modifier("public") {
                        continue;
                    }
                    let Some(name) = method.identifier() else {
                        continue;
                    };
                    if invoked.contains(name) {
                        continue;
                    }
                    violations.push(
                        Violation::new(
                            CODE,
                            NAME,
                            self.severity,
                            file.location(name_token(method)),
                            format!("Public method `{owner}.{name}` is not called by any test"),
                        )
                        .with_suggestion(Suggestion::new(format!(
                            "Add a test method that calls `{name}`"
                        ))),
                    );
                }
            }
        }
        violations
    }
}
