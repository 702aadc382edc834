//! Rule requiring public methods to start with an uppercase letter.
//!
//! # Detected Patterns
//!
//! - `public void calculate()`
//! - a public method whose name could not be read (empty identifier)

use sharp_lint_core::{FileContext, Rule, RuleConfig, Severity, Suggestion, SyntaxKind, Violation};

use crate::name_token;

/// Rule code for public-method-capitalization.
pub const CODE: &str = "CQ002";

/// Rule name for public-method-capitalization.
pub const NAME: &str = "public-method-capitalization";

/// Requires PascalCase public method names.
#[derive(Debug, Clone)]
pub struct PublicMethodCapitalization {
    /// Severity level.
    pub severity: Severity,
}

impl Default for PublicMethodCapitalization {
    fn default() -> Self {
        Self::new()
    }
}

impl PublicMethodCapitalization {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Creates the rule from its `[rules.public-method-capitalization]` table.
    #[must_use]
    pub fn from_config(_config: Option<&RuleConfig>) -> Self {
        Self::new()
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

impl Rule for PublicMethodCapitalization {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Public methods must start with an uppercase letter"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        ctx.root()
            .descendants_of_kind(SyntaxKind::MethodDeclaration)
            .filter(|method| method.has_modifier("public"))
            .filter_map(|method| {
                let name = method.identifier().unwrap_or_default();
                if starts_uppercase(name) {
                    return None;
                }

                let violation = if name.is_empty() {
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(method),
                        "Public method has an empty name",
                    )
                } else {
                    let mut chars = name.chars();
                    let fixed: String = chars
                        .next()
                        .map(|c| c.to_uppercase().chain(chars).collect())
                        .unwrap_or_default();
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(name_token(method)),
                        format!("Public method `{name}` must start with an uppercase letter"),
                    )
                    .with_suggestion(Suggestion::new(format!("Rename to `{fixed}`")))
                };
                Some(violation)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check;

    #[test]
    fn flags_lowercase_public_method() {
        let violations = check(
            &PublicMethodCapitalization::new(),
            "class Calculator\n{\n    public int add(int a, int b) { return a + b; }\n}\n",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 3);
        assert_eq!(
            violations[0].suggestion.as_ref().map(|s| s.message.as_str()),
            Some("Rename to `Add`")
        );
    }

    #[test]
    fn capitalized_and_uppercase_pass() {
        let violations = check(
            &PublicMethodCapitalization::new(),
            "class Calculator\n{\n    public int Add() { return 0; }\n    public void RUN() { }\n}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn non_public_methods_are_ignored() {
        let violations = check(
            &PublicMethodCapitalization::new(),
            "class Calculator\n{\n    private void helper() { }\n    internal void other() { }\n}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn underscore_prefix_is_flagged() {
        let violations = check(
            &PublicMethodCapitalization::new(),
            "class Calculator\n{\n    public void _Run() { }\n}\n",
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn first_character_must_be_uppercase() {
        assert!(!starts_uppercase(""));
        assert!(starts_uppercase("Ärger"));
        assert!(!starts_uppercase("run"));
    }
}
