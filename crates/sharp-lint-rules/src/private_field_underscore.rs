//! Rule requiring private fields to start with an underscore.
//!
//! # Detected Patterns
//!
//! - `private int count;`
//! - `private readonly ILogger logger, fallback;` (each declarator)
//!
//! Fields without an explicit `private` modifier are implicitly private but
//! are not checked; only the spelled-out modifier opts a field in.

use sharp_lint_core::{
    FileContext, RuleConfig, Rule, Severity, Suggestion, SyntaxKind, Violation,
};

use crate::name_token;

/// Rule code for private-field-underscore.
pub const CODE: &str = "CQ001";

/// Rule name for private-field-underscore.
pub const NAME: &str = "private-field-underscore";

/// Requires `_` as the first character of private field names.
#[derive(Debug, Clone)]
pub struct PrivateFieldUnderscore {
    /// Severity level.
    pub severity: Severity,
}

impl Default for PrivateFieldUnderscore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrivateFieldUnderscore {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Creates the rule from its `[rules.private-field-underscore]` table.
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

impl Rule for PrivateFieldUnderscore {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Private fields must start with an underscore"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        ctx.root()
            .descendants_of_kind(SyntaxKind::FieldDeclaration)
            .filter(|field| field.has_modifier("private"))
            .flat_map(|field| field.declarators())
            .filter_map(|declarator| {
                let name = declarator.identifier()?;
                if name.starts_with('_') {
                    return None;
                }
                Some(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(name_token(declarator)),
                        format!("Private field `{name}` must start with `_`"),
                    )
                    .with_suggestion(Suggestion::new(format!("Rename to `_{name}`"))),
                )
            })
            .collect()
    }
}
