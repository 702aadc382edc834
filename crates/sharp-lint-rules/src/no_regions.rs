//! Rule forbidding `#region` directives.
//!
//! Directives are trivia attached to the following token (or to the end of
//! file token), so each `#region` is reported once. The matching
//! `#endregion` is not reported separately.

use sharp_lint_core::{FileContext, Rule, RuleConfig, Severity, Suggestion, TriviaKind, Violation};

/// Rule code for no-regions.
pub const CODE: &str = "CQ004";

/// Rule name for no-regions.
pub const NAME: &str = "no-regions";

/// Forbids `#region` blocks.
#[derive(Debug, Clone)]
pub struct NoRegions {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoRegions {
    fn default() -> Self {
        Self::new()
    }
}

impl NoRegions {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Creates the rule from its `[rules.no-regions]` table.
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

impl Rule for NoRegions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Region directives are not allowed"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        ctx.root()
            .tokens()
            .flat_map(|token| token.leading_trivia())
            .filter(|trivia| trivia.kind() == TriviaKind::RegionDirective)
            .map(|trivia| {
                let label = trivia.text().trim().trim_start_matches("#region").trim();
                let message = if label.is_empty() {
                    "Region directive is not allowed".to_string()
                } else {
                    format!("Region directive `{label}` is not allowed")
                };
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location_of(trivia.range(), trivia.span()),
                    message,
                )
                .with_suggestion(Suggestion::new(
                    "Remove the region, or split the type into smaller types",
                ))
            })
            .collect()
    }
}
