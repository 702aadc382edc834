//! Rule limiting the length of method declarations.
//!
//! The length is the line difference between the start and end of the
//! declaration, attributes and signature included.
//!
//! ```toml
//! [rules.method-length]
//! max_lines = 50
//! ```

use sharp_lint_core::{FileContext, Rule, RuleConfig, Severity, Suggestion, SyntaxKind, Violation};
use tracing::warn;

use crate::name_token;

/// Rule code for method-length.
pub const CODE: &str = "CQ005";

/// Rule name for method-length.
pub const NAME: &str = "method-length";

/// Default maximum line difference.
pub const DEFAULT_MAX_LINES: usize = 50;

/// Flags methods spanning more than `max_lines` lines.
#[derive(Debug, Clone)]
pub struct MethodLength {
    /// Severity level.
    pub severity: Severity,
    /// Largest allowed line difference.
    pub max_lines: usize,
}

impl Default for MethodLength {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodLength {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Creates the rule from its `[rules.method-length]` table.
    ///
    /// A negative `max_lines` falls back to the default.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let Some(config) = config else {
            return Self::new();
        };
        let max_lines = match config.options.get("max_lines") {
            None => DEFAULT_MAX_LINES,
            Some(raw) => config.get_option::<usize>("max_lines").unwrap_or_else(|| {
                warn!("Ignoring invalid {NAME}.max_lines = {raw}");
                DEFAULT_MAX_LINES
            }),
        };
        Self::new().max_lines(max_lines)
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the largest allowed line difference.
    #[must_use]
    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

impl Rule for MethodLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Methods must not exceed the configured number of lines"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        ctx.root()
            .descendants_of_kind(SyntaxKind::MethodDeclaration)
            .filter_map(|method| {
                let lines = method.span().line_delta();
                if lines <= self.max_lines {
                    return None;
                }
                let name = method.identifier().unwrap_or("<unnamed>");
                Some(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(name_token(method)),
                        format!(
                            "Method `{name}` spans {lines} lines (max {})",
                            self.max_lines
                        ),
                    )
                    .with_suggestion(Suggestion::new("Extract parts of the method into helpers")),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check;

    /// A method whose closing brace is `delta` lines below its signature.
    fn method_spanning(delta: usize) -> String {
        let mut source = String::from("class Worker\n{\n    public void Run()\n    {\n");
        for i in 0..delta.saturating_sub(2) {
            source.push_str(&format!("        var x{i} = {i};\n"));
        }
        source.push_str("    }\n}\n");
        source
    }

    #[test]
    fn delta_of_51_is_flagged() {
        let violations = check(&MethodLength::new(), &method_spanning(51));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "Method `Run` spans 51 lines (max 50)");
    }

    #[test]
    fn delta_of_50_passes() {
        assert!(check(&MethodLength::new(), &method_spanning(50)).is_empty());
    }

    #[test]
    fn threshold_is_configurable() {
        let rule = MethodLength::new().max_lines(5);
        assert_eq!(check(&rule, &method_spanning(6)).len(), 1);
        assert!(check(&rule, &method_spanning(5)).is_empty());
    }

    #[test]
    fn reads_max_lines_from_config() {
        let config: RuleConfig = toml::from_str("max_lines = 80").unwrap();
        assert_eq!(MethodLength::from_config(Some(&config)).max_lines, 80);

        let negative: RuleConfig = toml::from_str("max_lines = -1").unwrap();
        assert_eq!(
            MethodLength::from_config(Some(&negative)).max_lines,
            DEFAULT_MAX_LINES
        );
    }

    #[test]
    fn constructors_are_not_checked() {
        let mut source = String::from("class Worker\n{\n    public Worker()\n    {\n");
        for i in 0..60 {
            source.push_str(&format!("        var x{i} = {i};\n"));
        }
        source.push_str("    }\n}\n");
        assert!(check(&MethodLength::new(), &source).is_empty());
    }
}
