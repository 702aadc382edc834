//! Rule requiring interface names to start with `I`.
//!
//! The rule fails when any interface in the code base violates the
//! convention. By default each offending interface is reported on its own;
//! with `report_each = false` a single violation lists every offender.
//!
//! ```toml
//! [rules.interface-prefix]
//! report_each = false
//! ```

use sharp_lint_core::{
    ProjectContext, ProjectRule, RuleConfig, Severity, Suggestion, SyntaxKind, Violation,
};

use crate::name_token;

/// Rule code for interface-prefix.
pub const CODE: &str = "CQ006";

/// Rule name for interface-prefix.
pub const NAME: &str = "interface-prefix";

/// Requires `I` as the first character of interface names.
#[derive(Debug, Clone)]
pub struct InterfacePrefix {
    /// Severity level.
    pub severity: Severity,
    /// One violation per interface instead of one for the whole run.
    pub report_each: bool,
}

impl Default for InterfacePrefix {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfacePrefix {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            report_each: true,
        }
    }

    /// Creates the rule from its `[rules.interface-prefix]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        match config {
            Some(config) => rule.report_each(config.get_bool("report_each", true)),
            None => rule,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Chooses between per-interface and aggregate reporting.
    #[must_use]
    pub fn report_each(mut self, report_each: bool) -> Self {
        self.report_each = report_each;
        self
    }
}

impl ProjectRule for InterfacePrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Interface names must start with `I`"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<Violation> {
        let offenders: Vec<(String, Violation)> = ctx
            .files()
            .flat_map(|file| {
                file.root()
                    .descendants_of_kind(SyntaxKind::InterfaceDeclaration)
                    .filter_map(move |interface| {
                        let name = interface.identifier().unwrap_or_default();
                        if name.starts_with('I') {
                            return None;
                        }
                        let violation = Violation::new(
                            CODE,
                            NAME,
                            self.severity,
                            file.location(name_token(interface)),
                            format!("Interface `{name}` must start with `I`"),
                        )
                        .with_suggestion(Suggestion::new(format!("Rename to `I{name}`")));
                        Some((name.to_string(), violation))
                    })
            })
            .collect();

        if self.report_each {
            return offenders.into_iter().map(|(_, v)| v).collect();
        }

        let Some((_, first)) = offenders.first() else {
            return Vec::new();
        };
        let names: Vec<String> = offenders.iter().map(|(n, _)| format!("`{n}`")).collect();
        vec![Violation::new(
            CODE,
            NAME,
            self.severity,
            first.location.clone(),
            format!(
                "{} interface(s) do not start with `I`: {}",
                names.len(),
                names.join(", ")
            ),
        )]
    }
}
