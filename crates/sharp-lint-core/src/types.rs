//! Core types for lint violations and reports.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::syntax::{LineSpan, TextRange};

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// Parses a severity name as used in configuration files.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analyzed root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location from a node's range and 0-based span.
    #[must_use]
    pub fn from_span(file: PathBuf, range: TextRange, span: LineSpan) -> Self {
        Self {
            file,
            line: span.start.line + 1,
            column: span.start.column + 1,
            offset: range.start,
            length: range.len(),
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "CQ001").
    pub code: String,
    /// Rule name (e.g., "private-field-underscore").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        format!(
            "{} {} at {}:{}:{}\n{}",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.details(),
        )
    }

    /// Severity, message and help lines shared by the text renderings.
    fn details(&self) -> String {
        let mut details = format!("  {}: {}\n", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            details.push_str(&format!("  = help: {}\n", suggestion.message));
        }
        details
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A violation rendered against its source text.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: String,
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[source_code]
    source_code: NamedSource<String>,
}

impl ViolationDiagnostic {
    /// Creates a diagnostic for `violation` over the file's `source`.
    #[must_use]
    pub fn new(violation: &Violation, source: &str) -> Self {
        let offset = violation.location.offset.min(source.len());
        let length = violation.location.length.min(source.len() - offset);
        Self {
            code: violation.code.clone(),
            message: violation.message.clone(),
            help: violation.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((offset, length)),
            label_message: violation.rule.clone(),
            source_code: NamedSource::new(
                violation.location.file.display().to_string(),
                source.to_owned(),
            ),
        }
    }
}

/// How a single rule fared in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RuleStatus {
    /// Ran and found nothing.
    Passed,
    /// Ran and reported violations.
    Failed,
    /// Not run: disabled, or it needs a semantic model the run lacks.
    Skipped {
        /// Why the rule did not run.
        reason: String,
    },
    /// Panicked; its partial output was discarded.
    Errored {
        /// Panic message.
        message: String,
    },
}

/// Per-rule entry of a [`Report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Rule code.
    pub code: String,
    /// Rule name.
    pub rule: String,
    /// Outcome.
    #[serde(flatten)]
    pub status: RuleStatus,
    /// Violations contributed to the report.
    pub violations: usize,
}

impl RuleOutcome {
    /// Returns true if the rule ran without reporting anything.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == RuleStatus::Passed
    }
}

/// Result of running the analyzer over a document set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// One entry per registered rule, in registration order.
    pub outcomes: Vec<RuleOutcome>,
    /// All violations, sorted by file, line, column and code.
    pub violations: Vec<Violation>,
    /// Number of documents analyzed.
    pub documents_checked: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns true if any rule panicked.
    #[must_use]
    pub fn has_rule_errors(&self) -> bool {
        self.errored_rules().next().is_some()
    }

    /// Outcomes of rules that panicked.
    pub fn errored_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, RuleStatus::Errored { .. }))
    }

    /// Outcome of a rule by name or code.
    #[must_use]
    pub fn outcome(&self, rule: &str) -> Option<&RuleOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.rule == rule || o.code == rule)
    }

    /// Violations reported by a rule, by name or code.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.rule == rule || v.code == rule)
            .collect()
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// No violation at or above `fail_on` and no rule errors.
    #[must_use]
    pub fn is_clean(&self, fail_on: Severity) -> bool {
        !self.has_violations_at(fail_on) && !self.has_rule_errors()
    }

    /// Formats violations as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()`
    /// messages when the analyzer runs inside a test harness.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        let failing: Vec<&Violation> = self
            .violations
            .iter()
            .filter(|v| v.severity >= fail_on)
            .collect();

        let mut report = format!("\n=== sharp-lint: {} violation(s) ===\n\n", failing.len());

        for v in &failing {
            report.push_str(&format!(
                "{} [{}] at {}:{}:{}\n{}\n",
                v.rule,
                v.code,
                v.location.file.display(),
                v.location.line,
                v.location.column,
                v.details(),
            ));
        }

        for outcome in self.errored_rules() {
            if let RuleStatus::Errored { message } = &outcome.status {
                report.push_str(&format!(
                    "{} [{}] failed to run: {message}\n\n",
                    outcome.rule, outcome.code
                ));
            }
        }

        let (errors, warnings, infos) = self.count_by_severity();
        report.push_str(&format!(
            "Total: {errors} error(s), {warnings} warning(s), {infos} info(s) in {} document(s)\n",
            self.documents_checked
        ));

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "CQ001",
            "private-field-underscore",
            severity,
            Location::new(PathBuf::from("src/Order.cs"), 12, 5),
            "Private field `count` must start with `_`",
        )
    }

    #[test]
    fn severity_parse() {
        assert_eq!(Severity::parse("Warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("error"), Some(Severity::Error));
        assert_eq!(Severity::parse("loud"), None);
    }

    #[test]
    fn violation_display() {
        let v = make_violation(Severity::Error);
        insta::assert_snapshot!(
            v.to_string(),
            @"src/Order.cs:12:5: error [CQ001] Private field `count` must start with `_`"
        );
    }

    #[test]
    fn violation_format_includes_suggestion() {
        let v = make_violation(Severity::Error).with_suggestion(Suggestion::new("Rename to `_count`"));
        assert_eq!(
            v.format(),
            "CQ001 private-field-underscore at src/Order.cs:12:5\n  error: Private field `count` must start with `_`\n  = help: Rename to `_count`\n"
        );
    }

    #[test]
    fn location_from_span_is_one_based() {
        let span = LineSpan::new(
            crate::syntax::LinePosition::new(4, 8),
            crate::syntax::LinePosition::new(4, 14),
        );
        let location = Location::from_span(PathBuf::from("A.cs"), TextRange::new(40, 46), span);
        assert_eq!((location.line, location.column), (5, 9));
        assert_eq!((location.offset, location.length), (40, 6));
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut report = Report::new();
        report.violations.push(make_violation(Severity::Warning));
        assert!(!report.has_violations_at(Severity::Error));
        assert!(report.has_violations_at(Severity::Warning));
        assert!(report.is_clean(Severity::Error));
    }

    #[test]
    fn rule_errors_make_report_unclean() {
        let mut report = Report::new();
        report.outcomes.push(RuleOutcome {
            code: "CQ005".into(),
            rule: "method-length".into(),
            status: RuleStatus::Errored {
                message: "boom".into(),
            },
            violations: 0,
        });
        assert!(report.has_rule_errors());
        assert!(!report.is_clean(Severity::Error));
        assert!(report
            .format_test_report(Severity::Error)
            .contains("method-length [CQ005] failed to run: boom"));
    }

    #[test]
    fn format_test_report_filters_by_severity() {
        let mut report = Report::new();
        report.documents_checked = 5;
        report.violations.push(make_violation(Severity::Warning));
        report.violations.push(make_violation(Severity::Error));

        assert_eq!(
            report.format_test_report(Severity::Error),
            "\n=== sharp-lint: 1 violation(s) ===\n\n\
             private-field-underscore [CQ001] at src/Order.cs:12:5\n\
             \x20 error: Private field `count` must start with `_`\n\n\
             Total: 1 error(s), 1 warning(s), 0 info(s) in 5 document(s)\n"
        );
    }

    #[test]
    fn diagnostic_span_is_clamped_to_source() {
        let v = make_violation(Severity::Error);
        let located = Violation {
            location: v.location.clone().with_span(10, 100),
            ..v
        };
        let diagnostic = ViolationDiagnostic::new(&located, "class Order { }");
        assert_eq!(diagnostic.span.offset(), 10);
        assert_eq!(diagnostic.span.len(), 5);
    }
}
