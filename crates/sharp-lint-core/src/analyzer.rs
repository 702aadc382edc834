//! Rule engine: runs registered rules over a document set.

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, RuleConfig};
use crate::context::{FileContext, ProjectContext};
use crate::document::DocumentSet;
use crate::rule::{ProjectRule, ProjectRuleBox, RegisteredRule, Rule, RuleBox};
use crate::types::{Report, RuleOutcome, RuleStatus, Violation};

/// Errors that can occur when building or driving the analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// No registered rule has this name or code.
    #[error("Unknown rule: {id}")]
    UnknownRule {
        /// Requested rule name or code.
        id: String,
    },

    /// A rule panicked while running on its own.
    #[error("Rule {rule} failed: {message}")]
    RuleFailed {
        /// Rule name.
        rule: String,
        /// Panic message.
        message: String,
    },

    /// A rule that needs symbols was asked to run on a syntax-only set.
    #[error("Rule {rule} requires a semantic model, but the documents were loaded without one")]
    SemanticModelUnavailable {
        /// Rule name.
        rule: String,
    },

    /// The worker pool could not be created.
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RegisteredRule>,
    config: Option<Config>,
    parallelism: Option<usize>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-document rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(RegisteredRule::Document(Box::new(rule)));
        self
    }

    /// Adds a boxed per-document rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(RegisteredRule::Document(rule));
        self
    }

    /// Adds a project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule<R: ProjectRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(RegisteredRule::Project(Box::new(rule)));
        self
    }

    /// Adds a boxed project-wide rule to the analyzer.
    #[must_use]
    pub fn project_rule_box(mut self, rule: ProjectRuleBox) -> Self {
        self.rules.push(RegisteredRule::Project(rule));
        self
    }

    /// Adds rules of either shape, e.g. the output of a preset.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RegisteredRule>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the number of worker threads, overriding the configuration.
    #[must_use]
    pub fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if a dedicated thread pool was requested and could
    /// not be created.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let threads = self.parallelism.or(config.analyzer.parallelism);

        let pool = match threads {
            Some(n) if n > 0 => Some(rayon::ThreadPoolBuilder::new().num_threads(n).build()?),
            _ => None,
        };

        Ok(Analyzer {
            rules: self.rules,
            config,
            pool,
        })
    }
}

/// The rule engine.
///
/// Holds the registered rules in registration order and evaluates them over
/// a [`DocumentSet`]. Rules run concurrently, document rules additionally
/// across documents; a rule that panics is recorded as errored without
/// affecting the others.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    rules: Vec<RegisteredRule>,
    config: Config,
    pool: Option<rayon::ThreadPool>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Registered rules in registration order.
    #[must_use]
    pub fn rules(&self) -> &[RegisteredRule] {
        &self.rules
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }

    /// Runs every registered rule and returns the combined report.
    ///
    /// Every rule gets an outcome, even when it reports nothing or fails.
    /// Violations are sorted by file, line, column and code, so repeated
    /// runs over the same documents produce identical reports.
    #[must_use]
    pub fn run_all(&self, documents: &DocumentSet) -> Report {
        info!(
            "Running {} rules over {} documents",
            self.rules.len(),
            documents.len()
        );

        let results: Vec<(RuleOutcome, Vec<Violation>)> = self.install(|| {
            self.rules
                .par_iter()
                .map(|rule| self.evaluate(rule, documents, true))
                .collect()
        });

        let mut report = Report::new();
        report.documents_checked = documents.len();
        for (outcome, violations) in results {
            report.outcomes.push(outcome);
            report.violations.extend(violations);
        }
        sort_violations(&mut report.violations);

        info!(
            "Analysis complete: {} violations, {} rule errors",
            report.violations.len(),
            report.errored_rules().count()
        );

        report
    }

    /// Runs a single rule, selected by name or code.
    ///
    /// The rule runs even if the configuration disables it.
    ///
    /// # Errors
    ///
    /// Returns an error if no rule matches `id`, the rule panics, or it
    /// needs a semantic model that `documents` does not have.
    pub fn run(&self, id: &str, documents: &DocumentSet) -> Result<Vec<Violation>, AnalyzerError> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.matches(id))
            .ok_or_else(|| AnalyzerError::UnknownRule { id: id.to_string() })?;

        let (outcome, mut violations) = self.install(|| self.evaluate(rule, documents, false));
        match outcome.status {
            RuleStatus::Errored { message } => Err(AnalyzerError::RuleFailed {
                rule: outcome.rule,
                message,
            }),
            RuleStatus::Skipped { .. } => Err(AnalyzerError::SemanticModelUnavailable {
                rule: outcome.rule,
            }),
            RuleStatus::Passed | RuleStatus::Failed => {
                sort_violations(&mut violations);
                Ok(violations)
            }
        }
    }

    fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    fn evaluate(
        &self,
        rule: &RegisteredRule,
        documents: &DocumentSet,
        respect_enabled: bool,
    ) -> (RuleOutcome, Vec<Violation>) {
        let mut outcome = RuleOutcome {
            code: rule.code().to_string(),
            rule: rule.name().to_string(),
            status: RuleStatus::Passed,
            violations: 0,
        };

        if respect_enabled && !self.config.is_rule_enabled(rule.name()) {
            debug!("Skipping disabled rule: {}", rule.name());
            outcome.status = RuleStatus::Skipped {
                reason: "disabled in configuration".to_string(),
            };
            return (outcome, Vec::new());
        }

        if rule.requires_semantics() && !documents.is_empty() && documents.compilation().is_none()
        {
            debug!("Skipping {}: no semantic model", rule.name());
            outcome.status = RuleStatus::Skipped {
                reason: "semantic model not available".to_string(),
            };
            return (outcome, Vec::new());
        }

        debug!("Running rule: {} ({})", rule.name(), rule.code());
        let result = panic::catch_unwind(AssertUnwindSafe(|| match rule {
            RegisteredRule::Document(r) => documents
                .documents()
                .par_iter()
                .map(|document| r.check(&FileContext::new(document)))
                .reduce(Vec::new, |mut acc, mut part| {
                    acc.append(&mut part);
                    acc
                }),
            RegisteredRule::Project(r) => r.check_project(&ProjectContext::new(documents)),
        }));

        match result {
            Ok(violations) => {
                let violations = self.apply_severity_override(rule.name(), violations);
                outcome.violations = violations.len();
                if !violations.is_empty() {
                    outcome.status = RuleStatus::Failed;
                }
                (outcome, violations)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Rule {} failed: {}", rule.name(), message);
                outcome.status = RuleStatus::Errored { message };
                (outcome, Vec::new())
            }
        }
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }
}

fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
            .then_with(|| a.code.cmp(&b.code))
            .then_with(|| a.message.cmp(&b.message))
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{LineSpan, LinePosition, SyntaxKind, SyntaxNode, SyntaxTree, TextRange};
    use crate::types::{Location, Severity};

    fn tree(path: &str) -> SyntaxTree {
        let root = SyntaxNode::node(
            SyntaxKind::CompilationUnit,
            TextRange::new(0, 10),
            LineSpan::new(LinePosition::new(0, 0), LinePosition::new(0, 10)),
            Vec::new(),
        );
        SyntaxTree::new(path, "class A {}", root)
    }

    fn documents() -> DocumentSet {
        DocumentSet::new(
            "/repo",
            vec![tree("/repo/B.cs"), tree("/repo/A.cs"), tree("/repo/C.cs")],
            false,
        )
    }

    struct OnePerFile;

    impl Rule for OnePerFile {
        fn name(&self) -> &'static str {
            "one-per-file"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn check(&self, ctx: &FileContext) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                Severity::Warning,
                ctx.location(ctx.root()),
                "found",
            )]
        }
    }

    struct Panics;

    impl Rule for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn check(&self, _ctx: &FileContext) -> Vec<Violation> {
            panic!("walked off the tree")
        }
    }

    struct NeedsSymbols;

    impl Rule for NeedsSymbols {
        fn name(&self) -> &'static str {
            "needs-symbols"
        }
        fn code(&self) -> &'static str {
            "T003"
        }
        fn requires_semantics(&self) -> bool {
            true
        }
        fn check(&self, _ctx: &FileContext) -> Vec<Violation> {
            Vec::new()
        }
    }

    struct CountDocuments;

    impl ProjectRule for CountDocuments {
        fn name(&self) -> &'static str {
            "count-documents"
        }
        fn code(&self) -> &'static str {
            "T004"
        }
        fn check_project(&self, ctx: &ProjectContext) -> Vec<Violation> {
            vec![Violation::new(
                self.code(),
                self.name(),
                Severity::Info,
                Location::new(ctx.root().to_path_buf(), 1, 1),
                format!("{} documents", ctx.documents.len()),
            )]
        }
    }

    fn analyzer(config: Config) -> Analyzer {
        Analyzer::builder()
            .rule(OnePerFile)
            .rule(Panics)
            .rule(NeedsSymbols)
            .project_rule(CountDocuments)
            .config(config)
            .build()
            .expect("Failed to build analyzer")
    }

    #[test]
    fn test_builder() {
        let analyzer = analyzer(Config::default());
        assert_eq!(analyzer.rule_count(), 4);
        assert_eq!(analyzer.rules()[3].name(), "count-documents");
    }

    #[test]
    fn run_all_isolates_panicking_rule() {
        let report = analyzer(Config::default()).run_all(&documents());

        assert_eq!(report.documents_checked, 3);
        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.outcome("one-per-file").unwrap().status, RuleStatus::Failed);
        assert_eq!(report.outcome("one-per-file").unwrap().violations, 3);
        assert_eq!(
            report.outcome("T002").unwrap().status,
            RuleStatus::Errored {
                message: "walked off the tree".to_string()
            }
        );
        assert!(matches!(
            report.outcome("needs-symbols").unwrap().status,
            RuleStatus::Skipped { .. }
        ));
        assert_eq!(report.by_rule("count-documents")[0].message, "3 documents");
        assert!(report.has_rule_errors());
    }

    #[test]
    fn violations_are_sorted_and_stable() {
        let analyzer = analyzer(Config::default());
        let first = analyzer.run_all(&documents());
        let second = analyzer.run_all(&documents());

        let files: Vec<String> = first
            .by_rule("one-per-file")
            .iter()
            .map(|v| v.location.file.display().to_string())
            .collect();
        assert_eq!(files, vec!["A.cs", "B.cs", "C.cs"]);

        let render = |r: &Report| r.violations.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(render(&first), render(&second));
    }

    #[test]
    fn empty_document_set_passes_every_rule_that_runs() {
        let analyzer = Analyzer::builder()
            .rule(OnePerFile)
            .rule(NeedsSymbols)
            .build()
            .unwrap();
        let report = analyzer.run_all(&DocumentSet::empty("/repo"));
        assert!(report.violations.is_empty());
        assert!(report.outcomes.iter().all(RuleOutcome::passed));
    }

    #[test]
    fn disabled_rule_is_skipped_and_severity_overridden() {
        let mut config = Config::default();
        config.rules.insert(
            "panics".to_string(),
            RuleConfig {
                enabled: Some(false),
                ..RuleConfig::default()
            },
        );
        config.rules.insert(
            "one-per-file".to_string(),
            RuleConfig {
                severity: Some(Severity::Error),
                ..RuleConfig::default()
            },
        );

        let report = analyzer(config).run_all(&documents());
        assert!(!report.has_rule_errors());
        assert!(matches!(
            report.outcome("panics").unwrap().status,
            RuleStatus::Skipped { .. }
        ));
        assert!(report
            .by_rule("one-per-file")
            .iter()
            .all(|v| v.severity == Severity::Error));
    }

    #[test]
    fn run_single_rule() {
        let analyzer = analyzer(Config::default());
        let violations = analyzer.run("T001", &documents()).unwrap();
        assert_eq!(violations.len(), 3);

        assert!(matches!(
            analyzer.run("missing", &documents()),
            Err(AnalyzerError::UnknownRule { .. })
        ));
        assert!(matches!(
            analyzer.run("panics", &documents()),
            Err(AnalyzerError::RuleFailed { .. })
        ));
    }

    #[test]
    fn run_single_rule_without_semantics_is_an_error() {
        let analyzer = analyzer(Config::default());
        match analyzer.run("T003", &documents()) {
            Err(AnalyzerError::SemanticModelUnavailable { rule }) => {
                assert_eq!(rule, "needs-symbols");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(analyzer
            .run("needs-symbols", &DocumentSet::empty("/repo"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn dedicated_pool() {
        let analyzer = Analyzer::builder()
            .rule(OnePerFile)
            .parallelism(2)
            .build()
            .unwrap();
        assert_eq!(analyzer.run_all(&documents()).violations.len(), 3);
    }
}
