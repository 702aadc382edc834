//! Shared output formatting for lint results.

use anyhow::Result;
use serde::Serialize;
use sharp_lint_core::{DocumentSet, Report, RuleStatus, Severity, Violation, ViolationDiagnostic};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(
    report: &Report,
    documents: &DocumentSet,
    format: OutputFormat,
    fail_on: Severity,
) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report, fail_on),
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Pretty => print_pretty(report, documents),
    }
    Ok(())
}

fn print_text(report: &Report) {
    for violation in &report.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    print_rule_problems(report);
    print_summary(report);
}

/// Skipped and errored rules, which have no violations to show.
fn print_rule_problems(report: &Report) {
    for outcome in &report.outcomes {
        match &outcome.status {
            RuleStatus::Errored { message } => println!(
                "\x1b[31m{} {} failed to run: {message}\x1b[0m",
                outcome.code, outcome.rule
            ),
            RuleStatus::Skipped { reason } => {
                println!("{} {} skipped: {reason}", outcome.code, outcome.rule);
            }
            RuleStatus::Passed | RuleStatus::Failed => {}
        }
    }
}

fn print_summary(report: &Report) {
    let (errors, warnings, infos) = report.count_by_severity();
    let summary_color = if errors > 0 || report.has_rule_errors() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, report.documents_checked
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    clean: bool,
    fail_on: Severity,
    #[serde(flatten)]
    report: &'a Report,
}

fn print_json(report: &Report, fail_on: Severity) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport {
        clean: report.is_clean(fail_on),
        fail_on,
        report,
    })?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for violation in &report.violations {
        println!("{}", violation.format());
    }
}

fn print_pretty(report: &Report, documents: &DocumentSet) {
    for violation in &report.violations {
        match diagnostic(violation, documents) {
            Some(diagnostic) => eprintln!("{:?}", miette::Report::new(diagnostic)),
            None => eprintln!("{}", violation.format()),
        }
    }
    print_rule_problems(report);
    print_summary(report);
}

fn diagnostic(violation: &Violation, documents: &DocumentSet) -> Option<ViolationDiagnostic> {
    documents
        .find(&violation.location.file)
        .map(|document| ViolationDiagnostic::new(violation, document.source()))
}
