//! Check command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sharp_lint_core::{Analyzer, Config, RegisteredRule};
use sharp_lint_rules::{rule_by_id, Preset};
use sharp_lint_ts::{Descriptor, WorkspaceLoader};

use crate::config_resolver;
use crate::OutputFormat;

/// Arguments of `sharp-lint check`.
pub struct CheckOptions {
    /// Solution, project, file or directory.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Load without semantic models.
    pub no_semantic: bool,
    /// Explicit config file.
    pub config: Option<PathBuf>,
}

/// Runs the check command.
///
/// Exits the process with status 1 when the report has violations at or
/// above `fail_on`, or a rule failed to run.
pub fn run(options: &CheckOptions) -> Result<()> {
    let descriptor = Descriptor::detect(&options.path)
        .with_context(|| format!("Cannot analyze {}", options.path.display()))?;

    let root = descriptor.root();
    let start = root.canonicalize().unwrap_or(root);
    let mut config = config_resolver::resolve(&start, options.config.as_deref()).load()?;
    config.analyzer.exclude.extend(options.exclude.iter().cloned());
    if options.no_semantic {
        config.analyzer.semantic = false;
    }
    let fail_on = config.fail_on_severity().context("Invalid configuration")?;

    let rules = select_rules(&config, options.rules.as_deref())?;

    let documents = WorkspaceLoader::from_config(&config.analyzer)
        .load(descriptor.path())
        .with_context(|| format!("Failed to load {}", descriptor.path().display()))?;

    let analyzer = Analyzer::builder()
        .rules(rules)
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        descriptor.path().display(),
        analyzer.rule_count()
    );

    let report = analyzer.run_all(&documents);

    super::output::print(&report, &documents, options.format, fail_on)?;

    if !report.is_clean(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Rules named by `--rules`, or the configured preset.
fn select_rules(config: &Config, filter: Option<&str>) -> Result<Vec<RegisteredRule>> {
    if let Some(filter) = filter {
        let mut rules = Vec::new();
        for id in filter.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            match rule_by_id(id, config) {
                Some(rule) => rules.push(rule),
                None => tracing::warn!("Unknown rule: {}", id),
            }
        }
        if rules.is_empty() {
            bail!("No known rules in --rules {filter}. Run `sharp-lint list-rules` to see them.");
        }
        return Ok(rules);
    }

    let name = config.preset.as_deref().unwrap_or("recommended");
    let Some(preset) = Preset::from_name(name) else {
        bail!("Unknown preset `{name}`; expected recommended, strict or minimal");
    };
    Ok(preset.rules(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rules: &[RegisteredRule]) -> Vec<&'static str> {
        rules.iter().map(RegisteredRule::code).collect()
    }

    #[test]
    fn filter_selects_by_name_and_code() {
        let rules = select_rules(&Config::default(), Some("no-regions, CQ005")).unwrap();
        assert_eq!(codes(&rules), vec!["CQ004", "CQ005"]);
    }

    #[test]
    fn unknown_rules_only_is_an_error() {
        assert!(select_rules(&Config::default(), Some("CQ999")).is_err());
    }

    #[test]
    fn preset_from_config() {
        let config = Config::parse("preset = \"minimal\"").unwrap();
        assert_eq!(codes(&select_rules(&config, None).unwrap()).len(), 3);

        let unknown = Config::parse("preset = \"paranoid\"").unwrap();
        assert!(select_rules(&unknown, None).is_err());
    }

    #[test]
    fn recommended_by_default() {
        let rules = select_rules(&Config::default(), None).unwrap();
        assert_eq!(rules.len(), 8);
    }
}
