//! Rule presets for common configurations.
//!
//! Every constructor takes the loaded [`Config`] so rule options
//! (`[rules.<name>]` tables) reach the rules. Severity overrides and
//! `enabled = false` are applied by the analyzer, not here.

use sharp_lint_core::{Config, ProjectRule, RegisteredRule, Rule};

use crate::{
    ImmutableMarker, InjectServices, InterfacePrefix, MethodLength, NoRegions, NoTabs,
    PrivateFieldUnderscore, PublicMethodCapitalization, TestCoverage,
};

/// Preset configurations for sharp-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// The house conventions, without the test coverage heuristic.
    Recommended,
    /// Every rule, with tab characters flagged.
    Strict,
    /// Naming rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Parses a preset name as used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self, config: &Config) -> Vec<RegisteredRule> {
        match self {
            Self::Recommended => recommended_rules(config),
            Self::Strict => strict_rules(config),
            Self::Minimal => minimal_rules(config),
        }
    }
}

fn document<R: Rule + 'static>(rule: R) -> RegisteredRule {
    RegisteredRule::Document(Box::new(rule))
}

fn project<R: ProjectRule + 'static>(rule: R) -> RegisteredRule {
    RegisteredRule::Project(Box::new(rule))
}

/// Returns the recommended set of rules.
///
/// Includes CQ001 through CQ008:
/// - naming: `private-field-underscore`, `public-method-capitalization`,
///   `interface-prefix`
/// - layout: `no-tabs`, `no-regions`, `method-length`
/// - design: `inject-services`, `immutable-marker`
#[must_use]
pub fn recommended_rules(config: &Config) -> Vec<RegisteredRule> {
    let options = |name: &str| config.rule(name);
    vec![
        document(PrivateFieldUnderscore::from_config(options(
            crate::private_field_underscore::NAME,
        ))),
        document(PublicMethodCapitalization::from_config(options(
            crate::public_method_capitalization::NAME,
        ))),
        document(NoTabs::from_config(options(crate::no_tabs::NAME))),
        document(NoRegions::from_config(options(crate::no_regions::NAME))),
        document(MethodLength::from_config(options(crate::method_length::NAME))),
        project(InterfacePrefix::from_config(options(
            crate::interface_prefix::NAME,
        ))),
        project(InjectServices::from_config(options(
            crate::inject_services::NAME,
        ))),
        document(ImmutableMarker::from_config(options(
            crate::immutable_marker::NAME,
        ))),
    ]
}

/// Returns the strict set of rules.
///
/// Includes all recommended rules plus:
/// - `no-tabs` also flagging tab characters, unless configured otherwise
/// - `public-method-test-coverage` (CQ009)
#[must_use]
pub fn strict_rules(config: &Config) -> Vec<RegisteredRule> {
    let mut rules: Vec<RegisteredRule> = recommended_rules(config)
        .into_iter()
        .map(|rule| {
            if rule.name() != crate::no_tabs::NAME {
                return rule;
            }
            let flag = config
                .rule(crate::no_tabs::NAME)
                .map_or(true, |c| c.get_bool("flag_tab_characters", true));
            document(NoTabs::new().flag_tab_characters(flag))
        })
        .collect();
    rules.push(project(TestCoverage::from_config(
        config.rule(crate::test_coverage::NAME),
    )));
    rules
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes the naming rules CQ001, CQ002 and
/// CQ006.
#[must_use]
pub fn minimal_rules(config: &Config) -> Vec<RegisteredRule> {
    vec![
        document(PrivateFieldUnderscore::from_config(
            config.rule(crate::private_field_underscore::NAME),
        )),
        document(PublicMethodCapitalization::from_config(
            config.rule(crate::public_method_capitalization::NAME),
        )),
        project(InterfacePrefix::from_config(
            config.rule(crate::interface_prefix::NAME),
        )),
    ]
}

/// Returns all available rules, in code order.
#[must_use]
pub fn all_rules(config: &Config) -> Vec<RegisteredRule> {
    let mut rules = recommended_rules(config);
    rules.push(project(TestCoverage::from_config(
        config.rule(crate::test_coverage::NAME),
    )));
    rules.sort_by_key(RegisteredRule::code);
    rules
}

/// Looks up a single rule by name or code.
#[must_use]
pub fn rule_by_id(id: &str, config: &Config) -> Option<RegisteredRule> {
    all_rules(config).into_iter().find(|rule| rule.matches(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rules: &[RegisteredRule]) -> Vec<&'static str> {
        rules.iter().map(RegisteredRule::code).collect()
    }

    #[test]
    fn test_preset_rules() {
        let config = Config::default();
        assert_eq!(Preset::Recommended.rules(&config).len(), 8);
        assert_eq!(Preset::Strict.rules(&config).len(), 9);
        assert_eq!(
            codes(&Preset::Minimal.rules(&config)),
            vec!["CQ001", "CQ002", "CQ006"]
        );
    }

    #[test]
    fn all_rules_in_code_order() {
        assert_eq!(
            codes(&all_rules(&Config::default())),
            vec!["CQ001", "CQ002", "CQ003", "CQ004", "CQ005", "CQ006", "CQ007", "CQ008", "CQ009"]
        );
    }

    #[test]
    fn recommended_excludes_test_coverage() {
        let rules = recommended_rules(&Config::default());
        assert!(!rules.iter().any(|r| r.matches("CQ009")));
    }

    #[test]
    fn parses_preset_names() {
        assert_eq!(Preset::from_name("Strict"), Some(Preset::Strict));
        assert_eq!(Preset::from_name("minimal"), Some(Preset::Minimal));
        assert_eq!(Preset::from_name("paranoid"), None);
    }

    #[test]
    fn finds_rule_by_name_or_code() {
        let config = Config::default();
        assert_eq!(
            rule_by_id("cq005", &config).map(|r| r.name()),
            Some("method-length")
        );
        assert_eq!(
            rule_by_id("inject-services", &config).map(|r| r.code()),
            Some("CQ007")
        );
        assert!(rule_by_id("CQ999", &config).is_none());
    }
}
