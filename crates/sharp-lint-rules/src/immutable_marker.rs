//! Rule enforcing immutability of types tagged with a marker interface.
//!
//! Every class or record implementing the marker (directly, through a base
//! class or through another interface) must not expose a public setter.
//! A property passes when it has no setter, or when its setter is less
//! accessible than public. `init` accessors pass unless
//! `allow_init_accessors` is turned off.
//!
//! ```toml
//! [rules.immutable-marker]
//! marker = "ICalculationResult"
//! allow_init_accessors = true
//! ```

use sharp_lint_core::{
    Accessibility, FileContext, Rule, RuleConfig, Severity, Suggestion, SyntaxKind, Violation,
};
use tracing::debug;

use crate::name_token;

/// Rule code for immutable-marker.
pub const CODE: &str = "CQ008";

/// Rule name for immutable-marker.
pub const NAME: &str = "immutable-marker";

/// Default marker interface name.
pub const DEFAULT_MARKER: &str = "ICalculationResult";

/// Forbids public setters on types implementing the marker interface.
#[derive(Debug, Clone)]
pub struct ImmutableMarker {
    /// Severity level.
    pub severity: Severity,
    /// Simple name of the marker interface.
    pub marker: String,
    /// Treat `init` accessors as read-only.
    pub allow_init_accessors: bool,
}

impl Default for ImmutableMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl ImmutableMarker {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            marker: DEFAULT_MARKER.to_string(),
            allow_init_accessors: true,
        }
    }

    /// Creates the rule from its `[rules.immutable-marker]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let Some(config) = config else {
            return Self::new();
        };
        Self::new()
            .marker(config.get_str("marker", DEFAULT_MARKER))
            .allow_init_accessors(config.get_bool("allow_init_accessors", true))
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the marker interface name.
    #[must_use]
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Sets whether `init` accessors are allowed.
    #[must_use]
    pub fn allow_init_accessors(mut self, allow: bool) -> Self {
        self.allow_init_accessors = allow;
        self
    }
}

impl Rule for ImmutableMarker {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Types implementing the marker interface must not have public setters"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn requires_semantics(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let Some(model) = ctx.semantic_model() else {
            return Vec::new();
        };
        let compilation = model.compilation();

        let mut violations = Vec::new();
        let types = ctx.root().descendants().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::ClassDeclaration | SyntaxKind::RecordDeclaration
            )
        });
        for declaration in types {
            let Some(symbol) = model.declared_symbol(declaration) else {
                debug!(
                    "Skipping unresolved type `{}` in {}",
                    declaration.identifier().unwrap_or_default(),
                    ctx.relative_path().display()
                );
                continue;
            };
            if !compilation.implements_named(symbol.id(), &self.marker) {
                continue;
            }

            for property in declaration
                .members()
                .into_iter()
                .filter(|m| m.kind().is_property())
            {
                let Some(setter) = model
                    .declared_symbol(property)
                    .and_then(|p| p.property())
                    .and_then(|info| info.setter)
                else {
                    continue;
                };
                if setter.accessibility < Accessibility::Public
                    || (setter.is_init_only && self.allow_init_accessors)
                {
                    continue;
                }

                let name = property.identifier().unwrap_or_default();
                let member = if property.kind() == SyntaxKind::IndexerDeclaration {
                    "Indexer"
                } else {
                    "Property"
                };
                let accessor = if setter.is_init_only { "init" } else { "set" };
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location(name_token(property)),
                        format!(
                            "{member} `{name}` of `{}` has a public {accessor} accessor; types implementing `{}` must be immutable",
                            symbol.name(),
                            self.marker
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Remove the setter or make it private, and assign the value in the constructor",
                    )),
                );
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check;

    const MARKER: &str = "public interface ICalculationResult { }\n";

    fn check_with_marker(rule: &ImmutableMarker, body: &str) -> Vec<Violation> {
        check(rule, &format!("{MARKER}{body}"))
    }

    #[test]
    fn flags_public_setter() {
        let violations = check_with_marker(
            &ImmutableMarker::new(),
            "public class Result : ICalculationResult\n{\n    public int Total { get; set; }\n}\n",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 4);
        assert!(violations[0].message.starts_with("Property `Total` of `Result`"));
    }

    #[test]
    fn private_setter_and_getter_only_pass() {
        let violations = check_with_marker(
            &ImmutableMarker::new(),
            "public class Result : ICalculationResult\n{\n    public Result(int total) { Total = total; }\n    public int Total { get; private set; }\n    public int Other { get; }\n    public int Computed => Total * 2;\n}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn init_accessor_is_configurable() {
        let body = "public record Result : ICalculationResult\n{\n    public int Total { get; init; }\n}\n";
        assert!(check_with_marker(&ImmutableMarker::new(), body).is_empty());

        let violations =
            check_with_marker(&ImmutableMarker::new().allow_init_accessors(false), body);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("public init accessor"));
    }

    #[test]
    fn indexer_setters_are_checked() {
        let violations = check_with_marker(
            &ImmutableMarker::new(),
            "public class Grid : ICalculationResult\n{\n    private int _x;\n    public int X { get => _x; set => _x = value; }\n    public int this[int i] { get => 0; set { } }\n    public int this[string key] => 0;\n    public int this[long i] { get => 0; private set { } }\n}\n",
        );
        let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![4, 5]);
        assert!(violations[1]
            .message
            .starts_with("Indexer `this[]` of `Grid` has a public set accessor"));
    }

    #[test]
    fn unmarked_types_are_ignored() {
        let violations = check_with_marker(
            &ImmutableMarker::new(),
            "public class Draft\n{\n    public int Total { get; set; }\n}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn marker_through_base_class() {
        let violations = check_with_marker(
            &ImmutableMarker::new(),
            "public abstract class ResultBase : ICalculationResult { }\npublic class Sum : ResultBase\n{\n    public int Value { get; set; }\n}\n",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("`Sum`"));
    }

    #[test]
    fn custom_marker_name() {
        let rule = ImmutableMarker::new().marker("IValueObject");
        let violations = check(
            &rule,
            "class Money : IValueObject\n{\n    public decimal Amount { get; set; }\n}\n",
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn reads_options_from_config() {
        let config: RuleConfig =
            toml::from_str("marker = \"IFrozen\"\nallow_init_accessors = false").unwrap();
        let rule = ImmutableMarker::from_config(Some(&config));
        assert_eq!(rule.marker, "IFrozen");
        assert!(!rule.allow_init_accessors);
    }
}
