//! Rule forbidding direct construction of service classes.
//!
//! A service is a class whose base list names an interface declared in the
//! code base. Services should be injected through that interface, so every
//! `new Service(...)` is flagged.
//!
//! Two matching modes are available:
//!
//! - `exact` (default): base types and constructed types are resolved to
//!   symbols, and only declared interfaces count
//! - `substring`: name matching without symbols. A base type counts when
//!   some declared interface name contains its text, and a construction is
//!   flagged when its type text equals a service class name
//!
//! ```toml
//! [rules.inject-services]
//! match_mode = "substring"
//! ```

use std::collections::HashMap;

use sharp_lint_core::{
    Location, ProjectContext, ProjectRule, RuleConfig, Severity, Suggestion, SymbolId, SyntaxKind,
    TypeKind, Violation,
};
use tracing::{debug, warn};

/// Rule code for inject-services.
pub const CODE: &str = "CQ007";

/// Rule name for inject-services.
pub const NAME: &str = "inject-services";

/// How base types and constructed types are matched against interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Symbol identity through the semantic model.
    #[default]
    Exact,
    /// Name containment on the syntax tree alone.
    Substring,
}

impl MatchMode {
    /// Parses a `match_mode` option value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "exact" => Some(Self::Exact),
            "substring" => Some(Self::Substring),
            _ => None,
        }
    }
}

/// Flags `new` expressions constructing interface-implementing classes.
#[derive(Debug, Clone)]
pub struct InjectServices {
    /// Severity level.
    pub severity: Severity,
    /// Matching mode.
    pub match_mode: MatchMode,
}

impl Default for InjectServices {
    fn default() -> Self {
        Self::new()
    }
}

impl InjectServices {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            match_mode: MatchMode::Exact,
        }
    }

    /// Creates the rule from its `[rules.inject-services]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let Some(config) = config else {
            return Self::new();
        };
        let raw = config.get_str("match_mode", "exact");
        let mode = MatchMode::parse(raw).unwrap_or_else(|| {
            warn!("Unknown {NAME}.match_mode `{raw}`, using exact");
            MatchMode::Exact
        });
        Self::new().match_mode(mode)
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the matching mode.
    #[must_use]
    pub fn match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    fn violation(&self, location: Location, service: &str, interface: &str) -> Violation {
        Violation::new(
            CODE,
            NAME,
            self.severity,
            location,
            format!("`{service}` implements `{interface}` and must be injected, not constructed"),
        )
        .with_suggestion(Suggestion::new(format!(
            "Take `{interface}` as a constructor parameter"
        )))
    }

    fn check_exact(&self, ctx: &ProjectContext) -> Vec<Violation> {
        let Some(compilation) = ctx.compilation() else {
            return Vec::new();
        };

        // service class -> first declared interface in its base list
        let services: HashMap<SymbolId, &str> = compilation
            .symbols()
            .filter(|s| matches!(s.type_kind(), Some(TypeKind::Class | TypeKind::Record)))
            .filter_map(|class| {
                class.base_types().iter().find_map(|base| {
                    compilation
                        .get(*base)
                        .filter(|b| b.is_interface())
                        .map(|b| (class.id(), b.name()))
                })
            })
            .collect();
        if services.is_empty() {
            return Vec::new();
        }

        let mut violations = Vec::new();
        for file in ctx.files() {
            let Some(model) = file.semantic_model() else {
                continue;
            };
            for creation in file
                .root()
                .descendants_of_kind(SyntaxKind::ObjectCreationExpression)
            {
                let Some(text) = creation.identifier() else {
                    continue;
                };
                let Some(id) = model.resolve_type(creation, text) else {
                    debug!("Unresolved construction of `{text}` in {}", file.relative_path().display());
                    continue;
                };
                if let Some(interface) = services.get(&id) {
                    let service = compilation.get(id).map_or(text, |s| s.name());
                    violations.push(self.violation(file.location(creation), service, interface));
                }
            }
        }
        violations
    }

    fn check_substring(&self, ctx: &ProjectContext) -> Vec<Violation> {
        let interfaces: Vec<&str> = ctx
            .files()
            .flat_map(|file| {
                file.root()
                    .descendants_of_kind(SyntaxKind::InterfaceDeclaration)
                    .filter_map(|i| i.identifier())
            })
            .collect();

        let mut services: HashMap<&str, &str> = HashMap::new();
        for file in ctx.files() {
            for class in file.root().descendants_of_kind(SyntaxKind::ClassDeclaration) {
                let Some(name) = class.identifier() else {
                    continue;
                };
                let matched = class
                    .children_of_kind(SyntaxKind::BaseList)
                    .flat_map(|list| list.children_of_kind(SyntaxKind::TypeReference))
                    .filter_map(|base| base.identifier())
                    .filter(|base| !base.is_empty())
                    .find_map(|base| interfaces.iter().copied().find(|i| i.contains(base)));
                if let Some(interface) = matched {
                    services.entry(name).or_insert(interface);
                }
            }
        }
        if services.is_empty() {
            return Vec::new();
        }

        let mut violations = Vec::new();
        for file in ctx.files() {
            for creation in file
                .root()
                .descendants_of_kind(SyntaxKind::ObjectCreationExpression)
            {
                let Some(text) = creation.identifier() else {
                    continue;
                };
                if let Some(interface) = services.get(text) {
                    violations.push(self.violation(file.location(creation), text, interface));
                }
            }
        }
        violations
    }
}

impl ProjectRule for InjectServices {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Classes implementing a declared interface must be injected, not constructed"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn requires_semantics(&self) -> bool {
        self.match_mode == MatchMode::Exact
    }

    fn check_project(&self, ctx: &ProjectContext) -> Vec<Violation> {
        match self.match_mode {
            MatchMode::Exact => self.check_exact(ctx),
            MatchMode::Substring => self.check_substring(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check_project;

    const SERVICES: &[(&str, &str)] = &[
        (
            "Contracts.cs",
            "namespace Shop.Contracts\n{\n    public interface IOrderService { }\n    public interface IClock { }\n}\n",
        ),
        (
            "Services.cs",
            "using Shop.Contracts;\n\nnamespace Shop.Services\n{\n    public class OrderService : IOrderService { }\n    public class Money { }\n    public class Timer : System.IDisposable { }\n}\n",
        ),
        (
            "Checkout.cs",
            "using Shop.Services;\n\nnamespace Shop.Web\n{\n    public class Checkout\n    {\n        public void Run()\n        {\n            var service = new OrderService();\n            var total = new Money();\n            var timer = new Timer();\n        }\n    }\n}\n",
        ),
    ];

    #[test]
    fn flags_construction_of_service() {
        let violations = check_project(&InjectServices::new(), SERVICES);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.file.to_str(), Some("Checkout.cs"));
        assert_eq!(violations[0].location.line, 9);
        assert_eq!(
            violations[0].message,
            "`OrderService` implements `IOrderService` and must be injected, not constructed"
        );
    }

    #[test]
    fn substring_mode_matches_names() {
        let violations = check_project(
            &InjectServices::new().match_mode(MatchMode::Substring),
            SERVICES,
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 9);
    }

    #[test]
    fn substring_mode_is_loose() {
        // `IOrder` is contained in `IOrderService` though no `IOrder` exists.
        let sources = [
            ("A.cs", "interface IOrderService { }\nclass Draft : IOrder { }\n"),
            ("B.cs", "class Use { void M() { var d = new Draft(); } }\n"),
        ];
        let substring = check_project(
            &InjectServices::new().match_mode(MatchMode::Substring),
            &sources,
        );
        assert_eq!(substring.len(), 1);
        assert!(check_project(&InjectServices::new(), &sources).is_empty());
    }

    #[test]
    fn undeclared_interfaces_do_not_make_services() {
        let sources = [(
            "A.cs",
            "class Timer : System.IDisposable { }\nclass Use { void M() { var t = new Timer(); } }\n",
        )];
        assert!(check_project(&InjectServices::new(), &sources).is_empty());
    }

    #[test]
    fn parses_match_mode() {
        assert_eq!(MatchMode::parse("Substring"), Some(MatchMode::Substring));
        assert_eq!(MatchMode::parse("fuzzy"), None);

        let config: RuleConfig = toml::from_str("match_mode = \"substring\"").unwrap();
        assert_eq!(
            InjectServices::from_config(Some(&config)).match_mode,
            MatchMode::Substring
        );
        assert!(!InjectServices::from_config(Some(&config)).requires_semantics());
    }
}
