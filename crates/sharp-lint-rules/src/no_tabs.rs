//! Rule flagging whitespace trivia that spans a line break.
//!
//! Despite its name the default predicate does not look for tab characters:
//! a whitespace trivia item is flagged when its text contains `\n`. Enable
//! `flag_tab_characters` to also flag whitespace containing `\t`.
//!
//! ```toml
//! [rules.no-tabs]
//! flag_tab_characters = true
//! ```

use sharp_lint_core::{FileContext, Rule, RuleConfig, Severity, TriviaKind, Violation};

/// Rule code for no-tabs.
pub const CODE: &str = "CQ003";

/// Rule name for no-tabs.
pub const NAME: &str = "no-tabs";

/// Flags multi-line whitespace trivia, and optionally tab characters.
#[derive(Debug, Clone)]
pub struct NoTabs {
    /// Severity level.
    pub severity: Severity,
    /// Also flag whitespace containing a tab character.
    pub flag_tab_characters: bool,
}

impl Default for NoTabs {
    fn default() -> Self {
        Self::new()
    }
}

impl NoTabs {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            flag_tab_characters: false,
        }
    }

    /// Creates the rule from its `[rules.no-tabs]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        match config {
            Some(config) => {
                rule.flag_tab_characters(config.get_bool("flag_tab_characters", false))
            }
            None => rule,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Also flags whitespace trivia containing `\t`.
    #[must_use]
    pub fn flag_tab_characters(mut self, flag: bool) -> Self {
        self.flag_tab_characters = flag;
        self
    }
}

impl Rule for NoTabs {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Whitespace trivia must not span a line break"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        ctx.root()
            .descendant_trivia()
            .filter(|trivia| trivia.kind() == TriviaKind::Whitespace)
            .filter_map(|trivia| {
                let message = if trivia.text().contains('\n') {
                    "Whitespace trivia contains a line break"
                } else if self.flag_tab_characters && trivia.text().contains('\t') {
                    "Tab character used for whitespace"
                } else {
                    return None;
                };
                Some(Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location_of(trivia.range(), trivia.span()),
                    message,
                ))
            })
            .collect()
    }
}
