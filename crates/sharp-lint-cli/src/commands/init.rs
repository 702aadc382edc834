//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# sharp-lint configuration

# recommended | strict | minimal
preset = "recommended"

# Lowest severity that fails `sharp-lint check`
fail_on = "error"

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/bin/**",
    "**/obj/**",
]

# Respect .gitignore files
respect_gitignore = true

# Build semantic models (needed by inject-services and immutable-marker)
semantic = true

# Abort when a source file has syntax errors; otherwise skip the file
fail_on_parse_error = true

# Worker threads for rule evaluation (default: all cores)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.method-length]
enabled = true
# severity = "warning"  # Override default severity
max_lines = 50

[rules.immutable-marker]
marker = "ICalculationResult"
allow_init_accessors = true

[rules.inject-services]
# exact | substring
match_mode = "exact"

[rules.interface-prefix]
report_each = true

# [rules.no-tabs]
# flag_tab_characters = true

# [rules.public-method-test-coverage]
# enabled = true
# test_attributes = ["Test", "TestCase", "Fact", "Theory", "TestMethod"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("sharp-lint.toml"), force)?;

    println!("Created sharp-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit sharp-lint.toml to configure rules");
    println!("  2. Run: sharp-lint check MySolution.sln");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharp_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.analyzer.semantic);
        assert_eq!(
            config.rule("method-length").map(|r| r.get_int("max_lines", 0)),
            Some(50)
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sharp-lint.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
