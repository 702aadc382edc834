//! List rules command implementation.

use sharp_lint_core::Config;
use sharp_lint_rules::{all_rules, recommended_rules};

/// Runs the list-rules command.
pub fn run() {
    let config = Config::default();
    let recommended: Vec<&str> = recommended_rules(&config)
        .iter()
        .map(|rule| rule.code())
        .collect();

    println!("Available rules:\n");
    println!("{:<7} {:<30} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(100));

    for rule in all_rules(&config) {
        let marker = if recommended.contains(&rule.code()) { "" } else { " (opt-in)" };
        println!(
            "{:<7} {:<30} {:<9} {}{marker}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description(),
        );
    }

    println!("\nPresets:");
    println!("  recommended  - CQ001-CQ008 (default)");
    println!("  strict       - All rules, no-tabs also flags tab characters");
    println!("  minimal      - CQ001, CQ002, CQ006 (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  sharp-lint check --rules no-regions,method-length");
    println!("  sharp-lint check MySolution.sln --rules CQ007,CQ008");
}
