//! List rules command implementation.

use ib_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<30} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        println!(
            "{:<8} {:<30} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.default_severity(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - IB001 to IB007 (default)");
    println!("  all          - Every rule, including identifier checks");
    println!("  minimal      - IB005, IB006, IB007 (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  ib-lint check --rules use-base-class,duplicate-id");
    println!("  ib-lint check --rules IB001,IB003");
}
