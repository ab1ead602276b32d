//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# ib-lint configuration

# Rule preset: "recommended" (default), "all" or "minimal"
preset = "recommended"

# Exit with a failure status when any violation at or above this severity
# is found ("warning" or "error")
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./App"

# Glob patterns to exclude from analysis
exclude = [
    "**/Pods/**",
    "**/Carthage/**",
    "**/DerivedData/**",
    "**/Generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Check documents in parallel
parallel = true

[decoder]
# SourceKitten executable used to index Swift sources
sourcekitten = "sourcekitten"

# Read pre-generated `sourcekitten structure` output instead,
# one `<path>.json` per Swift file
# structure_dir = "build/structure"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.use-base-class]
enabled = true
# severity = "error"  # Override default severity
# base_classes = { UIButton = ["PrimaryButton", "SecondaryButton"] }

[rules.custom-class-exists]
# ignore = ["UIResponder"]
# ignored_modules = ["ThirdPartyKit"]

# [rules.custom-module]
# modules = [
#     { module = "Feature", paths = ["Modules/Feature"] },
# ]

# [rules.misplaced-view]
# enabled = false
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("ib-lint.toml"), force)?;

    println!("Created ib-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit ib-lint.toml to configure rules");
    println!("  2. Run: ib-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
