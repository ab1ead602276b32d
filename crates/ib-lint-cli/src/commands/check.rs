//! Check command implementation.

use anyhow::{Context, Result};
use ib_lint_core::{Analyzer, Config, RuleBox};
use ib_lint_decode::{InterfaceBuilderDecoder, SourceKittenDecoder};
use ib_lint_rules::{rules_from_config, Preset};
use std::path::Path;

use crate::config_resolver;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let root = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path)
    };

    let source = config_resolver::resolve(&root, config_path);
    let config = source.load().with_context(|| match source.path() {
        Some(p) => format!("Failed to load config: {}", p.display()),
        None => "Failed to load default config".to_string(),
    })?;

    let rules = match rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            select_rules(&config, &names)?
        }
        None => rules_from_config(&config).context("Failed to configure rules")?,
    };

    let fail_on = config.fail_on();
    let source_decoder = SourceKittenDecoder::from_config(&config.decoder, &root);

    let mut builder = Analyzer::builder()
        .root(&root)
        .config(config)
        .source_decoder(source_decoder)
        .document_decoder(InterfaceBuilderDecoder::new());

    for pattern in exclude {
        builder = builder.exclude(pattern);
    }

    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        root.display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format)?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Picks rules by name or code out of every configured rule.
fn select_rules(config: &Config, names: &[&str]) -> Result<Vec<RuleBox>> {
    let available = Preset::All
        .rules(config)
        .context("Failed to configure rules")?;

    for name in names {
        if !available.iter().any(|r| r.name() == *name || r.code() == *name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    Ok(available
        .into_iter()
        .filter(|r| names.contains(&r.name()) || names.contains(&r.code()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_by_name_or_code() {
        let config = Config::default();
        let rules = select_rules(&config, &["duplicate-id", "IB001", "no-such-rule"]).unwrap();
        let codes: Vec<&str> = rules.iter().map(|r| r.code()).collect();
        assert_eq!(codes, ["IB001", "IB005"]);
    }
}
