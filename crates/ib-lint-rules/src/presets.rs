//! Rule presets for common configurations.

use crate::{
    AmbiguousView, ConnectionMismatch, CustomClassExists, CustomModule, DuplicateId,
    MisplacedView, ReuseIdentifier, StoryboardViewControllerId, UseBaseClass,
};
use ib_lint_core::{Config, ConfigError, RuleBox};

/// Preset configurations for ib-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Recommended rules (IB001-IB007).
    #[default]
    Recommended,
    /// Every built-in rule.
    All,
    /// Only checks that catch broken documents (IB005-IB007).
    Minimal,
}

impl std::str::FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "all" => Ok(Self::All),
            "minimal" => Ok(Self::Minimal),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

impl Preset {
    /// Returns the rules for this preset, configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule option in `config` is malformed.
    pub fn rules(self, config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
        let rules = match self {
            Self::Recommended => recommended_rules(config)?,
            Self::All => {
                let mut rules = recommended_rules(config)?;
                rules.push(Box::new(StoryboardViewControllerId::new()));
                rules.push(Box::new(ReuseIdentifier::new()));
                rules
            }
            Self::Minimal => minimal_rules(),
        };
        Ok(rules)
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `use-base-class` (IB001)
/// - `custom-class-exists` (IB002)
/// - `connection-mismatch` (IB003)
/// - `custom-module` (IB004)
/// - the [`minimal_rules`]
///
/// # Errors
///
/// Returns an error if a rule option in `config` is malformed.
pub fn recommended_rules(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let mut rules: Vec<RuleBox> = vec![
        Box::new(UseBaseClass::from_config(config)?),
        Box::new(CustomClassExists::from_config(config)?),
        Box::new(ConnectionMismatch::new()),
        Box::new(CustomModule::from_config(config)?),
    ];
    rules.extend(minimal_rules());
    Ok(rules)
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `duplicate-id` (IB005)
/// - `ambiguous-view` (IB006)
/// - `misplaced-view` (IB007)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(DuplicateId::new()),
        Box::new(AmbiguousView::new()),
        Box::new(MisplacedView::new()),
    ]
}

/// Returns all available rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(UseBaseClass::new()),
        Box::new(CustomClassExists::new()),
        Box::new(ConnectionMismatch::new()),
        Box::new(CustomModule::new()),
        Box::new(DuplicateId::new()),
        Box::new(AmbiguousView::new()),
        Box::new(MisplacedView::new()),
        Box::new(StoryboardViewControllerId::new()),
        Box::new(ReuseIdentifier::new()),
    ]
}

/// Builds the rule set selected by `config.preset` (default: recommended).
///
/// # Errors
///
/// Returns an error for an unknown preset or a malformed rule option.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    let preset = match config.preset.as_deref() {
        Some(name) => name.parse()?,
        None => Preset::default(),
    };
    tracing::debug!("Using preset {:?}", preset);
    preset.rules(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.code()).collect()
    }

    #[test]
    fn test_preset_rules() {
        let config = Config::default();
        assert_eq!(
            codes(&Preset::Recommended.rules(&config).unwrap()),
            ["IB001", "IB002", "IB003", "IB004", "IB005", "IB006", "IB007"]
        );
        assert_eq!(
            codes(&Preset::Minimal.rules(&config).unwrap()),
            ["IB005", "IB006", "IB007"]
        );
        assert_eq!(
            codes(&Preset::All.rules(&config).unwrap()),
            codes(&all_rules())
        );
    }

    #[test]
    fn rules_from_config_uses_preset() {
        let config = Config::parse("preset = \"minimal\"").unwrap();
        assert_eq!(rules_from_config(&config).unwrap().len(), 3);

        let config = Config::parse("preset = \"paranoid\"").unwrap();
        assert!(matches!(
            rules_from_config(&config),
            Err(ConfigError::UnknownPreset(name)) if name == "paranoid"
        ));
    }

    #[test]
    fn rule_codes_and_names_are_unique() {
        let rules = all_rules();
        let mut seen = std::collections::HashSet::new();
        for rule in &rules {
            assert!(seen.insert(rule.code()), "duplicate code {}", rule.code());
            assert!(seen.insert(rule.name()), "duplicate name {}", rule.name());
            assert!(!rule.description().is_empty());
        }
    }
}
