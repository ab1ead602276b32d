//! Configuration types for ib-lint.

use crate::types::Severity;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration for ib-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "all", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing run (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Source decoder configuration.
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration table of a rule.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Deserializes a rule option into `T`.
    ///
    /// Returns `Ok(None)` when the rule or the option is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the option has the wrong shape.
    pub fn rule_option<T: serde::de::DeserializeOwned>(
        &self,
        rule_name: &str,
        key: &str,
    ) -> Result<Option<T>, ConfigError> {
        let Some(value) = self.rules.get(rule_name).and_then(|c| c.options.get(key)) else {
            return Ok(None);
        };
        value
            .clone()
            .try_into()
            .map(Some)
            .map_err(|e: toml::de::Error| ConfigError::InvalidOption {
                rule: rule_name.to_string(),
                key: key.to_string(),
                message: e.message().to_string(),
            })
    }

    /// Severity threshold for a failing run.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Whether source files and documents are processed in parallel.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            respect_gitignore: true,
            parallel: true,
        }
    }
}

/// How Swift sources are turned into declaration records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// SourceKitten executable.
    #[serde(default = "default_sourcekitten")]
    pub sourcekitten: PathBuf,

    /// Directory of pre-decoded structure JSON files. When set, SourceKitten
    /// is not invoked.
    #[serde(default)]
    pub structure_dir: Option<PathBuf>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            sourcekitten: default_sourcekitten(),
            structure_dir: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sourcekitten() -> PathBuf {
    PathBuf::from("sourcekitten")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(ib_lint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(ib_lint::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule option has the wrong shape.
    #[error("Invalid option '{key}' for rule '{rule}': {message}")]
    #[diagnostic(code(ib_lint::config::invalid_option))]
    InvalidOption {
        /// Rule name.
        rule: String,
        /// Option key.
        key: String,
        /// Deserialization detail.
        message: String,
    },

    /// The preset name is not known.
    #[error("Unknown preset '{0}'")]
    #[diagnostic(
        code(ib_lint::config::unknown_preset),
        help("use one of: recommended, all, minimal")
    )]
    UnknownPreset(String),
}
