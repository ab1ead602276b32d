//! Core types for lint violations and results.

use crate::position::Position;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}' (expected warning or error)")),
        }
    }
}

/// File location of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analyzed root.
    pub file: PathBuf,
    /// Line number (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown).
    pub column: usize,
}

impl Location {
    /// Creates a location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }

    /// A location covering a whole file.
    #[must_use]
    pub fn file(file: &Path) -> Self {
        Self::new(file.to_path_buf(), 0, 0)
    }

    /// Converts a resolved [`Position`] (0-indexed column) into a location.
    #[must_use]
    pub fn from_position(file: &Path, position: &Position) -> Self {
        Self::new(file.to_path_buf(), position.line, position.column + 1)
    }

    /// Whether line information is available.
    #[must_use]
    pub fn has_line(&self) -> bool {
        self.line > 0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.has_line() {
            write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
        } else {
            write!(f, "{}", self.file.display())
        }
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "IB001").
    pub code: String,
    /// Rule name (e.g., "use-base-class").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.location);
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        for label in &self.labels {
            let _ = writeln!(output, "  --> {}: {}", label.location, label.message);
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.code, self.message
        )
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found, in document then rule then traversal order.
    pub violations: Vec<Violation>,
    /// Number of documents checked.
    pub documents_checked: usize,
    /// Number of source files that contributed to the symbol table.
    pub sources_indexed: usize,
    /// Number of classes in the symbol table.
    pub classes_indexed: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Counts violations as `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        (errors, self.violations.len() - errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "IB001",
            "use-base-class",
            severity,
            Location::new(PathBuf::from("Main.storyboard"), 42, 10),
            "custom class is not set for element of kind UIButton (id=abc-12-xyz)",
        )
    }

    #[test]
    fn severity_orders_warning_below_error() {
        assert!(Severity::Warning < Severity::Error);
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("info".parse::<Severity>().is_err());
    }

    #[test]
    fn location_without_line_prints_file_only() {
        let loc = Location::file(Path::new("Cell.xib"));
        assert_eq!(loc.to_string(), "Cell.xib");
    }

    #[test]
    fn location_from_position_is_one_indexed() {
        let loc = Location::from_position(Path::new("A.swift"), &Position::new(3, 0));
        assert_eq!((loc.line, loc.column), (3, 1));
    }

    #[test]
    fn violation_display() {
        insta::assert_snapshot!(
            make_violation(Severity::Warning).to_string(),
            @"Main.storyboard:42:10: warning [IB001] custom class is not set for element of kind UIButton (id=abc-12-xyz)"
        );
    }

    #[test]
    fn violation_format_includes_labels_and_help() {
        let v = make_violation(Severity::Error)
            .with_label(Label::new(
                Location::new(PathBuf::from("Button.swift"), 3, 7),
                "class declared here",
            ))
            .with_suggestion(Suggestion::new("use MyButton"));
        let formatted = v.format();
        assert!(formatted.contains("  --> Button.swift:3:7: class declared here"));
        assert!(formatted.contains("  = help: use MyButton"));
    }

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(result.has_violations_at(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
    }
}
