//! Rule requiring configured UI element kinds to use an allowed custom class.
//!
//! # Rationale
//!
//! Projects often route every button or label through a small set of base
//! classes that apply fonts, colors and accessibility defaults. A plain
//! `UIButton` dropped into a storyboard silently bypasses them.
//!
//! # Configuration
//!
//! - `base_classes`: table of element kind to allowed custom classes
//!
//! ```toml
//! [rules.use-base-class]
//! base_classes = { UIButton = ["PrimaryButton", "SecondaryButton"] }
//! ```
//!
//! Element kinds without an entry are not checked.

use crate::element_location;
use ib_lint_core::{
    Config, ConfigError, Context, Document, Rule, Severity, UiElement, Violation,
};
use indexmap::{IndexMap, IndexSet};

/// Rule code for use-base-class.
pub const CODE: &str = "IB001";

/// Rule name for use-base-class.
pub const NAME: &str = "use-base-class";

/// Requires elements of configured kinds to declare an allowed custom class.
#[derive(Debug, Clone)]
pub struct UseBaseClass {
    /// Allowed custom classes per element kind.
    pub base_classes: IndexMap<String, IndexSet<String>>,
    /// Severity of reported violations.
    pub severity: Severity,
}

impl Default for UseBaseClass {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one [`UseBaseClass::evaluate`] pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// Violations in pre-order.
    pub violations: Vec<Violation>,
    /// Number of elements visited.
    pub visited: usize,
}

impl UseBaseClass {
    /// Creates a rule with no allow-lists.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_classes: IndexMap::new(),
            severity: Severity::Warning,
        }
    }

    /// Builds the rule from the `base_classes` option.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the option is not a table of
    /// string arrays.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let base_classes = config
            .rule_option::<IndexMap<String, IndexSet<String>>>(NAME, "base_classes")?
            .unwrap_or_default();
        Ok(Self {
            base_classes,
            ..Self::new()
        })
    }

    /// Allows `classes` for elements of `kind`.
    #[must_use]
    pub fn allow<I, S>(mut self, kind: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_classes
            .entry(kind.into())
            .or_default()
            .extend(classes.into_iter().map(Into::into));
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Walks every element of `doc` pre-order and collects violations.
    #[must_use]
    pub fn evaluate(&self, doc: &Document) -> Evaluation {
        let mut evaluation = Evaluation {
            violations: Vec::new(),
            visited: 0,
        };
        for element in doc.elements() {
            evaluation.visited += 1;
            if let Some(violation) = self.check_element(doc, element) {
                evaluation.violations.push(violation);
            }
        }
        evaluation
    }

    fn check_element(&self, doc: &Document, element: &UiElement) -> Option<Violation> {
        let allowed = self.base_classes.get(&element.kind)?;

        let message = match element.custom_class.as_deref() {
            None => format!(
                "custom class is not set for element of kind {} (id={})",
                element.kind, element.id
            ),
            Some(class) if !allowed.contains(class) => format!(
                "custom class '{class}' is not contained in allowed base classes for {} (id={})",
                element.kind, element.id
            ),
            Some(_) => return None,
        };

        Some(Violation::new(
            CODE,
            NAME,
            self.severity,
            element_location(doc, element),
            message,
        ))
    }
}

impl Rule for UseBaseClass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires configured element kinds to use an allowed base class"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        self.evaluate(doc).violations
    }
}
