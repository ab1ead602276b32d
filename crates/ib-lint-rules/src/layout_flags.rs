//! Rules reporting views that Interface Builder itself flags as broken.
//!
//! IB writes `ambiguous="YES"` when constraints do not determine a frame
//! and `misplaced="YES"` when the stored frame differs from the one the
//! constraints produce.

use crate::element_location;
use ib_lint_core::{Context, Document, Rule, Severity, Violation};

/// Rule code for ambiguous-view.
pub const AMBIGUOUS_CODE: &str = "IB006";

/// Rule name for ambiguous-view.
pub const AMBIGUOUS_NAME: &str = "ambiguous-view";

/// Rule code for misplaced-view.
pub const MISPLACED_CODE: &str = "IB007";

/// Rule name for misplaced-view.
pub const MISPLACED_NAME: &str = "misplaced-view";

fn flagged(
    rule: &dyn Rule,
    doc: &Document,
    attribute: &str,
    describe: &str,
) -> Vec<Violation> {
    doc.elements()
        .filter(|e| e.flag(attribute))
        .map(|e| {
            Violation::new(
                rule.code(),
                rule.name(),
                rule.default_severity(),
                element_location(doc, e),
                format!("{describe} {} (id={})", e.kind, e.id),
            )
        })
        .collect()
}

/// Reports views with ambiguous layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbiguousView;

impl AmbiguousView {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for AmbiguousView {
    fn name(&self) -> &'static str {
        AMBIGUOUS_NAME
    }

    fn code(&self) -> &'static str {
        AMBIGUOUS_CODE
    }

    fn description(&self) -> &'static str {
        "Forbids views with ambiguous Auto Layout constraints"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        flagged(self, doc, "ambiguous", "ambiguous layout for")
    }
}

/// Reports views whose frame disagrees with their constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct MisplacedView;

impl MisplacedView {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MisplacedView {
    fn name(&self) -> &'static str {
        MISPLACED_NAME
    }

    fn code(&self) -> &'static str {
        MISPLACED_CODE
    }

    fn description(&self) -> &'static str {
        "Warns about misplaced views"
    }

    fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        flagged(self, doc, "misplaced", "misplaced")
    }
}
