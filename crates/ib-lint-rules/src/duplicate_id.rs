//! Rule forbidding repeated element ids within one document.
//!
//! Interface Builder resolves connections by id; a copy-pasted element with
//! a clashing id makes outlets bind to the wrong view.

use crate::element_location;
use ib_lint_core::{Context, Document, Rule, Severity, Violation};
use std::collections::HashSet;

/// Rule code for duplicate-id.
pub const CODE: &str = "IB005";

/// Rule name for duplicate-id.
pub const NAME: &str = "duplicate-id";

/// Reports every element whose id was already used earlier in the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateId;

impl DuplicateId {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DuplicateId {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids duplicate element ids within a document"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        let mut seen = HashSet::new();
        doc.elements()
            .filter(|&e| !seen.insert(e.id.as_str()))
            .map(|e| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    element_location(doc, e),
                    format!("duplicate element id '{}' on {}", e.id, e.kind),
                )
            })
            .collect()
    }
}
