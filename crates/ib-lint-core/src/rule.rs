//! The rule abstraction and the context rules run in.

use crate::config::Config;
use crate::document::Document;
use crate::symbols::SymbolTable;
use crate::types::{Severity, Violation};

/// Shared, read-only state available to every rule during a run.
///
/// Holds the symbol table and the configuration by shared reference, so no
/// rule can modify either.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    symbols: &'a SymbolTable,
    config: &'a Config,
}

impl<'a> Context<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(symbols: &'a SymbolTable, config: &'a Config) -> Self {
        Self { symbols, config }
    }

    /// The project's symbol table.
    #[must_use]
    pub fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.config
    }
}

/// A lint rule evaluated against one Interface Builder document.
///
/// Rules are built once per run and must be pure: the same document and
/// context always produce the same violations in the same order. Any
/// accumulation happens in locals of [`Rule::check`], never in `self`.
///
/// Storyboards and xibs share one entry point; a rule that only applies to
/// one of them inspects [`Document::kind`].
///
/// # Example
///
/// ```ignore
/// use ib_lint_core::{Context, Document, Location, Rule, Severity, Violation};
///
/// pub struct NoPlainViews;
///
/// impl Rule for NoPlainViews {
///     fn name(&self) -> &'static str { "no-plain-views" }
///     fn code(&self) -> &'static str { "IB100" }
///
///     fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
///         doc.elements()
///             .filter(|e| e.kind == "UIView" && e.custom_class.is_none())
///             .map(|e| Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 Location::file(&doc.path),
///                 format!("plain UIView (id={})", e.id),
///             ))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "use-base-class").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "IB001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Checks a single document and returns any violations found, in
    /// document traversal order.
    fn check(&self, ctx: &Context<'_>, doc: &Document) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentKind, UiElement};
    use crate::types::Location;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }

        fn check(&self, ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
            doc.elements()
                .filter(|e| {
                    e.custom_class
                        .as_deref()
                        .is_some_and(|c| !ctx.symbols().contains(c))
                })
                .map(|e| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        Location::file(&doc.path),
                        format!("unknown class (id={})", e.id),
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Warning);
    }

    #[test]
    fn test_rule_reads_context() {
        let symbols = SymbolTable::new();
        let config = Config::default();
        let ctx = Context::new(&symbols, &config);
        let doc = Document::new(
            "View.xib",
            DocumentKind::Xib,
            vec![UiElement::new("UIView", "v1").with_custom_class("Missing")],
        );

        let violations = TestRule.check(&ctx, &doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "unknown class (id=v1)");
    }
}
