//! Rules keeping string identifiers in step with class names.
//!
//! Code usually instantiates view controllers and dequeues cells with
//! `String(describing: Type.self)`, which only works when the storyboard
//! identifier or reuse identifier equals the class name.

use crate::element_location;
use ib_lint_core::{Context, Document, DocumentKind, Rule, UiElement, Violation};

/// Rule code for storyboard-viewcontroller-id.
pub const VIEW_CONTROLLER_ID_CODE: &str = "IB008";

/// Rule name for storyboard-viewcontroller-id.
pub const VIEW_CONTROLLER_ID_NAME: &str = "storyboard-viewcontroller-id";

/// Rule code for reuse-identifier.
pub const REUSE_IDENTIFIER_CODE: &str = "IB009";

/// Rule name for reuse-identifier.
pub const REUSE_IDENTIFIER_NAME: &str = "reuse-identifier";

const REUSABLE_KINDS: &[&str] = &[
    "UITableViewCell",
    "UICollectionViewCell",
    "UICollectionReusableView",
    "UITableViewHeaderFooterView",
];

/// Reports elements whose `attribute` is set to something other than their
/// custom class. Elements missing either value are skipped.
fn mismatched(
    rule: &dyn Rule,
    doc: &Document,
    attribute: &str,
    applies: impl Fn(&UiElement) -> bool,
) -> Vec<Violation> {
    doc.elements()
        .filter(|&e| applies(e))
        .filter_map(|e| {
            let class = e.custom_class.as_deref()?;
            let value = e.attribute(attribute)?;
            (value != class).then(|| {
                Violation::new(
                    rule.code(),
                    rule.name(),
                    rule.default_severity(),
                    element_location(doc, e),
                    format!("{attribute} '{value}' should be '{class}' (id={})", e.id),
                )
            })
        })
        .collect()
}

/// Requires a view controller's storyboard identifier to equal its class.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoryboardViewControllerId;

impl StoryboardViewControllerId {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for StoryboardViewControllerId {
    fn name(&self) -> &'static str {
        VIEW_CONTROLLER_ID_NAME
    }

    fn code(&self) -> &'static str {
        VIEW_CONTROLLER_ID_CODE
    }

    fn description(&self) -> &'static str {
        "Requires storyboard identifiers to match the view controller class"
    }

    fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        if doc.kind != DocumentKind::Storyboard {
            return Vec::new();
        }
        mismatched(self, doc, "storyboardIdentifier", |e| {
            e.kind.ends_with("Controller")
        })
    }
}

/// Requires a reusable cell's reuse identifier to equal its class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReuseIdentifier;

impl ReuseIdentifier {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ReuseIdentifier {
    fn name(&self) -> &'static str {
        REUSE_IDENTIFIER_NAME
    }

    fn code(&self) -> &'static str {
        REUSE_IDENTIFIER_CODE
    }

    fn description(&self) -> &'static str {
        "Requires reuse identifiers to match the cell class"
    }

    fn check(&self, _ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        mismatched(self, doc, "reuseIdentifier", |e| {
            REUSABLE_KINDS.contains(&e.kind.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ib_lint_core::{Config, SymbolTable};

    fn run(rule: &dyn Rule, doc: &Document) -> Vec<String> {
        let symbols = SymbolTable::new();
        let config = Config::default();
        rule.check(&Context::new(&symbols, &config), doc)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    fn controllers(kind: DocumentKind) -> Document {
        Document::new(
            "Main.storyboard",
            kind,
            vec![
                UiElement::new("UIViewController", "good")
                    .with_custom_class("LoginViewController")
                    .with_attribute("storyboardIdentifier", "LoginViewController"),
                UiElement::new("UITableViewController", "bad")
                    .with_custom_class("ListViewController")
                    .with_attribute("storyboardIdentifier", "List"),
                UiElement::new("UIViewController", "unset").with_custom_class("Other"),
            ],
        )
    }

    #[test]
    fn storyboard_identifier_must_match_class() {
        assert_eq!(
            run(&StoryboardViewControllerId, &controllers(DocumentKind::Storyboard)),
            ["storyboardIdentifier 'List' should be 'ListViewController' (id=bad)"]
        );
    }

    #[test]
    fn storyboard_identifier_rule_ignores_xibs() {
        assert!(run(&StoryboardViewControllerId, &controllers(DocumentKind::Xib)).is_empty());
    }

    #[test]
    fn reuse_identifier_must_match_class() {
        let doc = Document::new(
            "Cells.xib",
            DocumentKind::Xib,
            vec![
                UiElement::new("UITableViewCell", "c1")
                    .with_custom_class("ItemCell")
                    .with_attribute("reuseIdentifier", "Cell"),
                UiElement::new("UICollectionViewCell", "c2")
                    .with_custom_class("PhotoCell")
                    .with_attribute("reuseIdentifier", "PhotoCell"),
                UiElement::new("UIView", "v")
                    .with_custom_class("Banner")
                    .with_attribute("reuseIdentifier", "x"),
            ],
        );
        assert_eq!(
            run(&ReuseIdentifier, &doc),
            ["reuseIdentifier 'Cell' should be 'ItemCell' (id=c1)"]
        );
    }
}
