//! Rule requiring declared custom classes to exist in the Swift sources.
//!
//! # Configuration
//!
//! - `ignore`: class names that are provided elsewhere (frameworks, Objective-C)
//! - `ignored_modules`: skip elements whose `customModule` is listed
//!
//! The rule is silent when no Swift source was indexed. The First Responder
//! placeholder is never checked.

use crate::element_location;
use ib_lint_core::{Config, ConfigError, Context, Document, Rule, Violation};
use indexmap::IndexSet;

/// Rule code for custom-class-exists.
pub const CODE: &str = "IB002";

/// Rule name for custom-class-exists.
pub const NAME: &str = "custom-class-exists";

/// Requires every custom class to be declared in an indexed Swift source.
#[derive(Debug, Clone, Default)]
pub struct CustomClassExists {
    /// Classes that are never reported.
    pub ignore: IndexSet<String>,
    /// Modules whose classes are never reported.
    pub ignored_modules: IndexSet<String>,
}

impl CustomClassExists {
    /// Creates a rule with nothing ignored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the rule from the `ignore` and `ignored_modules` options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if an option is not a string array.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            ignore: config.rule_option(NAME, "ignore")?.unwrap_or_default(),
            ignored_modules: config
                .rule_option(NAME, "ignored_modules")?
                .unwrap_or_default(),
        })
    }

    /// Never reports `class`.
    #[must_use]
    pub fn ignore_class(mut self, class: impl Into<String>) -> Self {
        self.ignore.insert(class.into());
        self
    }

    /// Never reports classes from `module`.
    #[must_use]
    pub fn ignore_module(mut self, module: impl Into<String>) -> Self {
        self.ignored_modules.insert(module.into());
        self
    }
}

impl Rule for CustomClassExists {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires custom classes to be declared in the project's Swift sources"
    }

    fn check(&self, ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        let symbols = ctx.symbols();
        if symbols.is_empty() {
            return Vec::new();
        }

        doc.elements()
            .filter(|e| !e.is_first_responder())
            .filter(|e| {
                e.custom_module
                    .as_ref()
                    .map_or(true, |m| !self.ignored_modules.contains(m))
            })
            .filter_map(|e| {
                let class = e.custom_class.as_deref()?;
                if symbols.contains(class) || self.ignore.contains(class) {
                    return None;
                }
                Some(Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    element_location(doc, e),
                    format!(
                        "custom class '{class}' is not declared in any Swift source (id={})",
                        e.id
                    ),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ib_lint_core::{
        ClassSymbol, DocumentDecoder, DocumentKind, Position, SymbolTable, UiElement,
    };
    use std::path::PathBuf;

    fn table(names: &[&str]) -> SymbolTable {
        names
            .iter()
            .map(|name| ClassSymbol {
                name: (*name).to_string(),
                file: PathBuf::from(format!("{name}.swift")),
                inherited_types: Vec::new(),
                connections: Vec::new(),
                position: Position::new(1, 6),
            })
            .collect()
    }

    fn doc() -> Document {
        Document::new(
            "Main.storyboard",
            DocumentKind::Storyboard,
            vec![UiElement::new("UIView", "root")
                .with_custom_class("Known")
                .with_child(UiElement::new("UIButton", "b1").with_custom_class("Ghost"))
                .with_child(
                    UiElement::new("MKMapView", "map")
                        .with_custom_class("VendorMap")
                        .with_custom_module("Vendor"),
                )
                .with_child(UiElement::new("UILabel", "plain"))],
        )
    }

    fn check(rule: &CustomClassExists, symbols: &SymbolTable) -> Vec<Violation> {
        let config = Config::default();
        rule.check(&Context::new(symbols, &config), &doc())
    }

    #[test]
    fn reports_unknown_classes() {
        let violations = check(&CustomClassExists::new(), &table(&["Known"]));
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "custom class 'Ghost' is not declared in any Swift source (id=b1)",
                "custom class 'VendorMap' is not declared in any Swift source (id=map)",
            ]
        );
    }

    #[test]
    fn honours_ignore_lists() {
        let rule = CustomClassExists::new()
            .ignore_class("Ghost")
            .ignore_module("Vendor");
        assert!(check(&rule, &table(&["Known"])).is_empty());
    }

    #[test]
    fn silent_without_indexed_sources() {
        assert!(check(&CustomClassExists::new(), &SymbolTable::new()).is_empty());
    }

    #[test]
    fn xcode_first_responder_placeholder_is_not_reported() {
        let xib = r#"<?xml version="1.0" encoding="UTF-8"?>
<document type="com.apple.InterfaceBuilder3.CocoaTouch.XIB" version="3.0">
    <objects>
        <placeholder placeholderIdentifier="IBFilesOwner" id="-1" userLabel="File's Owner" customClass="LoginViewController"/>
        <placeholder placeholderIdentifier="IBFirstResponder" id="-2" customClass="UIResponder"/>
        <view contentMode="scaleToFill" id="root" customClass="GhostView"/>
    </objects>
</document>
"#;
        let doc = ib_lint_decode::InterfaceBuilderDecoder::new()
            .decode(std::path::Path::new("Login.xib"), xib)
            .unwrap();
        let symbols = table(&["LoginViewController"]);
        let config = Config::default();

        let violations = CustomClassExists::new().check(&Context::new(&symbols, &config), &doc);
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            ["custom class 'GhostView' is not declared in any Swift source (id=root)"]
        );
    }

    #[test]
    fn from_config_reads_options() {
        let config = Config::parse(
            "[rules.custom-class-exists]\nignore = [\"Ghost\"]\nignored_modules = [\"Vendor\"]\n",
        )
        .unwrap();
        let rule = CustomClassExists::from_config(&config).unwrap();
        assert!(rule.ignore.contains("Ghost"));
        assert!(rule.ignored_modules.contains("Vendor"));
    }
}
