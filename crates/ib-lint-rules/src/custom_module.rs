//! Rule requiring `customModule` to match where the class is declared.
//!
//! # Configuration
//!
//! ```toml
//! [[rules.custom-module.modules]]
//! module = "Checkout"
//! paths = ["Modules/Checkout"]
//! ```
//!
//! A class whose Swift file lies under one of `paths` must be referenced
//! with `customModule="Checkout"`. `customModuleProvider="target"` is
//! accepted for any module.

use crate::element_location;
use ib_lint_core::{Config, ConfigError, Context, Document, Rule, Severity, Violation};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Rule code for custom-module.
pub const CODE: &str = "IB004";

/// Rule name for custom-module.
pub const NAME: &str = "custom-module";

/// Value of `customModuleProvider` that inherits the module from the target.
const TARGET_PROVIDER: &str = "target";

/// Source directories that belong to one module.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleMapping {
    /// Module name.
    pub module: String,
    /// Directories, relative to the analyzed root.
    pub paths: Vec<PathBuf>,
}

/// Requires custom classes to carry the module their source belongs to.
#[derive(Debug, Clone, Default)]
pub struct CustomModule {
    /// Configured module mappings, first match wins.
    pub modules: Vec<ModuleMapping>,
}

impl CustomModule {
    /// Creates a rule with no mappings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the rule from the `modules` option.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if `modules` is malformed.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            modules: config.rule_option(NAME, "modules")?.unwrap_or_default(),
        })
    }

    /// Adds a module mapping.
    #[must_use]
    pub fn module<I, P>(mut self, module: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.modules.push(ModuleMapping {
            module: module.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        });
        self
    }

    fn module_for(&self, file: &Path) -> Option<&str> {
        self.modules
            .iter()
            .find(|m| m.paths.iter().any(|p| file.starts_with(p)))
            .map(|m| m.module.as_str())
    }
}

impl Rule for CustomModule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires customModule to match the module declaring the class"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        if self.modules.is_empty() {
            return Vec::new();
        }

        doc.elements()
            .filter(|e| e.attribute("customModuleProvider") != Some(TARGET_PROVIDER))
            .filter_map(|e| {
                let class = ctx.symbols().get(e.custom_class.as_deref()?)?;
                let expected = self.module_for(&class.file)?;
                let actual = e.custom_module.as_deref();
                if actual == Some(expected) {
                    return None;
                }
                let found = actual.map_or_else(|| "not set".to_string(), |m| format!("'{m}'"));
                Some(Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    element_location(doc, e),
                    format!(
                        "custom module of '{}' should be '{expected}' but is {found} (id={})",
                        class.name, e.id
                    ),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ib_lint_core::{ClassSymbol, DocumentKind, Position, SymbolTable, UiElement};

    fn symbols() -> SymbolTable {
        [("CartView", "Modules/Checkout/CartView.swift"), ("AppView", "App/AppView.swift")]
            .into_iter()
            .map(|(name, file)| ClassSymbol {
                name: name.to_string(),
                file: PathBuf::from(file),
                inherited_types: vec!["UIView".to_string()],
                connections: Vec::new(),
                position: Position::new(1, 6),
            })
            .collect()
    }

    fn rule() -> CustomModule {
        CustomModule::new().module("Checkout", ["Modules/Checkout"])
    }

    fn check(elements: Vec<UiElement>) -> Vec<String> {
        let symbols = symbols();
        let config = Config::default();
        let doc = Document::new("Cart.xib", DocumentKind::Xib, elements);
        rule()
            .check(&Context::new(&symbols, &config), &doc)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn matching_module_passes() {
        let element = UiElement::new("UIView", "v")
            .with_custom_class("CartView")
            .with_custom_module("Checkout");
        assert!(check(vec![element]).is_empty());
    }

    #[test]
    fn wrong_or_missing_module_is_reported() {
        let wrong = UiElement::new("UIView", "wrong")
            .with_custom_class("CartView")
            .with_custom_module("App");
        let missing = UiElement::new("UIView", "missing").with_custom_class("CartView");
        assert_eq!(
            check(vec![wrong, missing]),
            [
                "custom module of 'CartView' should be 'Checkout' but is 'App' (id=wrong)",
                "custom module of 'CartView' should be 'Checkout' but is not set (id=missing)",
            ]
        );
    }

    #[test]
    fn target_provider_and_unmapped_classes_pass() {
        let inherited = UiElement::new("UIView", "t")
            .with_custom_class("CartView")
            .with_attribute("customModuleProvider", "target");
        let unmapped = UiElement::new("UIView", "a").with_custom_class("AppView");
        assert!(check(vec![inherited, unmapped]).is_empty());
    }

    #[test]
    fn from_config_reads_module_tables() {
        let config = Config::parse(
            "[[rules.custom-module.modules]]\nmodule = \"Checkout\"\npaths = [\"Modules/Checkout\"]\n",
        )
        .unwrap();
        let rule = CustomModule::from_config(&config).unwrap();
        assert_eq!(rule.modules, CustomModule::new().module("Checkout", ["Modules/Checkout"]).modules);
    }
}
