//! Rule cross-checking document connections against Swift declarations.
//!
//! An `<outlet property="x">` on an element whose custom class is indexed
//! must name an `@IBOutlet` of that class. An `<action selector="y:">`
//! must name an `@IBAction` of the destination element's class.
//!
//! Declarations are looked up through the indexed superclass chain. Outlets
//! UIKit itself declares (`view` on a view controller, `delegate` on a
//! scroll view, ...) are accepted. Classes that are not indexed, and classes
//! deriving from a class that is neither indexed nor a known UIKit class,
//! are not checked.

use crate::element_location;
use crate::framework::inherited_outlets;
use ib_lint_core::{
    ClassSymbol, Context, Document, Label, Lineage, Location, Rule, Severity, Suggestion,
    SymbolTable, UiConnection, UiElement, Violation,
};
use std::collections::HashMap;
use tracing::debug;

/// Rule code for connection-mismatch.
pub const CODE: &str = "IB003";

/// Rule name for connection-mismatch.
pub const NAME: &str = "connection-mismatch";

/// Requires outlets and actions to match the declarations of their class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionMismatch;

impl ConnectionMismatch {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn violation(
        doc: &Document,
        element: &UiElement,
        class: &ClassSymbol,
        message: String,
        help: String,
    ) -> Violation {
        Violation::new(
            CODE,
            NAME,
            Severity::Error,
            element_location(doc, element),
            message,
        )
        .with_label(Label::new(
            Location::from_position(&class.file, &class.position),
            format!("class {} declared here", class.name),
        ))
        .with_suggestion(Suggestion::new(help))
    }
}

/// Indexed class of `element`, if any.
fn class_of<'a>(symbols: &'a SymbolTable, element: &UiElement) -> Option<&'a ClassSymbol> {
    element
        .custom_class
        .as_deref()
        .and_then(|class| symbols.get(class))
}

/// Outlets of the UIKit class a lineage ends in, or `None` when it ends in
/// a class that is neither indexed nor known. Without an unindexed ancestor
/// the element kind stands in for it.
fn framework_outlets(lineage: &Lineage<'_>, element: &UiElement) -> Option<&'static [&'static str]> {
    let base = lineage.base.unwrap_or(element.kind.as_str());
    let outlets = inherited_outlets(base);
    if outlets.is_none() {
        debug!("Skipping id={}: base class {base} is unknown", element.id);
    }
    outlets
}

impl Rule for ConnectionMismatch {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires outlets and actions to be declared in the connected class"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        let symbols = ctx.symbols();
        let by_id: HashMap<&str, &UiElement> =
            doc.elements().map(|e| (e.id.as_str(), e)).collect();

        let mut violations = Vec::new();
        for element in doc.elements() {
            for connection in &element.connections {
                match connection {
                    UiConnection::Outlet { property, .. } => {
                        let Some(class) = class_of(symbols, element) else {
                            continue;
                        };
                        let lineage = symbols.lineage(&class.name);
                        if lineage.outlet(property).is_some() {
                            continue;
                        }
                        let Some(inherited) = framework_outlets(&lineage, element) else {
                            continue;
                        };
                        if !inherited.contains(&property.as_str()) {
                            violations.push(Self::violation(
                                doc,
                                element,
                                class,
                                format!(
                                    "outlet '{property}' is not declared in class '{}' (id={})",
                                    class.name, element.id
                                ),
                                format!("declare `@IBOutlet var {property}` or remove the connection"),
                            ));
                        }
                    }
                    UiConnection::Action {
                        selector,
                        destination,
                        ..
                    } => {
                        let Some((target, class)) =
                            by_id.get(destination.as_str()).and_then(|&target| {
                                class_of(symbols, target).map(|class| (target, class))
                            })
                        else {
                            continue;
                        };
                        let lineage = symbols.lineage(&class.name);
                        if lineage.action(selector).is_some() {
                            continue;
                        }
                        if framework_outlets(&lineage, target).is_some() {
                            violations.push(Self::violation(
                                doc,
                                element,
                                class,
                                format!(
                                    "action '{selector}' is not declared in class '{}' (id={})",
                                    class.name, element.id
                                ),
                                format!("declare an `@IBAction` with selector {selector} or remove the connection"),
                            ));
                        }
                    }
                }
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ib_lint_core::symbols::extract_classes;
    use ib_lint_core::{Config, Connection, DocumentDecoder, DocumentKind, Position};
    use ib_lint_decode::{InterfaceBuilderDecoder, SourceKittenDecoder};
    use std::path::{Path, PathBuf};

    fn login_class() -> ClassSymbol {
        let file = PathBuf::from("App/LoginViewController.swift");
        ClassSymbol {
            name: "LoginViewController".to_string(),
            inherited_types: vec!["UIViewController".to_string()],
            connections: vec![
                Connection::Outlet {
                    property_name: "titleLabel".to_string(),
                    is_optional: false,
                    position: Position::new(4, 18).with_file(&file),
                },
                Connection::Action {
                    selector_name: "login:".to_string(),
                    position: Position::new(6, 19).with_file(&file),
                },
            ],
            position: Position::new(3, 6).with_file(&file),
            file,
        }
    }

    fn doc(outlet: &str, selector: &str) -> Document {
        let vc = UiElement::new("UIViewController", "vc")
            .with_custom_class("LoginViewController")
            .with_connection(UiConnection::Outlet {
                property: outlet.to_string(),
                destination: "label".to_string(),
            })
            .with_child(
                UiElement::new("UIView", "root")
                    .with_child(UiElement::new("UILabel", "label"))
                    .with_child(UiElement::new("UIButton", "button").with_connection(
                        UiConnection::Action {
                            selector: selector.to_string(),
                            destination: "vc".to_string(),
                            event_type: Some("touchUpInside".to_string()),
                        },
                    )),
            );
        Document::new("Login.storyboard", DocumentKind::Storyboard, vec![vc])
    }

    fn check(doc: &Document) -> Vec<Violation> {
        let symbols: SymbolTable = [login_class()].into_iter().collect();
        let config = Config::default();
        ConnectionMismatch.check(&Context::new(&symbols, &config), doc)
    }

    #[test]
    fn matching_connections_pass() {
        assert!(check(&doc("titleLabel", "login:")).is_empty());
    }

    #[test]
    fn reports_unknown_outlet_with_label() {
        let violations = check(&doc("subtitleLabel", "login:"));
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.severity, Severity::Error);
        assert_eq!(
            v.message,
            "outlet 'subtitleLabel' is not declared in class 'LoginViewController' (id=vc)"
        );
        assert_eq!(
            v.labels[0].location.to_string(),
            "App/LoginViewController.swift:3:7"
        );
    }

    #[test]
    fn reports_unknown_action_on_the_sending_element() {
        let violations = check(&doc("titleLabel", "logout:"));
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "action 'logout:' is not declared in class 'LoginViewController' (id=button)"
        );
    }

    #[test]
    fn files_owner_view_outlet_is_inherited_from_uikit() {
        let swift = "class LoginViewController: UIViewController {\n    @IBOutlet var titleLabel: UILabel!\n}\n";
        let structure = format!(
            r#"{{"key.substructure": [{{
                "key.kind": "source.lang.swift.decl.class",
                "key.name": "LoginViewController",
                "key.nameoffset": {},
                "key.inheritedtypes": [{{ "key.name": "UIViewController" }}],
                "key.substructure": [{{
                    "key.kind": "source.lang.swift.decl.var.instance",
                    "key.name": "titleLabel",
                    "key.nameoffset": {},
                    "key.typename": "UILabel!",
                    "key.attributes": [{{ "key.attribute": "source.decl.attribute.iboutlet" }}]
                }}]
            }}]}}"#,
            swift.find("LoginViewController").unwrap(),
            swift.find("titleLabel").unwrap(),
        );
        let path = Path::new("Login.swift");
        let records = SourceKittenDecoder::parse(path, &structure).unwrap();
        let symbols: SymbolTable = extract_classes(path, swift, &records).into_iter().collect();

        let xib = r#"<?xml version="1.0" encoding="UTF-8"?>
<document type="com.apple.InterfaceBuilder3.CocoaTouch.XIB" version="3.0">
    <objects>
        <placeholder placeholderIdentifier="IBFilesOwner" id="-1" userLabel="File's Owner" customClass="LoginViewController">
            <connections>
                <outlet property="titleLabel" destination="lbl" id="o-1"/>
                <outlet property="view" destination="root" id="o-2"/>
                <outlet property="missingLabel" destination="lbl" id="o-3"/>
            </connections>
        </placeholder>
        <placeholder placeholderIdentifier="IBFirstResponder" id="-2" customClass="UIResponder"/>
        <view contentMode="scaleToFill" id="root">
            <subviews>
                <label text="Title" id="lbl"/>
            </subviews>
        </view>
    </objects>
</document>
"#;
        let doc = InterfaceBuilderDecoder::new()
            .decode(Path::new("Login.xib"), xib)
            .unwrap();
        let config = Config::default();

        let violations = ConnectionMismatch.check(&Context::new(&symbols, &config), &doc);
        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            ["outlet 'missingLabel' is not declared in class 'LoginViewController' (id=-1)"]
        );
    }

    fn subclass(name: &str, parent: &str, connections: Vec<Connection>) -> ClassSymbol {
        let file = PathBuf::from(format!("App/{name}.swift"));
        ClassSymbol {
            name: name.to_string(),
            inherited_types: vec![parent.to_string()],
            connections,
            position: Position::new(1, 6).with_file(&file),
            file,
        }
    }

    #[test]
    fn declarations_of_indexed_superclasses_count() {
        let base = subclass(
            "BaseViewController",
            "UIViewController",
            vec![
                Connection::Outlet {
                    property_name: "titleLabel".to_string(),
                    is_optional: false,
                    position: Position::new(2, 4),
                },
                Connection::Action {
                    selector_name: "login:".to_string(),
                    position: Position::new(3, 9),
                },
            ],
        );
        let login = subclass("LoginViewController", "BaseViewController", Vec::new());
        let symbols: SymbolTable = [base, login].into_iter().collect();
        let config = Config::default();

        let ctx = Context::new(&symbols, &config);
        assert!(ConnectionMismatch.check(&ctx, &doc("titleLabel", "login:")).is_empty());
        assert_eq!(ConnectionMismatch.check(&ctx, &doc("missing", "login:")).len(), 1);
    }

    #[test]
    fn classes_deriving_from_unknown_bases_are_not_checked() {
        let login = subclass("LoginViewController", "VendorViewController", Vec::new());
        let symbols: SymbolTable = [login].into_iter().collect();
        let config = Config::default();

        let violations =
            ConnectionMismatch.check(&Context::new(&symbols, &config), &doc("nope", "nope:"));
        assert!(violations.is_empty());
    }

    #[test]
    fn unindexed_classes_are_not_checked() {
        let symbols = SymbolTable::new();
        let config = Config::default();
        let violations =
            ConnectionMismatch.check(&Context::new(&symbols, &config), &doc("nope", "nope:"));
        assert!(violations.is_empty());
    }
}
