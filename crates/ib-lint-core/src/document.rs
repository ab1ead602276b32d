//! Decoded Interface Builder documents.
//!
//! A [`Document`] is a forest of [`UiElement`]s as produced by a
//! [`DocumentDecoder`]. Rules only ever see it by shared reference.

use crate::position::Position;
use crate::symbols::DecodeError;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which kind of Interface Builder file a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `.storyboard`
    Storyboard,
    /// `.xib`
    Xib,
}

impl DocumentKind {
    /// Detects the kind from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("storyboard") => Some(Self::Storyboard),
            Some("xib") => Some(Self::Xib),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storyboard => write!(f, "storyboard"),
            Self::Xib => write!(f, "xib"),
        }
    }
}

/// A connection authored in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiConnection {
    /// `<outlet property="label" destination="..."/>`
    Outlet {
        /// Property on the owning element's class.
        property: String,
        /// Id of the connected element.
        destination: String,
    },
    /// `<action selector="tap:" destination="..." eventType="..."/>`
    Action {
        /// Selector invoked on the destination.
        selector: String,
        /// Id of the element whose class implements the selector.
        destination: String,
        /// Control event, if any.
        event_type: Option<String>,
    },
}

/// One element of the UI tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UiElement {
    /// Element kind (`UIButton`, `UIViewController`, ...).
    pub kind: String,
    /// Document-unique id.
    pub id: String,
    /// Author-declared implementation class.
    pub custom_class: Option<String>,
    /// Module the custom class lives in.
    pub custom_module: Option<String>,
    /// Remaining attributes, ordered by name.
    pub attributes: BTreeMap<String, String>,
    /// Outlets and actions owned by this element.
    pub connections: Vec<UiConnection>,
    /// Child elements in document order.
    pub children: Vec<UiElement>,
    /// Where the element starts in the document.
    pub position: Option<Position>,
}

impl UiElement {
    /// Creates an element with no custom class and no children.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the custom class.
    #[must_use]
    pub fn with_custom_class(mut self, class: impl Into<String>) -> Self {
        self.custom_class = Some(class.into());
        self
    }

    /// Sets the custom module.
    #[must_use]
    pub fn with_custom_module(mut self, module: impl Into<String>) -> Self {
        self.custom_module = Some(module.into());
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Adds a connection.
    #[must_use]
    pub fn with_connection(mut self, connection: UiConnection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Appends a child.
    #[must_use]
    pub fn with_child(mut self, child: UiElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the position.
    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Looks up an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// True if the attribute is set to Interface Builder's `YES`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.attribute(key) == Some("YES")
    }

    /// True for the First Responder placeholder Xcode adds to every xib
    /// and scene. Its `UIResponder` class is never a project class.
    #[must_use]
    pub fn is_first_responder(&self) -> bool {
        self.attribute("placeholderIdentifier") == Some("IBFirstResponder")
    }
}

/// A decoded storyboard or xib.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path used when reporting violations.
    pub path: PathBuf,
    /// Storyboard or xib.
    pub kind: DocumentKind,
    /// Top-level elements (scenes' objects, xib objects) in order.
    pub roots: Vec<UiElement>,
}

impl Document {
    /// Creates a document.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: DocumentKind, roots: Vec<UiElement>) -> Self {
        Self {
            path: path.into(),
            kind,
            roots,
        }
    }

    /// Visits every element depth-first, parent before children, siblings
    /// in document order.
    #[must_use]
    pub fn elements(&self) -> Preorder<'_> {
        Preorder::new(&self.roots)
    }

    /// Finds an element by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&UiElement> {
        self.elements().find(|e| e.id == id)
    }
}

/// Pre-order iterator over a UI forest.
///
/// Uses an explicit stack, so deeply nested documents do not grow the call
/// stack.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<&'a UiElement>,
}

impl<'a> Preorder<'a> {
    /// Starts a walk over `roots`.
    #[must_use]
    pub fn new(roots: &'a [UiElement]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a UiElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Decodes one Interface Builder document.
pub trait DocumentDecoder: Send + Sync {
    /// Decodes `text` (the contents of `path`).
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the document cannot be decoded.
    fn decode(&self, path: &Path, text: &str) -> Result<Document, DecodeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let root = UiElement::new("UIView", "root")
            .with_child(
                UiElement::new("UIStackView", "a")
                    .with_child(UiElement::new("UILabel", "a1"))
                    .with_child(UiElement::new("UIButton", "a2")),
            )
            .with_child(UiElement::new("UILabel", "b"));
        Document::new(
            "Main.storyboard",
            DocumentKind::Storyboard,
            vec![root, UiElement::new("UIView", "second-root")],
        )
    }

    #[test]
    fn preorder_visits_parent_before_children() {
        let doc = sample();
        let ids: Vec<&str> = doc.elements().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["root", "a", "a1", "a2", "b", "second-root"]);
    }

    #[test]
    fn preorder_handles_deep_nesting() {
        let mut element = UiElement::new("UIView", "leaf");
        for depth in 0..2_000 {
            element = UiElement::new("UIView", depth.to_string()).with_child(element);
        }
        let doc = Document::new("Deep.xib", DocumentKind::Xib, vec![element]);
        assert_eq!(doc.elements().count(), 2_001);
        assert_eq!(doc.elements().last().map(|e| e.id.as_str()), Some("leaf"));
    }

    #[test]
    fn find_by_id() {
        let doc = sample();
        assert_eq!(doc.find("a2").map(|e| e.kind.as_str()), Some("UIButton"));
        assert!(doc.find("missing").is_none());
    }

    #[test]
    fn kind_from_extension() {
        assert_eq!(
            DocumentKind::from_path(Path::new("Base.lproj/Main.storyboard")),
            Some(DocumentKind::Storyboard)
        );
        assert_eq!(DocumentKind::from_path(Path::new("Cell.xib")), Some(DocumentKind::Xib));
        assert_eq!(DocumentKind::from_path(Path::new("Cell.swift")), None);
    }

    #[test]
    fn flag_reads_yes() {
        let e = UiElement::new("UIView", "v").with_attribute("misplaced", "YES");
        assert!(e.flag("misplaced"));
        assert!(!e.flag("ambiguous"));
    }
}
