//! Storyboard and xib decoding.
//!
//! Interface Builder files are XML. Every XML element that carries an `id`
//! becomes a [`UiElement`]; id-less wrappers such as `<subviews>`,
//! `<objects>` or `<scenes>` are transparent and their children attach to
//! the nearest enclosing element.

use ib_lint_core::{
    DecodeError, Document, DocumentDecoder, DocumentKind, LineIndex, UiConnection, UiElement,
};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Root tag of every Interface Builder file.
const DOCUMENT_TAG: &str = "document";

/// Tags that carry an `id` but are not part of the UI tree.
const NON_ELEMENT_TAGS: &[&str] = &["device"];

/// Decodes `.storyboard` and `.xib` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceBuilderDecoder;

impl InterfaceBuilderDecoder {
    /// Creates a decoder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentDecoder for InterfaceBuilderDecoder {
    fn decode(&self, path: &Path, text: &str) -> Result<Document, DecodeError> {
        let kind = DocumentKind::from_path(path)
            .ok_or_else(|| DecodeError::new(path, "not a .storyboard or .xib file"))?;

        let mut reader = Reader::from_reader(text.as_bytes());
        reader.config_mut().trim_text(true);

        let mut tree = TreeBuilder::new(path, text);
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                DecodeError::new(
                    path,
                    format!("XML parse error at position {}: {e}", reader.error_position()),
                )
            })?;
            let end = usize::try_from(reader.buffer_position()).unwrap_or(text.len());

            match event {
                Event::Start(ref e) => tree.start(e, end)?,
                Event::Empty(ref e) => {
                    tree.start(e, end)?;
                    tree.end()?;
                }
                Event::End(_) => tree.end()?,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let roots = tree.finish()?;
        debug!("Decoded {} with {} root elements", path.display(), roots.len());
        Ok(Document::new(path, kind, roots))
    }
}

enum Frame {
    Element(UiElement),
    Connections,
    Transparent,
}

struct TreeBuilder<'a> {
    path: &'a Path,
    text: &'a str,
    index: LineIndex<'a>,
    stack: Vec<Frame>,
    roots: Vec<UiElement>,
    seen_document: bool,
}

impl<'a> TreeBuilder<'a> {
    fn new(path: &'a Path, text: &'a str) -> Self {
        Self {
            path,
            text,
            index: LineIndex::new(text).with_file(path),
            stack: Vec::new(),
            roots: Vec::new(),
            seen_document: false,
        }
    }

    fn error(&self, message: impl Into<String>) -> DecodeError {
        DecodeError::new(self.path, message)
    }

    /// Handles an opening tag. `end` is the byte offset just past it.
    fn start(&mut self, e: &BytesStart<'_>, end: usize) -> Result<(), DecodeError> {
        let tag = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| self.error(format!("invalid tag name: {err}")))?
            .to_string();

        if !self.seen_document {
            if tag != DOCUMENT_TAG {
                return Err(self.error(format!(
                    "not an Interface Builder document (root element <{tag}>)"
                )));
            }
            self.seen_document = true;
            self.stack.push(Frame::Transparent);
            return Ok(());
        }

        let mut attributes = self.read_attributes(e)?;

        if matches!(self.stack.last(), Some(Frame::Connections)) {
            match connection(&tag, &mut attributes) {
                Some(conn) => {
                    if let Some(owner) = self.owner_mut() {
                        owner.connections.push(conn);
                    }
                }
                None => debug!("Ignoring <{tag}> connection in {}", self.path.display()),
            }
            self.stack.push(Frame::Transparent);
            return Ok(());
        }

        if tag == "connections" {
            self.stack.push(Frame::Connections);
            return Ok(());
        }

        let id = if NON_ELEMENT_TAGS.contains(&tag.as_str()) {
            None
        } else {
            attributes.remove("id")
        };
        let Some(id) = id else {
            self.stack.push(Frame::Transparent);
            return Ok(());
        };

        let start = self.text[..end.min(self.text.len())]
            .rfind('<')
            .unwrap_or_default();
        let position = self
            .index
            .resolve(start)
            .map_err(|err| self.error(err.to_string()))?;

        let mut element = UiElement::new(element_kind(&tag), id).with_position(position);
        element.custom_class = attributes.remove("customClass");
        element.custom_module = attributes.remove("customModule");
        element.attributes = attributes;

        self.stack.push(Frame::Element(element));
        Ok(())
    }

    fn end(&mut self) -> Result<(), DecodeError> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| self.error("unbalanced closing tag"))?;

        if let Frame::Element(element) = frame {
            match self.owner_mut() {
                Some(parent) => parent.children.push(element),
                None => self.roots.push(element),
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<UiElement>, DecodeError> {
        if !self.seen_document {
            return Err(self.error("empty document"));
        }
        if !self.stack.is_empty() {
            return Err(self.error("unexpected end of document"));
        }
        Ok(self.roots)
    }

    /// Nearest enclosing element.
    fn owner_mut(&mut self) -> Option<&mut UiElement> {
        self.stack.iter_mut().rev().find_map(|frame| match frame {
            Frame::Element(element) => Some(element),
            _ => None,
        })
    }

    fn read_attributes(&self, e: &BytesStart<'_>) -> Result<BTreeMap<String, String>, DecodeError> {
        let mut attributes = BTreeMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error(format!("attribute error: {err}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| self.error(format!("attribute key error: {err}")))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| self.error(format!("attribute value error: {err}")))?
                .into_owned();
            attributes.insert(key, value);
        }
        Ok(attributes)
    }
}

/// Converts a child of `<connections>`. Segues and malformed entries yield
/// `None`.
fn connection(tag: &str, attributes: &mut BTreeMap<String, String>) -> Option<UiConnection> {
    match tag {
        "outlet" | "outletCollection" => Some(UiConnection::Outlet {
            property: attributes.remove("property")?,
            destination: attributes.remove("destination")?,
        }),
        "action" => Some(UiConnection::Action {
            selector: attributes.remove("selector")?,
            destination: attributes.remove("destination")?,
            event_type: attributes.remove("eventType"),
        }),
        _ => None,
    }
}

/// Maps an Interface Builder tag to its UIKit class name. Unknown tags are
/// kept as they are.
#[must_use]
pub fn element_kind(tag: &str) -> String {
    let class = match tag {
        "view" => "UIView",
        "button" => "UIButton",
        "label" => "UILabel",
        "imageView" => "UIImageView",
        "textField" => "UITextField",
        "textView" => "UITextView",
        "scrollView" => "UIScrollView",
        "stackView" => "UIStackView",
        "tableView" => "UITableView",
        "tableViewCell" => "UITableViewCell",
        "tableViewCellContentView" => "UITableViewCellContentView",
        "collectionView" => "UICollectionView",
        "collectionViewCell" => "UICollectionViewCell",
        "collectionReusableView" => "UICollectionReusableView",
        "switch" => "UISwitch",
        "slider" => "UISlider",
        "stepper" => "UIStepper",
        "segmentedControl" => "UISegmentedControl",
        "pageControl" => "UIPageControl",
        "progressView" => "UIProgressView",
        "activityIndicatorView" => "UIActivityIndicatorView",
        "datePicker" => "UIDatePicker",
        "pickerView" => "UIPickerView",
        "searchBar" => "UISearchBar",
        "navigationBar" => "UINavigationBar",
        "navigationItem" => "UINavigationItem",
        "toolbar" => "UIToolbar",
        "tabBar" => "UITabBar",
        "tabBarItem" => "UITabBarItem",
        "barButtonItem" => "UIBarButtonItem",
        "visualEffectView" => "UIVisualEffectView",
        "wkWebView" => "WKWebView",
        "mapView" => "MKMapView",
        "viewController" => "UIViewController",
        "tableViewController" => "UITableViewController",
        "collectionViewController" => "UICollectionViewController",
        "navigationController" => "UINavigationController",
        "tabBarController" => "UITabBarController",
        "pageViewController" => "UIPageViewController",
        "splitViewController" => "UISplitViewController",
        "tapGestureRecognizer" => "UITapGestureRecognizer",
        "panGestureRecognizer" => "UIPanGestureRecognizer",
        "swipeGestureRecognizer" => "UISwipeGestureRecognizer",
        "longPressGestureRecognizer" => "UILongPressGestureRecognizer",
        other => other,
    };
    class.to_string()
}
