//! Decoded source structure as delivered by a [`SourceDecoder`].

use miette::Diagnostic;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level declaration record produced by a source decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclarationRecord {
    /// Declaration kind (e.g. `class`, `extension`, `struct`).
    pub kind: String,
    /// Declared name.
    pub name: String,
    /// Byte offset of the name within the file.
    pub name_offset: usize,
    /// Inherited types in declaration order. For a class with a superclass
    /// the superclass comes first.
    pub inherited_types: Vec<String>,
    /// Immediate members of the declaration.
    pub members: Vec<MemberRecord>,
}

/// A member of a [`DeclarationRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberRecord {
    /// Member name (`label`, `tap(_:)`).
    pub name: String,
    /// Raw attribute tags attached to the member.
    pub attributes: Vec<String>,
    /// Declared type annotation, if any.
    pub type_name: Option<String>,
    /// Objective-C selector for methods.
    pub selector_name: Option<String>,
    /// Byte offset of the member name within the file.
    pub name_offset: Option<usize>,
}

impl MemberRecord {
    /// The recognized attributes of this member.
    #[must_use]
    pub fn recognized_attributes(&self) -> HashSet<MemberAttribute> {
        self.attributes
            .iter()
            .filter_map(|tag| MemberAttribute::from_tag(tag))
            .collect()
    }
}

/// Declaration kinds the symbol table keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `class Foo`
    Class,
    /// `extension Foo`
    Extension,
}

impl DeclarationKind {
    const SOURCEKIT_PREFIX: &'static str = "source.lang.swift.decl.";

    /// Classifies a decoder kind string.
    ///
    /// Accepts both the short form (`class`) and the SourceKit form
    /// (`source.lang.swift.decl.extension.class`). Every other kind is
    /// not retained.
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        let kind = kind.strip_prefix(Self::SOURCEKIT_PREFIX).unwrap_or(kind);
        match kind {
            "class" => Some(Self::Class),
            "extension" => Some(Self::Extension),
            k if k.starts_with("extension.") => Some(Self::Extension),
            _ => None,
        }
    }
}

/// Closed set of member attribute tags the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberAttribute {
    /// `@IBOutlet`
    Outlet,
    /// `@IBAction`
    Action,
    /// `@IBInspectable`
    Inspectable,
    /// `@IBSegueAction`
    SegueAction,
}

impl MemberAttribute {
    const SOURCEKIT_PREFIX: &'static str = "source.decl.attribute.";

    /// Maps a raw tag (`source.decl.attribute.iboutlet`, `IBOutlet`,
    /// `iboutlet`) onto a recognized attribute.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.strip_prefix(Self::SOURCEKIT_PREFIX).unwrap_or(tag);
        let tag = tag.trim_start_matches('@');
        match tag.to_ascii_lowercase().as_str() {
            "iboutlet" => Some(Self::Outlet),
            "ibaction" => Some(Self::Action),
            "ibinspectable" => Some(Self::Inspectable),
            "ibsegueaction" => Some(Self::SegueAction),
            _ => None,
        }
    }
}

/// A source file or UI document could not be decoded.
///
/// Never fatal: the affected file simply contributes no data.
#[derive(Debug, Clone, thiserror::Error, Diagnostic)]
#[error("failed to decode {path}: {message}")]
#[diagnostic(code(ib_lint::decode))]
pub struct DecodeError {
    /// File that failed to decode.
    pub path: PathBuf,
    /// Decoder-specific detail.
    pub message: String,
}

impl DecodeError {
    /// Creates a decode error for `path`.
    #[must_use]
    pub fn new(path: &Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Decodes the structure of one source file.
///
/// Implementations live outside the core; the core only needs the
/// declaration records.
pub trait SourceDecoder: Send + Sync {
    /// Decodes `text` (the contents of `path`) into top-level declarations.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the structure cannot be produced.
    fn decode(&self, path: &Path, text: &str) -> Result<Vec<DeclarationRecord>, DecodeError>;
}
