//! # ib-lint-decode
//!
//! Decoders that feed the ib-lint core:
//!
//! - [`SourceKittenDecoder`] turns Swift files into declaration records using
//!   SourceKitten's `structure` JSON
//! - [`InterfaceBuilderDecoder`] turns storyboards and xibs into UI element
//!   trees

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod sourcekitten;
mod xml;

pub use sourcekitten::{normalize_kind, objc_selector, SourceKittenDecoder, StructureSource};
pub use xml::{element_kind, InterfaceBuilderDecoder};
