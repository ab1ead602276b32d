//! # ib-lint-core
//!
//! Core framework for linting Interface Builder storyboards and xibs
//! against the Swift sources of the same project.
//!
//! This crate provides the foundational traits and types:
//!
//! - [`LineIndex`] for turning byte offsets into line/column positions
//! - [`SymbolTable`] and [`SymbolTableBuilder`] for indexing Swift classes
//!   with their outlet and action connections
//! - [`Document`] and [`UiElement`] for the decoded UI tree
//! - [`Rule`] trait for per-document rules
//! - [`Analyzer`] for orchestrating lint execution
//! - [`Violation`] for representing lint findings
//!
//! Decoding of Swift sources and Interface Builder XML is done by
//! implementations of [`SourceDecoder`] and [`DocumentDecoder`].
//!
//! ## Example
//!
//! ```ignore
//! use ib_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./App")
//!     .rule(MyRule::new())
//!     .source_decoder(my_source_decoder)
//!     .document_decoder(my_document_decoder)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! for violation in &result.violations {
//!     println!("{}", violation.format());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod document;
mod position;
mod rule;
mod types;

/// Class declarations, connections and the project symbol table.
pub mod symbols;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, DiscoveredFiles};
pub use config::{AnalyzerConfig, Config, ConfigError, DecoderConfig, RuleConfig};
pub use document::{Document, DocumentDecoder, DocumentKind, Preorder, UiConnection, UiElement};
pub use position::{resolve_offset, LineIndex, Position, PositionError};
pub use rule::{Context, Rule, RuleBox};
pub use symbols::{
    ClassSymbol, Connection, DecodeError, DeclarationRecord, Lineage, MemberRecord, SourceDecoder,
    SymbolTable, SymbolTableBuilder,
};
pub use types::{Label, LintResult, Location, Severity, Suggestion, Violation};
