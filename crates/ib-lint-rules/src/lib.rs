//! # ib-lint-rules
//!
//! Built-in lint rules for ib-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | IB001 | `use-base-class` | Configured element kinds must use an allowed custom class |
//! | IB002 | `custom-class-exists` | Custom classes must be declared in the Swift sources |
//! | IB003 | `connection-mismatch` | Outlets and actions must exist in the connected class |
//! | IB004 | `custom-module` | `customModule` must match the module declaring the class |
//! | IB005 | `duplicate-id` | Element ids must be unique within a document |
//! | IB006 | `ambiguous-view` | Forbids views with ambiguous layout |
//! | IB007 | `misplaced-view` | Warns about misplaced views |
//! | IB008 | `storyboard-viewcontroller-id` | Storyboard identifiers must equal the class name |
//! | IB009 | `reuse-identifier` | Reuse identifiers must equal the cell class name |
//!
//! ## Usage
//!
//! ```ignore
//! use ib_lint_core::Analyzer;
//! use ib_lint_rules::{DuplicateId, UseBaseClass};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./App")
//!     .rule(UseBaseClass::new().allow("UIButton", ["PrimaryButton"]))
//!     .rule(DuplicateId::new())
//!     .document_decoder(InterfaceBuilderDecoder::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection_mismatch;
mod custom_class_exists;
mod custom_module;
mod duplicate_id;
mod framework;
mod identifiers;
mod layout_flags;
mod presets;
mod use_base_class;

pub use connection_mismatch::ConnectionMismatch;
pub use custom_class_exists::CustomClassExists;
pub use custom_module::{CustomModule, ModuleMapping};
pub use duplicate_id::DuplicateId;
pub use identifiers::{ReuseIdentifier, StoryboardViewControllerId};
pub use layout_flags::{AmbiguousView, MisplacedView};
pub use presets::{all_rules, minimal_rules, recommended_rules, rules_from_config, Preset};
pub use use_base_class::{Evaluation, UseBaseClass};

/// Re-export core types for convenience.
pub use ib_lint_core::{Rule, Severity, Violation};

use ib_lint_core::{Document, Location, UiElement};

/// Location of `element` in `doc`, or the whole file when it has no position.
pub(crate) fn element_location(doc: &Document, element: &UiElement) -> Location {
    element.position.as_ref().map_or_else(
        || Location::file(&doc.path),
        |position| Location::from_position(&doc.path, position),
    )
}
