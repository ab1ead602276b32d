//! Byte offset to line/column translation.
//!
//! Decoders report declaration offsets in bytes, while editors and IDE
//! integrations expect a 1-based line and a 0-based column counted in
//! characters. [`LineIndex`] performs that translation for a single file.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A resolved source position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column in characters (0-indexed).
    pub column: usize,
    /// File the position belongs to, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Position {
    /// Creates a position without a file reference.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            file: None,
        }
    }

    /// Attaches a file reference to this position.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file.display())?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Errors raised when an offset cannot be mapped onto the text.
///
/// Both variants indicate a mismatch between a decoder and the text it was
/// given, not a problem in the user's project.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum PositionError {
    /// The offset lies past the end of the text.
    #[error("offset {offset} is out of range for text of {len} bytes")]
    #[diagnostic(code(ib_lint::position::out_of_range))]
    OutOfRange {
        /// Requested byte offset.
        offset: usize,
        /// Length of the text in bytes.
        len: usize,
    },

    /// The offset points into the middle of a multi-byte character.
    #[error("offset {offset} is not on a character boundary")]
    #[diagnostic(code(ib_lint::position::not_char_boundary))]
    NotCharBoundary {
        /// Requested byte offset.
        offset: usize,
    },
}

/// Precomputed line starts for one file.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
    file: Option<PathBuf>,
}

impl<'a> LineIndex<'a> {
    /// Indexes the line separators of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                text.bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        Self {
            text,
            line_starts,
            file: None,
        }
    }

    /// Stamps every resolved position with `file`.
    #[must_use]
    pub fn with_file(mut self, file: &Path) -> Self {
        self.file = Some(file.to_path_buf());
        self
    }

    /// Resolves a byte offset into a [`Position`].
    ///
    /// `offset == text.len()` is accepted and refers to the end of the text.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfRange`] past the end of the text and
    /// [`PositionError::NotCharBoundary`] inside a multi-byte character.
    pub fn resolve(&self, offset: usize) -> Result<Position, PositionError> {
        let len = self.text.len();
        if offset > len {
            return Err(PositionError::OutOfRange { offset, len });
        }
        if !self.text.is_char_boundary(offset) {
            return Err(PositionError::NotCharBoundary { offset });
        }

        // Number of line starts at or before `offset`; always >= 1.
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line - 1];
        let column = self.text[line_start..offset].chars().count();

        Ok(Position {
            line,
            column,
            file: self.file.clone(),
        })
    }
}

/// Resolves a single byte offset without keeping an index around.
///
/// # Errors
///
/// See [`LineIndex::resolve`].
pub fn resolve_offset(text: &str, offset: usize) -> Result<Position, PositionError> {
    LineIndex::new(text).resolve(offset)
}
