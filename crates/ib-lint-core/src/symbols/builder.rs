//! Builds the [`SymbolTable`] from decoded source files.

use super::record::{
    DeclarationKind, DeclarationRecord, DecodeError, MemberAttribute, MemberRecord, SourceDecoder,
};
use super::{ClassSymbol, Connection, SymbolTable};
use crate::position::{LineIndex, PositionError};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Marker ending an optional type annotation.
const OPTIONAL_MARKER: char = '?';

/// Outcome of a symbol table build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// The merged table.
    pub table: SymbolTable,
    /// Number of files that decoded successfully.
    pub indexed_files: usize,
    /// Files that could not be read or decoded.
    pub failures: Vec<DecodeError>,
}

/// Turns source files into a [`SymbolTable`] through a [`SourceDecoder`].
pub struct SymbolTableBuilder<'a> {
    decoder: &'a dyn SourceDecoder,
    parallel: bool,
    root: Option<&'a Path>,
}

impl<'a> SymbolTableBuilder<'a> {
    /// Creates a builder using `decoder`.
    #[must_use]
    pub fn new(decoder: &'a dyn SourceDecoder) -> Self {
        Self {
            decoder,
            parallel: true,
            root: None,
        }
    }

    /// Records symbol files relative to `root`.
    #[must_use]
    pub fn relative_to(mut self, root: &'a Path) -> Self {
        self.root = Some(root);
        self
    }

    /// Sets whether files are decoded in parallel (default: true).
    ///
    /// The merge order is the input order either way.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the table for `files`.
    #[must_use]
    pub fn build(&self, files: &[PathBuf]) -> SymbolTable {
        self.build_report(files).table
    }

    /// Builds the table for `files` and reports per-file failures.
    ///
    /// A file that cannot be read or decoded contributes no classes. When
    /// several files declare the same name the one later in `files` wins.
    #[must_use]
    pub fn build_report(&self, files: &[PathBuf]) -> BuildReport {
        let loaded: Vec<Result<Vec<ClassSymbol>, DecodeError>> = if self.parallel {
            files.par_iter().map(|path| self.load_file(path)).collect()
        } else {
            files.iter().map(|path| self.load_file(path)).collect()
        };

        let mut report = BuildReport::default();
        for result in loaded {
            match result {
                Ok(symbols) => {
                    report.indexed_files += 1;
                    for symbol in symbols {
                        report.table.insert_or_replace(symbol);
                    }
                }
                Err(e) => {
                    warn!("{e}");
                    report.failures.push(e);
                }
            }
        }

        info!(
            "Indexed {} classes from {} of {} source files",
            report.table.len(),
            report.indexed_files,
            files.len()
        );
        report
    }

    /// Reads, decodes and extracts one file.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the file cannot be read or decoded.
    pub fn load_file(&self, path: &Path) -> Result<Vec<ClassSymbol>, DecodeError> {
        debug!("Indexing: {}", path.display());
        let text =
            std::fs::read_to_string(path).map_err(|e| DecodeError::new(path, e.to_string()))?;
        let records = self.decoder.decode(path, &text)?;
        let reported = self
            .root
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);
        Ok(extract_classes(reported, &text, &records))
    }
}

/// Extracts class and extension symbols from the records of one file.
///
/// A declaration whose name offset does not fit `text` is dropped on its
/// own, as is a member whose offset does not fit; the rest of the file is
/// still extracted.
#[must_use]
pub fn extract_classes(path: &Path, text: &str, records: &[DeclarationRecord]) -> Vec<ClassSymbol> {
    let index = LineIndex::new(text).with_file(path);

    records
        .iter()
        .filter(|record| DeclarationKind::from_kind(&record.kind).is_some())
        .filter_map(|record| match extract_class(path, &index, record) {
            Ok(symbol) => Some(symbol),
            Err(e) => {
                warn!("Skipping {} in {}: {e}", record.name, path.display());
                None
            }
        })
        .collect()
}

fn extract_class(
    path: &Path,
    index: &LineIndex<'_>,
    record: &DeclarationRecord,
) -> Result<ClassSymbol, PositionError> {
    let position = index.resolve(record.name_offset)?;

    let mut connections = Vec::new();
    for member in &record.members {
        if let Err(e) = extract_connections(index, member, &mut connections) {
            warn!(
                "Skipping member {} of {} in {}: {e}",
                member.name,
                record.name,
                path.display()
            );
        }
    }

    // Extensions only add protocol conformances, never a superclass.
    let inherited_types = match DeclarationKind::from_kind(&record.kind) {
        Some(DeclarationKind::Class) => record.inherited_types.clone(),
        _ => Vec::new(),
    };

    Ok(ClassSymbol {
        name: record.name.clone(),
        file: path.to_path_buf(),
        inherited_types,
        connections,
        position,
    })
}

/// Appends the outlet and/or action a member declares.
///
/// Outlet and action are independent checks, so a member tagged with both
/// yields both connections.
fn extract_connections(
    index: &LineIndex<'_>,
    member: &MemberRecord,
    out: &mut Vec<Connection>,
) -> Result<(), PositionError> {
    let Some(offset) = member.name_offset else {
        return Ok(());
    };
    let attributes = member.recognized_attributes();
    let is_outlet = attributes.contains(&MemberAttribute::Outlet) && !member.name.is_empty();
    let selector = member
        .selector_name
        .as_ref()
        .filter(|_| attributes.contains(&MemberAttribute::Action));
    if !is_outlet && selector.is_none() {
        return Ok(());
    }

    let position = index.resolve(offset)?;
    if is_outlet {
        out.push(Connection::Outlet {
            property_name: member.name.clone(),
            is_optional: is_optional_type(member.type_name.as_deref()),
            position: position.clone(),
        });
    }
    if let Some(selector) = selector {
        out.push(Connection::Action {
            selector_name: selector.clone(),
            position,
        });
    }

    Ok(())
}

fn is_optional_type(type_name: Option<&str>) -> bool {
    type_name.is_some_and(|t| t.trim_end().ends_with(OPTIONAL_MARKER))
}
