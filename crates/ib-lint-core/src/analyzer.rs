//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, ConfigError};
use crate::document::{Document, DocumentDecoder, DocumentKind};
use crate::rule::{Context, Rule, RuleBox};
use crate::symbols::{BuildReport, SourceDecoder, SymbolTable, SymbolTableBuilder};
use crate::types::{LintResult, Violation};

use miette::Diagnostic;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Extension of Swift source files.
const SOURCE_EXTENSION: &str = "swift";

/// Errors that can occur during analysis.
#[derive(Debug, Error, Diagnostic)]
pub enum AnalyzerError {
    /// IO error resolving the root.
    #[error("IO error: {0}")]
    #[diagnostic(code(ib_lint::analyzer::io))]
    Io(#[from] std::io::Error),

    /// Directory walk failed.
    #[error("Failed to walk project: {0}")]
    #[diagnostic(code(ib_lint::analyzer::walk))]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    #[diagnostic(code(ib_lint::analyzer::glob))]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    #[diagnostic(code(ib_lint::analyzer::config))]
    Config(#[from] ConfigError),

    /// No document decoder was supplied.
    #[error("No document decoder configured")]
    #[diagnostic(code(ib_lint::analyzer::no_document_decoder))]
    MissingDocumentDecoder,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    source_decoder: Option<Box<dyn SourceDecoder>>,
    document_decoder: Option<Box<dyn DocumentDecoder>>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the decoder for Swift sources. Without one the symbol table
    /// stays empty.
    #[must_use]
    pub fn source_decoder<D: SourceDecoder + 'static>(mut self, decoder: D) -> Self {
        self.source_decoder = Some(Box::new(decoder));
        self
    }

    /// Sets the decoder for storyboards and xibs.
    #[must_use]
    pub fn document_decoder<D: DocumentDecoder + 'static>(mut self, decoder: D) -> Self {
        self.document_decoder = Some(Box::new(decoder));
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be resolved, an exclude pattern
    /// is invalid, or no document decoder was supplied.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let document_decoder = self
            .document_decoder
            .ok_or(AnalyzerError::MissingDocumentDecoder)?;

        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        // Merge exclude patterns from config
        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }

        // Add default excludes if none specified
        if exclude_patterns.is_empty() {
            exclude_patterns.extend(
                ["**/Pods/**", "**/Carthage/**", "**/DerivedData/**"].map(String::from),
            );
        }

        let compiled_excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            compiled_excludes,
            config: self.config.unwrap_or_default(),
            source_decoder: self.source_decoder,
            document_decoder,
        })
    }
}

/// Files found under the analyzed root.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    /// Swift sources, sorted.
    pub sources: Vec<PathBuf>,
    /// Storyboards and xibs, sorted.
    pub documents: Vec<PathBuf>,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    compiled_excludes: Vec<glob::Pattern>,
    config: Config,
    source_decoder: Option<Box<dyn SourceDecoder>>,
    document_decoder: Box<dyn DocumentDecoder>,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// Source and document decode failures are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let files = self.discover_files()?;
        info!(
            "Found {} source files and {} documents",
            files.sources.len(),
            files.documents.len()
        );

        let report = self.index_sources(&files.sources);
        let ctx = Context::new(&report.table, &self.config);

        let parallel = self.config.analyzer.parallel;
        let per_document: Vec<Option<Vec<Violation>>> = if parallel {
            files
                .documents
                .par_iter()
                .map(|path| self.analyze_document(&ctx, path))
                .collect()
        } else {
            files
                .documents
                .iter()
                .map(|path| self.analyze_document(&ctx, path))
                .collect()
        };

        let mut result = LintResult::new();
        result.sources_indexed = report.indexed_files;
        result.classes_indexed = report.table.len();
        for violations in per_document.into_iter().flatten() {
            result.violations.extend(violations);
            result.documents_checked += 1;
        }

        info!(
            "Analysis complete: {} violations in {} documents",
            result.violations.len(),
            result.documents_checked
        );

        Ok(result)
    }

    /// Builds the symbol table for `sources`.
    #[must_use]
    pub fn index_sources(&self, sources: &[PathBuf]) -> BuildReport {
        match &self.source_decoder {
            Some(decoder) => SymbolTableBuilder::new(decoder.as_ref())
                .parallel(self.config.analyzer.parallel)
                .relative_to(&self.root)
                .build_report(sources),
            None => {
                debug!("No source decoder configured, symbol table stays empty");
                BuildReport::default()
            }
        }
    }

    /// Runs every enabled rule against an already decoded document.
    #[must_use]
    pub fn check_document(&self, symbols: &SymbolTable, doc: &Document) -> Vec<Violation> {
        self.run_rules(&Context::new(symbols, &self.config), doc)
    }

    /// Reads, decodes and checks one document. Returns `None` if the
    /// document could not be read or decoded.
    fn analyze_document(&self, ctx: &Context<'_>, path: &Path) -> Option<Vec<Violation>> {
        debug!("Analyzing: {}", path.display());

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                return None;
            }
        };

        let relative = self.relative_path(path);
        match self.document_decoder.decode(&relative, &text) {
            Ok(doc) => Some(self.run_rules(ctx, &doc)),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    fn run_rules(&self, ctx: &Context<'_>, doc: &Document) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(ctx, doc);
            let rule_violations = self.apply_severity_override(rule.name(), rule_violations);
            violations.extend(rule_violations);
        }

        violations
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers Swift sources and Interface Builder documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory walk fails.
    pub fn discover_files(&self) -> Result<DiscoveredFiles, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder.git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = DiscoveredFiles::default();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let is_source = path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION);
            let is_document = DocumentKind::from_path(path).is_some();
            if !is_source && !is_document {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            if is_source {
                files.sources.push(path.to_path_buf());
            } else {
                files.documents.push(path.to_path_buf());
            }
        }

        files.sources.sort();
        files.documents.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        // Matched against the root-relative path only.
        let relative = self.relative_path(path);
        let relative_str = relative.to_string_lossy();

        if self.compiled_excludes.iter().any(|p| p.matches(&relative_str)) {
            return true;
        }

        // Also check as substring for patterns like "**/Pods/**"
        let rooted = format!("/{relative_str}");
        self.exclude_patterns.iter().any(|pattern| {
            let normalized_pattern = pattern.replace("**", "");
            normalized_pattern.len() > 1 && rooted.contains(&normalized_pattern)
        })
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::DecodeError;

    struct EmptyDocuments;

    impl DocumentDecoder for EmptyDocuments {
        fn decode(&self, path: &Path, _text: &str) -> Result<Document, DecodeError> {
            let kind = DocumentKind::from_path(path)
                .ok_or_else(|| DecodeError::new(path, "not an Interface Builder file"))?;
            Ok(Document::new(path, kind, Vec::new()))
        }
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/Pods/**")
            .document_decoder(EmptyDocuments)
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn test_builder_requires_document_decoder() {
        let err = Analyzer::builder().root(".").build().err();
        assert!(matches!(err, Some(AnalyzerError::MissingDocumentDecoder)));
    }

    #[test]
    fn test_builder_rejects_invalid_glob() {
        let err = Analyzer::builder()
            .root(".")
            .exclude("[")
            .document_decoder(EmptyDocuments)
            .build()
            .err();
        assert!(matches!(err, Some(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/project")
            .exclude("**/Pods/**")
            .exclude("**/Carthage/**")
            .document_decoder(EmptyDocuments)
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/project/Pods/Alamofire/Session.swift")));
        assert!(analyzer.should_exclude(Path::new("/project/Carthage/Checkouts/A.xib")));
        assert!(!analyzer.should_exclude(Path::new("/project/App/Main.storyboard")));
    }

    #[test]
    fn test_exclude_ignores_directories_above_root() {
        let analyzer = Analyzer::builder()
            .root("/work/Pods/Demo")
            .exclude("**/Pods/**")
            .document_decoder(EmptyDocuments)
            .build()
            .expect("Failed to build analyzer");

        assert!(!analyzer.should_exclude(Path::new("/work/Pods/Demo/App/Main.storyboard")));
        assert!(analyzer.should_exclude(Path::new("/work/Pods/Demo/Pods/Lib/Lib.xib")));
    }

    #[test]
    fn test_discovers_sources_and_documents_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("App/Views")).unwrap();
        std::fs::create_dir_all(root.join("Pods/Lib")).unwrap();
        for file in [
            "App/Views/Cell.xib",
            "App/Main.storyboard",
            "App/Views/Cell.swift",
            "App/AppDelegate.swift",
            "App/Info.plist",
            "Pods/Lib/Lib.swift",
        ] {
            std::fs::write(root.join(file), "").unwrap();
        }

        let analyzer = Analyzer::builder()
            .root(root)
            .document_decoder(EmptyDocuments)
            .build()
            .unwrap();
        let files = analyzer.discover_files().unwrap();

        assert_eq!(
            files.sources,
            vec![root.join("App/AppDelegate.swift"), root.join("App/Views/Cell.swift")]
        );
        assert_eq!(
            files.documents,
            vec![root.join("App/Main.storyboard"), root.join("App/Views/Cell.xib")]
        );
    }
}
