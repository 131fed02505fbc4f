//! MathLingua - checking documents written in the MathLingua language.
//!
//! This crate ties the parser to the file system: it loads the documents of
//! a workspace, checks each one, and collects the diagnostics into a
//! [`CheckReport`].

pub mod config;

mod error;
mod report;
mod workspace;

pub use mathlingua_core::{ast, render, schema, scope, span, walk};
pub use mathlingua_parser::error as diagnostics;

pub use error::MathlinguaError;
pub use report::{CheckReport, DiagnosticRecord, FileReport};
pub use workspace::collect_files;

use std::{fs, path::Path};

use log::{debug, info, trace};

use mathlingua_core::{ast::Document, schema::GroupKind};

use config::AppConfig;

/// Keywords of the formulation language offered as completions.
pub const KEYWORDS: &[&str] = &["in", "is", "as", "extends"];

/// Checks MathLingua documents.
///
/// # Examples
///
/// ```
/// use mathlingua::{Checker, config::AppConfig};
///
/// let checker = Checker::new(AppConfig::default());
///
/// let report = checker.check_source("Axiom:\nthen: `x = x`\n", "reflexive.math");
/// assert!(report.diagnostics().is_empty());
///
/// let report = checker.check_source("Axiom:\n", "empty.math");
/// assert!(report.has_errors());
/// ```
#[derive(Debug, Default)]
pub struct Checker {
    config: AppConfig,
}

impl Checker {
    /// Create a new checker with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a document, failing on any error.
    ///
    /// # Errors
    ///
    /// Returns `MathlinguaError::Parse` holding every diagnostic, together
    /// with the source, when at least one diagnostic is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathlingua::Checker;
    ///
    /// let checker = Checker::default();
    /// let document = checker.parse("Axiom:\nthen: `x = x`\n", "reflexive.math")
    ///     .expect("Failed to parse");
    /// assert_eq!(document.items.len(), 1);
    /// ```
    pub fn parse(&self, source: &str, path: &str) -> Result<Document, MathlinguaError> {
        mathlingua_parser::parse_document_strict(source, path)
            .map_err(|err| MathlinguaError::new_parse_error(err, source))
    }

    /// Check source text that is already in memory.
    pub fn check_source(&self, source: &str, path: &str) -> FileReport {
        let (document, diagnostics) = mathlingua_parser::parse_document(source, path);
        debug!(path, diagnostics = diagnostics.len(); "Checked document");
        FileReport::new(path.to_string(), source.to_string(), document, diagnostics)
    }

    /// Read and check a single file.
    ///
    /// # Errors
    ///
    /// Returns `MathlinguaError::Io` if the file cannot be read.
    pub fn check_file(&self, path: &Path) -> Result<FileReport, MathlinguaError> {
        let source = fs::read_to_string(path)?;
        Ok(self.check_source(&source, &path.display().to_string()))
    }

    /// Check every document under `paths`.
    ///
    /// Directories are walked according to the `[check]` configuration;
    /// see [`collect_files`]. Files are checked in path order.
    ///
    /// # Errors
    ///
    /// Returns `MathlinguaError::Io` if a path does not exist or a file
    /// cannot be read.
    pub fn check_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> Result<CheckReport, MathlinguaError> {
        let files = collect_files(paths, self.config.check())?;
        info!(files = files.len(); "Checking workspace");

        let reports = files
            .iter()
            .map(|file| self.check_file(file))
            .collect::<Result<Vec<_>, _>>()?;
        let report = CheckReport::new(reports);

        info!(
            files = report.file_count(),
            errors = report.error_count(),
            warnings = report.warning_count();
            "Workspace checked"
        );
        Ok(report)
    }
}

/// Completion entries for editors.
///
/// The formulation keywords come first, then one entry per group kind
/// holding its section names as `name:` lines.
///
/// # Examples
///
/// ```
/// let completions = mathlingua::completions();
/// assert_eq!(&completions[..4], ["in", "is", "as", "extends"]);
/// assert!(completions.iter().any(|c| c.starts_with("Theorem:\ngiven:\nwhere:\n")));
/// ```
pub fn completions() -> Vec<String> {
    let mut completions: Vec<String> = KEYWORDS.iter().map(|k| k.to_string()).collect();
    completions.extend(GroupKind::all().map(|kind| {
        kind.schema()
            .names()
            .map(|name| format!("{name}:"))
            .collect::<Vec<_>>()
            .join("\n")
    }));
    trace!(entries = completions.len(); "Built completions");
    completions
}
