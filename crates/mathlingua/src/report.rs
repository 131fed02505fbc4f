//! Results of checking one or more documents.

use serde::Serialize;

use mathlingua_core::{ast::Document, span::Position};
use mathlingua_parser::error::{Diagnostic, Severity};

/// The outcome of checking a single document.
#[derive(Debug, Clone)]
pub struct FileReport {
    path: String,
    source: String,
    document: Document,
    diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub(crate) fn new(
        path: String,
        source: String,
        document: Document,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            path,
            source,
            document,
            diagnostics,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The source text the diagnostics' spans point into.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity().is_error())
    }
}

/// The outcome of checking a set of documents.
///
/// Besides the per-file reports, a check can carry diagnostics that belong
/// to no document, such as a configuration file that was ignored.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    files: Vec<FileReport>,
    general: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn new(files: Vec<FileReport>) -> Self {
        Self {
            files,
            general: Vec::new(),
        }
    }

    /// Adds a diagnostic that is not tied to a checked document.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.general.push(diagnostic);
    }

    pub fn files(&self) -> &[FileReport] {
        &self.files
    }

    /// Diagnostics not tied to a checked document.
    pub fn general(&self) -> &[Diagnostic] {
        &self.general
    }

    /// Every diagnostic, general ones first, then per file in path order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.general
            .iter()
            .chain(self.files.iter().flat_map(|file| file.diagnostics.iter()))
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics()
            .filter(|d| d.severity().is_error())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics()
            .filter(|d| d.severity().is_warning())
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().any(|d| d.severity().is_error())
    }

    /// The closing line of a check, such as
    /// `Processed 2 files and found 1 error and 0 warnings`.
    pub fn summary(&self) -> String {
        format!(
            "Processed {} and found {} and {}",
            counted(self.file_count(), "file"),
            counted(self.error_count(), "error"),
            counted(self.warning_count(), "warning"),
        )
    }

    /// Every diagnostic in its machine-readable form.
    pub fn records(&self) -> Vec<DiagnosticRecord<'_>> {
        self.diagnostics().map(DiagnosticRecord::from).collect()
    }
}

fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// A diagnostic as it appears in JSON output.
///
/// Serializes as
/// `{"Type": "Error", "Origin": "Phase5ParserOrigin", "Message": ..., "Path": ..., "Position": {"Offset": .., "Row": .., "Column": ..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiagnosticRecord<'a> {
    pub r#type: &'static str,
    pub origin: &'static str,
    pub message: &'a str,
    pub path: &'a str,
    pub position: Position,
}

impl<'a> From<&'a Diagnostic> for DiagnosticRecord<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        let r#type = match diagnostic.severity() {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        Self {
            r#type,
            origin: diagnostic.origin().as_str(),
            message: diagnostic.message(),
            path: diagnostic.path(),
            position: diagnostic.position(),
        }
    }
}
