//! Per-document diagnostic log.

use log::trace;

use crate::{
    error::{Diagnostic, ParseError},
    position::PositionTracker,
};

/// An append-only log of the diagnostics of one document.
///
/// Appending stamps each diagnostic with the document path and the
/// position of its primary label, so every phase can report spans and
/// leave resolution to one place.
///
/// # Example
///
/// ```
/// # use mathlingua_parser::error::{Diagnostic, DiagnosticTracker, Origin};
/// # use mathlingua_parser::position::PositionTracker;
/// # use mathlingua_core::span::Span;
///
/// let positions = PositionTracker::new("Axiom:\n. \"oops\n");
/// let mut tracker = DiagnosticTracker::new("axiom.math", &positions);
/// tracker.append(
///     Diagnostic::error(Origin::Phase1Lexer, "Unterminated text")
///         .with_label(Span::new(9..14), "text starts here"),
/// );
///
/// let diagnostics = tracker.snapshot();
/// assert_eq!(diagnostics[0].path(), "axiom.math");
/// assert_eq!(diagnostics[0].position().row, 1);
/// assert!(tracker.finish().is_err());
/// ```
#[derive(Debug)]
pub struct DiagnosticTracker<'a> {
    path: &'a str,
    positions: &'a PositionTracker,
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl<'a> DiagnosticTracker<'a> {
    pub fn new(path: &'a str, positions: &'a PositionTracker) -> Self {
        Self {
            path,
            positions,
            diagnostics: Vec::new(),
            has_errors: false,
        }
    }

    /// Appends `diagnostic`, resolving its location.
    pub fn append(&mut self, diagnostic: Diagnostic) {
        let position = diagnostic
            .primary_span()
            .map_or(diagnostic.position(), |span| self.positions.start_of(span));
        let diagnostic = diagnostic.with_location(self.path, position);
        trace!(origin:% = diagnostic.origin(), message = diagnostic.message(); "Diagnostic");
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Number of diagnostics appended so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// The diagnostics appended so far, in insertion order.
    pub fn snapshot(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn positions(&self) -> &'a PositionTracker {
        self.positions
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// `Err` with every diagnostic when any of them is an error.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}
