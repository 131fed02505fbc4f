//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with its origin
//! phase, optional error code, labeled source spans, and help text. The
//! document path and resolved position are stamped on by the
//! [`DiagnosticTracker`](super::DiagnosticTracker) when it is appended.

use std::fmt;

use mathlingua_core::span::{Position, Span};

use crate::error::{ErrorCode, Label, Origin, Severity};

/// A structured report of a parse problem.
///
/// # Example
///
/// ```text
/// error[E400]: Expected section 'then'
///   --> theorem.math:1:1
///    |
///  1 | Theorem:
///    | ^^^^^^^^ group starts here
///    |
///    = help: add a `then:` section
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    origin: Origin,
    code: Option<ErrorCode>,
    message: String,
    path: String,
    position: Position,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use mathlingua_parser::error::{Diagnostic, ErrorCode, Origin};
    /// # use mathlingua_core::span::Span;
    ///
    /// let diag = Diagnostic::error(Origin::Phase1Lexer, "Unterminated text")
    ///     .with_code(ErrorCode::E001)
    ///     .with_label(Span::new(8..13), "text starts here")
    ///     .with_help("add a closing `\"`");
    /// assert_eq!(diag.to_string(), "error[E001]: Unterminated text");
    /// ```
    pub fn error(origin: Origin, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, origin, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(origin: Origin, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, origin, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The document the diagnostic belongs to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Where the diagnostic points, resolved from its primary label.
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach the document path and resolved position.
    pub fn with_location(mut self, path: impl Into<String>, position: Position) -> Self {
        self.path = path.into();
        self.position = position;
        self
    }

    fn new(severity: Severity, origin: Origin, message: impl Into<String>) -> Self {
        Self {
            severity,
            origin,
            code: None,
            message: message.into(),
            path: String::new(),
            position: Position::default(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::error(Origin::Phase2Lexer, "misaligned");

        assert!(diag.severity().is_error());
        assert_eq!(diag.origin(), Origin::Phase2Lexer);
        assert_eq!(diag.message(), "misaligned");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.primary_span().is_none());
        assert!(diag.help().is_none());
        assert_eq!(diag.path(), "");
    }

    #[test]
    fn test_diagnostic_primary_span_skips_secondary() {
        let diag = Diagnostic::error(Origin::Phase5Parser, "Unexpected section 'then'")
            .with_secondary_label(Span::new(1..5), "first used here")
            .with_label(Span::new(20..24), "duplicate");

        assert_eq!(diag.primary_span(), Some(Span::new(20..24)));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error(Origin::Phase5Parser, "Expected section 'then'")
            .with_code(ErrorCode::E400);

        assert_eq!(diag.to_string(), "error[E400]: Expected section 'then'");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning(Origin::Config, "could not read mlg.conf");

        assert_eq!(diag.to_string(), "warning: could not read mlg.conf");
    }

    #[test]
    fn test_diagnostic_with_location() {
        let diag = Diagnostic::error(Origin::Phase1Lexer, "x")
            .with_location("a.math", Position::new(4, 1, 2));

        assert_eq!(diag.path(), "a.math");
        assert_eq!(diag.position(), Position::new(4, 1, 2));
    }
}
