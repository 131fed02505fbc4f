//! Bridges MathLingua diagnostics and errors to miette reports.
//!
//! A [`MathlinguaError::Parse`] or a [`CheckReport`] may carry many
//! diagnostics. Each becomes its own [`Reportable`] so they render one by one.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use mathlingua::{CheckReport, MathlinguaError};
use mathlingua_core::span::Span;
use mathlingua_parser::error::Diagnostic;

/// Anything the CLI can hand to a miette report handler.
pub type Reportable<'a> = Box<dyn MietteDiagnostic + 'a>;

/// A [`Diagnostic`] together with the text its labels point into.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }

    fn boxed(diag: &'a Diagnostic, src: &'a str) -> Reportable<'a> {
        Box::new(Self::new(diag, src))
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.diag, f)
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = self.diag.code()?;
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = self.diag.help()?;
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        let spans = labels.iter().map(|label| {
            let text = Some(label.message().to_string());
            let at = span_to_miette(label.span());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(text, at)
            } else {
                LabeledSpan::new_with_span(text, at)
            }
        });
        Some(Box::new(spans))
    }
}

/// Presents an I/O or configuration failure, which has no source text.
#[derive(Debug)]
pub struct ErrorAdapter<'a>(pub &'a MathlinguaError);

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0 {
            MathlinguaError::Io(_) => Some(Box::new("mathlingua::io")),
            MathlinguaError::Config(_) => Some(Box::new("mathlingua::config")),
            MathlinguaError::Parse { .. } => None,
        }
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// One reportable per diagnostic of a parse failure, or a single one for
/// any other error.
pub fn to_reportables(err: &MathlinguaError) -> Vec<Reportable<'_>> {
    let MathlinguaError::Parse { err: parse_err, src } = err else {
        return vec![Box::new(ErrorAdapter(err))];
    };

    parse_err
        .diagnostics()
        .iter()
        .map(|d| DiagnosticAdapter::boxed(d, src))
        .collect()
}

/// One reportable per diagnostic of a check, in [`CheckReport::diagnostics`]
/// order. Diagnostics outside any file, such as an ignored configuration,
/// have no source to show.
pub fn report_reportables(report: &CheckReport) -> Vec<Reportable<'_>> {
    let general = report
        .general()
        .iter()
        .map(|d| DiagnosticAdapter::boxed(d, ""));

    let files = report.files().iter().flat_map(|file| {
        file.diagnostics()
            .iter()
            .map(|d| DiagnosticAdapter::boxed(d, file.source()))
    });

    general.chain(files).collect()
}

#[cfg(test)]
mod tests {
    use mathlingua::Checker;
    use mathlingua_parser::error::{ErrorCode, Origin, ParseError};

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error(Origin::Phase5Parser, "test error")
            .with_code(ErrorCode::E400)
            .with_label(Span::new(0..5), "here")
            .with_help("try this");
        let parse_err = ParseError::from(diag);
        let err = MathlinguaError::new_parse_error(parse_err, "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let report = &reportables[0];
        assert_eq!(report.to_string(), "test error");
        assert_eq!(report.code().map(|c| c.to_string()).as_deref(), Some("E400"));
        assert_eq!(report.help().map(|h| h.to_string()).as_deref(), Some("try this"));
        assert!(report.source_code().is_some());
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error(Origin::Phase1Lexer, "first error")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error(Origin::Phase5Parser, "second error")
                .with_code(ErrorCode::E401)
                .with_label(Span::new(10..15), "second")
                .with_help("help for second"),
            Diagnostic::error(Origin::FormulationParser, "third error")
                .with_label(Span::new(20..25), "third"),
        ];
        let parse_err = ParseError::from(diags);
        let err = MathlinguaError::new_parse_error(parse_err, "source code here...");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].to_string(), "third error");
    }

    #[test]
    fn test_non_parse_error() {
        let err = MathlinguaError::Config("bad file".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        let report = &reportables[0];
        assert_eq!(report.to_string(), "Configuration error: bad file");
        assert_eq!(
            report.code().map(|c| c.to_string()).as_deref(),
            Some("mathlingua::config")
        );
        assert!(report.labels().is_none());
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error(Origin::Phase5Parser, "Duplicate section 'then'")
            .with_label(Span::new(10..15), "duplicate")
            .with_secondary_label(Span::new(0..5), "first used here");

        let adapter = DiagnosticAdapter::new(&diag, "then: `a`\nthen: `b`\n");

        let labels: Vec<_> = adapter.labels().expect("labels").collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("duplicate"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("first used here"));
        assert!(!labels[1].primary());
    }

    #[test]
    fn test_warning_severity() {
        let diag = Diagnostic::warning(Origin::Config, "ignored");
        let adapter = DiagnosticAdapter::new(&diag, "");
        assert_eq!(adapter.severity(), Some(miette::Severity::Warning));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_report_reportables_keep_general_first() {
        let checker = Checker::default();
        let file = checker.check_source("Axiom:\n", "a.math");
        let mut report = CheckReport::new(vec![file]);
        report.add_diagnostic(Diagnostic::warning(Origin::Config, "ignored mlg.conf"));

        let reportables = report_reportables(&report);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "ignored mlg.conf");
        assert_eq!(reportables[1].to_string(), "Expected section 'then'");
    }
}
