//! MathLingua Parser
//!
//! A five-phase parser for MathLingua documents:
//!
//! 1. [`lexer`]: characters to raw line-oriented tokens
//! 2. [`indent`]: leading whitespace to indent, dedent and same-indent markers
//! 3. [`bracket`]: markers to balanced group, section and argument brackets
//! 4. [`group_tree`]: brackets to an untyped tree of groups
//! 5. [`structural`]: the untyped tree to the typed [`Document`], using the
//!    schema table and the [`formulation`] sub-parser for inline literals
//!
//! No phase stops at the first problem. Each reports [`Diagnostic`]s to the
//! document's [`DiagnosticTracker`](error::DiagnosticTracker), installs a
//! default value where something was missing, and hands its output on.
//!
//! # Example
//!
//! ```
//! use mathlingua_core::ast::TopLevelItem;
//!
//! let source = "Theorem:\n. \"Pythagoras\"\ngiven: a, b, c\nthen:\n. `a^2 + b^2 = c^2`\n";
//! let (document, diagnostics) = mathlingua_parser::parse_document(source, "pythagoras.math");
//!
//! assert!(diagnostics.is_empty());
//! assert!(matches!(document.items[0], TopLevelItem::Theorem(_)));
//! ```

pub mod bracket;
pub mod error;
pub mod formulation;
pub mod group_tree;
pub mod indent;
pub mod lexer;
pub mod position;
pub mod structural;
pub mod tokens;

use log::{debug, info};

use mathlingua_core::ast::Document;

use error::{Diagnostic, DiagnosticTracker, ParseError};
use position::PositionTracker;

/// Everything a parse produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub document: Document,
    /// In the order the phases reported them.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether phase 5 matched every group against its schema without
    /// reporting anything. Earlier phases may still have reported problems.
    pub structurally_valid: bool,
}

impl ParsedDocument {
    /// Whether no phase reported anything.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parses one document.
///
/// Always produces a [`Document`]. The diagnostics are in the order the
/// phases reported them; the document is fully valid when there are none.
pub fn parse_document(source: &str, path: &str) -> (Document, Vec<Diagnostic>) {
    let parsed = parse(source, path);
    (parsed.document, parsed.diagnostics)
}

/// Parses one document, keeping the phase-5 outcome alongside the
/// diagnostics.
pub fn parse(source: &str, path: &str) -> ParsedDocument {
    info!(path, bytes = source.len(); "Parsing document");

    let positions = PositionTracker::new(source);
    let mut diagnostics = DiagnosticTracker::new(path, &positions);

    let raw = lexer::tokenize(source, &mut diagnostics);
    let marked = indent::mark_indentation(raw, &mut diagnostics);
    let bracketed = bracket::bracket(marked, &mut diagnostics);
    let root = group_tree::build_tree(&bracketed, &mut diagnostics);
    let (document, structurally_valid) = structural::build_document(&root, &mut diagnostics);

    debug!(
        path,
        items = document.items.len(),
        diagnostics = diagnostics.len(),
        structurally_valid;
        "Document parsed"
    );
    ParsedDocument {
        document,
        diagnostics: diagnostics.into_diagnostics(),
        structurally_valid,
    }
}

/// Parses one document, failing if any error was reported.
///
/// # Errors
///
/// Returns a [`ParseError`] holding every diagnostic when at least one of
/// them is an error.
pub fn parse_document_strict(source: &str, path: &str) -> Result<Document, ParseError> {
    let (document, diagnostics) = parse_document(source, path);
    if diagnostics.iter().any(|d| d.severity().is_error()) {
        return Err(ParseError::new(diagnostics));
    }
    Ok(document)
}
