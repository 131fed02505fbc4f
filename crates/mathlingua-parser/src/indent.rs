//! Phase 2: indentation to explicit markers.
//!
//! Each [`Token::Indentation`] is replaced by markers relative to a stack
//! of open indentation widths that starts at `[0]`:
//! - deeper: one [`Token::Indent`] per two columns, each pushing a level
//! - shallower: one [`Token::Dedent`] per popped level, then
//!   [`Token::SameIndent`]
//! - equal: [`Token::SameIndent`]
//!
//! A [`Token::LineBreak`] and the end of input close every open level, so
//! the output always has as many dedents as indents.

use log::{debug, trace};

use mathlingua_core::span::Span;

use crate::{
    error::{Diagnostic, DiagnosticTracker, ErrorCode, Origin},
    tokens::{PositionedToken, Token},
};

/// Columns per indentation level.
const UNIT: usize = 2;

struct Indenter<'a> {
    out: Vec<PositionedToken<'a>>,
    stack: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Indenter<'a> {
    fn new(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            stack: vec![0],
            diagnostics: Vec::new(),
        }
    }

    fn top(&self) -> usize {
        self.stack.last().copied().unwrap_or(0)
    }

    fn marker(&mut self, token: Token<'a>, at: usize) {
        self.out.push(PositionedToken::new(token, Span::point(at)));
    }

    fn line_start(&mut self, raw: &str, span: Span) {
        let at = span.end();
        if raw.contains('\t') {
            self.diagnostics.push(
                Diagnostic::error(Origin::Phase2Lexer, "Tab characters are not allowed in indentation")
                    .with_code(ErrorCode::E100)
                    .with_label(span, "tab found here")
                    .with_help("indent with two spaces per level"),
            );
        }
        let width: usize = raw.chars().map(|c| if c == '\t' { UNIT } else { 1 }).sum();
        let top = self.top();

        if width > top {
            let level = if width < top + UNIT {
                self.misaligned(span, "Indentation is less than one level deeper");
                top
            } else if (width - top) % UNIT != 0 {
                self.misaligned(span, "Indentation is not a multiple of two spaces");
                width - 1
            } else {
                width
            };

            if level == top {
                self.marker(Token::SameIndent, at);
            }
            for step in (top + UNIT..=level).step_by(UNIT) {
                self.marker(Token::Indent, at);
                self.stack.push(step);
            }
        } else {
            while self.stack.len() > 1 && width < self.top() {
                self.stack.pop();
                self.marker(Token::Dedent, at);
            }
            if width != self.top() {
                self.misaligned(span, "Indentation does not line up with an enclosing level");
            }
            self.marker(Token::SameIndent, at);
        }
    }

    fn misaligned(&mut self, span: Span, message: &str) {
        self.diagnostics.push(
            Diagnostic::error(Origin::Phase2Lexer, message)
                .with_code(ErrorCode::E101)
                .with_label(span, "aligned to the nearest enclosing level"),
        );
    }

    /// Pops every open level.
    fn close_all(&mut self, at: usize) {
        while self.stack.len() > 1 {
            self.stack.pop();
            self.marker(Token::Dedent, at);
        }
    }
}

/// Replaces indentation tokens with indent, dedent, and same-indent markers.
///
/// Misaligned lines are reported with origin [`Origin::Phase2Lexer`] and
/// treated as if they sat at the nearest enclosing level.
///
/// # Examples
///
/// ```
/// use mathlingua_parser::{
///     error::DiagnosticTracker,
///     indent::mark_indentation,
///     lexer::tokenize,
///     position::PositionTracker,
///     tokens::Token,
/// };
///
/// let source = "a:\n  . x\n";
/// let positions = PositionTracker::new(source);
/// let mut diagnostics = DiagnosticTracker::new("doc.math", &positions);
/// let raw = tokenize(source, &mut diagnostics);
/// let marked: Vec<_> = mark_indentation(raw, &mut diagnostics)
///     .into_iter()
///     .map(|t| t.token)
///     .collect();
///
/// assert_eq!(marked[0], Token::SameIndent);
/// assert_eq!(marked[4], Token::Indent);
/// assert_eq!(marked.last(), Some(&Token::Dedent));
/// ```
pub fn mark_indentation<'a>(
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Vec<PositionedToken<'a>> {
    let end = tokens.last().map_or(0, |t| t.span.end());
    let mut indenter = Indenter::new(tokens.len());

    for token in tokens {
        match token.token {
            Token::Indentation(raw) => indenter.line_start(raw, token.span),
            Token::LineBreak => {
                indenter.close_all(token.span.start());
                indenter.out.push(token);
            }
            _ => indenter.out.push(token),
        }
    }
    indenter.close_all(end);

    let errors = indenter.diagnostics.len();
    for diagnostic in indenter.diagnostics {
        diagnostics.append(diagnostic);
    }

    debug!(tokens = indenter.out.len(), errors; "Phase 2 complete");
    trace!(tokens:? = indenter.out; "Indentation markers");
    indenter.out
}
