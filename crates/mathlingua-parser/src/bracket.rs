//! Phase 3: indentation markers to balanced brackets.
//!
//! The output keeps only what phase 4 needs: [`Token::BeginGroup`] /
//! [`Token::EndGroup`] around each group, an optional [`Token::Id`], and
//! for each section [`Token::BeginSection`], its [`Token::Name`], and one
//! [`Token::BeginArgument`] / [`Token::EndArgument`] pair per argument
//! around either a literal or a nested group. Top-level text blocks pass
//! through on their own.
//!
//! Every begin token is matched by an end token at the same depth no
//! matter how malformed the input is: the builder is a recursive descent
//! whose frames always close what they opened.

use log::{debug, trace};

use mathlingua_core::span::Span;

use crate::{
    error::{Diagnostic, DiagnosticTracker, ErrorCode, Origin},
    tokens::{PositionedToken, Token},
};

/// What a line holds after its markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Header,
    Argument,
    Id,
    TextBlock,
    Other,
}

struct Bracketer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    pos: usize,
    out: Vec<PositionedToken<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Bracketer<'a> {
    fn new(tokens: Vec<PositionedToken<'a>>) -> Self {
        let capacity = tokens.len();
        Self {
            tokens,
            pos: 0,
            out: Vec::with_capacity(capacity),
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self, ahead: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + ahead).map(|t| t.token)
    }

    fn advance(&mut self) -> Option<PositionedToken<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Offset of the next token, or the end of the last one.
    fn here(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some(token) => token.span.start(),
            None => self.tokens.last().map_or(0, |t| t.span.end()),
        }
    }

    fn span_at(&self, ahead: usize) -> Span {
        self.tokens
            .get(self.pos + ahead)
            .map_or_else(|| Span::point(self.here()), |t| t.span)
    }

    fn emit(&mut self, token: Token<'a>, at: usize) {
        self.out.push(PositionedToken::new(token, Span::point(at)));
    }

    fn line(&self, ahead: usize) -> Line {
        match (self.peek(ahead), self.peek(ahead + 1)) {
            (Some(Token::Name(_)), Some(Token::Colon)) => Line::Header,
            (Some(Token::DotSpace), _) => Line::Argument,
            (Some(Token::Id(_)), _) => Line::Id,
            (Some(Token::TextBlock(_)), _) => Line::TextBlock,
            _ => Line::Other,
        }
    }

    fn skip_line(&mut self) {
        while let Some(token) = self.advance() {
            if token.token == Token::Newline {
                break;
            }
        }
    }

    /// Skips an indented block up to and including its matching dedent.
    fn skip_block(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            match token.token {
                Token::Indent => depth += 1,
                Token::Dedent => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    /// Reports and skips the line at the cursor, which is past its markers.
    fn unexpected_line(&mut self, message: &str) {
        let span = self.span_at(0);
        self.diagnostics.push(
            Diagnostic::error(Origin::Phase3Lexer, message)
                .with_code(ErrorCode::E201)
                .with_label(span, ErrorCode::E201.description()),
        );
        self.skip_line();
    }

    /// Reports and skips the block opened by the indent at the cursor.
    fn unexpected_indent(&mut self) {
        let mut ahead = 0;
        while self.peek(ahead) == Some(Token::Indent) {
            ahead += 1;
        }
        let span = self.span_at(ahead);
        self.diagnostics.push(
            Diagnostic::error(Origin::Phase3Lexer, "Unexpected indentation")
                .with_code(ErrorCode::E200)
                .with_label(span, "indented deeper than its context allows")
                .with_help("sections sit at the column of their group, arguments at the column of their section or one level deeper"),
        );
        self.skip_block();
    }

    fn document(&mut self) {
        while let Some(token) = self.peek(0) {
            match token {
                Token::LineBreak | Token::Dedent | Token::Newline => self.pos += 1,
                Token::SameIndent => {
                    self.pos += 1;
                    match self.line(0) {
                        Line::Header | Line::Id => self.group(true),
                        Line::TextBlock => self.text_block(),
                        Line::Argument | Line::Other => {
                            self.unexpected_line("Expected a group or a text block")
                        }
                    }
                }
                Token::Indent => self.unexpected_indent(),
                _ => self.unexpected_line("Expected a group or a text block"),
            }
        }
    }

    fn text_block(&mut self) {
        if let Some(block) = self.advance() {
            self.out.push(block);
        }
        match self.peek(0) {
            Some(Token::Newline) => self.pos += 1,
            Some(_) => self.unexpected_line("Unexpected content after a text block"),
            None => {}
        }
    }

    /// Brackets a group whose first line is at the cursor.
    ///
    /// `opened` tells whether the group's base column has been entered.
    /// A group that starts on a `. name:` line has not: its later sections
    /// sit one indent deeper than the dot, and the group consumes the
    /// dedent that leaves that column.
    fn group(&mut self, mut opened: bool) {
        let entered_closed = !opened;
        self.emit(Token::BeginGroup, self.here());

        if let Some(Token::Id(_)) = self.peek(0) {
            let id_span = self.span_at(0);
            if let Some(id) = self.advance() {
                self.out.push(id);
            }
            if self.peek(0) == Some(Token::Newline) {
                self.pos += 1;
                if opened && self.peek(0) == Some(Token::SameIndent) && self.line(1) == Line::Header {
                    self.pos += 1;
                } else {
                    self.diagnostics.push(
                        Diagnostic::error(Origin::Phase3Lexer, "Expected a section header after the id")
                            .with_code(ErrorCode::E202)
                            .with_label(id_span, "id without a group"),
                    );
                    self.emit(Token::EndGroup, self.here());
                    return;
                }
            }
        }

        if self.line(0) == Line::Header {
            self.section(&mut opened);
        } else {
            self.unexpected_line("Expected a section header");
        }

        loop {
            match self.peek(0) {
                Some(Token::SameIndent) if opened => match self.line(1) {
                    Line::Header => {
                        self.pos += 1;
                        self.section(&mut opened);
                    }
                    Line::Argument | Line::Id | Line::TextBlock | Line::Other => {
                        self.pos += 1;
                        self.unexpected_line("Expected a section");
                    }
                },
                Some(Token::Indent) if !opened => {
                    self.pos += 1;
                    opened = true;
                    if self.line(0) == Line::Header {
                        self.section(&mut opened);
                    } else {
                        self.unexpected_line("Expected a section");
                    }
                }
                Some(Token::Indent) => self.unexpected_indent(),
                _ => break,
            }
        }

        self.emit(Token::EndGroup, self.here());
        if entered_closed && opened && self.peek(0) == Some(Token::Dedent) {
            self.pos += 1;
        }
    }

    /// Brackets a section whose `name:` is at the cursor.
    fn section(&mut self, opened: &mut bool) {
        let Some(name) = self.advance() else {
            return;
        };
        self.pos += 1;
        self.emit(Token::BeginSection, name.span.start());
        self.out.push(name);
        self.inline_arguments();

        let mut deeper = false;
        let mut count = 0usize;
        loop {
            match self.peek(0) {
                Some(Token::SameIndent) if *opened => {
                    if self.line(1) == Line::Argument {
                        self.pos += 1;
                        self.argument();
                        count += 1;
                    } else if deeper {
                        self.pos += 1;
                        self.unexpected_line("Expected an argument");
                    } else {
                        break;
                    }
                }
                Some(Token::Indent) if !*opened => {
                    if self.line(1) == Line::Argument {
                        self.pos += 1;
                    } else if self.peek(1) == Some(Token::Indent) && self.line(2) == Line::Argument {
                        self.pos += 2;
                        deeper = true;
                    } else {
                        break;
                    }
                    *opened = true;
                    self.argument();
                    count += 1;
                }
                Some(Token::Indent) => {
                    if !deeper && count == 0 && self.line(1) == Line::Argument {
                        self.pos += 1;
                        deeper = true;
                        self.argument();
                        count += 1;
                    } else {
                        self.unexpected_indent();
                    }
                }
                Some(Token::Dedent) if deeper => {
                    self.pos += 1;
                    break;
                }
                _ => break,
            }
        }

        self.emit(Token::EndSection, self.here());
    }

    /// Brackets each literal up to the end of the line.
    fn inline_arguments(&mut self) {
        loop {
            match self.peek(0) {
                Some(token) if token.is_literal() => {
                    if let Some(literal) = self.advance() {
                        self.emit(Token::BeginArgument, literal.span.start());
                        self.out.push(literal);
                        self.emit(Token::EndArgument, literal.span.end());
                    }
                }
                Some(Token::Comma) => self.pos += 1,
                Some(Token::Newline) => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    self.unexpected_line("Expected a text, formulation, or argument");
                    break;
                }
                None => break,
            }
        }
    }

    /// Brackets the `. ` line at the cursor.
    fn argument(&mut self) {
        let Some(dot) = self.advance() else {
            return;
        };
        match self.line(0) {
            Line::Header => {
                self.emit(Token::BeginArgument, dot.span.start());
                self.group(false);
                self.emit(Token::EndArgument, self.here());
            }
            _ if self.peek(0) == Some(Token::Newline) => {
                self.diagnostics.push(
                    Diagnostic::error(Origin::Phase3Lexer, "Expected an argument after '. '")
                        .with_code(ErrorCode::E201)
                        .with_label(dot.span, "empty argument"),
                );
                self.pos += 1;
            }
            _ => self.inline_arguments(),
        }
    }
}

/// Turns indentation markers into balanced group, section, and argument
/// brackets.
///
/// Lines that fit nowhere are reported with origin
/// [`Origin::Phase3Lexer`] and skipped.
pub fn bracket<'a>(
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Vec<PositionedToken<'a>> {
    let mut bracketer = Bracketer::new(tokens);
    bracketer.document();

    let errors = bracketer.diagnostics.len();
    for diagnostic in bracketer.diagnostics {
        diagnostics.append(diagnostic);
    }

    debug!(tokens = bracketer.out.len(), errors; "Phase 3 complete");
    trace!(tokens:? = bracketer.out; "Bracketed tokens");
    bracketer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{indent::mark_indentation, lexer::tokenize, position::PositionTracker};

    fn run(source: &str) -> (Vec<Token<'_>>, Vec<Diagnostic>) {
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let raw = tokenize(source, &mut diagnostics);
        let marked = mark_indentation(raw, &mut diagnostics);
        let tokens = bracket(marked, &mut diagnostics)
            .into_iter()
            .map(|t| t.token)
            .collect();
        (tokens, diagnostics.into_diagnostics())
    }

    fn brackets(source: &str) -> Vec<Token<'_>> {
        let (tokens, diagnostics) = run(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens
    }

    use Token::{
        BeginArgument as BA, BeginGroup as BG, BeginSection as BS, EndArgument as EA,
        EndGroup as EG, EndSection as ES,
    };

    #[test]
    fn test_flat_group() {
        assert_eq!(
            brackets("Theorem:\n. \"P\"\ngiven: a, b\nthen:\n. `a = b`\n"),
            [
                BG,
                BS,
                Token::Name("Theorem"),
                BA,
                Token::Text("P"),
                EA,
                ES,
                BS,
                Token::Name("given"),
                BA,
                Token::ArgumentText("a"),
                EA,
                BA,
                Token::ArgumentText("b"),
                EA,
                ES,
                BS,
                Token::Name("then"),
                BA,
                Token::Formulation("a = b"),
                EA,
                ES,
                EG,
            ]
        );
    }

    #[test]
    fn test_arguments_one_level_deeper() {
        let at_section = brackets("Axiom:\n. \"A\"\nthen:\n. `x`\n");
        let deeper = brackets("Axiom:\n  . \"A\"\nthen:\n  . `x`\n");
        assert_eq!(at_section, deeper);
    }

    #[test]
    fn test_nested_group_in_argument() {
        assert_eq!(
            brackets("then:\n. forAll: x\n  then:\n  . `x = x`\nwhere: y\n"),
            [
                BG,
                BS,
                Token::Name("then"),
                BA,
                BG,
                BS,
                Token::Name("forAll"),
                BA,
                Token::ArgumentText("x"),
                EA,
                ES,
                BS,
                Token::Name("then"),
                BA,
                Token::Formulation("x = x"),
                EA,
                ES,
                EG,
                EA,
                ES,
                BS,
                Token::Name("where"),
                BA,
                Token::ArgumentText("y"),
                EA,
                ES,
                EG,
            ]
        );
    }

    #[test]
    fn test_nested_first_section_arguments() {
        let tokens = brackets("then:\n. not:\n  . `x`\n");
        assert_eq!(
            tokens,
            [
                BG,
                BS,
                Token::Name("then"),
                BA,
                BG,
                BS,
                Token::Name("not"),
                BA,
                Token::Formulation("x"),
                EA,
                ES,
                EG,
                EA,
                ES,
                EG,
            ]
        );
    }

    #[test]
    fn test_id_on_its_own_line() {
        let tokens = brackets("[\\a]\nDescribes: a\n");
        assert_eq!(&tokens[..4], [BG, Token::Id("\\a"), BS, Token::Name("Describes")]);
    }

    #[test]
    fn test_groups_and_text_blocks() {
        let tokens = brackets("::intro::\n\nAxiom:\nthen:\n. `x`\n\nAxiom:\nthen:\n. `y`\n");
        assert_eq!(tokens[0], Token::TextBlock("intro"));
        assert_eq!(tokens.iter().filter(|t| **t == BG).count(), 2);
    }

    #[test]
    fn test_stray_indentation_is_skipped() {
        let (tokens, diagnostics) = run("Axiom:\n. \"A\"\n    garbage\n    more\nthen:\n. `x`\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].origin(), Origin::Phase3Lexer);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E200));
        assert_eq!(diagnostics[0].position().row, 2);
        assert!(tokens.contains(&Token::Name("then")));
        assert!(!tokens.contains(&Token::Name("garbage")));
    }

    #[test]
    fn test_id_without_header() {
        let (tokens, diagnostics) = run("[x]\n\nAxiom:\nthen:\n. `x`\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E202));
        assert_eq!(&tokens[..3], [BG, Token::Id("x"), EG]);
    }

    #[test]
    fn test_empty_argument() {
        let (_, diagnostics) = run("Axiom:\n.\nthen:\n. `x`\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E201));
    }
}
