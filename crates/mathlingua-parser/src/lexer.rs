//! Phase 1: characters to raw tokens.
//!
//! Lexing is line oriented. Every non-blank line becomes
//! [`Token::Indentation`], the tokens of its content, then
//! [`Token::Newline`]; runs of blank lines become a single
//! [`Token::LineBreak`]. A line whose first content is `--` is a comment
//! and produces nothing.
//!
//! The content of a line is, after an optional `[id]`, one of:
//! - `. ` followed by a nested group header or comma separated arguments
//! - a `::...::` text block
//! - a `name:` header, optionally followed by comma separated arguments
//!
//! Text and formulation literals may run over several lines. A literal
//! that is never closed is reported at its opening delimiter and keeps the
//! rest of that line, and lexing resumes on the next line.

use std::cell::Cell;

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, delimited, opt, preceded, repeat},
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location, Stream},
    token::{any, none_of, one_of, take, take_till, take_until, take_while},
};

use mathlingua_core::span::Span;

use crate::{
    error::{Diagnostic, DiagnosticTracker, ErrorCode, Origin},
    tokens::{PositionedToken, Token},
};

/// Diagnostic information for an unterminated literal.
///
/// Attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Offset of the opening delimiter.
    start: usize,
    /// Byte length of the opening delimiter.
    width: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<LexerDiagnostic>>>;

/// How much input an unterminated literal keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Line,
    Input,
}

fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn at_line_end(input: &Input<'_>) -> bool {
    let line: &str = input;
    let rest = line.strip_prefix('\r').unwrap_or(line);
    rest.is_empty() || rest.starts_with('\n')
}

fn spaces<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(0.., is_inline_space).parse_next(input)
}

fn rest_of_line<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_till(0.., '\n')
        .map(|line: &str| line.strip_suffix('\r').unwrap_or(line))
        .parse_next(input)
}

fn rest_of_input<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(0.., |_: char| true).parse_next(input)
}

/// `[A-Za-z_][A-Za-z0-9_]*` with an optional trailing `?`.
fn name<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
        opt('?'),
    )
        .take()
        .parse_next(input)
}

/// `name:` followed by whitespace or the end of the line.
fn header<'a>(input: &mut Input<'a>) -> IResult<(PositionedToken<'a>, PositionedToken<'a>)> {
    let start = input.current_token_start();
    let name = name.parse_next(input)?;
    let colon_start = input.current_token_start();
    ':'.parse_next(input)?;
    let end = input.current_token_start();

    if !at_line_end(input) && !input.starts_with(is_inline_space) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    Ok((
        PositionedToken::new(Token::Name(name), Span::new(start..colon_start)),
        PositionedToken::new(Token::Colon, Span::new(colon_start..end)),
    ))
}

/// `.` followed by whitespace or the end of the line.
fn dot_space<'a>(input: &mut Input<'a>) -> IResult<()> {
    '.'.parse_next(input)?;
    if at_line_end(input) {
        return Ok(());
    }
    one_of(is_inline_space).void().parse_next(input)
}

fn text_body<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    repeat(
        0..,
        alt((preceded('\\', any).void(), none_of(['"', '\\']).void())),
    )
    .map(|()| ())
    .take()
    .parse_next(input)
}

/// `"..."` with `\"` escapes; may span lines.
fn text<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    delimited('"', text_body, '"')
        .map(Token::Text)
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "Unterminated text literal",
            help: Some("add a closing `\"`"),
            start,
            width: 1,
        })
        .parse_next(input)
}

/// `` `...` ``; may span lines.
fn formulation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    delimited('`', take_till(0.., '`'), '`')
        .map(Token::Formulation)
        .context(LexerDiagnostic {
            code: ErrorCode::E002,
            message: "Unterminated formulation literal",
            help: Some("add a closing backtick"),
            start,
            width: 1,
        })
        .parse_next(input)
}

/// `::...::`
fn text_block<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    delimited("::", take_until(0.., "::"), "::")
        .map(Token::TextBlock)
        .context(LexerDiagnostic {
            code: ErrorCode::E003,
            message: "Unterminated text block",
            help: Some("close the block with `::`"),
            start,
            width: 2,
        })
        .parse_next(input)
}

fn id_body<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    repeat(
        0..,
        alt((
            delimited('[', id_body, ']').void(),
            none_of(['[', ']', '\n']).void(),
        )),
    )
    .map(|()| ())
    .take()
    .parse_next(input)
}

/// `[...]` with balanced brackets on one line.
fn id<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start = input.current_token_start();
    delimited('[', id_body, ']')
        .map(Token::Id)
        .context(LexerDiagnostic {
            code: ErrorCode::E004,
            message: "Unterminated id",
            help: Some("balance the brackets of the id on its line"),
            start,
            width: 1,
        })
        .parse_next(input)
}

/// Bare text up to a comma outside of brackets or the end of the line.
fn argument_text<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    let depth = Cell::new(0usize);
    take_while(1.., |c: char| match c {
        '\n' => false,
        ',' => depth.get() > 0,
        '(' | '[' | '{' => {
            depth.set(depth.get() + 1);
            true
        }
        ')' | ']' | '}' => {
            depth.set(depth.get().saturating_sub(1));
            true
        }
        _ => true,
    })
    .parse_next(input)
}

/// Characters that can start a token on a line that is not a header.
fn starts_token(c: char) -> bool {
    matches!(c, '"' | '`' | ',' | ':' | '[') || c.is_ascii_alphabetic() || c == '_'
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            self.line(&mut input);
        }
    }

    fn push(&mut self, token: Token<'a>, span: Span) {
        self.tokens.push(PositionedToken::new(token, span));
    }

    fn line(&mut self, input: &mut Input<'a>) {
        let start = input.current_token_start();
        let indentation = spaces(input).unwrap_or_default();

        if at_line_end(input) {
            Self::line_end(input);
            let after_content = self
                .tokens
                .last()
                .is_some_and(|last| last.token != Token::LineBreak);
            if after_content {
                self.push(Token::LineBreak, Span::new(start..input.current_token_start()));
            }
            return;
        }

        if input.starts_with("--") {
            Self::line_end(input);
            return;
        }

        self.push(
            Token::Indentation(indentation),
            Span::new(start..input.current_token_start()),
        );
        self.content(input);

        let newline_start = input.current_token_start();
        Self::line_end(input);
        self.push(
            Token::Newline,
            Span::new(newline_start..input.current_token_start()),
        );
    }

    /// Consumes the rest of the line and its newline.
    fn line_end(input: &mut Input<'a>) {
        let _ = rest_of_line(input);
        let _: IResult<Option<char>> = opt('\n').parse_next(input);
    }

    fn content(&mut self, input: &mut Input<'a>) {
        if input.starts_with('[') {
            self.literal(input, id, Token::Id, Recovery::Line);
            let _ = spaces(input);
            if at_line_end(input) {
                return;
            }
        }

        let start = input.current_token_start();
        let checkpoint = input.checkpoint();
        if dot_space(input).is_ok() {
            self.push(
                Token::DotSpace,
                Span::new(start..input.current_token_start()),
            );
            let _ = spaces(input);
            self.header_or(input, Self::arguments);
            return;
        }
        input.reset(&checkpoint);

        if input.starts_with("::") {
            self.literal(input, text_block, Token::TextBlock, Recovery::Input);
            self.stray(input);
            return;
        }

        self.header_or(input, Self::stray);
    }

    /// Lexes a `name:` header with its inline arguments, or falls back to
    /// `otherwise` when the line does not start with one.
    fn header_or(&mut self, input: &mut Input<'a>, otherwise: fn(&mut Self, &mut Input<'a>)) {
        let checkpoint = input.checkpoint();
        match header(input) {
            Ok((name, colon)) => {
                self.tokens.push(name);
                self.tokens.push(colon);
                self.arguments(input);
            }
            Err(_) => {
                input.reset(&checkpoint);
                otherwise(self, input);
            }
        }
    }

    /// Comma separated literals and argument text up to the end of the line.
    fn arguments(&mut self, input: &mut Input<'a>) {
        loop {
            let _ = spaces(input);
            if at_line_end(input) {
                break;
            }

            let start = input.current_token_start();
            if input.starts_with('"') {
                self.literal(input, text, Token::Text, Recovery::Line);
            } else if input.starts_with('`') {
                self.literal(input, formulation, Token::Formulation, Recovery::Line);
            } else if input.starts_with(',') {
                let _: IResult<char> = any.parse_next(input);
                self.push(Token::Comma, Span::new(start..start + 1));
            } else {
                match argument_text(input) {
                    Ok(raw) => {
                        let raw = raw.trim_end();
                        self.push(Token::ArgumentText(raw), Span::new(start..start + raw.len()));
                    }
                    Err(_) => break,
                }
            }
        }
    }

    /// Lexes a line that is neither a header nor an argument line.
    ///
    /// Recognizable tokens are kept for phase 3 to reject; runs of other
    /// characters are reported and skipped.
    fn stray(&mut self, input: &mut Input<'a>) {
        loop {
            let _ = spaces(input);
            if at_line_end(input) {
                break;
            }

            let start = input.current_token_start();
            if input.starts_with('"') {
                self.literal(input, text, Token::Text, Recovery::Line);
            } else if input.starts_with('`') {
                self.literal(input, formulation, Token::Formulation, Recovery::Line);
            } else if input.starts_with('[') {
                self.literal(input, id, Token::Id, Recovery::Line);
            } else if input.starts_with(',') || input.starts_with(':') {
                let token = match any::<_, ErrMode<ContextError<LexerDiagnostic>>>.parse_next(input) {
                    Ok(',') => Token::Comma,
                    _ => Token::Colon,
                };
                self.push(token, Span::new(start..start + 1));
            } else if let Ok(word) = name(input) {
                self.push(Token::Name(word), Span::new(start..input.current_token_start()));
            } else {
                let run: IResult<&str> =
                    take_till(1.., |c: char| starts_token(c) || c.is_whitespace()).parse_next(input);
                if run.is_err() {
                    let _: IResult<char> = any.parse_next(input);
                }
                let end = input.current_token_start();
                self.diagnostics.push(
                    Diagnostic::error(Origin::Phase1Lexer, "Unexpected character")
                        .with_code(ErrorCode::E005)
                        .with_label(Span::new(start..end), ErrorCode::E005.description()),
                );
            }
        }
    }

    /// Lexes a delimited literal, recovering when it is never closed.
    fn literal(
        &mut self,
        input: &mut Input<'a>,
        parser: fn(&mut Input<'a>) -> IResult<Token<'a>>,
        partial: fn(&'a str) -> Token<'a>,
        recovery: Recovery,
    ) {
        let start = input.current_token_start();
        let checkpoint = input.checkpoint();
        match parser(input) {
            Ok(token) => self.push(token, Span::new(start..input.current_token_start())),
            Err(err) => {
                input.reset(&checkpoint);
                let (diagnostic, width) = Self::convert_err_mode(err, start);
                self.diagnostics.push(diagnostic);

                let _: IResult<&str> = take(width).parse_next(input);
                let content = match recovery {
                    Recovery::Line => rest_of_line(input),
                    Recovery::Input => rest_of_input(input),
                }
                .unwrap_or_default();
                self.push(
                    partial(content),
                    Span::new(start..input.current_token_start()),
                );
            }
        }
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Also returns the width of the opening delimiter to skip when
    /// recovering.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> (Diagnostic, usize) {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
            width,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..*start + *width);
            let mut diag = Diagnostic::error(Origin::Phase1Lexer, *message)
                .with_code(*code)
                .with_label(span, "opened here");
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return (diag, *width);
        }

        let span = Span::new(error_pos..error_pos + 1);
        let diag = Diagnostic::error(Origin::Phase1Lexer, "Unexpected character")
            .with_code(ErrorCode::E005)
            .with_label(span, ErrorCode::E005.description());
        (diag, 1)
    }
}

/// Splits `source` into raw tokens.
///
/// Problems are appended to `diagnostics` with origin
/// [`Origin::Phase1Lexer`]; lexing always runs to the end of the input.
///
/// # Examples
///
/// ```
/// use mathlingua_parser::{
///     error::DiagnosticTracker,
///     lexer::tokenize,
///     position::PositionTracker,
///     tokens::Token,
/// };
///
/// let source = "given: x\n";
/// let positions = PositionTracker::new(source);
/// let mut diagnostics = DiagnosticTracker::new("doc.math", &positions);
/// let tokens: Vec<_> = tokenize(source, &mut diagnostics)
///     .into_iter()
///     .map(|t| t.token)
///     .collect();
///
/// assert_eq!(
///     tokens,
///     [
///         Token::Indentation(""),
///         Token::Name("given"),
///         Token::Colon,
///         Token::ArgumentText("x"),
///         Token::Newline,
///     ]
/// );
/// ```
pub fn tokenize<'a>(
    source: &'a str,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Vec<PositionedToken<'a>> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(source));

    let errors = lexer.diagnostics.len();
    for diagnostic in lexer.diagnostics {
        diagnostics.append(diagnostic);
    }

    debug!(tokens = lexer.tokens.len(), errors; "Phase 1 complete");
    trace!(tokens:? = lexer.tokens; "Raw tokens");
    lexer.tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::PositionTracker;

    fn lex(source: &str) -> (Vec<Token<'_>>, Vec<Diagnostic>) {
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let tokens = tokenize(source, &mut diagnostics)
            .into_iter()
            .map(|t| t.token)
            .collect();
        (tokens, diagnostics.into_diagnostics())
    }

    fn tokens(source: &str) -> Vec<Token<'_>> {
        let (tokens, diagnostics) = lex(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens
    }

    #[test]
    fn test_header_with_inline_arguments() {
        assert_eq!(
            tokens("given: a, b, c\n"),
            [
                Token::Indentation(""),
                Token::Name("given"),
                Token::Colon,
                Token::ArgumentText("a"),
                Token::Comma,
                Token::ArgumentText("b"),
                Token::Comma,
                Token::ArgumentText("c"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_argument_lines() {
        assert_eq!(
            tokens("Theorem:\n. \"Pythagoras\"\n  . `a^2`\n"),
            [
                Token::Indentation(""),
                Token::Name("Theorem"),
                Token::Colon,
                Token::Newline,
                Token::Indentation(""),
                Token::DotSpace,
                Token::Text("Pythagoras"),
                Token::Newline,
                Token::Indentation("  "),
                Token::DotSpace,
                Token::Formulation("a^2"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_nested_group_header_on_argument_line() {
        assert_eq!(
            tokens(". forAll: x\n"),
            [
                Token::Indentation(""),
                Token::DotSpace,
                Token::Name("forAll"),
                Token::Colon,
                Token::ArgumentText("x"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_id_before_header() {
        assert_eq!(
            tokens("[\\set{x[0]}] Describes: X\n"),
            [
                Token::Indentation(""),
                Token::Id("\\set{x[0]}"),
                Token::Name("Describes"),
                Token::Colon,
                Token::ArgumentText("X"),
                Token::Newline,
            ]
        );
        assert_eq!(
            tokens("[x]\n"),
            [Token::Indentation(""), Token::Id("x"), Token::Newline]
        );
    }

    #[test]
    fn test_metadata_section_name() {
        let lexed = tokens("Id?: \"a\"\n");
        assert_eq!(lexed[1], Token::Name("Id?"));
    }

    #[test]
    fn test_blank_lines_collapse_to_one_break() {
        assert_eq!(
            tokens("\n\na:\n\n  \n\nb:\n"),
            [
                Token::Indentation(""),
                Token::Name("a"),
                Token::Colon,
                Token::Newline,
                Token::LineBreak,
                Token::Indentation(""),
                Token::Name("b"),
                Token::Colon,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_comment_lines_are_dropped() {
        assert_eq!(
            tokens("-- about a\na:\n  -- inner\n"),
            [
                Token::Indentation(""),
                Token::Name("a"),
                Token::Colon,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_argument_text_respects_brackets() {
        assert_eq!(
            tokens(". f(a, b), {c, d}\n"),
            [
                Token::Indentation(""),
                Token::DotSpace,
                Token::ArgumentText("f(a, b)"),
                Token::Comma,
                Token::ArgumentText("{c, d}"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_colon_inside_argument_text() {
        let lexed = tokens(". x := y\n");
        assert_eq!(lexed[2], Token::ArgumentText("x := y"));
    }

    #[test]
    fn test_text_escapes_are_kept() {
        let lexed = tokens(". \"say \\\"hi\\\"\"\n");
        assert_eq!(lexed[2], Token::Text("say \\\"hi\\\""));
    }

    #[test]
    fn test_literals_span_lines() {
        assert_eq!(
            tokens(". `a +\n  b`\nthen:\n"),
            [
                Token::Indentation(""),
                Token::DotSpace,
                Token::Formulation("a +\n  b"),
                Token::Newline,
                Token::Indentation(""),
                Token::Name("then"),
                Token::Colon,
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_text_block() {
        assert_eq!(
            tokens("::some\ntext::\n"),
            [
                Token::Indentation(""),
                Token::TextBlock("some\ntext"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            tokens("a: x\r\n. y\r\n"),
            [
                Token::Indentation(""),
                Token::Name("a"),
                Token::Colon,
                Token::ArgumentText("x"),
                Token::Newline,
                Token::Indentation(""),
                Token::DotSpace,
                Token::ArgumentText("y"),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn test_spans() {
        let source = "a:\n  . \"xy\"\n";
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let lexed = tokenize(source, &mut diagnostics);

        let text = lexed
            .iter()
            .find(|t| matches!(t.token, Token::Text(_)))
            .map(|t| t.span);
        assert_eq!(text, Some(Span::new(7..11)));
        assert_eq!(lexed[4].span, Span::new(3..5));
        assert_eq!(lexed[5].span, Span::new(5..7));
    }

    mod errors {
        use super::*;

        #[test]
        fn test_unterminated_text_keeps_line() {
            let (tokens, diagnostics) = lex("Axiom:\n. \"oops\nthen:\n");
            assert!(tokens.contains(&Token::Text("oops")));
            assert!(tokens.contains(&Token::Name("then")));

            assert_eq!(diagnostics.len(), 1);
            let diagnostic = &diagnostics[0];
            assert_eq!(diagnostic.origin(), Origin::Phase1Lexer);
            assert_eq!(diagnostic.code(), Some(ErrorCode::E001));
            assert_eq!(diagnostic.position().offset, 9);
            assert_eq!(diagnostic.position().row, 1);
            assert_eq!(diagnostic.position().column, 2);
        }

        #[test]
        fn test_unterminated_formulation() {
            let (tokens, diagnostics) = lex(". `x + y\n");
            assert!(tokens.contains(&Token::Formulation("x + y")));
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E002));
        }

        #[test]
        fn test_unterminated_text_block_keeps_input() {
            let (tokens, diagnostics) = lex("::open\nmore\n");
            assert_eq!(tokens[1], Token::TextBlock("open\nmore\n"));
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E003));
        }

        #[test]
        fn test_unterminated_id() {
            let (tokens, diagnostics) = lex("[x[y]\nDescribes: x\n");
            assert_eq!(tokens[1], Token::Id("x[y]"));
            assert!(tokens.contains(&Token::Name("Describes")));
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E004));
        }

        #[test]
        fn test_unexpected_characters() {
            let (tokens, diagnostics) = lex("%% a\n");
            assert!(tokens.contains(&Token::Name("a")));
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E005));
            assert_eq!(diagnostics[0].labels()[0].span(), Span::new(0..2));
        }
    }
}
