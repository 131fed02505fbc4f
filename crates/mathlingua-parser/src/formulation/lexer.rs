//! Lexer for the inline formulation language.
//!
//! Whitespace separates tokens and is dropped. Every span is absolute: the
//! lexer is handed the document offset of the literal's first content byte
//! and shifts each token by it.

use winnow::{
    Parser as _,
    combinator::{alt, opt, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location},
    token::{any, one_of, take_while},
};

use mathlingua_core::span::Span;

use super::tokens::{PositionedToken, Token};
use crate::{
    error::{Diagnostic, ErrorCode, Origin},
    position::PositionTracker,
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

const OPERATOR_CHARS: [char; 15] = [
    '+', '-', '*', '/', '<', '>', '=', '!', '&', '|', '~', '%', '@', '?', '.',
];

/// `[A-Za-z][A-Za-z0-9']*`
fn word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic()),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '\''),
    )
        .take()
        .parse_next(input)
}

fn name_or_keyword<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    word.map(|word| match word {
        "is" => Token::Is,
        "as" => Token::As,
        "in" => Token::In,
        "notin" => Token::NotIn,
        "extends" => Token::Extends,
        _ => Token::Name(word),
    })
    .parse_next(input)
}

fn number<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .map(Token::Number)
        .parse_next(input)
}

/// `\a.b.c`, or `\a.b.c/` for an infix command.
fn command<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let names = preceded('\\', separated(1.., word, '.').map(|()| ()).take())
        .parse_next(input)?;
    let infix = opt('/').parse_next(input)?;
    Ok(match infix {
        Some(_) => Token::InfixCommand(names),
        None => Token::Command(names),
    })
}

fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        ":=>".value(Token::ColonEqualsArrow),
        ":=".value(Token::ColonEquals),
        ':'.value(Token::Colon),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '{'.value(Token::LeftBrace),
        alt((
            '}'.value(Token::RightBrace),
            ','.value(Token::Comma),
            '^'.value(Token::Caret),
            '_'.value(Token::Underscore),
        )),
    ))
    .parse_next(input)
}

fn operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., OPERATOR_CHARS)
        .map(Token::Operator)
        .parse_next(input)
}

fn token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((command, number, name_or_keyword, punctuation, operator)).parse_next(input)
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<()> {
    repeat(0.., one_of(char::is_whitespace)).parse_next(input)
}

/// Splits one formulation literal into tokens.
pub(super) struct Lexer<'p> {
    positions: &'p PositionTracker,
    /// Document offset of the literal's first byte.
    base: usize,
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl<'p> Lexer<'p> {
    pub(super) fn new(positions: &'p PositionTracker, base: usize) -> Self {
        Self {
            positions,
            base,
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn tokenize<'a>(&mut self, text: &'a str) -> Vec<PositionedToken<'a>> {
        let mut input = LocatingSlice::new(text);
        let mut tokens = Vec::new();

        loop {
            let _ = whitespace(&mut input);
            if input.is_empty() {
                break;
            }

            let start = input.current_token_start();
            match token(&mut input) {
                Ok(token) => {
                    let span = Span::new(start..input.current_token_start()).shifted(self.base);
                    tokens.push(PositionedToken::new(
                        token,
                        span,
                        self.positions.start_of(span),
                    ));
                }
                Err(_) => {
                    let skipped = any::<_, ErrMode<ContextError>>.parse_next(&mut input);
                    let span = Span::new(start..input.current_token_start()).shifted(self.base);
                    let message = match skipped {
                        Ok(c) => format!("Unexpected character '{c}'"),
                        Err(_) => "Unexpected character".to_string(),
                    };
                    self.diagnostics.push(
                        Diagnostic::error(Origin::FormulationLexer, message)
                            .with_code(ErrorCode::E500)
                            .with_label(span, ErrorCode::E500.description()),
                    );
                }
            }
        }

        tokens
    }
}
