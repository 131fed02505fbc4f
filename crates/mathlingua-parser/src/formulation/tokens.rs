//! Tokens of the inline formulation language.

use std::fmt;

use mathlingua_core::span::{Position, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    Name(&'src str),
    Number(&'src str),
    /// `\a.b.c`, holding `a.b.c`.
    Command(&'src str),
    /// `\a.b/`, holding `a.b`.
    InfixCommand(&'src str),
    /// A run of operator characters such as `+`, `<=` or `!=`.
    Operator(&'src str),
    Caret,
    Underscore,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Colon,
    /// `:=`
    ColonEquals,
    /// `:=>`
    ColonEqualsArrow,

    // Keywords
    Is,
    As,
    In,
    NotIn,
    Extends,
}

impl Token<'_> {
    /// Whether this token can begin an operand.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Name(_)
                | Token::Number(_)
                | Token::Command(_)
                | Token::LeftParen
                | Token::LeftBrace
        )
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(text) | Token::Number(text) | Token::Operator(text) => f.write_str(text),
            Token::Command(names) => write!(f, "\\{names}"),
            Token::InfixCommand(names) => write!(f, "\\{names}/"),
            Token::Caret => f.write_str("^"),
            Token::Underscore => f.write_str("_"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::LeftBracket => f.write_str("["),
            Token::RightBracket => f.write_str("]"),
            Token::LeftBrace => f.write_str("{"),
            Token::RightBrace => f.write_str("}"),
            Token::Comma => f.write_str(","),
            Token::Colon => f.write_str(":"),
            Token::ColonEquals => f.write_str(":="),
            Token::ColonEqualsArrow => f.write_str(":=>"),
            Token::Is => f.write_str("is"),
            Token::As => f.write_str("as"),
            Token::In => f.write_str("in"),
            Token::NotIn => f.write_str("notin"),
            Token::Extends => f.write_str("extends"),
        }
    }
}

/// A token with its absolute span and the resolved position of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub start: Position,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, start: Position) -> Self {
        Self { token, span, start }
    }
}
