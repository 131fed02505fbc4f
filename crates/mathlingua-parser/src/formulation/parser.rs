//! Pratt parser for the inline formulation language.
//!
//! Binding powers, loosest first:
//!
//! | Level | Operators | Associativity |
//! |---|---|---|
//! | declaration | `:=` `:=>` | none |
//! | spec | `is` `extends` over comma lists | none |
//! | 10 | `as` | left |
//! | 20 | `in` `notin` | left |
//! | 30 | relational operators, `\op/` | left |
//! | 40 | `+` `-` | left |
//! | 50 | `*` `/` `%` | left |
//! | 60 | prefix operators | |
//! | 70 | `^` | right |
//! | 80 | postfix `!`, calls, subscripts | |

use winnow::{
    Parser as _,
    combinator::{preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use mathlingua_core::{
    ast::{Command, Expression, NamedArg, Signature},
    span::{Position, Span},
};

use super::tokens::{PositionedToken, Token};
use crate::error::{Diagnostic, ErrorCode, Origin};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    /// What the parser expected at the failure point.
    Label(&'static str),
}

type Input<'a> = TokenSlice<'a, PositionedToken<'a>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

const PREFIX_BP: u8 = 60;
const POSTFIX_BP: u8 = 80;

const POSTFIX_OPERATORS: &[&str] = &["!"];

fn failure(label: &'static str) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    ErrMode::Backtrack(e)
}

fn peek<'a>(input: &Input<'a>) -> Option<Token<'a>> {
    input.peek_token().map(|t| t.token)
}

/// The next two tokens, without consuming them.
fn peek_pair<'a>(input: &mut Input<'a>) -> (Option<Token<'a>>, Option<Token<'a>>) {
    let checkpoint = input.checkpoint();
    let first = input.next_token().map(|t| t.token);
    let second = input.next_token().map(|t| t.token);
    input.reset(&checkpoint);
    (first, second)
}

fn eat<'a>(input: &mut Input<'a>, expected: Token<'static>) -> bool {
    if peek(input) == Some(expected) {
        let _ = input.next_token();
        true
    } else {
        false
    }
}

fn expect<'a>(input: &mut Input<'a>, expected: Token<'static>, label: &'static str) -> IResult<()> {
    any.verify(|token: &PositionedToken<'a>| token.token == expected)
        .void()
        .context(Context::Label(label))
        .parse_next(input)
}

fn comma<'a>(input: &mut Input<'a>) -> IResult<()> {
    expect(input, Token::Comma, "','")
}

/// `formulation := spec ((':=' | ':=>') spec)?`
fn formulation<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    let lhs = spec(input)?;
    let start = lhs.start();
    if eat(input, Token::ColonEquals) {
        let value = spec(input)?;
        return Ok(Expression::Declaration {
            target: Box::new(lhs),
            value: Box::new(value),
            start,
        });
    }
    if eat(input, Token::ColonEqualsArrow) {
        let value = spec(input)?;
        return Ok(Expression::Alias {
            target: Box::new(lhs),
            value: Box::new(value),
            start,
        });
    }
    Ok(lhs)
}

/// `spec := list (('is' | 'extends') list)?`
///
/// A comma list is only valid on the left of `is` or `extends`.
fn spec<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    let mut lhs: Vec<Expression> = separated(1.., |i: &mut Input<'a>| binary(i, 0), comma)
        .context(Context::Label("an expression"))
        .parse_next(input)?;
    let start = lhs.first().map(Expression::start).unwrap_or_default();

    if eat(input, Token::Is) {
        let rhs = separated(1.., |i: &mut Input<'a>| binary(i, 0), comma)
            .context(Context::Label("a type after 'is'"))
            .parse_next(input)?;
        return Ok(Expression::Is { lhs, rhs, start });
    }
    if eat(input, Token::Extends) {
        let rhs = separated(1.., |i: &mut Input<'a>| binary(i, 0), comma)
            .context(Context::Label("a type after 'extends'"))
            .parse_next(input)?;
        return Ok(Expression::Extends { lhs, rhs, start });
    }

    match lhs.len() {
        1 => Ok(lhs.remove(0)),
        _ => Err(failure("'is' or 'extends' after a list")),
    }
}

/// An element of a bracketed list: an operator expression, optionally
/// restricted with `is` or `extends`.
fn item<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    let lhs = binary(input, 0)?;
    let start = lhs.start();
    if eat(input, Token::Is) {
        let rhs = binary(input, 0)?;
        return Ok(Expression::Is {
            lhs: vec![lhs],
            rhs: vec![rhs],
            start,
        });
    }
    if eat(input, Token::Extends) {
        let rhs = binary(input, 0)?;
        return Ok(Expression::Extends {
            lhs: vec![lhs],
            rhs: vec![rhs],
            start,
        });
    }
    Ok(lhs)
}

/// Comma separated items up to `close`, the opening token already consumed.
fn items<'a>(
    input: &mut Input<'a>,
    element: fn(&mut Input<'a>) -> IResult<Expression>,
    close: Token<'static>,
    label: &'static str,
) -> IResult<Vec<Expression>> {
    if eat(input, close) {
        return Ok(Vec::new());
    }
    let items = separated(1.., element, comma).parse_next(input)?;
    expect(input, close, label)?;
    Ok(items)
}

/// A bracketed item list if the next token is `open`.
fn bracketed<'a>(
    input: &mut Input<'a>,
    open: Token<'static>,
    close: Token<'static>,
    label: &'static str,
) -> IResult<Option<Vec<Expression>>> {
    if eat(input, open) {
        items(input, item, close, label).map(Some)
    } else {
        Ok(None)
    }
}

fn infix_binding(token: Token<'_>) -> Option<(String, u8, u8)> {
    let binding = match token {
        Token::As => ("as".to_string(), 10, 11),
        Token::In => ("in".to_string(), 20, 21),
        Token::NotIn => ("notin".to_string(), 20, 21),
        Token::InfixCommand(names) => (format!("\\{names}/"), 30, 31),
        Token::Operator(op @ ("+" | "-")) => (op.to_string(), 40, 41),
        Token::Operator(op @ ("*" | "/" | "%")) => (op.to_string(), 50, 51),
        Token::Operator(op) => (op.to_string(), 30, 31),
        Token::Caret => ("^".to_string(), 71, 70),
        _ => return None,
    };
    Some(binding)
}

/// Operator expressions at or above `min_bp`.
fn binary<'a>(input: &mut Input<'a>, min_bp: u8) -> IResult<Expression> {
    let mut lhs = prefix(input)?;

    loop {
        let (next, after) = peek_pair(input);
        let Some(next) = next else {
            break;
        };

        match next {
            Token::LeftParen if POSTFIX_BP >= min_bp => {
                let _ = input.next_token();
                let args = items(input, item, Token::RightParen, "')'")?;
                let start = lhs.start();
                lhs = Expression::Call {
                    target: Box::new(lhs),
                    args,
                    start,
                };
                continue;
            }
            Token::Underscore if POSTFIX_BP >= min_bp => {
                let _ = input.next_token();
                let indices = subscript(input)?;
                let start = lhs.start();
                lhs = Expression::Subscript {
                    target: Box::new(lhs),
                    indices,
                    start,
                };
                continue;
            }
            Token::Operator(op)
                if POSTFIX_OPERATORS.contains(&op)
                    && !after.is_some_and(|t| t.starts_operand()) =>
            {
                let _ = input.next_token();
                let start = lhs.start();
                lhs = Expression::Postfix {
                    op: op.to_string(),
                    operand: Box::new(lhs),
                    start,
                };
                continue;
            }
            _ => {}
        }

        let Some((op, l_bp, r_bp)) = infix_binding(next) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }
        let _ = input.next_token();
        let rhs = binary(input, r_bp)?;
        let start = lhs.start();
        lhs = match next {
            Token::As => Expression::As {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                start,
            },
            _ => Expression::Infix {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                start,
            },
        };
    }

    Ok(lhs)
}

/// `_{a, b}` or `_a`, the underscore already consumed.
fn subscript<'a>(input: &mut Input<'a>) -> IResult<Vec<Expression>> {
    if eat(input, Token::LeftBrace) {
        return items(input, item, Token::RightBrace, "'}'");
    }
    let index = any
        .verify_map(|token: &PositionedToken<'a>| match token.token {
            Token::Name(name) => Some(Expression::Name {
                name: name.to_string(),
                start: token.start,
            }),
            Token::Number(value) => Some(Expression::Number {
                value: value.to_string(),
                start: token.start,
            }),
            _ => None,
        })
        .context(Context::Label("a subscript"))
        .parse_next(input)?;
    Ok(vec![index])
}

fn prefix<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    match input.peek_token().copied() {
        Some(PositionedToken {
            token: Token::Operator(op),
            start,
            ..
        }) => {
            let _ = input.next_token();
            let operand = binary(input, PREFIX_BP)?;
            Ok(Expression::Prefix {
                op: op.to_string(),
                operand: Box::new(operand),
                start,
            })
        }
        _ => primary(input),
    }
}

fn primary<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    let token = any
        .verify(|token: &PositionedToken<'a>| token.token.starts_operand())
        .context(Context::Label("an operand"))
        .parse_next(input)?;
    let start = token.start;

    match token.token {
        Token::Name(name) => Ok(Expression::Name {
            name: name.to_string(),
            start,
        }),
        Token::Number(value) => Ok(Expression::Number {
            value: value.to_string(),
            start,
        }),
        Token::Command(names) => command(input, names, start),
        Token::LeftParen => {
            let mut items = items(input, item, Token::RightParen, "')'")?;
            if items.len() == 1 {
                Ok(Expression::Grouped {
                    inner: Box::new(items.remove(0)),
                    start,
                })
            } else {
                Ok(Expression::Tuple { items, start })
            }
        }
        Token::LeftBrace => {
            let items = items(input, item, Token::RightBrace, "'}'")?;
            Ok(Expression::Set { items, start })
        }
        _ => Err(failure("an operand")),
    }
}

/// Name of a `:name` part; keywords are allowed.
fn part_name<'a>(input: &mut Input<'a>) -> IResult<String> {
    any.verify_map(|token: &PositionedToken<'a>| match token.token {
        Token::Name(name) => Some(name.to_string()),
        Token::Is | Token::As | Token::In | Token::NotIn | Token::Extends => {
            Some(token.token.to_string())
        }
        _ => None,
    })
    .context(Context::Label("a name after ':'"))
    .parse_next(input)
}

/// The parts of a command after `\a.b`.
fn command<'a>(input: &mut Input<'a>, names: &str, start: Position) -> IResult<Expression> {
    let names = names.split('.').map(str::to_string).collect();
    let square = bracketed(input, Token::LeftBracket, Token::RightBracket, "']'")?;

    let subscript = match peek_pair(input) {
        (Some(Token::Underscore), Some(Token::LeftBrace)) => {
            let _ = input.next_token();
            bracketed(input, Token::LeftBrace, Token::RightBrace, "'}'")?
        }
        _ => None,
    };
    let superscript = match peek_pair(input) {
        (Some(Token::Caret), Some(Token::LeftBrace)) => {
            let _ = input.next_token();
            bracketed(input, Token::LeftBrace, Token::RightBrace, "'}'")?
        }
        _ => None,
    };
    let curly = bracketed(input, Token::LeftBrace, Token::RightBrace, "'}'")?;

    let mut named = Vec::new();
    while eat(input, Token::Colon) {
        let name = part_name(input)?;
        let args = bracketed(input, Token::LeftBrace, Token::RightBrace, "'}'")?;
        named.push(NamedArg { name, args });
    }

    let paren = bracketed(input, Token::LeftParen, Token::RightParen, "')'")?;

    Ok(Expression::Command(Command {
        names,
        square,
        subscript,
        superscript,
        curly,
        named,
        paren,
        start,
    }))
}

/// `\a.b(:name)*`
fn signature<'a>(input: &mut Input<'a>) -> IResult<Signature> {
    let (names, start) = any
        .verify_map(|token: &PositionedToken<'a>| match token.token {
            Token::Command(names) => Some((names, token.start)),
            _ => None,
        })
        .context(Context::Label("a command signature"))
        .parse_next(input)?;
    let named = repeat(0.., preceded(|i: &mut Input<'a>| expect(i, Token::Colon, "':'"), part_name))
        .parse_next(input)?;
    Ok(Signature {
        names: names.split('.').map(str::to_string).collect(),
        named,
        start,
    })
}

/// `form := core (':=' formulation)?`
fn form<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    let target = form_core(input)?;
    if eat(input, Token::ColonEquals) {
        let start = target.start();
        let value = formulation(input)?;
        return Ok(Expression::Declaration {
            target: Box::new(target),
            value: Box::new(value),
            start,
        });
    }
    Ok(target)
}

/// A name with optional subscript and parameters, a tuple, a set, or a
/// command.
fn form_core<'a>(input: &mut Input<'a>) -> IResult<Expression> {
    let token = any
        .verify(|token: &PositionedToken<'a>| {
            matches!(
                token.token,
                Token::Name(_) | Token::Command(_) | Token::LeftParen | Token::LeftBrace
            )
        })
        .context(Context::Label("a name, tuple, or set"))
        .parse_next(input)?;
    let start = token.start;

    match token.token {
        Token::Name(name) => {
            let mut target = Expression::Name {
                name: name.to_string(),
                start,
            };
            if eat(input, Token::Underscore) {
                let indices = subscript(input)?;
                target = Expression::Subscript {
                    target: Box::new(target),
                    indices,
                    start,
                };
            }
            if eat(input, Token::LeftParen) {
                let args = items(input, form_core, Token::RightParen, "')'")?;
                target = Expression::Call {
                    target: Box::new(target),
                    args,
                    start,
                };
            }
            Ok(target)
        }
        Token::Command(names) => command(input, names, start),
        Token::LeftParen => {
            let items = items(input, form_core, Token::RightParen, "')'")?;
            Ok(Expression::Tuple { items, start })
        }
        Token::LeftBrace => {
            let items = items(input, form_core, Token::RightBrace, "'}'")?;
            Ok(Expression::Set { items, start })
        }
        _ => Err(failure("a name, tuple, or set")),
    }
}

/// Converts a parse failure into a diagnostic at the offending token, or at
/// `end` when the input ran out.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
    end: usize,
) -> Diagnostic {
    let expected = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().next().map(|ctx| match ctx {
            Context::Label(label) => *label,
        }),
        ErrMode::Incomplete(_) => None,
    };

    let offset = tokens.len() - current_remaining;
    match tokens.get(offset) {
        Some(token) => {
            let message = match expected {
                Some(label) => format!("Unexpected token '{}', expected {label}", token.token),
                None => format!("Unexpected token '{}'", token.token),
            };
            Diagnostic::error(Origin::FormulationParser, message)
                .with_code(ErrorCode::E501)
                .with_label(token.span, ErrorCode::E501.description())
        }
        None => {
            let message = match expected {
                Some(label) => format!("Unexpected end of formulation, expected {label}"),
                None => "Unexpected end of formulation".to_string(),
            };
            Diagnostic::error(Origin::FormulationParser, message)
                .with_code(ErrorCode::E502)
                .with_label(Span::point(end), ErrorCode::E502.description())
        }
    }
}

/// Runs `rule` over the whole of `tokens`.
fn run<'a, O>(
    tokens: &'a [PositionedToken<'a>],
    end: usize,
    rule: fn(&mut Input<'a>) -> IResult<O>,
) -> Result<O, Diagnostic> {
    let mut input = TokenSlice::new(tokens);
    match rule(&mut input) {
        Ok(output) if input.eof_offset() == 0 => Ok(output),
        Ok(_) => Err(convert_error(
            failure("the end of the formulation"),
            tokens,
            input.eof_offset(),
            end,
        )),
        Err(e) => Err(convert_error(e, tokens, input.eof_offset(), end)),
    }
}

pub(super) fn expression<'a>(tokens: &'a [PositionedToken<'a>], end: usize) -> Result<Expression, Diagnostic> {
    run(tokens, end, formulation)
}

pub(super) fn target<'a>(tokens: &'a [PositionedToken<'a>], end: usize) -> Result<Expression, Diagnostic> {
    run(tokens, end, form)
}

pub(super) fn command_signature<'a>(
    tokens: &'a [PositionedToken<'a>],
    end: usize,
) -> Result<Signature, Diagnostic> {
    run(tokens, end, signature)
}
