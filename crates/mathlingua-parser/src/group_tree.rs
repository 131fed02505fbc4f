//! Phase 4: bracketed tokens to an untyped group tree.
//!
//! The grammar is exactly the bracket structure produced by phase 3:
//!
//! ```text
//! root     = (group | TextBlock)*
//! group    = BeginGroup Id? section* EndGroup
//! section  = BeginSection Name argument* EndSection
//! argument = BeginArgument (Text | Formulation | ArgumentText | group) EndArgument
//! ```
//!
//! Phase 3 always produces a stream of this shape, so the error path only
//! guards against a broken invariant: a malformed item is reported with
//! [`ErrorCode::E300`] and skipped one token at a time.

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use mathlingua_core::span::Span;

use crate::{
    error::{Diagnostic, DiagnosticTracker, ErrorCode, Origin},
    tokens::{PositionedToken, Token},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    Label(&'static str),
}

type Input<'a> = TokenSlice<'a, PositionedToken<'a>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

/// The contents of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal<'a> {
    /// The text between the delimiters.
    pub text: &'a str,
    /// Offset of the first byte of `text`.
    pub start: usize,
    /// Span of the whole token, delimiters included.
    pub span: Span,
}

impl<'a> Literal<'a> {
    fn of(token: &PositionedToken<'a>, text: &'a str) -> Self {
        Self {
            text,
            start: token.content_start(),
            span: token.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root<'a> {
    pub nodes: Vec<TopLevelNode<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelNode<'a> {
    Group(Group<'a>),
    TextBlock(Literal<'a>),
}

/// A group: an optional `[...]` id and its sections in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    pub id: Option<Literal<'a>>,
    pub sections: Vec<Section<'a>>,
    pub span: Span,
}

impl Group<'_> {
    /// The name of the first section, which identifies the group kind.
    pub fn head(&self) -> Option<&str> {
        self.sections.first().map(|section| section.name)
    }

    pub fn start(&self) -> usize {
        self.span.start()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub name: &'a str,
    /// Span of the section name.
    pub name_span: Span,
    pub args: Vec<Argument<'a>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument<'a> {
    pub payload: Payload<'a>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<'a> {
    Text(Literal<'a>),
    Formulation(Literal<'a>),
    ArgumentText(Literal<'a>),
    Group(Group<'a>),
}

impl Payload<'_> {
    /// A short description used in diagnostics, such as "a text".
    pub fn describe(&self) -> &'static str {
        match self {
            Payload::Text(_) => "a text",
            Payload::Formulation(_) => "a formulation",
            Payload::ArgumentText(_) => "an argument",
            Payload::Group(_) => "a group",
        }
    }
}

fn marker<'a>(input: &mut Input<'a>, expected: Token<'static>, label: &'static str) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'a>| (token.token == expected).then_some(token.span))
        .context(Context::Label(label))
        .parse_next(input)
}

fn id<'a>(input: &mut Input<'a>) -> IResult<Literal<'a>> {
    any.verify_map(|token: &PositionedToken<'a>| match token.token {
        Token::Id(text) => Some(Literal::of(token, text)),
        _ => None,
    })
    .context(Context::Label("id"))
    .parse_next(input)
}

fn name<'a>(input: &mut Input<'a>) -> IResult<(&'a str, Span)> {
    any.verify_map(|token: &PositionedToken<'a>| match token.token {
        Token::Name(name) => Some((name, token.span)),
        _ => None,
    })
    .context(Context::Label("section name"))
    .parse_next(input)
}

fn literal<'a>(input: &mut Input<'a>) -> IResult<Payload<'a>> {
    any.verify_map(|token: &PositionedToken<'a>| match token.token {
        Token::Text(text) => Some(Payload::Text(Literal::of(token, text))),
        Token::Formulation(text) => Some(Payload::Formulation(Literal::of(token, text))),
        Token::ArgumentText(text) => Some(Payload::ArgumentText(Literal::of(token, text))),
        _ => None,
    })
    .context(Context::Label("literal"))
    .parse_next(input)
}

fn argument<'a>(input: &mut Input<'a>) -> IResult<Argument<'a>> {
    let begin = marker(input, Token::BeginArgument, "argument")?;
    let payload = alt((literal, group.map(Payload::Group))).parse_next(input)?;
    let end = marker(input, Token::EndArgument, "end of argument")?;
    Ok(Argument {
        payload,
        span: begin.union(end),
    })
}

fn section<'a>(input: &mut Input<'a>) -> IResult<Section<'a>> {
    let begin = marker(input, Token::BeginSection, "section")?;
    let (name, name_span) = name(input)?;
    let args = repeat(0.., argument).parse_next(input)?;
    let end = marker(input, Token::EndSection, "end of section")?;
    Ok(Section {
        name,
        name_span,
        args,
        span: begin.union(end),
    })
}

fn group<'a>(input: &mut Input<'a>) -> IResult<Group<'a>> {
    let begin = marker(input, Token::BeginGroup, "group")?;
    let id = opt(id).parse_next(input)?;
    let sections = repeat(0.., section).parse_next(input)?;
    let end = marker(input, Token::EndGroup, "end of group")?;
    Ok(Group {
        id,
        sections,
        span: begin.union(end),
    })
}

fn text_block<'a>(input: &mut Input<'a>) -> IResult<Literal<'a>> {
    any.verify_map(|token: &PositionedToken<'a>| match token.token {
        Token::TextBlock(text) => Some(Literal::of(token, text)),
        _ => None,
    })
    .context(Context::Label("text block"))
    .parse_next(input)
}

fn top_level<'a>(input: &mut Input<'a>) -> IResult<TopLevelNode<'a>> {
    alt((group.map(TopLevelNode::Group), text_block.map(TopLevelNode::TextBlock)))
        .parse_next(input)
}

fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let offset = tokens.len() - current_remaining;
    let span = tokens
        .get(offset)
        .or_else(|| tokens.last())
        .map_or_else(Span::default, |t| t.span);

    let expected: Vec<&str> = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e
            .context()
            .map(|ctx| match ctx {
                Context::Label(label) => *label,
            })
            .collect(),
        ErrMode::Incomplete(_) => Vec::new(),
    };
    let message = match expected.as_slice() {
        [] => "Malformed structure".to_string(),
        labels => format!("Malformed structure: expected {}", labels.join(" → ")),
    };

    Diagnostic::error(Origin::Phase4Parser, message)
        .with_code(ErrorCode::E300)
        .with_label(span, ErrorCode::E300.description())
}

/// Builds the untyped group tree from a bracketed token stream.
///
/// # Examples
///
/// ```
/// use mathlingua_parser::{
///     bracket::bracket,
///     error::DiagnosticTracker,
///     group_tree::{Payload, TopLevelNode, build_tree},
///     indent::mark_indentation,
///     lexer::tokenize,
///     position::PositionTracker,
/// };
///
/// let source = "not:\n. `x`\n";
/// let positions = PositionTracker::new(source);
/// let mut diagnostics = DiagnosticTracker::new("doc.math", &positions);
/// let raw = tokenize(source, &mut diagnostics);
/// let tokens = bracket(mark_indentation(raw, &mut diagnostics), &mut diagnostics);
/// let root = build_tree(&tokens, &mut diagnostics);
///
/// let TopLevelNode::Group(group) = &root.nodes[0] else {
///     panic!("expected a group");
/// };
/// assert_eq!(group.head(), Some("not"));
/// assert!(matches!(group.sections[0].args[0].payload, Payload::Formulation(_)));
/// ```
pub fn build_tree<'a>(
    tokens: &'a [PositionedToken<'a>],
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Root<'a> {
    let mut input = TokenSlice::new(tokens);
    let mut nodes = Vec::new();
    let mut errors = 0usize;

    while input.eof_offset() > 0 {
        let checkpoint = input.checkpoint();
        match top_level.parse_next(&mut input) {
            Ok(node) => nodes.push(node),
            Err(err) => {
                diagnostics.append(convert_error(err, tokens, input.eof_offset()));
                errors += 1;
                input.reset(&checkpoint);
                let _ = input.next_token();
            }
        }
    }

    debug!(nodes = nodes.len(), errors; "Phase 4 complete");
    trace!(root:? = nodes; "Group tree");
    Root { nodes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bracket::bracket, indent::mark_indentation, lexer::tokenize, position::PositionTracker};

    fn with_tree(source: &str, check: impl FnOnce(&Root<'_>, &[Diagnostic])) {
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let raw = tokenize(source, &mut diagnostics);
        let tokens = bracket(mark_indentation(raw, &mut diagnostics), &mut diagnostics);
        let root = build_tree(&tokens, &mut diagnostics);
        check(&root, diagnostics.snapshot());
    }

    fn first_group<'r, 'a>(root: &'r Root<'a>) -> &'r Group<'a> {
        match &root.nodes[0] {
            TopLevelNode::Group(group) => group,
            other => panic!("expected a group, got {other:?}"),
        }
    }

    #[test]
    fn test_sections_and_payloads() {
        let source = "Theorem:\n. \"P\"\ngiven: a, b\nthen:\n. `a = b`\n";
        with_tree(source, |root, diagnostics| {
            assert!(diagnostics.is_empty());
            let group = first_group(root);
            let names: Vec<_> = group.sections.iter().map(|s| s.name).collect();
            assert_eq!(names, ["Theorem", "given", "then"]);

            let Payload::Text(text) = group.sections[0].args[0].payload else {
                panic!("expected a text payload");
            };
            assert_eq!(text.text, "P");
            assert_eq!(text.start, 12);
            assert_eq!(&source[text.start..text.start + 1], "P");

            assert_eq!(group.sections[1].args.len(), 2);
            assert!(matches!(group.sections[2].args[0].payload, Payload::Formulation(f) if f.text == "a = b"));
        });
    }

    #[test]
    fn test_nested_group_argument() {
        with_tree("then:\n. forAll: x\n  then:\n  . `x = x`\n", |root, diagnostics| {
            assert!(diagnostics.is_empty());
            let group = first_group(root);
            let Payload::Group(nested) = &group.sections[0].args[0].payload else {
                panic!("expected a nested group");
            };
            assert_eq!(nested.head(), Some("forAll"));
            assert_eq!(nested.sections.len(), 2);
            assert_eq!(nested.start(), 8);
        });
    }

    #[test]
    fn test_id_and_text_block() {
        with_tree("::intro::\n\n[\\a]\nDescribes: a\n", |root, diagnostics| {
            assert!(diagnostics.is_empty());
            assert_eq!(root.nodes.len(), 2);
            let TopLevelNode::TextBlock(block) = root.nodes[0] else {
                panic!("expected a text block");
            };
            assert_eq!((block.text, block.start), ("intro", 2));

            let TopLevelNode::Group(group) = &root.nodes[1] else {
                panic!("expected a group");
            };
            let id = group.id.map(|id| (id.text, id.start));
            assert_eq!(id, Some(("\\a", 12)));
        });
    }

    #[test]
    fn test_malformed_stream_is_reported() {
        let source = "x";
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let tokens = [
            PositionedToken::new(Token::BeginGroup, Span::point(0)),
            PositionedToken::new(Token::Name("x"), Span::new(0..1)),
        ];
        let root = build_tree(&tokens, &mut diagnostics);

        assert!(root.nodes.is_empty());
        let reported = diagnostics.into_diagnostics();
        assert_eq!(reported.len(), 2);
        assert!(reported.iter().all(|d| d.origin() == Origin::Phase4Parser));
        assert_eq!(reported[0].code(), Some(ErrorCode::E300));
    }
}
