//! Tokens shared by the structural phases.
//!
//! Phase 1 produces the raw variants. Phase 2 replaces each
//! [`Token::Indentation`] with [`Token::Indent`], [`Token::Dedent`] and
//! [`Token::SameIndent`] markers, and phase 3 adds the `Begin*`/`End*`
//! brackets that phase 4 turns into a tree.

use std::fmt;

use mathlingua_core::span::Span;

/// A token of the structural phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    // Raw tokens
    /// Leading whitespace of a line, spaces and tabs as written.
    Indentation(&'src str),
    /// `[...]`, holding the text between the outer brackets.
    Id(&'src str),
    Name(&'src str),
    Colon,
    Comma,
    /// `"..."`, holding the text between the quotes with escapes kept.
    Text(&'src str),
    /// `` `...` ``, holding the text between the backticks.
    Formulation(&'src str),
    /// `::...::`, holding the text between the markers.
    TextBlock(&'src str),
    /// Bare argument text, trimmed.
    ArgumentText(&'src str),
    /// `. ` at the start of an argument line.
    DotSpace,
    Newline,
    /// One or more blank lines.
    LineBreak,

    // Indentation markers
    Indent,
    Dedent,
    SameIndent,

    // Brackets
    BeginGroup,
    EndGroup,
    BeginSection,
    EndSection,
    BeginArgument,
    EndArgument,
}

impl Token<'_> {
    /// Whether this token is a literal argument payload.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::Text(_) | Token::Formulation(_) | Token::ArgumentText(_)
        )
    }

    /// Byte length of the opening delimiter of a literal.
    ///
    /// Adding this to a literal token's span start gives the offset of its
    /// content.
    pub fn content_offset(&self) -> usize {
        match self {
            Token::Text(_) | Token::Formulation(_) | Token::Id(_) => 1,
            Token::TextBlock(_) => 2,
            _ => 0,
        }
    }
}

/// A token with its span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }

    /// Offset of the first content byte of a literal.
    pub fn content_start(&self) -> usize {
        self.span.start() + self.token.content_offset()
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Indentation(raw) => write!(f, "Indentation({})", raw.len()),
            Token::Id(id) => write!(f, "[{id}]"),
            Token::Name(name) => write!(f, "{name}"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Text(text) => write!(f, "\"{text}\""),
            Token::Formulation(text) => write!(f, "`{text}`"),
            Token::TextBlock(text) => write!(f, "::{text}::"),
            Token::ArgumentText(text) => write!(f, "{text}"),
            Token::DotSpace => write!(f, ". "),
            Token::Newline => write!(f, "\\n"),
            Token::LineBreak => write!(f, "LineBreak"),
            Token::Indent => write!(f, "Indent"),
            Token::Dedent => write!(f, "Dedent"),
            Token::SameIndent => write!(f, "SameIndent"),
            Token::BeginGroup => write!(f, "BeginGroup"),
            Token::EndGroup => write!(f, "EndGroup"),
            Token::BeginSection => write!(f, "BeginSection"),
            Token::EndSection => write!(f, "EndSection"),
            Token::BeginArgument => write!(f, "BeginArgument"),
            Token::EndArgument => write!(f, "EndArgument"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_start_skips_delimiters() {
        let text = PositionedToken::new(Token::Text("abc"), Span::new(4..9));
        assert_eq!(text.content_start(), 5);
        let block = PositionedToken::new(Token::TextBlock("abc"), Span::new(0..7));
        assert_eq!(block.content_start(), 2);
        let argument = PositionedToken::new(Token::ArgumentText("x"), Span::new(3..4));
        assert_eq!(argument.content_start(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::Formulation("x + y").to_string(), "`x + y`");
        assert_eq!(Token::Id("\\set").to_string(), "[\\set]");
        assert_eq!(Token::Indentation("    ").to_string(), "Indentation(4)");
    }
}
