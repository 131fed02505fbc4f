//! The inline formulation language.
//!
//! Formulation text appears in backtick literals, ids, and some argument
//! text. Each entry point lexes and parses one literal, reports problems
//! to the document's [`DiagnosticTracker`] with absolute spans, and
//! returns `None` when the literal is not a valid formulation.
//!
//! # Example
//!
//! ```
//! # use mathlingua_parser::error::DiagnosticTracker;
//! # use mathlingua_parser::formulation::parse_expression;
//! # use mathlingua_parser::position::PositionTracker;
//!
//! let source = "x + y * z";
//! let positions = PositionTracker::new(source);
//! let mut diagnostics = DiagnosticTracker::new("inline.math", &positions);
//!
//! let expression = parse_expression(source, 0, &mut diagnostics).unwrap();
//! assert_eq!(expression.to_string(), "x + y * z");
//! assert!(diagnostics.is_empty());
//! ```

mod lexer;
mod parser;
mod tokens;

use log::trace;

use mathlingua_core::ast::{Expression, Signature};

pub use tokens::{PositionedToken, Token};

use crate::error::{Diagnostic, DiagnosticTracker};
use lexer::Lexer;

type Rule<O> = for<'a> fn(&'a [PositionedToken<'a>], usize) -> Result<O, Diagnostic>;

fn parse_literal<O>(
    text: &str,
    offset: usize,
    diagnostics: &mut DiagnosticTracker<'_>,
    rule: Rule<O>,
) -> Option<O> {
    let mut lexer = Lexer::new(diagnostics.positions(), offset);
    let tokens = lexer.tokenize(text);

    let lexed_cleanly = lexer.diagnostics.is_empty();
    for diagnostic in lexer.diagnostics {
        diagnostics.append(diagnostic);
    }
    if !lexed_cleanly {
        return None;
    }

    match rule(&tokens, offset + text.len()) {
        Ok(output) => Some(output),
        Err(diagnostic) => {
            trace!(text, offset; "Formulation rejected");
            diagnostics.append(diagnostic);
            None
        }
    }
}

/// Parses a full formulation such as `f(x) := x^2` or `a, b is \set`.
///
/// `offset` is the document offset of the first byte of `text`.
pub fn parse_expression(
    text: &str,
    offset: usize,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<Expression> {
    parse_literal(text, offset, diagnostics, parser::expression)
}

/// Parses a command signature such as `\set.of:in`.
pub fn parse_signature(
    text: &str,
    offset: usize,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<Signature> {
    parse_literal(text, offset, diagnostics, parser::command_signature)
}

/// Parses a target form: a name with optional subscript and parameters, a
/// tuple or set of forms, or a command, optionally followed by `:=` and a
/// definition.
pub fn parse_form(
    text: &str,
    offset: usize,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<Expression> {
    parse_literal(text, offset, diagnostics, parser::target)
}

/// Parses the bracketed id above a group.
pub fn parse_id(
    text: &str,
    offset: usize,
    diagnostics: &mut DiagnosticTracker<'_>,
) -> Option<Expression> {
    parse_literal(text, offset, diagnostics, parser::expression)
}

#[cfg(test)]
mod tests {
    use mathlingua_core::span::{Position, Span};

    use super::*;
    use crate::{
        error::{ErrorCode, Origin},
        position::PositionTracker,
    };

    fn expression(source: &str) -> Expression {
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let expression = parse_expression(source, 0, &mut diagnostics);
        assert!(
            diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            diagnostics.snapshot()
        );
        expression.expect("expression should parse")
    }

    fn failure(source: &str) -> Vec<Diagnostic> {
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        assert_eq!(parse_expression(source, 0, &mut diagnostics), None);
        diagnostics.into_diagnostics()
    }

    fn name(name: &str, offset: usize) -> Expression {
        Expression::Name {
            name: name.to_string(),
            start: Position::new(offset, 0, offset),
        }
    }

    #[test]
    fn test_precedence_climbs() {
        let parsed = expression("a + b * c");
        let Expression::Infix { op, lhs, rhs, .. } = parsed else {
            panic!("expected an infix expression");
        };
        assert_eq!(op, "+");
        assert_eq!(*lhs, name("a", 0));
        assert!(matches!(*rhs, Expression::Infix { ref op, .. } if op == "*"));
    }

    #[test]
    fn test_left_associative_subtraction() {
        let parsed = expression("a - b - c");
        let Expression::Infix { lhs, rhs, .. } = parsed else {
            panic!("expected an infix expression");
        };
        assert!(matches!(*lhs, Expression::Infix { .. }));
        assert_eq!(*rhs, name("c", 8));
    }

    #[test]
    fn test_power_is_right_associative() {
        let parsed = expression("a ^ b ^ c");
        let Expression::Infix { lhs, rhs, .. } = parsed else {
            panic!("expected an infix expression");
        };
        assert_eq!(*lhs, name("a", 0));
        assert!(matches!(*rhs, Expression::Infix { ref op, .. } if op == "^"));
    }

    #[test]
    fn test_prefix_binds_looser_than_call() {
        let parsed = expression("-f(x)");
        let Expression::Prefix { op, operand, .. } = parsed else {
            panic!("expected a prefix expression");
        };
        assert_eq!(op, "-");
        assert!(matches!(*operand, Expression::Call { .. }));
    }

    #[test]
    fn test_postfix_factorial() {
        let parsed = expression("n! = m");
        let Expression::Infix { lhs, .. } = parsed else {
            panic!("expected an infix expression");
        };
        assert!(matches!(*lhs, Expression::Postfix { ref op, .. } if op == "!"));
    }

    #[test]
    fn test_is_takes_comma_lists() {
        let parsed = expression("a, b is \\set");
        let Expression::Is { lhs, rhs, start } = parsed else {
            panic!("expected an is expression");
        };
        assert_eq!(lhs, [name("a", 0), name("b", 3)]);
        assert_eq!(rhs.len(), 1);
        assert_eq!(start.column, 0);
    }

    #[test]
    fn test_declaration_and_alias() {
        assert!(matches!(
            expression("f(x) := x^2"),
            Expression::Declaration { .. }
        ));
        let parsed = expression("a \\op/ b :=> \\op{a, b}");
        let Expression::Alias { target, value, .. } = parsed else {
            panic!("expected an alias");
        };
        assert!(matches!(*target, Expression::Infix { ref op, .. } if op == "\\op/"));
        assert!(matches!(*value, Expression::Command(_)));
    }

    #[test]
    fn test_command_parts() {
        let parsed = expression("\\set.of[x]_{n}{A}:in{B}(y)");
        let Expression::Command(command) = parsed else {
            panic!("expected a command");
        };
        assert_eq!(command.names, ["set", "of"]);
        assert_eq!(command.square.as_deref(), Some(&[name("x", 8)][..]));
        assert_eq!(command.subscript.as_ref().map(Vec::len), Some(1));
        assert_eq!(command.superscript, None);
        assert_eq!(command.curly.as_ref().map(Vec::len), Some(1));
        assert_eq!(command.named.len(), 1);
        assert_eq!(command.named[0].name, "in");
        assert_eq!(command.paren.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_grouped_tuple_and_set() {
        assert!(matches!(expression("(a)"), Expression::Grouped { .. }));
        assert!(matches!(expression("(a, b)"), Expression::Tuple { ref items, .. } if items.len() == 2));
        assert!(matches!(expression("{a, b, c}"), Expression::Set { ref items, .. } if items.len() == 3));
    }

    #[test]
    fn test_membership_and_as() {
        let parsed = expression("x in A as \\set");
        let Expression::As { lhs, .. } = parsed else {
            panic!("expected an as expression");
        };
        assert!(matches!(*lhs, Expression::Infix { ref op, .. } if op == "in"));
    }

    #[test]
    fn test_positions_are_absolute() {
        let source = "Defines: `x + y`";
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let parsed = parse_expression("x + y", 10, &mut diagnostics).expect("should parse");
        let Expression::Infix { rhs, start, .. } = parsed else {
            panic!("expected an infix expression");
        };
        assert_eq!(start, Position::new(10, 0, 10));
        assert_eq!(rhs.start(), Position::new(14, 0, 14));
    }

    #[test]
    fn test_signature() {
        let source = "\\set.of:in:as";
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let signature = parse_signature(source, 0, &mut diagnostics).expect("should parse");
        assert_eq!(signature.names, ["set", "of"]);
        assert_eq!(signature.named, ["in", "as"]);
    }

    #[test]
    fn test_forms() {
        let source = "f_{i}(x, (y, z)) := x";
        let positions = PositionTracker::new(source);
        let mut diagnostics = DiagnosticTracker::new("test.math", &positions);
        let form = parse_form(source, 0, &mut diagnostics).expect("should parse");
        let Expression::Declaration { target, .. } = form else {
            panic!("expected a declaration");
        };
        let Expression::Call { target, args, .. } = *target else {
            panic!("expected a call");
        };
        assert!(matches!(*target, Expression::Subscript { .. }));
        assert!(matches!(args[1], Expression::Tuple { .. }));
        assert!(diagnostics.is_empty());
    }

    mod errors {
        use super::*;

        #[test]
        fn test_unexpected_token() {
            let diagnostics = failure("a + )");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].origin(), Origin::FormulationParser);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E501));
            assert_eq!(diagnostics[0].primary_span(), Some(Span::new(4..5)));
        }

        #[test]
        fn test_unexpected_end() {
            let diagnostics = failure("f(x");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E502));
            assert_eq!(diagnostics[0].primary_span(), Some(Span::point(3)));
        }

        #[test]
        fn test_empty_formulation() {
            let diagnostics = failure("");
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E502));
        }

        #[test]
        fn test_trailing_tokens() {
            let diagnostics = failure("a b");
            assert_eq!(diagnostics[0].code(), Some(ErrorCode::E501));
            assert_eq!(diagnostics[0].primary_span(), Some(Span::new(2..3)));
        }

        #[test]
        fn test_list_without_is() {
            let diagnostics = failure("a, b");
            assert_eq!(diagnostics.len(), 1);
        }

        #[test]
        fn test_lexer_errors_stop_parsing() {
            let diagnostics = failure("a # b");
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].origin(), Origin::FormulationLexer);
        }
    }
}
