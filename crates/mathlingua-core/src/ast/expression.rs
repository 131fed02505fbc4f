//! Formulation trees.
//!
//! These are produced by the formulation parser from the contents of
//! backtick literals, ids, and argument text. Every variant records the
//! absolute document position of its first character.

use std::fmt;

use crate::span::Position;

/// A node of the inline formulation language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Name {
        name: String,
        start: Position,
    },
    Number {
        value: String,
        start: Position,
    },
    /// `f(x, y)`
    Call {
        target: Box<Expression>,
        args: Vec<Expression>,
        start: Position,
    },
    /// `x_i` or `x_{i, j}`
    Subscript {
        target: Box<Expression>,
        indices: Vec<Expression>,
        start: Position,
    },
    /// `(a, b)`
    Tuple {
        items: Vec<Expression>,
        start: Position,
    },
    /// `{a, b}`
    Set {
        items: Vec<Expression>,
        start: Position,
    },
    /// `(a)`
    Grouped {
        inner: Box<Expression>,
        start: Position,
    },
    Command(Command),
    Prefix {
        op: String,
        operand: Box<Expression>,
        start: Position,
    },
    Postfix {
        op: String,
        operand: Box<Expression>,
        start: Position,
    },
    Infix {
        op: String,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        start: Position,
    },
    /// `a, b is \set`
    Is {
        lhs: Vec<Expression>,
        rhs: Vec<Expression>,
        start: Position,
    },
    /// `a, b extends \set`
    Extends {
        lhs: Vec<Expression>,
        rhs: Vec<Expression>,
        start: Position,
    },
    /// `x as \real`
    As {
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        start: Position,
    },
    /// `f(x) := y`
    Declaration {
        target: Box<Expression>,
        value: Box<Expression>,
        start: Position,
    },
    /// `a \op/ b :=> \op{a, b}`
    Alias {
        target: Box<Expression>,
        value: Box<Expression>,
        start: Position,
    },
}

/// `\name.name[square]_{sub}^{sup}{curly}:named{...}(paren)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub names: Vec<String>,
    pub square: Option<Vec<Expression>>,
    pub subscript: Option<Vec<Expression>>,
    pub superscript: Option<Vec<Expression>>,
    pub curly: Option<Vec<Expression>>,
    pub named: Vec<NamedArg>,
    pub paren: Option<Vec<Expression>>,
    pub start: Position,
}

/// A `:name{args}` part of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArg {
    pub name: String,
    pub args: Option<Vec<Expression>>,
}

/// `\name.name:named:named`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub names: Vec<String>,
    pub named: Vec<String>,
    pub start: Position,
}

impl Expression {
    pub fn start(&self) -> Position {
        match self {
            Expression::Command(command) => command.start,
            Expression::Name { start, .. }
            | Expression::Number { start, .. }
            | Expression::Call { start, .. }
            | Expression::Subscript { start, .. }
            | Expression::Tuple { start, .. }
            | Expression::Set { start, .. }
            | Expression::Grouped { start, .. }
            | Expression::Prefix { start, .. }
            | Expression::Postfix { start, .. }
            | Expression::Infix { start, .. }
            | Expression::Is { start, .. }
            | Expression::Extends { start, .. }
            | Expression::As { start, .. }
            | Expression::Declaration { start, .. }
            | Expression::Alias { start, .. } => *start,
        }
    }

    /// Visits direct sub-expressions in source order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(&Expression)) {
        match self {
            Expression::Name { .. } | Expression::Number { .. } => {}
            Expression::Call { target, args, .. } => {
                f(target);
                args.iter().for_each(|arg| f(arg));
            }
            Expression::Subscript {
                target, indices, ..
            } => {
                f(target);
                indices.iter().for_each(|index| f(index));
            }
            Expression::Tuple { items, .. } | Expression::Set { items, .. } => {
                items.iter().for_each(|item| f(item));
            }
            Expression::Grouped { inner, .. } => f(inner),
            Expression::Command(command) => command.for_each_child(f),
            Expression::Prefix { operand, .. } | Expression::Postfix { operand, .. } => f(operand),
            Expression::Infix { lhs, rhs, .. } | Expression::As { lhs, rhs, .. } => {
                f(lhs);
                f(rhs);
            }
            Expression::Is { lhs, rhs, .. } | Expression::Extends { lhs, rhs, .. } => {
                lhs.iter().chain(rhs).for_each(|side| f(side));
            }
            Expression::Declaration { target, value, .. }
            | Expression::Alias { target, value, .. } => {
                f(target);
                f(value);
            }
        }
    }

    /// Whether this is a bare name.
    pub fn is_name(&self) -> bool {
        matches!(self, Expression::Name { .. })
    }
}

impl Command {
    fn for_each_child(&self, f: &mut dyn FnMut(&Expression)) {
        let groups = [&self.square, &self.subscript, &self.superscript, &self.curly];
        for group in groups.into_iter().flatten() {
            group.iter().for_each(|arg| f(arg));
        }
        for named in &self.named {
            named.args.iter().flatten().for_each(|arg| f(arg));
        }
        self.paren.iter().flatten().for_each(|arg| f(arg));
    }
}

struct Joined<'a>(&'a [Expression]);

impl fmt::Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, item) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            item.fmt(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Name { name, .. } => f.write_str(name),
            Expression::Number { value, .. } => f.write_str(value),
            Expression::Call { target, args, .. } => write!(f, "{target}({})", Joined(args)),
            Expression::Subscript {
                target, indices, ..
            } => match indices.as_slice() {
                [single @ (Expression::Name { .. } | Expression::Number { .. })] => {
                    write!(f, "{target}_{single}")
                }
                _ => write!(f, "{target}_{{{}}}", Joined(indices)),
            },
            Expression::Tuple { items, .. } => write!(f, "({})", Joined(items)),
            Expression::Set { items, .. } => write!(f, "{{{}}}", Joined(items)),
            Expression::Grouped { inner, .. } => write!(f, "({inner})"),
            Expression::Command(command) => command.fmt(f),
            Expression::Prefix { op, operand, .. } => write!(f, "{op}{operand}"),
            Expression::Postfix { op, operand, .. } => write!(f, "{operand}{op}"),
            Expression::Infix { op, lhs, rhs, .. } => write!(f, "{lhs} {op} {rhs}"),
            Expression::Is { lhs, rhs, .. } => write!(f, "{} is {}", Joined(lhs), Joined(rhs)),
            Expression::Extends { lhs, rhs, .. } => {
                write!(f, "{} extends {}", Joined(lhs), Joined(rhs))
            }
            Expression::As { lhs, rhs, .. } => write!(f, "{lhs} as {rhs}"),
            Expression::Declaration { target, value, .. } => write!(f, "{target} := {value}"),
            Expression::Alias { target, value, .. } => write!(f, "{target} :=> {value}"),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.names.join("."))?;
        if let Some(square) = &self.square {
            write!(f, "[{}]", Joined(square))?;
        }
        if let Some(sub) = &self.subscript {
            write!(f, "_{{{}}}", Joined(sub))?;
        }
        if let Some(sup) = &self.superscript {
            write!(f, "^{{{}}}", Joined(sup))?;
        }
        if let Some(curly) = &self.curly {
            write!(f, "{{{}}}", Joined(curly))?;
        }
        for named in &self.named {
            write!(f, ":{}", named.name)?;
            if let Some(args) = &named.args {
                write!(f, "{{{}}}", Joined(args))?;
            }
        }
        if let Some(paren) = &self.paren {
            write!(f, "({})", Joined(paren))?;
        }
        Ok(())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\\{}", self.names.join("."))?;
        for named in &self.named {
            write!(f, ":{named}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str, offset: usize) -> Expression {
        Expression::Name {
            name: text.to_string(),
            start: Position::new(offset, 0, offset),
        }
    }

    #[test]
    fn test_display_infix_and_call() {
        let call = Expression::Call {
            target: Box::new(name("f", 0)),
            args: vec![name("x", 2), name("y", 5)],
            start: Position::default(),
        };
        let expr = Expression::Infix {
            op: "=".to_string(),
            lhs: Box::new(call),
            rhs: Box::new(name("z", 10)),
            start: Position::default(),
        };
        assert_eq!(expr.to_string(), "f(x, y) = z");
    }

    #[test]
    fn test_display_command() {
        let command = Command {
            names: vec!["set".to_string(), "of".to_string()],
            square: None,
            subscript: Some(vec![name("n", 9)]),
            superscript: None,
            curly: Some(vec![name("x", 13)]),
            named: vec![NamedArg {
                name: "in".to_string(),
                args: Some(vec![name("A", 20)]),
            }],
            paren: None,
            start: Position::default(),
        };
        assert_eq!(
            Expression::Command(command).to_string(),
            "\\set.of_{n}{x}:in{A}"
        );
    }

    #[test]
    fn test_display_signature() {
        let signature = Signature {
            names: vec!["function".to_string()],
            named: vec!["on".to_string(), "to".to_string()],
            start: Position::default(),
        };
        assert_eq!(signature.to_string(), "\\function:on:to");
    }

    #[test]
    fn test_children_in_order() {
        let expr = Expression::Is {
            lhs: vec![name("a", 0), name("b", 3)],
            rhs: vec![name("c", 10)],
            start: Position::default(),
        };
        let mut seen = Vec::new();
        expr.for_each_child(&mut |child| seen.push(child.start().offset));
        assert_eq!(seen, [0, 3, 10]);
    }
}
