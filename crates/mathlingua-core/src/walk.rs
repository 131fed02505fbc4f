//! Generic traversal over the typed AST.
//!
//! Every node implements [`Node`], whose `for_each_child` visits each
//! directly owned child exactly once in source order. Rendering, cloning,
//! and position checks are written once on top of it instead of per node.

use std::fmt;

use crate::{
    ast::{Expression, MetaData, Signature},
    schema::GroupKind,
};

/// The parsed tree of a formulation literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormulationRoot<'a> {
    Expression(&'a Expression),
    Signature(&'a Signature),
}

impl fmt::Display for FormulationRoot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulationRoot::Expression(expression) => expression.fmt(f),
            FormulationRoot::Signature(signature) => signature.fmt(f),
        }
    }
}

/// A formulation literal as seen by a walker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormulationView<'a> {
    /// The literal text between its delimiters.
    pub raw: &'a str,
    /// `None` when the literal failed to parse or is opaque text.
    pub root: Option<FormulationRoot<'a>>,
}

/// What a node is, without naming its concrete type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeView<'a> {
    Document,
    Group {
        kind: GroupKind,
        id: Option<FormulationView<'a>>,
    },
    Section {
        name: &'static str,
    },
    Text(&'a str),
    TextBlock(&'a str),
    Formulation(FormulationView<'a>),
}

/// A node of the typed AST.
pub trait Node: fmt::Debug {
    fn view(&self) -> NodeView<'_>;

    fn meta(&self) -> &MetaData;

    fn meta_mut(&mut self) -> &mut MetaData;

    /// Visits every direct child once, in source order.
    fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node));

    /// Mutable counterpart of [`Node::for_each_child`].
    fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node));
}

/// Pre-order walk of `node` and all of its descendants.
pub fn walk<'a>(node: &'a dyn Node, f: &mut dyn FnMut(&'a dyn Node)) {
    f(node);
    node.for_each_child(&mut |child| walk(child, &mut *f));
}

/// Post-order mutable walk: children are visited before their parent.
pub fn walk_mut(node: &mut dyn Node, f: &mut dyn FnMut(&mut dyn Node)) {
    node.for_each_child_mut(&mut |child| walk_mut(child, &mut *f));
    f(node);
}

/// Direct children of `node`.
pub fn children(node: &dyn Node) -> Vec<&dyn Node> {
    let mut out = Vec::new();
    node.for_each_child(&mut |child| out.push(child));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Section, TextItem},
        span::Position,
    };

    fn section() -> Section<TextItem> {
        Section::new(
            "written",
            Position::new(0, 0, 0),
            vec![
                TextItem::new("a", Position::new(12, 1, 3)),
                TextItem::new("b", Position::new(20, 2, 3)),
            ],
        )
    }

    #[test]
    fn test_children_in_source_order() {
        let section = section();
        let texts: Vec<_> = children(&section)
            .into_iter()
            .map(|child| child.view())
            .collect();
        assert_eq!(texts, [NodeView::Text("a"), NodeView::Text("b")]);
    }

    #[test]
    fn test_walk_is_pre_order() {
        let section = section();
        let mut seen = Vec::new();
        walk(&section, &mut |node| seen.push(node.meta().start.offset));
        assert_eq!(seen, [0, 12, 20]);
    }

    #[test]
    fn test_walk_mut_is_post_order() {
        let mut section = section();
        let mut order = Vec::new();
        walk_mut(&mut section, &mut |node| {
            order.push(node.meta().start.offset);
            node.meta_mut().start.column += 1;
        });
        assert_eq!(order, [12, 20, 0]);
        assert_eq!(section.items[0].meta.start.column, 4);
    }
}
