//! The typed document tree.
//!
//! The tree is a closed family of node types:
//!
//! - structural groups ([`groups`]), one struct per schema in the
//!   [`schema`](crate::schema) table, each holding one field per section;
//! - leaf items ([`items`]) for text and formulation literals;
//! - formulation trees ([`expression`]) parsed from those literals;
//! - the [`Document`] root.
//!
//! Group structs are not built field by field. A parser implements
//! [`Fill`] for every field type it can produce from a cursor over the
//! matched sections, and [`Assemble`] stitches the fields together in
//! schema order.

mod document;
mod expression;
mod groups;
mod items;

pub use document::Document;
pub use expression::{Command, Expression, NamedArg, Signature};
pub use groups::*;
pub use items::{
    Alias, Formulation, GroupId, IdItem, NoArgument, NoId, SignatureItem, Spec, Target,
    TextBlockItem, TextItem,
};

use crate::{
    schema::ArgKind,
    scope::ScopeId,
    span::Position,
    walk::{Node, NodeView},
};

/// Data carried by every node.
///
/// Equality ignores `scope`: two trees that differ only in which arena
/// slots their scopes occupy compare equal.
#[derive(Debug, Clone, Copy, Default, Eq)]
pub struct MetaData {
    pub start: Position,
    /// Filled in by semantic passes; `None` after parsing.
    pub scope: Option<ScopeId>,
}

impl MetaData {
    pub fn at(start: Position) -> Self {
        Self { start, scope: None }
    }
}

impl PartialEq for MetaData {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
    }
}

/// A matched section and its converted arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<T> {
    pub name: &'static str,
    pub items: Vec<T>,
    pub meta: MetaData,
}

impl<T> Section<T> {
    pub fn new(name: &'static str, start: Position, items: Vec<T>) -> Self {
        Self {
            name,
            items,
            meta: MetaData::at(start),
        }
    }

    /// The placeholder installed when a required section is missing.
    pub fn missing(name: &'static str, start: Position) -> Self {
        Self::new(name, start, Vec::new())
    }

    /// The single item of an exactly-one section.
    pub fn single(&self) -> Option<&T> {
        match self.items.as_slice() {
            [item] => Some(item),
            _ => None,
        }
    }
}

impl<T: Node> Node for Section<T> {
    fn view(&self) -> NodeView<'_> {
        NodeView::Section { name: self.name }
    }

    fn meta(&self) -> &MetaData {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaData {
        &mut self.meta
    }

    fn for_each_child<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node)) {
        for item in &self.items {
            f(item);
        }
    }

    fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node)) {
        for item in &mut self.items {
            f(item);
        }
    }
}

/// A section the schema requires.
pub type Required<T> = Section<T>;

/// A section the schema allows to be absent.
pub type Optional<T> = Option<Section<T>>;

/// A group field that can be produced from a parser-specific source.
///
/// Fields are filled strictly in declaration order, which matches schema
/// order, so a source may hand out sections sequentially.
pub trait Fill<S>: Sized {
    fn fill(source: &mut S) -> Self;
}

/// A group that can be assembled from a parser-specific source.
pub trait Assemble<S>: Sized {
    fn assemble(source: &mut S, meta: MetaData) -> Self;
}

/// A group field that holds a section.
pub trait SectionSlot {
    /// Whether the schema must list the section as required.
    const REQUIRED: bool;

    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node));

    fn visit_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node));
}

impl<T: Node> SectionSlot for Section<T> {
    const REQUIRED: bool = true;

    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node)) {
        f(self);
    }

    fn visit_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node)) {
        f(self);
    }
}

impl<T: Node> SectionSlot for Option<Section<T>> {
    const REQUIRED: bool = false;

    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a dyn Node)) {
        if let Some(section) = self {
            f(section);
        }
    }

    fn visit_mut(&mut self, f: &mut dyn FnMut(&mut dyn Node)) {
        if let Some(section) = self {
            f(section);
        }
    }
}

/// A type that section items are converted into.
pub trait SectionItem {
    /// The schema argument kind such sections declare.
    const ARG: ArgKind;
}

macro_rules! section_items {
    ($( $item:ty => $kind:ident ),* $(,)?) => {$(
        impl SectionItem for $item {
            const ARG: ArgKind = ArgKind::$kind;
        }
    )*};
}

section_items! {
    NoArgument => None,
    TextItem => Text,
    Target => Target,
    Spec => Spec,
    Clause => Clause,
    Alias => Alias,
    Formulation => Formulation,
    SignatureItem => Signature,
    DocumentedItem => Documented,
    ProvidesItem => Provides,
    JustifiedItem => Justified,
    SpecifyItem => Specify,
    ResourceItem => Resource,
    PersonItem => Person,
    NoteItem => Note,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_equality_ignores_scope() {
        let mut arena = crate::scope::ScopeArena::new();
        let start = Position::new(5, 1, 0);
        let bare = MetaData::at(start);
        let scoped = MetaData {
            start,
            scope: Some(arena.alloc(Default::default())),
        };
        assert_eq!(bare, scoped);
        assert_ne!(bare, MetaData::at(Position::new(6, 1, 1)));
    }

    #[test]
    fn test_section_single() {
        let one = Section::new("then", Position::default(), vec![1]);
        assert_eq!(one.single(), Some(&1));
        let two = Section::new("then", Position::default(), vec![1, 2]);
        assert_eq!(two.single(), None);
        assert!(Section::<u8>::missing("then", Position::default()).items.is_empty());
    }
}
