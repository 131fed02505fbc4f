//! Leaf items: text literals, text blocks, and formulation literals.

use crate::{
    ast::{Expression, MetaData, Signature},
    schema::IdRule,
    span::Position,
    walk::{FormulationRoot, FormulationView, Node, NodeView},
};

/// A `"..."` text literal, stored without its quotes.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub raw: String,
    pub meta: MetaData,
}

impl TextItem {
    pub fn new(raw: impl Into<String>, start: Position) -> Self {
        Self {
            raw: raw.into(),
            meta: MetaData::at(start),
        }
    }
}

impl Node for TextItem {
    fn view(&self) -> NodeView<'_> {
        NodeView::Text(&self.raw)
    }

    fn meta(&self) -> &MetaData {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaData {
        &mut self.meta
    }

    fn for_each_child<'a>(&'a self, _f: &mut dyn FnMut(&'a dyn Node)) {}

    fn for_each_child_mut(&mut self, _f: &mut dyn FnMut(&mut dyn Node)) {}
}

/// A top-level `::...::` block, stored without its delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlockItem {
    pub text: String,
    pub meta: MetaData,
}

impl TextBlockItem {
    pub fn new(text: impl Into<String>, start: Position) -> Self {
        Self {
            text: text.into(),
            meta: MetaData::at(start),
        }
    }
}

impl Node for TextBlockItem {
    fn view(&self) -> NodeView<'_> {
        NodeView::TextBlock(&self.text)
    }

    fn meta(&self) -> &MetaData {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut MetaData {
        &mut self.meta
    }

    fn for_each_child<'a>(&'a self, _f: &mut dyn FnMut(&'a dyn Node)) {}

    fn for_each_child_mut(&mut self, _f: &mut dyn FnMut(&mut dyn Node)) {}
}

/// Defines a formulation-backed item: the raw literal text plus the parsed
/// tree, which is `None` when the literal did not parse.
macro_rules! formulation_item {
    ($(
        $(#[$doc:meta])*
        $name:ident($root:ident);
    )*) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            pub raw: String,
            pub root: Option<$root>,
            pub meta: MetaData,
        }

        impl $name {
            pub fn new(raw: impl Into<String>, root: Option<$root>, start: Position) -> Self {
                Self {
                    raw: raw.into(),
                    root,
                    meta: MetaData::at(start),
                }
            }

            pub fn formulation(&self) -> FormulationView<'_> {
                FormulationView {
                    raw: &self.raw,
                    root: self.root.as_ref().map(FormulationRoot::$root),
                }
            }
        }

        impl Node for $name {
            fn view(&self) -> NodeView<'_> {
                NodeView::Formulation(self.formulation())
            }

            fn meta(&self) -> &MetaData {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut MetaData {
                &mut self.meta
            }

            fn for_each_child<'a>(&'a self, _f: &mut dyn FnMut(&'a dyn Node)) {}

            fn for_each_child_mut(&mut self, _f: &mut dyn FnMut(&mut dyn Node)) {}
        }
    )*};
}

formulation_item! {
    /// A binder: a name, function, set, tuple, or `:=` declaration.
    Target(Expression);
    /// A `... is ...` or `... <op> ...` restriction.
    Spec(Expression);
    /// A `... :=> ...` rewrite.
    Alias(Expression);
    /// A general statement.
    Formulation(Expression);
    /// The `[...]` id of a typed group.
    IdItem(Expression);
    SignatureItem(Signature);
}

/// Access to a group's id, whatever its representation.
pub trait GroupId {
    /// The schema id rule this representation stands for.
    const RULE: IdRule;

    fn id_view(&self) -> Option<FormulationView<'_>>;
}

/// Marker for groups whose id is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoId;

impl GroupId for NoId {
    const RULE: IdRule = IdRule::Ignored;

    fn id_view(&self) -> Option<FormulationView<'_>> {
        None
    }
}

impl GroupId for IdItem {
    const RULE: IdRule = IdRule::RequiredFormulation;

    fn id_view(&self) -> Option<FormulationView<'_>> {
        Some(self.formulation())
    }
}

impl GroupId for Option<IdItem> {
    const RULE: IdRule = IdRule::OptionalFormulation;

    fn id_view(&self) -> Option<FormulationView<'_>> {
        self.as_ref().map(IdItem::formulation)
    }
}

/// Opaque ids of `Topic`, `Person`, and `Resource`.
impl GroupId for String {
    const RULE: IdRule = IdRule::RequiredText;

    fn id_view(&self) -> Option<FormulationView<'_>> {
        Some(FormulationView {
            raw: self,
            root: None,
        })
    }
}

/// Argument type of sections that take no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoArgument {}

impl Node for NoArgument {
    fn view(&self) -> NodeView<'_> {
        match *self {}
    }

    fn meta(&self) -> &MetaData {
        match *self {}
    }

    fn meta_mut(&mut self) -> &mut MetaData {
        match *self {}
    }

    fn for_each_child<'a>(&'a self, _f: &mut dyn FnMut(&'a dyn Node)) {
        match *self {}
    }

    fn for_each_child_mut(&mut self, _f: &mut dyn FnMut(&mut dyn Node)) {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsed_formulation_keeps_raw() {
        let item = Formulation::new("x +", None, Position::new(4, 0, 4));
        let view = item.formulation();
        assert_eq!(view.raw, "x +");
        assert!(view.root.is_none());
        assert_eq!(item.meta().start.offset, 4);
    }

    #[test]
    fn test_group_id_views() {
        assert!(NoId.id_view().is_none());
        let text = "pythagoras".to_string();
        assert_eq!(text.id_view().map(|view| view.raw), Some("pythagoras"));
        let missing: Option<IdItem> = None;
        assert!(missing.id_view().is_none());
    }
}
