//! The document root.

use crate::{
    ast::{MetaData, TopLevelItem},
    scope::ScopeArena,
    walk::{Node, NodeView},
};

/// The root of a parsed file.
///
/// The document owns the scope arena that its nodes' scope handles point
/// into, so cloning a document copies every scope along with the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub items: Vec<TopLevelItem>,
    pub scopes: ScopeArena,
    pub meta: MetaData,
}

impl Document {
    pub fn new(items: Vec<TopLevelItem>) -> Self {
        Self {
            items,
            scopes: ScopeArena::new(),
            meta: MetaData::default(),
        }
    }

    /// Deep-clones the item at `index` within this document, giving each
    /// scoped node of the copy its own scope.
    pub fn clone_item(&mut self, index: usize) -> Option<TopLevelItem> {
        let item = self.items.get(index)?;
        Some(self.scopes.clone_node(item))
    }
}

impl Node for Document {
    fn view(&self) -> NodeView<'_> {
        NodeView::Document
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
