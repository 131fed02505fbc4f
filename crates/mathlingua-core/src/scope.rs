//! Scope arena.
//!
//! Nodes never own a scope directly. They carry an optional [`ScopeId`]
//! pointing into the [`ScopeArena`] owned by the enclosing document, which
//! avoids reference cycles between nodes and the semantic passes that fill
//! scopes in. Freshly parsed nodes carry no scope.

use indexmap::IndexMap;
use log::trace;

use crate::{
    span::Position,
    walk::{Node, walk_mut},
};

/// Opaque handle to a [`Scope`] in a [`ScopeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The symbols bound at one node, in binding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    symbols: IndexMap<String, Position>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning the previous binding site if it was already bound.
    pub fn bind(&mut self, name: impl Into<String>, site: Position) -> Option<Position> {
        self.symbols.insert(name.into(), site)
    }

    pub fn lookup(&self, name: &str) -> Option<Position> {
        self.symbols.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&str, Position)> {
        self.symbols.iter().map(|(name, site)| (name.as_str(), *site))
    }
}

/// Storage for every scope of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `scope` and returns its handle.
    pub fn alloc(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Deep-clones `node`, giving every reachable node that carries a scope
    /// a fresh copy of it.
    ///
    /// The walk is post-order, so each node's scope is copied exactly once
    /// and children are rebound before their parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use mathlingua_core::{
    ///     ast::TextItem,
    ///     scope::{Scope, ScopeArena},
    ///     span::Position,
    ///     walk::Node,
    /// };
    ///
    /// let mut arena = ScopeArena::new();
    /// let mut item = TextItem::new("prime", Position::default());
    /// item.meta.scope = Some(arena.alloc(Scope::new()));
    ///
    /// let copy = arena.clone_node(&item);
    /// assert_eq!(copy, item);
    /// assert_ne!(copy.meta().scope, item.meta().scope);
    /// ```
    pub fn clone_node<N>(&mut self, node: &N) -> N
    where
        N: Node + Clone,
    {
        let mut copy = node.clone();
        let mut copied = 0usize;
        walk_mut(&mut copy, &mut |child: &mut dyn Node| {
            let Some(id) = child.meta().scope else {
                return;
            };
            let scope = self.get(id).cloned().unwrap_or_default();
            let fresh = self.alloc(scope);
            child.meta_mut().scope = Some(fresh);
            copied += 1;
        });
        trace!(copied; "Cloned node scopes");
        copy
    }
}
