// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link-following iterators over a [`NodeStore`].
//!
//! Both iterators walk one topology column (`next_sibling` or `parent`)
//! until it reaches [`INVALID`] or a slot outside the store.

use super::id::{INVALID, NodeId};
use super::nodes::NodeStore;

/// Which topology column a [`Walk`] follows.
#[derive(Clone, Copy, Debug)]
enum Link {
    Sibling,
    Parent,
}

#[derive(Debug)]
struct Walk<'a> {
    store: &'a NodeStore,
    link: Link,
    at: u32,
}

impl<'a> Walk<'a> {
    fn new(store: &'a NodeStore, link: Link, start: u32) -> Self {
        Self {
            store,
            link,
            at: start,
        }
    }

    /// Yields the current slot and moves along the link.
    fn step(&mut self) -> Option<u32> {
        let at = self.at;
        if at == INVALID || at >= self.store.len {
            return None;
        }
        let column = match self.link {
            Link::Sibling => &self.store.next_sibling,
            Link::Parent => &self.store.parent,
        };
        self.at = column[at as usize];
        Some(at)
    }

    fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        }
    }
}

/// The direct children of a node, in document order.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a>(Walk<'a>);

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self(Walk::new(store, Link::Sibling, first))
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.0.step()?;
        Some(self.0.handle(idx))
    }
}

/// A node followed by its ancestors, nearest first.
///
/// Created by [`NodeStore::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a>(Walk<'a>);

impl<'a> Ancestors<'a> {
    pub(crate) fn new(store: &'a NodeStore, start: u32) -> Self {
        Self(Walk::new(store, Link::Parent, start))
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.0.step()?;
        Some(self.0.handle(idx))
    }
}

impl NodeStore {
    /// Raw-index containment check used when consuming recorded changes,
    /// whose slots may since have been destroyed.
    pub(crate) fn is_within_at(&self, idx: u32, ancestor: u32) -> bool {
        let mut walk = Walk::new(self, Link::Parent, idx);
        core::iter::from_fn(|| walk.step()).any(|at| at == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn ancestors_start_at_the_node() {
        let mut store = NodeStore::new();
        let root = store.create_element("div");
        let list = store.create_element("ul");
        let item = store.create_element("li");
        store.append_child(root, list);
        store.append_child(list, item);

        let chain: Vec<_> = store.ancestors(item).collect();
        assert_eq!(chain, [item, list, root]);
        assert_eq!(store.ancestors(root).count(), 1);
    }

    #[test]
    fn detached_nodes_are_their_own_root() {
        let mut store = NodeStore::new();
        let root = store.create_element("div");
        let loose = store.create_element("p");
        assert!(!store.is_within_at(loose.index(), root.index()));
        assert!(store.is_within_at(loose.index(), loose.index()));
        assert!(!store.is_within_at(INVALID, root.index()));
    }
}
