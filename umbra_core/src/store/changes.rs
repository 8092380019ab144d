// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change collection for the in-memory tree.
//!
//! [`NodeStore::take_changes`] drains every dirty channel into a
//! [`TreeChanges`]. A host then asks two questions about the container it
//! watches, mirroring what a browser's observers would report:
//!
//! - [`resized`](TreeChanges::resized): did the container's own box size
//!   change? (resize source)
//! - [`mutated_within`](TreeChanges::mutated_within): did the child list,
//!   style, or text of the container or any descendant change? (mutation
//!   source)
//!
//! [`TreeChanges`] holds raw slot indices (`u32`) rather than [`NodeId`]
//! handles, as recorded at mutation time.
//!
//! [`NodeId`]: super::NodeId

use alloc::vec::Vec;

use super::id::NodeId;
use super::nodes::NodeStore;
use crate::dirty;

/// The set of changes recorded since the previous
/// [`NodeStore::take_changes`] call.
#[derive(Clone, Debug, Default)]
pub struct TreeChanges {
    /// Nodes whose box size changed.
    pub sizes: Vec<u32>,
    /// Nodes whose child list changed.
    pub topology: Vec<u32>,
    /// Nodes whose tag, style, or flags changed.
    pub styles: Vec<u32>,
    /// Nodes whose direct text changed.
    pub texts: Vec<u32>,
}

impl TreeChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.sizes.clear();
        self.topology.clear();
        self.styles.clear();
        self.texts.clear();
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
            && self.topology.is_empty()
            && self.styles.is_empty()
            && self.texts.is_empty()
    }

    /// Returns `true` if `node`'s own box size changed.
    #[must_use]
    pub fn resized(&self, node: NodeId) -> bool {
        self.sizes.contains(&node.index())
    }

    /// Returns `true` if a topology, style, or text change touched `node` or
    /// any of its current descendants.
    #[must_use]
    pub fn mutated_within(&self, store: &NodeStore, node: NodeId) -> bool {
        let root = node.index();
        self.topology
            .iter()
            .chain(&self.styles)
            .chain(&self.texts)
            .any(|&idx| store.is_within_at(idx, root))
    }
}

impl NodeStore {
    /// Drains all dirty channels and returns the recorded changes.
    pub fn take_changes(&mut self) -> TreeChanges {
        let mut changes = TreeChanges::default();
        self.take_changes_into(&mut changes);
        changes
    }

    /// Like [`take_changes`](Self::take_changes), but reuses a
    /// caller-provided buffer.
    pub fn take_changes_into(&mut self, changes: &mut TreeChanges) {
        changes.clear();
        for (channel, out) in [
            (dirty::SIZE, &mut changes.sizes),
            (dirty::TOPOLOGY, &mut changes.topology),
            (dirty::STYLE, &mut changes.styles),
            (dirty::TEXT, &mut changes.texts),
        ] {
            out.extend(self.dirty.drain(channel).deterministic().run());
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;

    fn tree() -> (NodeStore, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let root = store.element("div", Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = store.element("p", Rect::new(0.0, 0.0, 100.0, 20.0));
        store.append_child(root, child);
        let _ = store.take_changes();
        (store, root, child)
    }

    #[test]
    fn resize_only_counts_own_size() {
        let (mut store, root, child) = tree();
        store.set_rect(child, Rect::new(0.0, 0.0, 50.0, 20.0));
        let changes = store.take_changes();
        assert!(!changes.resized(root));
        assert!(changes.resized(child));

        store.set_rect(root, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert!(store.take_changes().resized(root));
    }

    #[test]
    fn moving_without_resizing_marks_nothing() {
        let (mut store, root, _) = tree();
        store.set_rect(root, Rect::new(10.0, 10.0, 110.0, 110.0));
        store.set_origin(root, 20.0, 20.0);
        assert!(store.take_changes().is_empty());
    }

    #[test]
    fn descendant_mutations_are_within() {
        let (mut store, root, child) = tree();
        store.set_text(child, "updated");
        let changes = store.take_changes();
        assert!(changes.mutated_within(&store, root));
        assert!(!changes.resized(root));

        let h2 = store.create_element("h2");
        store.append_child(root, h2);
        assert!(store.take_changes().mutated_within(&store, root));
    }

    #[test]
    fn outside_mutations_are_ignored() {
        let (mut store, root, _) = tree();
        let elsewhere = store.create_element("div");
        store.set_text(elsewhere, "not watched");
        let changes = store.take_changes();
        assert!(!changes.is_empty());
        assert!(!changes.mutated_within(&store, root));
    }

    #[test]
    fn buffer_is_reused() {
        let (mut store, root, child) = tree();
        let mut changes = TreeChanges::default();
        changes.texts.reserve(16);
        let capacity = changes.texts.capacity();

        store.set_text(child, "x");
        store.take_changes_into(&mut changes);
        assert_eq!(changes.texts, [child.index()]);
        assert!(changes.mutated_within(&store, root));
        assert_eq!(changes.texts.capacity(), capacity);

        store.take_changes_into(&mut changes);
        assert!(changes.is_empty());
        assert_eq!(changes.texts.capacity(), capacity);
    }

    #[test]
    fn changes_are_drained() {
        let (mut store, root, child) = tree();
        store.set_text(child, "x");
        assert!(store.take_changes().mutated_within(&store, root));
        assert!(store.take_changes().is_empty());
    }
}
