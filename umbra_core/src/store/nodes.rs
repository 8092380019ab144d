// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property management.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{INVALID, NodeId};
use super::traverse::{Ancestors, Children};
use crate::classify::ElementKind;
use crate::dirty;
use crate::tree::{NodeStyle, RenderTree};

/// Per-node boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Whether the node is the skeleton overlay region. Only consulted on
    /// direct children of the analyzed container.
    pub overlay: bool,
}

/// Struct-of-arrays storage for a laid-out element tree.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies a
/// slot in parallel arrays. Destroyed nodes are recycled via a free list, and
/// generation counters prevent stale handle access.
///
/// Rects are absolute (all nodes share one coordinate space), as a browser's
/// `getBoundingClientRect` reports them. Mutations record dirty channels (see
/// [`dirty`](crate::dirty)) that [`take_changes`](Self::take_changes) drains.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties --
    pub(crate) tag: Vec<String>,
    pub(crate) kind: Vec<ElementKind>,
    pub(crate) rect: Vec<Rect>,
    pub(crate) style: Vec<NodeStyle>,
    pub(crate) text: Vec<String>,
    pub(crate) flags: Vec<NodeFlags>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStore {
    /// Creates an empty node store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            tag: Vec::new(),
            kind: Vec::new(),
            rect: Vec::new(),
            style: Vec::new(),
            text: Vec::new(),
            flags: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        }
    }

    // -- Allocation API --

    /// Creates a detached element with the given tag and returns its handle.
    ///
    /// The node starts with a zero rect, default style, no text, and no
    /// parent.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let kind = ElementKind::from_tag(tag);
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let slot = idx as usize;
            self.generation[slot] += 1;
            self.parent[slot] = INVALID;
            self.first_child[slot] = INVALID;
            self.next_sibling[slot] = INVALID;
            self.prev_sibling[slot] = INVALID;
            self.tag[slot] = String::from(tag);
            self.kind[slot] = kind;
            self.rect[slot] = Rect::ZERO;
            self.style[slot] = NodeStyle::default();
            self.text[slot] = String::new();
            self.flags[slot] = NodeFlags::default();
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.tag.push(String::from(tag));
            self.kind.push(kind);
            self.rect.push(Rect::ZERO);
            self.style.push(NodeStyle::default());
            self.text.push(String::new());
            self.flags.push(NodeFlags::default());
            self.generation.push(0);
            idx
        };

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Creates a detached element with the given tag and rect.
    pub fn element(&mut self, tag: &str, rect: Rect) -> NodeId {
        let id = self.create_element(tag);
        self.rect[id.idx as usize] = rect;
        id
    }

    /// Destroys a node, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the node has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy node with children"
        );

        // Remove from parent's child list if attached.
        let p = self.parent[idx as usize];
        if p != INVALID {
            self.unlink_from_parent(idx);
            self.dirty.mark(p, dirty::TOPOLOGY);
        }

        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Inserts `child` before `sibling` in the sibling list.
    ///
    /// `child` must not already have a parent. `sibling` must have a parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or `sibling`
    /// has no parent.
    pub fn insert_before(&mut self, child: NodeId, sibling: NodeId) {
        self.validate(child);
        self.validate(sibling);
        let c = child.idx;
        let s = sibling.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            // `sibling` was the first child.
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the node has no parent.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "node has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(NodeId {
                idx: p,
                generation: self.generation[p as usize],
            })
        }
    }

    /// Returns an iterator over the direct children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns `id` followed by its ancestors, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, id.idx)
    }

    /// Returns `true` if `id` is `ancestor` or lies in its subtree.
    #[must_use]
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.validate(id);
        self.validate(ancestor);
        self.is_within_at(id.idx, ancestor.idx)
    }

    // -- Property getters (read-only) --

    /// Returns the tag the node was created with.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.tag[id.idx as usize]
    }

    /// Returns the element kind derived from the tag.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> ElementKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the node's absolute rect.
    #[must_use]
    pub fn rect(&self, id: NodeId) -> Rect {
        self.validate(id);
        self.rect[id.idx as usize]
    }

    /// Returns the node's style.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &NodeStyle {
        self.validate(id);
        &self.style[id.idx as usize]
    }

    /// Returns the node's direct text.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.text[id.idx as usize]
    }

    /// Returns the node's flags.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.validate(id);
        self.flags[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the node's absolute rect.
    ///
    /// Marks the SIZE channel only if the width or height changed.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.validate(id);
        let old = self.rect[id.idx as usize];
        self.rect[id.idx as usize] = rect;
        if old.size() != rect.size() {
            self.dirty.mark(id.idx, dirty::SIZE);
        }
    }

    /// Moves the node (and, since rects are absolute, only the node) by
    /// replacing its origin. Marks nothing.
    pub fn set_origin(&mut self, id: NodeId, x: f64, y: f64) {
        self.validate(id);
        let rect = self.rect[id.idx as usize];
        self.rect[id.idx as usize] = rect.with_origin((x, y));
    }

    /// Replaces the tag, and with it the element kind.
    pub fn set_tag(&mut self, id: NodeId, tag: &str) {
        self.validate(id);
        self.tag[id.idx as usize] = String::from(tag);
        self.kind[id.idx as usize] = ElementKind::from_tag(tag);
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the node's style.
    pub fn set_style(&mut self, id: NodeId, style: NodeStyle) {
        self.validate(id);
        self.style[id.idx as usize] = style;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the node's direct text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.validate(id);
        self.text[id.idx as usize] = text.into();
        self.dirty.mark(id.idx, dirty::TEXT);
    }

    /// Sets the node's flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.validate(id);
        self.flags[id.idx as usize] = flags;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Marks or unmarks the node as the overlay region.
    pub fn set_overlay(&mut self, id: NodeId, overlay: bool) {
        self.set_flags(id, NodeFlags { overlay });
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

impl RenderTree for NodeStore {
    type Node = NodeId;

    fn children(&self, node: &NodeId, out: &mut Vec<NodeId>) {
        out.extend(Self::children(self, *node));
    }

    fn element_kind(&self, node: &NodeId) -> ElementKind {
        self.kind(*node)
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        self.rect(*node)
    }

    fn style(&self, node: &NodeId) -> NodeStyle {
        Self::style(self, *node).clone()
    }

    fn has_direct_text(&self, node: &NodeId) -> bool {
        !self.text(*node).trim().is_empty()
    }

    fn is_overlay(&self, node: &NodeId) -> bool {
        self.flags(*node).overlay
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut store = NodeStore::new();
        let id = store.create_element("div");
        assert!(store.is_alive(id));
        store.destroy_node(id);
        assert!(!store.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = NodeStore::new();
        let id1 = store.create_element("div");
        store.destroy_node(id1);
        let id2 = store.create_element("img");
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert_eq!(store.kind(id2), ElementKind::Media);
    }

    #[test]
    fn append_and_insert_keep_document_order() {
        let mut store = NodeStore::new();
        let parent = store.create_element("ul");
        let a = store.create_element("li");
        let b = store.create_element("li");
        let c = store.create_element("li");

        store.append_child(parent, a);
        store.append_child(parent, c);
        store.insert_before(b, c);

        let kids: Vec<_> = store.children(parent).collect();
        assert_eq!(kids, vec![a, b, c]);
        assert_eq!(store.parent(b), Some(parent));
    }

    #[test]
    fn remove_from_parent_works() {
        let mut store = NodeStore::new();
        let parent = store.create_element("div");
        let child = store.create_element("span");

        store.append_child(parent, child);
        store.remove_from_parent(child);
        assert_eq!(store.parent(child), None);
        assert!(store.children(parent).next().is_none());
    }

    #[test]
    fn is_within_follows_ancestry() {
        let mut store = NodeStore::new();
        let root = store.create_element("div");
        let mid = store.create_element("section");
        let leaf = store.create_element("p");
        let other = store.create_element("div");
        store.append_child(root, mid);
        store.append_child(mid, leaf);

        assert!(store.is_within(leaf, root));
        assert!(store.is_within(root, root));
        assert!(!store.is_within(root, leaf));
        assert!(!store.is_within(other, root));
    }

    #[test]
    fn render_tree_queries() {
        let mut store = NodeStore::new();
        let span = store.element("SPAN", Rect::new(1.0, 2.0, 3.0, 4.0));
        store.set_text(span, "  ");
        assert!(!RenderTree::has_direct_text(&store, &span));
        store.set_text(span, " hi ");
        assert!(RenderTree::has_direct_text(&store, &span));
        assert_eq!(store.bounding_rect(&span), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert!(!store.is_overlay(&span));
        store.set_overlay(span, true);
        assert!(store.is_overlay(&span));
    }

    #[test]
    #[should_panic(expected = "cannot destroy node with children")]
    fn destroy_with_children_panics() {
        let mut store = NodeStore::new();
        let parent = store.create_element("div");
        let child = store.create_element("div");
        store.append_child(parent, child);
        store.destroy_node(parent);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_set_rect() {
        let mut store = NodeStore::new();
        let id = store.create_element("div");
        store.destroy_node(id);
        store.set_rect(id, Rect::ZERO);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_append_panics() {
        let mut store = NodeStore::new();
        let a = store.create_element("div");
        let b = store.create_element("div");
        let child = store.create_element("div");
        store.append_child(a, child);
        store.append_child(b, child);
    }
}
