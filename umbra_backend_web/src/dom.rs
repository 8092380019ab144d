// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Live DOM access for the analyzer.
//!
//! [`DomTree`] implements [`RenderTree`] over `web_sys::Element`s, reading
//! geometry from `getBoundingClientRect()` (viewport space) and style from
//! `getComputedStyle()`.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use umbra_core::classify::ElementKind;
use umbra_core::tree::{NodeStyle, RenderTree};
use web_sys::{CssStyleDeclaration, Element, Node};

/// The browser document as a [`RenderTree`].
#[derive(Clone, Debug)]
pub struct DomTree {
    overlay_class: String,
}

impl DomTree {
    /// Creates a tree that treats elements carrying `overlay_class` as the
    /// overlay region.
    #[must_use]
    pub fn new(overlay_class: impl Into<String>) -> Self {
        Self {
            overlay_class: overlay_class.into(),
        }
    }

    /// Returns the overlay marker class.
    #[must_use]
    pub fn overlay_class(&self) -> &str {
        &self.overlay_class
    }
}

impl RenderTree for DomTree {
    type Node = Element;

    fn children(&self, node: &Element, out: &mut Vec<Element>) {
        let children = node.children();
        out.extend((0..children.length()).filter_map(|i| children.item(i)));
    }

    fn element_kind(&self, node: &Element) -> ElementKind {
        ElementKind::from_tag(&node.tag_name())
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect::from_origin_size((r.x(), r.y()), (r.width(), r.height()))
    }

    fn style(&self, node: &Element) -> NodeStyle {
        let Some(decl) = computed_style(node) else {
            return NodeStyle::default();
        };
        let prop = |name: &str| decl.get_property_value(name).unwrap_or_default();
        NodeStyle::from_computed(
            &prop("display"),
            &prop("background-color"),
            &prop("background-image"),
            &prop("border-radius"),
        )
    }

    fn has_direct_text(&self, node: &Element) -> bool {
        let nodes = node.child_nodes();
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter(|child| child.node_type() == Node::TEXT_NODE)
            .any(|text| is_meaningful_text(text.text_content().as_deref()))
    }

    fn is_overlay(&self, node: &Element) -> bool {
        node.class_list().contains(&self.overlay_class)
    }
}

/// Reads the element's computed style. `None` outside a window or when the
/// browser declines (detached or foreign-document elements).
fn computed_style(node: &Element) -> Option<CssStyleDeclaration> {
    web_sys::window()?.get_computed_style(node).ok().flatten()
}

/// Returns `true` if a text node's content has anything besides whitespace.
pub(crate) fn is_meaningful_text(content: Option<&str>) -> bool {
    content.is_some_and(|text| !text.trim().is_empty())
}
