// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-tree abstraction read by the analyzer.
//!
//! The analyzer never mutates the tree it walks. A host exposes its rendered
//! subtree through [`RenderTree`]: child enumeration in document order,
//! bounding geometry in one shared coordinate space, a per-node
//! [`NodeStyle`] snapshot, and two content queries (direct text and the
//! overlay marker).
//!
//! Hosts that read style as raw computed strings (the DOM) build
//! [`NodeStyle`] with [`NodeStyle::from_computed`], which folds the string
//! parsing into the same fallback rules everywhere.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::classify::ElementKind;

/// Read-only access to a rendered, measurable tree.
///
/// Implementations must report geometry for every node in the same
/// coordinate space (for the DOM, viewport space). The analyzer subtracts the
/// container's origin to produce container-relative blocks.
pub trait RenderTree {
    /// A reference to one node of the tree.
    type Node: Clone;

    /// Appends the element children of `node` to `out`, in document order.
    fn children(&self, node: &Self::Node, out: &mut Vec<Self::Node>);

    /// Returns the element kind derived from the node's tag.
    fn element_kind(&self, node: &Self::Node) -> ElementKind;

    /// Returns the node's rendered border box.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Returns a snapshot of the node's computed style.
    fn style(&self, node: &Self::Node) -> NodeStyle;

    /// Returns `true` if one of the node's own text children (not text
    /// belonging to a descendant element) contains non-whitespace text.
    fn has_direct_text(&self, node: &Self::Node) -> bool;

    /// Returns `true` if the node is the overlay region painted over the
    /// container, which must never be analyzed.
    fn is_overlay(&self, node: &Self::Node) -> bool;
}

/// Shares a mutable tree between a host and a
/// [`Controller`](crate::observe::Controller).
///
/// Each call borrows the inner tree for its own duration only, so the host
/// may mutate the tree between analysis passes.
impl<T: RenderTree> RenderTree for Rc<RefCell<T>> {
    type Node = T::Node;

    fn children(&self, node: &Self::Node, out: &mut Vec<Self::Node>) {
        self.borrow().children(node, out);
    }

    fn element_kind(&self, node: &Self::Node) -> ElementKind {
        self.borrow().element_kind(node)
    }

    fn bounding_rect(&self, node: &Self::Node) -> Rect {
        self.borrow().bounding_rect(node)
    }

    fn style(&self, node: &Self::Node) -> NodeStyle {
        self.borrow().style(node)
    }

    fn has_direct_text(&self, node: &Self::Node) -> bool {
        self.borrow().has_direct_text(node)
    }

    fn is_overlay(&self, node: &Self::Node) -> bool {
        self.borrow().is_overlay(node)
    }
}

/// The parts of a node's computed style the analyzer consults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStyle {
    /// Computed `display: none`. Excludes the node and its subtree.
    pub display_none: bool,
    /// A non-transparent background color or a background image is painted.
    pub background: bool,
    /// Computed `border-radius`, unnormalized.
    pub border_radius: String,
}

impl NodeStyle {
    /// Builds a style snapshot from raw computed CSS values.
    #[must_use]
    pub fn from_computed(
        display: &str,
        background_color: &str,
        background_image: &str,
        border_radius: &str,
    ) -> Self {
        Self {
            display_none: display.trim().eq_ignore_ascii_case("none"),
            background: !is_transparent_color(background_color)
                || has_background_image(background_image),
            border_radius: String::from(border_radius.trim()),
        }
    }
}

/// Returns `true` if a computed color paints nothing.
///
/// Recognizes `transparent`, and `rgb`/`rgba`/`hsl`/`hsla` functions (comma
/// or slash syntax) whose alpha component is zero. An empty value is treated
/// as transparent.
#[must_use]
pub fn is_transparent_color(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("transparent") {
        return true;
    }
    let Some(open) = value.find('(') else {
        return false;
    };
    let name = value[..open].trim().to_ascii_lowercase();
    if !matches!(name.as_str(), "rgb" | "rgba" | "hsl" | "hsla") {
        return false;
    }
    let Some(inner) = value[open + 1..].strip_suffix(')') else {
        return false;
    };
    let alpha = if let Some((_, alpha)) = inner.split_once('/') {
        alpha
    } else {
        let mut parts = inner.split(',');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(_), Some(_), Some(alpha)) => alpha,
            _ => return false,
        }
    };
    parse_alpha(alpha) == Some(0.0)
}

/// Returns `true` if a computed `background-image` paints an image.
#[must_use]
pub fn has_background_image(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.eq_ignore_ascii_case("none")
}

fn parse_alpha(alpha: &str) -> Option<f64> {
    let alpha = alpha.trim();
    if let Some(percent) = alpha.strip_suffix('%') {
        return percent.trim().parse::<f64>().ok().map(|p| p / 100.0);
    }
    alpha.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_colors() {
        assert!(is_transparent_color("transparent"));
        assert!(is_transparent_color("rgba(0, 0, 0, 0)"));
        assert!(is_transparent_color("rgb(0 0 0 / 0)"));
        assert!(is_transparent_color("rgba(255, 255, 255, 0%)"));
        assert!(is_transparent_color("hsla(120, 50%, 50%, 0)"));
        assert!(is_transparent_color(""));
    }

    #[test]
    fn painted_colors() {
        assert!(!is_transparent_color("rgb(238, 238, 238)"));
        assert!(!is_transparent_color("rgba(0, 0, 0, 0.5)"));
        assert!(!is_transparent_color("rgb(0 0 0 / 50%)"));
        assert!(!is_transparent_color("#eee"));
        assert!(!is_transparent_color("red"));
    }

    #[test]
    fn background_images() {
        assert!(!has_background_image("none"));
        assert!(!has_background_image(""));
        assert!(has_background_image("url(\"a.png\")"));
        assert!(has_background_image("linear-gradient(red, blue)"));
    }

    #[test]
    fn style_from_computed_values() {
        let style = NodeStyle::from_computed("block", "rgba(0, 0, 0, 0)", "none", "0px");
        assert!(!style.display_none);
        assert!(!style.background);
        assert_eq!(style.border_radius, "0px");

        let hidden = NodeStyle::from_computed("none", "rgb(1, 2, 3)", "none", "");
        assert!(hidden.display_none);
        assert!(hidden.background);

        let image = NodeStyle::from_computed("flex", "transparent", "url(x.png)", "8px");
        assert!(image.background);
    }
}
