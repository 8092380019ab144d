// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay painting.
//!
//! Maps a block list onto absolutely positioned `<div>`s inside one overlay
//! element. Block elements are kept in slots by encounter index and reused
//! across passes; a style property is written only when its value changed.
//! An unchanged block list therefore produces no DOM mutations, which keeps a
//! subtree `MutationObserver` on the container from re-triggering forever.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use umbra_core::block::{CornerRadius, SkeletonBlock};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement};

use crate::WebConfig;

/// What a block element currently shows.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Painted {
    pub(crate) rect: Rect,
    pub(crate) radius: CornerRadius,
}

impl Painted {
    pub(crate) fn of(block: &SkeletonBlock) -> Self {
        Self {
            rect: block.rect(),
            radius: block.corner_radius().clone(),
        }
    }
}

/// Returns the CSS property writes needed to move an element from `old` to
/// `new`. Everything is written when there is no previous state.
pub(crate) fn style_writes(old: Option<&Painted>, new: &Painted) -> Vec<(&'static str, String)> {
    let mut writes = Vec::new();
    let rect = new.rect;
    let was = old.map(|o| o.rect);
    for (name, now, then) in [
        ("top", rect.y0, was.map(|r| r.y0)),
        ("left", rect.x0, was.map(|r| r.x0)),
        ("width", rect.width(), was.map(|r| r.width())),
        ("height", rect.height(), was.map(|r| r.height())),
    ] {
        if then != Some(now) {
            writes.push((name, px(now)));
        }
    }
    if old.is_none_or(|o| o.radius != new.radius) {
        writes.push(("border-radius", String::from(new.radius.as_str())));
    }
    writes
}

fn px(v: f64) -> String {
    format!("{v}px")
}

struct Slot {
    el: HtmlElement,
    painted: Painted,
}

/// Paints skeleton blocks into an overlay element over the container.
///
/// The overlay carries the configured marker class and `aria-hidden="true"`,
/// and is appended as the container's last child. It is removed from the DOM
/// when the presenter is dropped.
pub struct OverlayPresenter {
    overlay: HtmlElement,
    block_class: String,
    animate: bool,
    slots: Vec<Slot>,
}

impl core::fmt::Debug for OverlayPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlayPresenter")
            .field("overlay", &"HtmlElement")
            .field("block_class", &self.block_class)
            .field("animate", &self.animate)
            .field("slots_len", &self.slots.len())
            .finish()
    }
}

impl OverlayPresenter {
    /// Creates a hidden, empty overlay inside `container`.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if the overlay element cannot be created or
    /// inserted.
    pub fn new(container: &Element, config: &WebConfig) -> Result<Self, JsValue> {
        let doc = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container has no owner document"))?;
        let overlay: HtmlElement = doc.create_element("div")?.unchecked_into();
        overlay.set_class_name(&config.overlay_class);
        overlay.set_attribute("aria-hidden", "true")?;
        overlay.set_hidden(true);
        container.append_child(&overlay)?;
        Ok(Self {
            overlay,
            block_class: config.block_class.clone().into_owned(),
            animate: config.animate,
            slots: Vec::new(),
        })
    }

    /// Returns the overlay element.
    #[must_use]
    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }

    /// Returns the number of block elements currently painted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no block elements are painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Shows or hides the overlay element.
    pub fn set_visible(&self, visible: bool) {
        if self.overlay.hidden() == visible {
            self.overlay.set_hidden(!visible);
        }
    }

    /// Brings the overlay in line with `blocks`.
    ///
    /// Existing elements are updated in place, missing ones are created, and
    /// surplus ones are removed.
    pub fn paint(&mut self, blocks: &[SkeletonBlock]) {
        for (i, block) in blocks.iter().enumerate() {
            let painted = Painted::of(block);
            if let Some(slot) = self.slots.get_mut(i) {
                let writes = style_writes(Some(&slot.painted), &painted);
                if !writes.is_empty() {
                    apply(&slot.el, &writes);
                    slot.painted = painted;
                }
            } else {
                let Some(el) = self.create_block() else {
                    break;
                };
                apply(&el, &style_writes(None, &painted));
                let _ = self.overlay.append_child(&el);
                self.slots.push(Slot { el, painted });
            }
        }
        let keep = blocks.len().min(self.slots.len());
        for slot in self.slots.drain(keep..) {
            slot.el.remove();
        }
    }

    fn create_block(&self) -> Option<HtmlElement> {
        let doc = self.overlay.owner_document()?;
        let el: HtmlElement = doc.create_element("div").ok()?.unchecked_into();
        el.set_class_name(&self.block_class);
        if !self.animate {
            let _ = el.style().set_property("animation", "none");
        }
        Some(el)
    }
}

fn apply(el: &HtmlElement, writes: &[(&'static str, String)]) {
    let s = el.style();
    for (name, value) in writes {
        let _ = s.set_property(name, value);
    }
}

impl Drop for OverlayPresenter {
    fn drop(&mut self) {
        self.overlay.remove();
    }
}

#[cfg(test)]
mod tests {
    use umbra_core::block::BlockId;

    use super::*;

    fn painted(x: f64, y: f64, w: f64, h: f64, radius: &str) -> Painted {
        Painted::of(&SkeletonBlock::new(
            BlockId::new(0, 0),
            Rect::new(x, y, x + w, y + h),
            CornerRadius::normalize(radius, CornerRadius::DEFAULT_PX),
        ))
    }

    #[test]
    fn first_paint_writes_everything() {
        let writes = style_writes(None, &painted(10.0, 20.0, 100.0, 24.5, "8px"));
        assert_eq!(
            writes,
            [
                ("top", String::from("20px")),
                ("left", String::from("10px")),
                ("width", String::from("100px")),
                ("height", String::from("24.5px")),
                ("border-radius", String::from("8px")),
            ]
        );
    }

    #[test]
    fn unchanged_block_writes_nothing() {
        let a = painted(10.0, 20.0, 100.0, 24.0, "0px");
        let b = painted(10.0, 20.0, 100.0, 24.0, "0px");
        assert!(style_writes(Some(&a), &b).is_empty());
    }

    #[test]
    fn only_changed_properties_are_written() {
        let a = painted(10.0, 20.0, 100.0, 24.0, "4px");
        let b = painted(10.0, 40.0, 100.0, 24.0, "50%");
        assert_eq!(
            style_writes(Some(&a), &b),
            [("top", String::from("40px")), ("border-radius", String::from("50%"))]
        );
    }
}
