// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for umbra.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`DomTree`]: the live DOM as a [`RenderTree`](umbra_core::tree::RenderTree)
//! - [`ResizeWatch`] / [`MutationWatch`]: `ResizeObserver` and
//!   `MutationObserver` change sources
//! - [`OverlayPresenter`]: paints blocks into an overlay `<div>`
//! - [`AutoSkeleton`]: wires all of the above to one container and a loading
//!   flag

#![no_std]

extern crate alloc;

mod dom;
mod overlay;
mod skeleton;
mod style;
mod watch;

pub use dom::DomTree;
pub use overlay::OverlayPresenter;
pub use skeleton::{AutoSkeleton, WebController};
pub use style::{install_stylesheet, stylesheet};
pub use watch::{MutationWatch, ResizeWatch};

use alloc::borrow::Cow;

use umbra_core::block::CornerRadius;

/// Marker class names and presentation options for [`AutoSkeleton`].
#[derive(Clone, Debug, PartialEq)]
pub struct WebConfig {
    /// Class added to the container; makes it the overlay's positioning
    /// reference.
    pub container_class: Cow<'static, str>,
    /// Class identifying the overlay element. Elements carrying it are
    /// never analyzed.
    pub overlay_class: Cow<'static, str>,
    /// Class applied to the container while loading; hides everything in it
    /// except the overlay.
    pub hidden_class: Cow<'static, str>,
    /// Class applied to every block element.
    pub block_class: Cow<'static, str>,
    /// Whether blocks run the shimmer animation.
    pub animate: bool,
    /// Corner radius in pixels for blocks whose computed radius is zero.
    pub default_corner_radius: f64,
}

impl WebConfig {
    /// Default classes with the shimmer animation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            container_class: Cow::Borrowed("umbra-root"),
            overlay_class: Cow::Borrowed("umbra-overlay"),
            hidden_class: Cow::Borrowed("umbra-content-hidden"),
            block_class: Cow::Borrowed("umbra-block"),
            animate: true,
            default_corner_radius: CornerRadius::DEFAULT_PX,
        }
    }

    /// Default classes with static blocks.
    #[must_use]
    pub const fn still() -> Self {
        let mut config = Self::new();
        config.animate = false;
        config
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self::new()
    }
}
