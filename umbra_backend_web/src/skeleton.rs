// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The loading-state wrapper.
//!
//! [`AutoSkeleton`] attaches to an existing container element. While loading
//! it marks the container with the hidden class, which hides all of its
//! content with `visibility: hidden` (layout stays measurable) except the
//! overlay, and paints the skeleton over it. Content inserted while loading
//! is hidden the same way.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use umbra_core::analyze::AnalyzerConfig;
use umbra_core::block::SkeletonBlock;
use umbra_core::observe::{Controller, ControllerState};
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement};

use crate::{DomTree, MutationWatch, OverlayPresenter, ResizeWatch, WebConfig, install_stylesheet};

/// The controller type driven by an [`AutoSkeleton`].
pub type WebController = Controller<DomTree, ResizeWatch, MutationWatch>;

/// A container whose content is replaced by an automatic skeleton while
/// loading.
///
/// Create with [`attach`](Self::attach), then mirror the host's loading flag
/// with [`set_loading`](Self::set_loading). Dropping the wrapper releases
/// both observers, removes the overlay, shows the content again and removes
/// the container class.
pub struct AutoSkeleton {
    container: HtmlElement,
    config: WebConfig,
    controller: WebController,
    presenter: Rc<RefCell<OverlayPresenter>>,
    loading: bool,
}

impl core::fmt::Debug for AutoSkeleton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AutoSkeleton")
            .field("container", &"HtmlElement")
            .field("loading", &self.loading)
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl AutoSkeleton {
    /// Attaches to `container`, initially not loading.
    ///
    /// Installs the stylesheet, marks the container as the overlay's
    /// positioning reference and appends the (hidden) overlay.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if the document is unusable or either
    /// observer cannot be created.
    pub fn attach(container: HtmlElement, config: WebConfig) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container has no owner document"))?;
        install_stylesheet(&document, &config)?;
        mark(&container, &config, Phase::Idle)?;

        let presenter = Rc::new(RefCell::new(OverlayPresenter::new(&container, &config)?));
        let mut controller = Controller::with_config(
            DomTree::new(config.overlay_class.clone()),
            ResizeWatch::new()?,
            MutationWatch::new()?,
            AnalyzerConfig {
                default_corner_radius: config.default_corner_radius,
            },
        );
        let painter = Rc::clone(&presenter);
        controller.on_update(move |blocks| painter.borrow_mut().paint(blocks));
        controller.set_container(Some(Element::from(container.clone())));

        Ok(Self {
            container,
            config,
            controller,
            presenter,
            loading: false,
        })
    }

    /// Mirrors the host's loading flag.
    ///
    /// Entering loading hides the content, shows the overlay, and activates
    /// the controller (one pass, then observation). Leaving loading stops
    /// observation before the content is shown again.
    pub fn set_loading(&mut self, loading: bool) {
        if loading == self.loading {
            return;
        }
        self.loading = loading;
        if loading {
            let _ = mark(&self.container, &self.config, Phase::Loading);
            self.presenter.borrow().set_visible(true);
            self.controller.set_enabled(true);
        } else {
            self.controller.set_enabled(false);
            self.presenter.borrow().set_visible(false);
            let _ = mark(&self.container, &self.config, Phase::Idle);
        }
    }

    /// Returns the loading flag.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Re-runs analysis now, for layout changes neither observer reports
    /// (for example a viewport scroll inside the container).
    pub fn refresh(&self) {
        self.controller.refresh();
    }

    /// Returns the blocks currently painted.
    #[must_use]
    pub fn blocks(&self) -> Vec<SkeletonBlock> {
        self.controller.blocks()
    }

    /// Returns the container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Returns the underlying controller.
    #[must_use]
    pub fn controller(&self) -> &WebController {
        &self.controller
    }

    /// Returns `true` while the skeleton is observing the container.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.controller.state() == ControllerState::Active
    }
}

/// Where the wrapper is in its life, as far as the container's classes go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Loading,
    Detached,
}

/// Returns each marker class with whether the container carries it in
/// `phase`.
fn container_marks(config: &WebConfig, phase: Phase) -> [(&str, bool); 2] {
    [
        (&*config.container_class, phase != Phase::Detached),
        (&*config.hidden_class, phase == Phase::Loading),
    ]
}

fn mark(container: &HtmlElement, config: &WebConfig, phase: Phase) -> Result<(), JsValue> {
    let classes = container.class_list();
    for (class, on) in container_marks(config, phase) {
        classes.toggle_with_force(class, on)?;
    }
    Ok(())
}

impl Drop for AutoSkeleton {
    fn drop(&mut self) {
        self.set_loading(false);
        let _ = mark(&self.container, &self.config, Phase::Detached);
    }
}
