// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser change sources.
//!
//! [`ResizeWatch`] wraps a `ResizeObserver` and [`MutationWatch`] wraps a
//! `MutationObserver`. Each owns one JS closure for its whole lifetime; the
//! Rust callback behind it is swapped on subscribe and cleared on
//! unsubscribe. Observer records are ignored: any notification means
//! "re-analyze".
//!
//! Both observers deliver asynchronously, so DOM writes made while handling a
//! notification are reported in a later task, never re-entrantly.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use umbra_core::observe::{ChangeSource, SourceKind};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, ResizeObserver};

type ObserverClosure = Closure<dyn FnMut()>;

#[derive(Default)]
struct SlotState {
    callback: Option<Box<dyn FnMut()>>,
    /// Bumped on every `set`, so `fire` can tell whether the callback it took
    /// out was replaced or cleared while running.
    epoch: u64,
}

/// The Rust side of an observer closure.
#[derive(Clone, Default)]
struct CallbackSlot(Rc<RefCell<SlotState>>);

impl CallbackSlot {
    fn set(&self, callback: Option<Box<dyn FnMut()>>) {
        let mut state = self.0.borrow_mut();
        state.callback = callback;
        state.epoch += 1;
    }

    fn is_set(&self) -> bool {
        self.0.borrow().callback.is_some()
    }

    fn fire(&self) {
        let (callback, epoch) = {
            let mut state = self.0.borrow_mut();
            (state.callback.take(), state.epoch)
        };
        let Some(mut callback) = callback else {
            return;
        };
        callback();
        let mut state = self.0.borrow_mut();
        if state.epoch == epoch {
            state.callback = Some(callback);
        }
    }

    fn closure(&self) -> ObserverClosure {
        let slot = self.clone();
        Closure::wrap(Box::new(move || slot.fire()) as Box<dyn FnMut()>)
    }
}

/// Fires when the observed container's own size changes.
pub struct ResizeWatch {
    observer: ResizeObserver,
    slot: CallbackSlot,
    _closure: ObserverClosure,
}

impl ResizeWatch {
    /// Creates an idle watch.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if `ResizeObserver` is unavailable.
    pub fn new() -> Result<Self, JsValue> {
        let slot = CallbackSlot::default();
        let closure = slot.closure();
        let observer = ResizeObserver::new(closure.as_ref().unchecked_ref())?;
        Ok(Self {
            observer,
            slot,
            _closure: closure,
        })
    }
}

impl ChangeSource<Element> for ResizeWatch {
    fn subscribe(&mut self, target: &Element, callback: Box<dyn FnMut()>) {
        self.observer.disconnect();
        self.slot.set(Some(callback));
        self.observer.observe(target);
    }

    fn unsubscribe(&mut self) {
        self.observer.disconnect();
        self.slot.set(None);
    }

    fn is_subscribed(&self) -> bool {
        self.slot.is_set()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Resize
    }
}

impl Drop for ResizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl core::fmt::Debug for ResizeWatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResizeWatch")
            .field("subscribed", &self.slot.is_set())
            .finish_non_exhaustive()
    }
}

/// Fires on any change in the observed container's subtree: child list,
/// attributes, or character data, at any depth.
pub struct MutationWatch {
    observer: MutationObserver,
    slot: CallbackSlot,
    _closure: ObserverClosure,
}

impl MutationWatch {
    /// Creates an idle watch.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if `MutationObserver` is unavailable.
    pub fn new() -> Result<Self, JsValue> {
        let slot = CallbackSlot::default();
        let closure = slot.closure();
        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())?;
        Ok(Self {
            observer,
            slot,
            _closure: closure,
        })
    }
}

fn subtree_options() -> MutationObserverInit {
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    init.set_attributes(true);
    init.set_character_data(true);
    init
}

impl ChangeSource<Element> for MutationWatch {
    fn subscribe(&mut self, target: &Element, callback: Box<dyn FnMut()>) {
        self.observer.disconnect();
        if self
            .observer
            .observe_with_options(target, &subtree_options())
            .is_ok()
        {
            self.slot.set(Some(callback));
        } else {
            self.slot.set(None);
        }
    }

    fn unsubscribe(&mut self) {
        self.observer.disconnect();
        self.slot.set(None);
    }

    fn is_subscribed(&self) -> bool {
        self.slot.is_set()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Mutation
    }
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl core::fmt::Debug for MutationWatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MutationWatch")
            .field("subscribed", &self.slot.is_set())
            .finish_non_exhaustive()
    }
}
