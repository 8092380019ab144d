// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-driven change sources.
//!
//! [`ManualSource`] implements [`ChangeSource`] for hosts without native
//! layout or tree notifications. The source half goes to the
//! [`Controller`](super::Controller); the [`SourceTrigger`] half stays with
//! the host, which calls [`fire`](SourceTrigger::fire) when it knows the
//! watched geometry or subtree changed, for example after
//! [`NodeStore::take_changes`](crate::store::NodeStore::take_changes)
//! reports a resize or a mutation.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use super::{ChangeSource, SourceKind};

struct Slot {
    callback: Option<Box<dyn FnMut()>>,
    /// Bumped on every subscribe/unsubscribe so `fire` can tell whether the
    /// callback it took out is still the current one.
    epoch: u64,
    subscriptions: u32,
}

/// A [`ChangeSource`] fired explicitly through its [`SourceTrigger`].
pub struct ManualSource {
    kind: SourceKind,
    slot: Rc<RefCell<Slot>>,
}

/// The host's handle for firing a [`ManualSource`].
#[derive(Clone)]
pub struct SourceTrigger {
    slot: Rc<RefCell<Slot>>,
}

impl ManualSource {
    /// Creates an unsubscribed source of the given kind and its trigger.
    #[must_use]
    pub fn new(kind: SourceKind) -> (Self, SourceTrigger) {
        let slot = Rc::new(RefCell::new(Slot {
            callback: None,
            epoch: 0,
            subscriptions: 0,
        }));
        let trigger = SourceTrigger {
            slot: Rc::clone(&slot),
        };
        (Self { kind, slot }, trigger)
    }

    /// Creates a resize source and its trigger.
    #[must_use]
    pub fn resize() -> (Self, SourceTrigger) {
        Self::new(SourceKind::Resize)
    }

    /// Creates a subtree-mutation source and its trigger.
    #[must_use]
    pub fn mutation() -> (Self, SourceTrigger) {
        Self::new(SourceKind::Mutation)
    }
}

impl<N> ChangeSource<N> for ManualSource {
    fn subscribe(&mut self, target: &N, callback: Box<dyn FnMut()>) {
        _ = target;
        let mut slot = self.slot.borrow_mut();
        slot.callback = Some(callback);
        slot.epoch += 1;
        slot.subscriptions += 1;
    }

    fn unsubscribe(&mut self) {
        let mut slot = self.slot.borrow_mut();
        slot.callback = None;
        // Also bumped while the callback is out being fired, so `fire` does
        // not put it back.
        slot.epoch += 1;
    }

    fn is_subscribed(&self) -> bool {
        self.slot.borrow().callback.is_some()
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}

impl SourceTrigger {
    /// Invokes the subscribed callback, if any. Returns whether it fired.
    ///
    /// The callback may unsubscribe or resubscribe the source while running.
    pub fn fire(&self) -> bool {
        let (callback, epoch) = {
            let mut slot = self.slot.borrow_mut();
            (slot.callback.take(), slot.epoch)
        };
        let Some(mut callback) = callback else {
            return false;
        };
        callback();
        let mut slot = self.slot.borrow_mut();
        if slot.epoch == epoch {
            slot.callback = Some(callback);
        }
        true
    }

    /// Returns `true` while a callback is subscribed.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.slot.borrow().callback.is_some()
    }

    /// Returns how many times the source has been subscribed in total.
    #[must_use]
    pub fn subscriptions(&self) -> u32 {
        self.slot.borrow().subscriptions
    }
}

impl core::fmt::Debug for ManualSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ManualSource")
            .field("kind", &self.kind)
            .field("subscribed", &self.slot.borrow().callback.is_some())
            .finish()
    }
}

impl core::fmt::Debug for SourceTrigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("SourceTrigger")
            .field("subscribed", &slot.callback.is_some())
            .field("subscriptions", &slot.subscriptions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::{Cell, RefCell};

    use super::*;

    #[test]
    fn fires_only_while_subscribed() {
        let (mut source, trigger) = ManualSource::mutation();
        assert!(!trigger.fire());

        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        ChangeSource::<()>::subscribe(&mut source, &(), Box::new(move || seen.set(seen.get() + 1)));
        assert!(trigger.is_subscribed());
        assert!(trigger.fire());
        assert!(trigger.fire());
        assert_eq!(count.get(), 2);

        ChangeSource::<()>::unsubscribe(&mut source);
        assert!(!trigger.fire());
        assert_eq!(count.get(), 2);
        assert_eq!(trigger.subscriptions(), 1);
    }

    #[test]
    fn unsubscribe_from_inside_callback_sticks() {
        let (source, trigger) = ManualSource::mutation();
        let source = Rc::new(RefCell::new(source));
        let count = Rc::new(Cell::new(0));

        let inner = Rc::clone(&source);
        let seen = Rc::clone(&count);
        ChangeSource::<()>::subscribe(
            &mut *source.borrow_mut(),
            &(),
            Box::new(move || {
                seen.set(seen.get() + 1);
                ChangeSource::<()>::unsubscribe(&mut *inner.borrow_mut());
            }),
        );

        assert!(trigger.fire());
        assert!(!trigger.is_subscribed());
        assert!(!ChangeSource::<()>::is_subscribed(&*source.borrow()));
        assert!(!trigger.fire());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn resubscribe_from_inside_callback_replaces_it() {
        let (source, trigger) = ManualSource::resize();
        let source = Rc::new(RefCell::new(source));
        let replaced = Rc::new(Cell::new(0));

        let inner = Rc::clone(&source);
        let after = Rc::clone(&replaced);
        ChangeSource::<()>::subscribe(
            &mut *source.borrow_mut(),
            &(),
            Box::new(move || {
                let after = Rc::clone(&after);
                ChangeSource::<()>::subscribe(
                    &mut *inner.borrow_mut(),
                    &(),
                    Box::new(move || after.set(after.get() + 1)),
                );
            }),
        );

        assert!(trigger.fire());
        assert!(trigger.is_subscribed());
        assert!(trigger.fire());
        assert_eq!(replaced.get(), 1);
        assert_eq!(trigger.subscriptions(), 2);
    }

    #[test]
    fn kind_is_reported() {
        let (source, _) = ManualSource::resize();
        assert_eq!(ChangeSource::<()>::kind(&source), SourceKind::Resize);
    }
}
