// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observation controller: keeps skeleton blocks current while loading.
//!
//! A [`Controller`] owns the enable/disable lifecycle of one container.
//!
//! ```text
//!            enabled && container present
//!   Inactive ────────────────────────────► Active
//!      ▲     (one pass, then subscribe)      │
//!      │                                     │ resize / mutation fired
//!      │                                     ▼
//!      │                               re-analyze, notify
//!      │                                     │
//!      └─────────────────────────────────────┘
//!        disabled, container removed, or dropped
//!        (unsubscribe both sources, clear blocks)
//! ```
//!
//! While Active, every source notification replaces the block list
//! wholesale; there is no diffing or debouncing. The state machine has no
//! terminal state: it can be toggled any number of times, and each
//! activation subscribes afresh.
//!
//! Source callbacks hold only a weak reference to the controller's shared
//! state, so a source that outlives its controller never keeps it alive and
//! never re-analyzes after the controller is gone.

mod local;

pub use local::{ManualSource, SourceTrigger};

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::analyze::{Analyzer, AnalyzerConfig};
use crate::block::SkeletonBlock;
use crate::trace::{ChangeEvent, SubscriptionEvent, TraceSink, Tracer, TransitionEvent};
use crate::tree::RenderTree;

/// Which kind of change a [`ChangeSource`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The container's own size changed.
    Resize,
    /// The container's subtree changed: children added or removed,
    /// attributes changed, or text edited, at any depth.
    Mutation,
}

/// Lifecycle state of a [`Controller`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// No subscriptions and no blocks.
    #[default]
    Inactive,
    /// Subscribed to both sources; blocks track the container.
    Active,
}

/// A subscribable stream of change notifications for one target node.
///
/// A source holds at most one subscription. Subscribing again replaces the
/// previous callback.
pub trait ChangeSource<N> {
    /// Starts delivering notifications about `target` to `callback`.
    fn subscribe(&mut self, target: &N, callback: Box<dyn FnMut()>);

    /// Releases the current subscription, if any. Idempotent.
    fn unsubscribe(&mut self);

    /// Returns `true` while a subscription is held.
    fn is_subscribed(&self) -> bool;

    /// Returns which kind of change this source reports.
    fn kind(&self) -> SourceKind;
}

type UpdateHook = Box<dyn FnMut(&[SkeletonBlock])>;

struct Shared<T: RenderTree> {
    tree: T,
    container: RefCell<Option<T::Node>>,
    enabled: Cell<bool>,
    state: Cell<ControllerState>,
    analyzer: RefCell<Analyzer>,
    blocks: RefCell<Vec<SkeletonBlock>>,
    on_update: RefCell<Option<UpdateHook>>,
    sink: RefCell<Option<Box<dyn TraceSink>>>,
}

impl<T: RenderTree> Shared<T> {
    fn with_tracer<R>(&self, f: impl FnOnce(&mut Tracer<'_>) -> R) -> R {
        let mut sink = self.sink.borrow_mut();
        let mut tracer = match sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        f(&mut tracer)
    }

    /// Runs one pass over the current container and notifies the hook.
    fn analyze(&self) {
        if self.state.get() != ControllerState::Active {
            return;
        }
        let container = self.container.borrow().clone();
        {
            let mut blocks = self.blocks.borrow_mut();
            let mut analyzer = self.analyzer.borrow_mut();
            self.with_tracer(|tracer| {
                analyzer.run_into(
                    &self.tree,
                    container.as_ref(),
                    self.enabled.get(),
                    tracer,
                    &mut blocks,
                );
            });
        }
        self.notify();
    }

    fn changed(&self, source: SourceKind) {
        if self.state.get() != ControllerState::Active {
            return;
        }
        self.with_tracer(|tracer| tracer.change(&ChangeEvent { source }));
        self.analyze();
    }

    fn notify(&self) {
        // Taken out while running; a pass it triggers re-entrantly skips it.
        let hook = self.on_update.borrow_mut().take();
        if let Some(mut hook) = hook {
            let blocks = self.blocks.borrow().clone();
            hook(&blocks);
            let mut slot = self.on_update.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }

    fn transition(&self, to: ControllerState) {
        let from = self.state.replace(to);
        if from != to {
            self.with_tracer(|tracer| tracer.transition(&TransitionEvent { from, to }));
        }
    }
}

/// Drives the [`Analyzer`] from change notifications while enabled.
///
/// `R` reports container resizes and `M` reports subtree mutations. Both are
/// subscribed on activation and released on deactivation, and released when
/// the controller is dropped.
pub struct Controller<T, R, M>
where
    T: RenderTree + 'static,
    R: ChangeSource<T::Node>,
    M: ChangeSource<T::Node>,
{
    shared: Rc<Shared<T>>,
    resize: R,
    mutation: M,
}

impl<T, R, M> core::fmt::Debug for Controller<T, R, M>
where
    T: RenderTree + 'static,
    R: ChangeSource<T::Node>,
    M: ChangeSource<T::Node>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.shared.state.get())
            .field("enabled", &self.shared.enabled.get())
            .field("blocks", &self.shared.blocks.borrow().len())
            .field("passes", &self.shared.analyzer.borrow().passes())
            .finish_non_exhaustive()
    }
}

impl<T, R, M> Controller<T, R, M>
where
    T: RenderTree + 'static,
    R: ChangeSource<T::Node>,
    M: ChangeSource<T::Node>,
{
    /// Creates an inactive controller with the default analyzer
    /// configuration.
    pub fn new(tree: T, resize: R, mutation: M) -> Self {
        Self::with_config(tree, resize, mutation, AnalyzerConfig::default())
    }

    /// Creates an inactive controller with the given analyzer configuration.
    pub fn with_config(tree: T, resize: R, mutation: M, config: AnalyzerConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                tree,
                container: RefCell::new(None),
                enabled: Cell::new(false),
                state: Cell::new(ControllerState::Inactive),
                analyzer: RefCell::new(Analyzer::new(config)),
                blocks: RefCell::new(Vec::new()),
                on_update: RefCell::new(None),
                sink: RefCell::new(None),
            }),
            resize,
            mutation,
        }
    }

    /// Returns the tree being analyzed.
    pub fn tree(&self) -> &T {
        &self.shared.tree
    }

    /// Returns the resize source.
    pub fn resize_source(&self) -> &R {
        &self.resize
    }

    /// Returns the mutation source.
    pub fn mutation_source(&self) -> &M {
        &self.mutation
    }

    /// Sets or clears the container.
    ///
    /// Setting a container while Active re-activates against it: the old
    /// subscriptions are released, then a fresh pass runs and both sources
    /// subscribe to the new container.
    pub fn set_container(&mut self, container: Option<T::Node>) {
        if self.state() == ControllerState::Active {
            self.deactivate();
        }
        *self.shared.container.borrow_mut() = container;
        self.sync();
    }

    /// Sets the loading flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.shared.enabled.set(enabled);
        self.sync();
    }

    /// Returns the loading flag.
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.get()
    }

    /// Re-runs analysis now. Does nothing while Inactive.
    pub fn refresh(&self) {
        self.shared.analyze();
    }

    /// Returns a copy of the current block list.
    pub fn blocks(&self) -> Vec<SkeletonBlock> {
        self.shared.blocks.borrow().clone()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.shared.state.get()
    }

    /// Returns the number of analysis passes run so far.
    pub fn passes(&self) -> u32 {
        self.shared.analyzer.borrow().passes()
    }

    /// Installs the hook called with the new block list after every pass and
    /// with an empty list on deactivation.
    pub fn on_update(&mut self, hook: impl FnMut(&[SkeletonBlock]) + 'static) {
        *self.shared.on_update.borrow_mut() = Some(Box::new(hook));
    }

    /// Installs a trace sink for pass and lifecycle events.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        *self.shared.sink.borrow_mut() = Some(sink);
    }

    fn sync(&mut self) {
        let wanted = self.shared.enabled.get() && self.shared.container.borrow().is_some();
        match (self.state(), wanted) {
            (ControllerState::Inactive, true) => self.activate(),
            (ControllerState::Active, false) => self.deactivate(),
            _ => {}
        }
    }

    fn activate(&mut self) {
        let Some(container) = self.shared.container.borrow().clone() else {
            return;
        };
        self.shared.transition(ControllerState::Active);
        self.shared.analyze();

        let resize = callback(Rc::downgrade(&self.shared), SourceKind::Resize);
        self.resize.subscribe(&container, resize);
        self.traced_subscription(SourceKind::Resize, true);

        let mutation = callback(Rc::downgrade(&self.shared), SourceKind::Mutation);
        self.mutation.subscribe(&container, mutation);
        self.traced_subscription(SourceKind::Mutation, true);
    }

    fn deactivate(&mut self) {
        self.resize.unsubscribe();
        self.traced_subscription(SourceKind::Resize, false);
        self.mutation.unsubscribe();
        self.traced_subscription(SourceKind::Mutation, false);

        self.shared.transition(ControllerState::Inactive);
        self.shared.blocks.borrow_mut().clear();
        self.shared.notify();
    }

    fn traced_subscription(&self, source: SourceKind, subscribed: bool) {
        self.shared
            .with_tracer(|tracer| tracer.subscription(&SubscriptionEvent { source, subscribed }));
    }
}

impl<T, R, M> Drop for Controller<T, R, M>
where
    T: RenderTree + 'static,
    R: ChangeSource<T::Node>,
    M: ChangeSource<T::Node>,
{
    fn drop(&mut self) {
        self.resize.unsubscribe();
        self.mutation.unsubscribe();
        self.shared.state.set(ControllerState::Inactive);
    }
}

fn callback<T: RenderTree + 'static>(
    shared: Weak<Shared<T>>,
    source: SourceKind,
) -> Box<dyn FnMut()> {
    Box::new(move || {
        if let Some(shared) = shared.upgrade() {
            shared.changed(source);
        }
    })
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::Rect;

    use super::*;
    use crate::store::{NodeId, NodeStore};

    type Tree = Rc<RefCell<NodeStore>>;

    struct Fixture {
        tree: Tree,
        root: NodeId,
        controller: Controller<Tree, ManualSource, ManualSource>,
        resize: SourceTrigger,
        mutation: SourceTrigger,
    }

    /// A container with an image and a paragraph.
    fn fixture() -> Fixture {
        let mut store = NodeStore::new();
        let root = store.element("section", Rect::new(0.0, 0.0, 400.0, 300.0));
        let img = store.element("img", Rect::new(10.0, 10.0, 110.0, 110.0));
        let p = store.element("p", Rect::new(10.0, 120.0, 390.0, 160.0));
        store.append_child(root, img);
        store.append_child(root, p);
        store.take_changes();

        let tree = Rc::new(RefCell::new(store));
        let (resize_source, resize) = ManualSource::resize();
        let (mutation_source, mutation) = ManualSource::mutation();
        let controller = Controller::new(Rc::clone(&tree), resize_source, mutation_source);
        Fixture {
            tree,
            root,
            controller,
            resize,
            mutation,
        }
    }

    fn geometry(blocks: &[SkeletonBlock]) -> Vec<(f64, f64, f64, f64)> {
        blocks.iter().map(SkeletonBlock::geometry).collect()
    }

    #[test]
    fn stays_inactive_until_enabled_with_container() {
        let mut f = fixture();
        assert_eq!(f.controller.state(), ControllerState::Inactive);

        f.controller.set_container(Some(f.root));
        assert_eq!(f.controller.state(), ControllerState::Inactive);
        assert!(!f.resize.is_subscribed());

        f.controller.set_container(None);
        f.controller.set_enabled(true);
        assert_eq!(f.controller.state(), ControllerState::Inactive);
        assert_eq!(f.controller.passes(), 0);
        assert!(f.controller.blocks().is_empty());
    }

    #[test]
    fn activation_runs_one_pass_then_subscribes() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);

        assert_eq!(f.controller.state(), ControllerState::Active);
        assert_eq!(f.controller.passes(), 1);
        assert_eq!(f.controller.blocks().len(), 2);
        assert!(f.resize.is_subscribed());
        assert!(f.mutation.is_subscribed());
    }

    #[test]
    fn inserted_heading_triggers_one_pass_and_one_block() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        assert_eq!(f.controller.blocks().len(), 2);

        let changes = {
            let mut store = f.tree.borrow_mut();
            let h2 = store.element("h2", Rect::new(10.0, 170.0, 300.0, 200.0));
            store.append_child(f.root, h2);
            store.take_changes()
        };
        assert!(changes.mutated_within(&f.tree.borrow(), f.root));
        assert!(f.mutation.fire());

        assert_eq!(f.controller.passes(), 2);
        let blocks = f.controller.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].geometry(), (170.0, 10.0, 290.0, 30.0));
        assert!(blocks.iter().all(|b| b.id().pass() == 1));
    }

    #[test]
    fn resize_triggers_reanalysis() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);

        f.tree
            .borrow_mut()
            .set_rect(f.root, Rect::new(0.0, 0.0, 200.0, 300.0));
        assert!(f.resize.fire());
        assert_eq!(f.controller.passes(), 2);
    }

    #[test]
    fn disable_releases_subscriptions_and_clears_blocks() {
        let mut f = fixture();
        let updates = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&updates);
        f.controller
            .on_update(move |blocks| seen.borrow_mut().push(blocks.len()));
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        f.controller.set_enabled(false);

        assert_eq!(f.controller.state(), ControllerState::Inactive);
        assert!(!f.resize.is_subscribed());
        assert!(!f.mutation.is_subscribed());
        assert!(f.controller.blocks().is_empty());
        assert_eq!(*updates.borrow(), vec![2, 0]);

        // A late notification has no subscriber to reach.
        assert!(!f.mutation.fire());
        assert_eq!(f.controller.passes(), 1);
    }

    #[test]
    fn toggling_resubscribes_and_reproduces_geometry() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        let first = geometry(&f.controller.blocks());

        f.controller.set_enabled(false);
        f.controller.set_enabled(true);

        assert_eq!(f.controller.state(), ControllerState::Active);
        assert_eq!(f.resize.subscriptions(), 2);
        assert_eq!(f.mutation.subscriptions(), 2);
        assert!(f.mutation.is_subscribed());
        assert_eq!(geometry(&f.controller.blocks()), first);
        assert_eq!(f.controller.passes(), 2);
    }

    #[test]
    fn removing_container_deactivates() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        f.controller.set_container(None);

        assert_eq!(f.controller.state(), ControllerState::Inactive);
        assert!(!f.resize.is_subscribed());
        assert!(f.controller.blocks().is_empty());
    }

    #[test]
    fn new_container_while_active_reactivates() {
        let mut f = fixture();
        let other = {
            let mut store = f.tree.borrow_mut();
            let other = store.element("div", Rect::new(0.0, 400.0, 200.0, 500.0));
            let button = store.element("button", Rect::new(10.0, 410.0, 90.0, 440.0));
            store.append_child(other, button);
            other
        };
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        f.controller.set_container(Some(other));

        assert_eq!(f.controller.state(), ControllerState::Active);
        assert_eq!(f.resize.subscriptions(), 2);
        let blocks = f.controller.blocks();
        assert_eq!(geometry(&blocks), vec![(10.0, 10.0, 80.0, 30.0)]);
    }

    #[test]
    fn refresh_is_a_no_op_while_inactive() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.refresh();
        assert_eq!(f.controller.passes(), 0);

        f.controller.set_enabled(true);
        f.controller.refresh();
        assert_eq!(f.controller.passes(), 2);
    }

    #[test]
    fn drop_releases_subscriptions() {
        let mut f = fixture();
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        let Fixture {
            controller,
            resize,
            mutation,
            ..
        } = f;
        drop(controller);

        assert!(!resize.is_subscribed());
        assert!(!mutation.is_subscribed());
        assert!(!mutation.fire());
    }

    #[test]
    fn disabling_from_the_hook_releases_subscriptions() {
        let f = fixture();
        let Fixture {
            root,
            controller,
            resize,
            mutation,
            ..
        } = f;
        let controller = Rc::new(RefCell::new(controller));
        let weak = Rc::downgrade(&controller);
        controller.borrow_mut().on_update(move |_| {
            // Borrowed during activation; only notifications get through.
            if let Some(controller) = weak.upgrade()
                && let Ok(mut controller) = controller.try_borrow_mut()
            {
                controller.set_enabled(false);
            }
        });
        controller.borrow_mut().set_container(Some(root));
        controller.borrow_mut().set_enabled(true);
        assert_eq!(controller.borrow().state(), ControllerState::Active);

        assert!(mutation.fire());
        assert_eq!(controller.borrow().state(), ControllerState::Inactive);
        assert!(!resize.is_subscribed());
        assert!(!mutation.is_subscribed());
        assert!(!mutation.fire());
        assert_eq!(controller.borrow().passes(), 2);
    }

    #[test]
    fn hook_sees_every_pass() {
        let mut f = fixture();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        f.controller.on_update(move |blocks| {
            sink.borrow_mut().extend(blocks.iter().map(|b| b.id().index()));
        });
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        assert!(f.resize.fire());
        assert_eq!(*seen.borrow(), vec![0, 1, 0, 1]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn lifecycle_is_traced() {
        use crate::trace::PassSummary;

        struct Log(Rc<RefCell<Vec<&'static str>>>);
        impl TraceSink for Log {
            fn on_pass_summary(&mut self, _: &PassSummary) {
                self.0.borrow_mut().push("pass");
            }
            fn on_transition(&mut self, e: &TransitionEvent) {
                self.0.borrow_mut().push(match e.to {
                    ControllerState::Active => "active",
                    ControllerState::Inactive => "inactive",
                });
            }
            fn on_subscription(&mut self, e: &SubscriptionEvent) {
                self.0.borrow_mut().push(if e.subscribed { "sub" } else { "unsub" });
            }
            fn on_change(&mut self, _: &ChangeEvent) {
                self.0.borrow_mut().push("change");
            }
        }

        let mut f = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        f.controller.set_trace_sink(Box::new(Log(Rc::clone(&log))));
        f.controller.set_container(Some(f.root));
        f.controller.set_enabled(true);
        assert!(f.mutation.fire());
        f.controller.set_enabled(false);

        assert_eq!(
            *log.borrow(),
            vec![
                "active", "pass", "sub", "sub", "change", "pass", "unsub", "unsub", "inactive"
            ]
        );
    }
}
