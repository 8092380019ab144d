// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry analysis engine for automatic skeleton loading overlays.
//!
//! `umbra_core` infers placeholder ("skeleton") shapes directly from a
//! rendered subtree's own geometry, so a loading overlay needs no manual
//! configuration of shapes, sizes, or positions. It is `no_std` compatible
//! (with `alloc`) and knows nothing about any particular UI toolkit: hosts
//! describe their render tree through the [`RenderTree`](tree::RenderTree)
//! trait and their change notifications through
//! [`ChangeSource`](observe::ChangeSource).
//!
//! # Architecture
//!
//! ```text
//!   Host (DOM, native renderer, NodeStore)
//!       │  container + loading flag
//!       ▼
//!   Controller::set_enabled(true) ──► Analyzer::run() ──► Vec<SkeletonBlock>
//!       ▲                                                     │
//!       │ resize / mutation callbacks                         ▼
//!   ChangeSource (ResizeObserver, MutationObserver)     on_update hook
//!                                                             │
//!                                                             ▼
//!                                                  Overlay presenter
//! ```
//!
//! **[`analyze`]**: Iterative pre-order walk that filters hidden and
//! zero-size nodes and classifies the rest with the heuristic in
//! [`classify`]. Output coordinates are relative to the container.
//!
//! **[`observe`]**: Enable/disable state machine that re-runs the analyzer
//! whenever a resize or subtree-mutation source fires, and releases both
//! subscriptions on deactivation.
//!
//! **[`block`]**: The immutable [`SkeletonBlock`](block::SkeletonBlock)
//! output unit and its corner-radius normalization.
//!
//! **[`tree`]**: The render-tree abstraction and computed-style helpers.
//!
//! **[`store`]**: An in-memory struct-of-arrays render tree with dirty
//! tracking, for non-browser hosts and tests.
//!
//! **[`dirty`]**: Dirty channels used by [`store`].
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! analysis instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   visit events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod analyze;
pub mod block;
pub mod classify;
pub mod dirty;
pub mod observe;
pub mod store;
pub mod trace;
pub mod tree;

pub use analyze::{Analyzer, AnalyzerConfig, analyze};
pub use block::{BlockId, CornerRadius, SkeletonBlock};
pub use observe::{ChangeSource, Controller, ControllerState};
