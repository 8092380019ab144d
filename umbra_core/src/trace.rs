// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for analysis passes and the observation lifecycle.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! analyzer and controller call as they work. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`NodeVisitEvent`] and the
//!   corresponding `TraceSink` method.

use crate::observe::{ControllerState, SourceKind};

#[cfg(feature = "trace-rich")]
use crate::classify::Classification;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What the analyzer decided for one visited node.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisitOutcome {
    /// Computed `display: none`; the subtree was skipped.
    DisplayNone,
    /// Zero-width or zero-height box; no block, children still visited.
    ZeroSize,
    /// Classified by the heuristic.
    Classified(Classification),
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an analysis pass starts.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Pass number (also the `pass` of every block it emits).
    pub pass: u32,
    /// Whether analysis was enabled for this call.
    pub enabled: bool,
    /// Whether a container was available.
    pub has_container: bool,
}

/// Per-pass counters, emitted when an analysis pass completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Pass number.
    pub pass: u32,
    /// Nodes visited (including excluded ones).
    pub visited: u32,
    /// Blocks emitted.
    pub emitted: u32,
    /// Nodes excluded with their subtree by `display: none`.
    pub pruned: u32,
    /// Zero-size nodes that emitted nothing.
    pub zero_size: u32,
    /// Background containers descended into.
    pub containers: u32,
}

/// Emitted when the controller changes state.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// State before the transition.
    pub from: ControllerState,
    /// State after the transition.
    pub to: ControllerState,
}

/// Emitted when a change source is subscribed or released.
#[derive(Clone, Copy, Debug)]
pub struct SubscriptionEvent {
    /// Which source.
    pub source: SourceKind,
    /// `true` on subscribe, `false` on release.
    pub subscribed: bool,
}

/// Emitted when a change source fires and triggers re-analysis.
#[derive(Clone, Copy, Debug)]
pub struct ChangeEvent {
    /// Which source fired.
    pub source: SourceKind,
}

/// A per-node classification record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct NodeVisitEvent {
    /// Pass number.
    pub pass: u32,
    /// Depth below the container (direct children are depth 0).
    pub depth: u32,
    /// What happened to the node.
    pub outcome: VisitOutcome,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the analyzer and controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when an analysis pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when an analysis pass completes.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called when the controller changes state.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a change source is subscribed or released.
    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        _ = e;
    }

    /// Called when a change source fires.
    fn on_change(&mut self, e: &ChangeEvent) {
        _ = e;
    }

    /// Called for every visited node (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_visit(&mut self, e: &NodeVisitEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SubscriptionEvent`].
    #[inline]
    pub fn subscription(&mut self, e: &SubscriptionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_subscription(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ChangeEvent`].
    #[inline]
    pub fn change(&mut self, e: &ChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeVisitEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_visit(&mut self, e: &NodeVisitEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_visit(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
