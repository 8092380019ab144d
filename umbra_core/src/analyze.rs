// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The geometry analyzer.
//!
//! A pass walks the container's subtree once, in pre-order, using an explicit
//! stack rather than recursion. For each visited node:
//!
//! 1. **Exclusion.** Computed `display: none` skips the node and its
//!    subtree. A zero-width or zero-height box emits nothing but its children
//!    are still visited, since positioned descendants can be larger than
//!    their parent.
//! 2. **Classification.** See [`classify`](crate::classify). A leaf emits one
//!    block and stops the descent; anything else descends.
//!
//! Direct children of the container that carry the overlay marker are never
//! visited, so the overlay cannot skeletonize itself.
//!
//! Block coordinates are `node_rect - container_rect.origin()`, valid only
//! while the container is the overlay's positioning reference. Analysis has
//! no side effects on the tree: repeated passes over an unchanged tree
//! produce the same geometry, with fresh [`BlockId`]s.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::block::{BlockId, CornerRadius, SkeletonBlock};
use crate::classify::{Classification, classify};
use crate::trace::{PassBeginEvent, PassSummary, Tracer};
use crate::tree::RenderTree;

#[cfg(feature = "trace-rich")]
use crate::trace::{NodeVisitEvent, VisitOutcome};

/// Configuration for the [`Analyzer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalyzerConfig {
    /// Corner radius in pixels applied when a node's computed radius is zero
    /// or unreadable.
    pub default_corner_radius: f64,
}

impl AnalyzerConfig {
    /// The default configuration: 4px rounding on hard corners.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_corner_radius: CornerRadius::DEFAULT_PX,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs analysis passes and numbers them.
///
/// The only state carried between passes is the pass counter used to mint
/// [`BlockId`]s; the output of each pass depends solely on the tree.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    passes: u32,
}

impl Analyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: AnalyzerConfig) -> Self {
        Self { config, passes: 0 }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Returns the number of passes that walked a tree.
    #[must_use]
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Analyzes `container`'s subtree and returns its skeleton blocks in
    /// pre-order encounter order.
    ///
    /// Returns an empty list if `enabled` is false or `container` is `None`.
    pub fn run<T: RenderTree>(
        &mut self,
        tree: &T,
        container: Option<&T::Node>,
        enabled: bool,
        tracer: &mut Tracer<'_>,
    ) -> Vec<SkeletonBlock> {
        let mut out = Vec::new();
        self.run_into(tree, container, enabled, tracer, &mut out);
        out
    }

    /// Like [`run`](Self::run), but reuses a caller-provided buffer.
    pub fn run_into<T: RenderTree>(
        &mut self,
        tree: &T,
        container: Option<&T::Node>,
        enabled: bool,
        tracer: &mut Tracer<'_>,
        out: &mut Vec<SkeletonBlock>,
    ) {
        out.clear();
        let pass = self.passes;
        tracer.pass_begin(&PassBeginEvent {
            pass,
            enabled,
            has_container: container.is_some(),
        });

        let mut summary = PassSummary {
            pass,
            ..PassSummary::default()
        };
        if enabled && let Some(container) = container {
            walk(tree, container, pass, &self.config, out, &mut summary, tracer);
            self.passes = self.passes.wrapping_add(1);
        }
        summary.emitted = u32::try_from(out.len()).unwrap_or(u32::MAX);
        tracer.pass_summary(&summary);
    }
}

/// Analyzes `container` with the default configuration.
///
/// This is the standalone entry point for consumers that render skeletons
/// themselves. Every block carries pass number 0.
#[must_use]
pub fn analyze<T: RenderTree>(
    tree: &T,
    container: Option<&T::Node>,
    enabled: bool,
) -> Vec<SkeletonBlock> {
    Analyzer::default().run(tree, container, enabled, &mut Tracer::none())
}

/// One pre-order walk below `container`.
fn walk<T: RenderTree>(
    tree: &T,
    container: &T::Node,
    pass: u32,
    config: &AnalyzerConfig,
    out: &mut Vec<SkeletonBlock>,
    summary: &mut PassSummary,
    tracer: &mut Tracer<'_>,
) {
    let origin = tree.bounding_rect(container).origin().to_vec2();

    // Children are pushed in reverse so they pop in document order.
    let mut stack: Vec<(T::Node, u32)> = Vec::new();
    let mut scratch: Vec<T::Node> = Vec::new();
    tree.children(container, &mut scratch);
    stack.extend(
        scratch
            .drain(..)
            .rev()
            .filter(|child| !tree.is_overlay(child))
            .map(|child| (child, 0)),
    );

    while let Some((node, depth)) = stack.pop() {
        summary.visited += 1;

        let style = tree.style(&node);
        if style.display_none {
            summary.pruned += 1;
            #[cfg(feature = "trace-rich")]
            tracer.node_visit(&NodeVisitEvent {
                pass,
                depth,
                outcome: VisitOutcome::DisplayNone,
            });
            continue;
        }

        let rect = tree.bounding_rect(&node);
        if has_area(rect) {
            let class = classify(
                tree.element_kind(&node),
                || tree.has_direct_text(&node),
                style.background,
            );
            #[cfg(feature = "trace-rich")]
            tracer.node_visit(&NodeVisitEvent {
                pass,
                depth,
                outcome: VisitOutcome::Classified(class),
            });
            match class {
                Classification::Leaf(_) => {
                    let index = u32::try_from(out.len()).unwrap_or(u32::MAX);
                    out.push(SkeletonBlock::new(
                        BlockId::new(pass, index),
                        rect - origin,
                        CornerRadius::normalize(&style.border_radius, config.default_corner_radius),
                    ));
                    continue;
                }
                Classification::Container => summary.containers += 1,
                Classification::Passthrough => {}
            }
        } else {
            summary.zero_size += 1;
            #[cfg(feature = "trace-rich")]
            tracer.node_visit(&NodeVisitEvent {
                pass,
                depth,
                outcome: VisitOutcome::ZeroSize,
            });
        }

        tree.children(&node, &mut scratch);
        stack.extend(scratch.drain(..).rev().map(|child| (child, depth + 1)));
    }

    #[cfg(not(feature = "trace-rich"))]
    {
        _ = tracer;
    }
}

/// Returns `true` if the box has positive width and height. `NaN` counts as
/// empty.
fn has_area(rect: Rect) -> bool {
    rect.width() > 0.0 && rect.height() > 0.0
}
