// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for [`NodeStore`](crate::store::NodeStore).
//!
//! The in-memory render tree records mutations on independent channels (via
//! [`understory_dirty`]) so a host can decide which change source to fire.
//! All channels are local-only: a mark applies to the mutated node alone.
//! Subtree membership is resolved when the changes are consumed, through
//! [`TreeChanges::mutated_within`](crate::store::TreeChanges::mutated_within).
//!
//! - [`SIZE`]: a node's box size changed. Maps to the resize source when the
//!   node is the watched container.
//! - [`TOPOLOGY`], [`STYLE`], [`TEXT`]: child list, attribute/style, and
//!   character data changes. Each maps to the subtree-mutation source.
//!
//! Position-only rect changes mark nothing. Neither a resize nor a mutation
//! source reports them, so a host reacting only to these channels sees the
//! same notifications a browser would deliver.

use understory_dirty::Channel;

/// Box size changed.
pub const SIZE: Channel = Channel::new(0);

/// Child list changed (insert, remove, create, destroy).
pub const TOPOLOGY: Channel = Channel::new(1);

/// Tag, style, or marker changed.
pub const STYLE: Channel = Channel::new(2);

/// Direct text content changed.
pub const TEXT: Channel = Channel::new(3);
