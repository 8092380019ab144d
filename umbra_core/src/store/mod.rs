// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory render tree.
//!
//! [`NodeStore`] holds an already laid-out element tree for hosts that are not
//! a browser (native renderers, headless layout engines, tests). Each node
//! has:
//!
//! - An identity ([`NodeId`]), a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - Properties read by the analyzer: tag, absolute rect, [`NodeStyle`],
//!   direct text, and [`NodeFlags`].
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//! `NodeStore` implements [`RenderTree`], and mutations are recorded on the
//! [`dirty`](crate::dirty) channels so a host can drive the controller's
//! change sources from [`TreeChanges`].
//!
//! [`NodeStyle`]: crate::tree::NodeStyle
//! [`RenderTree`]: crate::tree::RenderTree

mod changes;
mod id;
mod nodes;
mod traverse;

pub use changes::TreeChanges;
pub use id::{INVALID, NodeId};
pub use nodes::{NodeFlags, NodeStore};
pub use traverse::{Ancestors, Children};
