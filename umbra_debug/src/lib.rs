// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON snapshots for umbra diagnostics.
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](umbra_core::trace::TraceSink)
//!   writing one human-readable line per event.
//! - [`snapshot`]: block sequences and pass summaries as JSON, for golden
//!   files and bug reports.

pub mod pretty;
pub mod snapshot;
