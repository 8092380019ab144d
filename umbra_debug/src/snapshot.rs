// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of analysis output.
//!
//! A block serializes with the field names a web consumer uses to position
//! it:
//!
//! ```json
//! { "id": "0-1", "top": 12.0, "left": 8.0, "width": 120.0,
//!   "height": 24.0, "borderRadius": "4px" }
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use umbra_core::block::SkeletonBlock;
use umbra_core::trace::PassSummary;

/// Returns one block as a JSON object.
#[must_use]
pub fn block(block: &SkeletonBlock) -> Value {
    json!({
        "id": block.id().to_string(),
        "top": block.top(),
        "left": block.left(),
        "width": block.width(),
        "height": block.height(),
        "borderRadius": block.corner_radius().as_str()
    })
}

/// Returns a block sequence as a JSON array, in encounter order.
#[must_use]
pub fn blocks(blocks: &[SkeletonBlock]) -> Value {
    Value::Array(blocks.iter().map(block).collect())
}

/// Returns pass counters as a JSON object.
#[must_use]
pub fn summary(s: &PassSummary) -> Value {
    json!({
        "pass": s.pass,
        "visited": s.visited,
        "emitted": s.emitted,
        "pruned": s.pruned,
        "zeroSize": s.zero_size,
        "containers": s.containers
    })
}

/// Writes a block sequence as pretty-printed JSON.
pub fn export(blocks: &[SkeletonBlock], writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &self::blocks(blocks))?;
    writeln!(writer)
}

/// Returns `true` if two snapshots describe the same geometry, ignoring ids.
///
/// Ids carry the pass number, so two passes over an unchanged tree differ
/// only there.
#[must_use]
pub fn same_geometry(a: &Value, b: &Value) -> bool {
    fn strip(v: &Value) -> Value {
        match v {
            Value::Array(items) => Value::Array(items.iter().map(strip).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(k, _)| k.as_str() != "id")
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
    strip(a) == strip(b)
}
