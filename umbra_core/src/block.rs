// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skeleton block output types.
//!
//! A [`SkeletonBlock`] is one placeholder rectangle, positioned relative to
//! the analyzed container's top-left corner. Blocks are immutable once an
//! analysis pass has produced them.

use alloc::format;
use alloc::string::String;
use core::fmt;

use kurbo::Rect;

/// Identifies a block within a single analysis pass.
///
/// `pass` is the analyzer's pass number and `index` the block's position in
/// that pass's output. Identifiers are regenerated on every pass; two blocks
/// from different passes with equal ids are unrelated.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId {
    pub(crate) pass: u32,
    pub(crate) index: u32,
}

impl BlockId {
    /// Creates a block id from a pass number and an in-pass index.
    #[inline]
    #[must_use]
    pub const fn new(pass: u32, index: u32) -> Self {
        Self { pass, index }
    }

    /// Returns the pass that produced this block.
    #[inline]
    #[must_use]
    pub const fn pass(self) -> u32 {
        self.pass
    }

    /// Returns the block's encounter position within its pass.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({}@pass{})", self.index, self.pass)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.pass, self.index)
    }
}

/// A CSS-style corner radius string.
///
/// Produced by [`CornerRadius::normalize`], which replaces hard corners and
/// values it cannot read with a small default rounding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CornerRadius(String);

impl CornerRadius {
    /// The rounding applied when the computed radius is zero or unreadable.
    pub const DEFAULT_PX: f64 = 4.0;

    /// Creates a radius of `px` pixels.
    #[must_use]
    pub fn from_px(px: f64) -> Self {
        Self(format!("{px}px"))
    }

    /// Normalizes a computed `border-radius` value.
    ///
    /// Returns `default_px` pixels if `computed` is empty, if every component
    /// is a zero length, or if any component is not a CSS length or
    /// percentage. Otherwise the (trimmed) computed value is kept as is.
    #[must_use]
    pub fn normalize(computed: &str, default_px: f64) -> Self {
        let value = computed.trim();
        let mut any_nonzero = false;
        let mut components = 0_usize;
        for component in value.split(|c: char| c.is_ascii_whitespace() || c == '/') {
            if component.is_empty() {
                continue;
            }
            components += 1;
            match parse_length(component) {
                Some(v) if v != 0.0 => any_nonzero = true,
                Some(_) => {}
                None => return Self::from_px(default_px),
            }
        }
        if components == 0 || !any_nonzero {
            return Self::from_px(default_px);
        }
        Self(String::from(value))
    }

    /// Returns the radius as a CSS value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CornerRadius {
    fn default() -> Self {
        Self::from_px(Self::DEFAULT_PX)
    }
}

impl fmt::Debug for CornerRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CornerRadius({:?})", self.0)
    }
}

impl fmt::Display for CornerRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Units accepted in a computed radius component.
const LENGTH_UNITS: &[&str] = &[
    "px", "%", "em", "rem", "vw", "vh", "vmin", "vmax", "pt", "pc", "cm", "mm", "in", "ch", "ex",
];

/// Parses one radius component into its numeric value, or `None` if it is
/// not a length or percentage.
fn parse_length(component: &str) -> Option<f64> {
    let split = component
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e'))
        .unwrap_or(component.len());
    // A bare `e` would swallow the start of `em`/`ex`; back off to the digits.
    let (mut number, mut unit) = component.split_at(split);
    if let Some(stripped) = number.strip_suffix('e') {
        number = stripped;
        unit = &component[stripped.len()..];
    }
    let value: f64 = number.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let unit = unit.to_ascii_lowercase();
    if unit.is_empty() {
        // Only a unitless zero is a valid length.
        return (value == 0.0).then_some(value);
    }
    LENGTH_UNITS.contains(&unit.as_str()).then_some(value)
}

/// A placeholder rectangle emitted by the analyzer.
///
/// Coordinates are in pixels relative to the analyzed container's top-left
/// corner. Width and height are always positive.
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonBlock {
    id: BlockId,
    rect: Rect,
    corner_radius: CornerRadius,
}

impl SkeletonBlock {
    /// Creates a block. `rect` must already be container-relative.
    #[must_use]
    pub fn new(id: BlockId, rect: Rect, corner_radius: CornerRadius) -> Self {
        Self {
            id,
            rect,
            corner_radius,
        }
    }

    /// Returns the block's per-pass identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Returns the container-relative rectangle.
    #[inline]
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Offset of the top edge from the container's top edge.
    #[inline]
    #[must_use]
    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Offset of the left edge from the container's left edge.
    #[inline]
    #[must_use]
    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Returns the normalized corner radius.
    #[inline]
    #[must_use]
    pub fn corner_radius(&self) -> &CornerRadius {
        &self.corner_radius
    }

    /// Returns `(top, left, width, height)`, ignoring the id and radius.
    #[must_use]
    pub fn geometry(&self) -> (f64, f64, f64, f64) {
        (self.top(), self.left(), self.width(), self.height())
    }
}
