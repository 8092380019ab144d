// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification heuristic: which nodes become skeleton blocks.
//!
//! Rules are evaluated in precedence order; the first match wins.
//!
//! 1. Replaced/media elements (`img`, `video`, `svg`) are leaves.
//! 2. Headings (`h1`–`h6`) are leaves.
//! 3. Form controls (`button`, `input`, `textarea`, `select`) are leaves.
//! 4. Paragraphs (`p`) are leaves, drawn as one block regardless of wrapping.
//! 5. Any other element with direct non-whitespace text is a leaf.
//! 6. An element painting a background is a container: no block, descend.
//! 7. Everything else passes through: no block, descend.
//!
//! Rule 5 is checked before rule 6, so a node with both direct text and a
//! background is drawn as a single block rather than decomposed.

/// Element categories the heuristic distinguishes, derived from tag names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Replaced or media content: `img`, `video`, `svg`.
    Media,
    /// Heading of the given level (1–6).
    Heading(u8),
    /// Interactive form control: `button`, `input`, `textarea`, `select`.
    Control,
    /// Paragraph: `p`.
    Paragraph,
    /// Any other element.
    Other,
}

impl ElementKind {
    /// Maps a tag name (any ASCII case) to its kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        let is = |name: &str| tag.eq_ignore_ascii_case(name);
        if is("img") || is("video") || is("svg") {
            Self::Media
        } else if is("button") || is("input") || is("textarea") || is("select") {
            Self::Control
        } else if is("p") {
            Self::Paragraph
        } else if let [h, level @ b'1'..=b'6'] = tag.as_bytes()
            && h.eq_ignore_ascii_case(&b'h')
        {
            Self::Heading(level - b'0')
        } else {
            Self::Other
        }
    }
}

/// Why a node was classified as a leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeafReason {
    /// Rule 1: replaced or media element.
    Media,
    /// Rule 2: heading.
    Heading,
    /// Rule 3: form control.
    Control,
    /// Rule 4: paragraph.
    Paragraph,
    /// Rule 5: element with direct text.
    DirectText,
}

/// Outcome of classifying one visible, non-empty node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Emit one block and do not descend.
    Leaf(LeafReason),
    /// Paints a background but has no direct content: descend, no block.
    Container,
    /// Nothing to draw here: descend, no block.
    Passthrough,
}

impl Classification {
    /// Returns `true` if the node becomes a block.
    #[inline]
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

/// Classifies a node.
///
/// `has_direct_text` is only called for [`ElementKind::Other`], since the
/// lookup walks the node's text children.
#[must_use]
pub fn classify(
    kind: ElementKind,
    has_direct_text: impl FnOnce() -> bool,
    has_background: bool,
) -> Classification {
    match kind {
        ElementKind::Media => Classification::Leaf(LeafReason::Media),
        ElementKind::Heading(_) => Classification::Leaf(LeafReason::Heading),
        ElementKind::Control => Classification::Leaf(LeafReason::Control),
        ElementKind::Paragraph => Classification::Leaf(LeafReason::Paragraph),
        ElementKind::Other => {
            if has_direct_text() {
                Classification::Leaf(LeafReason::DirectText)
            } else if has_background {
                Classification::Container
            } else {
                Classification::Passthrough
            }
        }
    }
}
