// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, capability tags, and render modes.

/// Identifier for a node in a [`Scene`](crate::Scene).
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Composites refer to their children by `NodeId`. A stale child handle is skipped (and logged)
/// during rendering and traversal; it never aliases a different live node because the
/// generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Capabilities a node is composed of.
    ///
    /// Exactly one of [`LEAF`](Self::LEAF) and [`COMPOSITE`](Self::COMPOSITE) is set on every
    /// node. The full set is the node's runtime tag for visitor specialization: a view matches a
    /// node exactly when the tags are equal, and is compatible when the node's tag contains the
    /// view's tag.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NodeTraits: u8 {
        /// Draws primitives directly.
        const LEAF         = 0b0000_0001;
        /// Drives its children through the full pass.
        const COMPOSITE    = 0b0000_0010;
        /// Brackets rendering with configure/deconfigure.
        const CONFIGURER   = 0b0000_0100;
        /// Brackets rendering with load/unload of a transform.
        const TRANSFORMER  = 0b0000_1000;
        /// Carries a name and a payload. Always comes with [`CONFIGURER`](Self::CONFIGURER).
        const SELECTABLE   = 0b0001_0000;
    }
}

/// What a pass is producing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Visible output.
    #[default]
    Render,
    /// Hit testing: primitives are tagged with the active name path instead of drawn.
    Select,
    /// Geometry capture.
    Feedback,
}
