// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for runtime classification: tags, narrowing, hooks, and defaults.
//!
//! ## Overview
//!
//! A visited base type describes its most-derived kind with a [`Tagged::Tag`].
//! A specialization declares the view type it wants to receive; that view type implements
//! [`Narrow`] to say which tag it matches exactly and how to obtain it from a compatible base.
//! These types are consumed by the [`specialized`](crate::specialized) dispatcher.

/// Runtime classification of a visited base type.
///
/// The tag is the analogue of a most-derived runtime type: two nodes with equal tags are
/// interchangeable as far as dispatch is concerned.
pub trait Tagged {
    /// Stable per-variant tag. Used as the key of the exact-match table.
    type Tag: Copy + Ord + core::fmt::Debug;

    /// Returns the tag of this node.
    fn tag(&self) -> Self::Tag;
}

/// A view of a base node that a specialization can be declared against.
///
/// Views are cheap handles (typically `Copy`) that do not borrow from the `&B` they were
/// narrowed from, so they can be handed to callbacks by value.
pub trait Narrow<B: Tagged + ?Sized>: Sized {
    /// Tag of the base nodes whose most-derived kind is exactly this view.
    fn exact_tag() -> B::Tag;

    /// Narrows `base` to this view.
    ///
    /// Returns `None` when `base` is not compatible. Failure is never an error: the
    /// dispatcher treats it as "this specialization does not apply".
    fn narrow(base: &B) -> Option<Self>;
}

/// The three visitor hooks.
///
/// Appears in trace logs and in [`HookDefaults::get`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Hook {
    /// Before descending into a composite.
    Enter,
    /// In lieu of descent, for a leaf.
    Leaf,
    /// After a composite's children.
    Leave,
}

/// Per-hook results used when no specialization applies and no fallback is configured.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HookDefaults {
    /// Default for [`Hook::Enter`].
    pub enter: bool,
    /// Default for [`Hook::Leaf`].
    pub leaf: bool,
    /// Default for [`Hook::Leave`].
    pub leave: bool,
}

impl HookDefaults {
    /// Continue traversal everywhere.
    pub const CONTINUE: Self = Self {
        enter: true,
        leaf: true,
        leave: true,
    };

    /// Returns the default for `hook`.
    pub fn get(self, hook: Hook) -> bool {
        match hook {
            Hook::Enter => self.enter,
            Hook::Leaf => self.leaf,
            Hook::Leave => self.leave,
        }
    }
}

impl Default for HookDefaults {
    fn default() -> Self {
        Self::CONTINUE
    }
}
