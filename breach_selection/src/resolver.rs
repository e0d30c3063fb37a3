// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name path resolution.
//!
//! A resolver walks a scene with a target name path and returns the payload of the selectable
//! node whose names from the root equal that path. Only branches whose selectable names are a
//! prefix of the path are entered.
//!
//! Depth moves with the walk: it advances on entering a matching selectable composite and
//! retreats on leaving one, so siblings are always compared against the same path element.
//!
//! A selectable composite whose name does not match returns `false` from its enter hook, which
//! under the visitor protocol also ends the walk of its parent. Resolve against the root whose
//! name is the first element of the path.

use core::any::Any;
use core::fmt;
use core::marker::PhantomData;

use breach_scene::view::{SelectableComposite, SelectableLeaf};
use breach_scene::{NodeId, NodeRef, Payload, Scene};
use breach_visitor::hierarchy::HierarchicalVisitor;
use breach_visitor::specialized::SpecializedVisitor;

/// Walk state shared by the resolver hooks.
#[derive(Debug)]
struct Search<'p, 's> {
    path: &'p [u32],
    level: usize,
    accept: fn(&Payload<'s>) -> bool,
    found: Option<Payload<'s>>,
}

impl<'s> Search<'_, 's> {
    fn take(&mut self, payload: Payload<'s>) {
        if (self.accept)(&payload) {
            log::debug!("resolved {:?} to {}", self.path, payload.type_name().unwrap_or("?"));
            self.found = Some(payload);
        }
    }

    fn enter(&mut self, node: SelectableComposite<'s>) -> bool {
        if self.found.is_some() {
            return false;
        }
        let Some(&expected) = self.path.get(self.level) else {
            return false;
        };
        if node.name() != Some(expected) {
            log::trace!("{:?} does not match {expected} at level {}", node.id(), self.level);
            return false;
        }
        if self.level + 1 < self.path.len() {
            self.level += 1;
            return true;
        }
        self.take(node.payload());
        false
    }

    fn leaf(&mut self, node: SelectableLeaf<'s>) -> bool {
        if self.found.is_some() {
            return false;
        }
        let Some(&expected) = self.path.get(self.level) else {
            return true;
        };
        if node.name() == Some(expected) && self.level + 1 == self.path.len() {
            self.take(node.payload());
        }
        self.found.is_none()
    }

    fn leave(&mut self, _: SelectableComposite<'s>) -> bool {
        self.level = self.level.saturating_sub(1);
        self.found.is_none()
    }
}

/// Resolves a name path to the untyped payload of the matching selectable node.
///
/// An empty payload at the end of the path counts as not found.
pub struct SelectionResolver<'p, 's> {
    visitor: SpecializedVisitor<'p, NodeRef<'s>, Search<'p, 's>>,
}

impl<'p, 's: 'p> SelectionResolver<'p, 's> {
    /// Creates a resolver for `path`, outermost name first.
    pub fn new(path: &'p [u32]) -> Self {
        Self::with_filter(path, Payload::is_set)
    }

    fn with_filter(path: &'p [u32], accept: fn(&Payload<'s>) -> bool) -> Self {
        let mut visitor = SpecializedVisitor::new(Search {
            path,
            level: 0,
            accept,
            found: None,
        });
        visitor
            .add_enter::<SelectableComposite<'s>, _>(Search::enter)
            .add_leaf::<SelectableLeaf<'s>, _>(Search::leaf)
            .add_leave::<SelectableComposite<'s>, _>(Search::leave);
        Self { visitor }
    }

    /// The target path.
    pub fn path(&self) -> &'p [u32] {
        self.visitor.state().path
    }

    /// Returns `true` once a payload has been found.
    pub fn is_found(&self) -> bool {
        self.visitor.state().found.is_some()
    }

    /// The payload found so far.
    pub fn selected(&self) -> Option<Payload<'s>> {
        self.visitor.state().found
    }

    /// Walks the subtree at `root` and returns the payload found there.
    pub fn resolve(mut self, scene: &'s Scene<'_>, root: NodeId) -> Option<Payload<'s>> {
        if self.path().is_empty() {
            log::warn!("empty name path resolves to nothing");
            return None;
        }
        scene.accept(root, &mut self.visitor);
        self.selected()
    }
}

impl<'s> HierarchicalVisitor<NodeRef<'s>> for SelectionResolver<'_, 's> {
    fn visit_enter(&mut self, node: &NodeRef<'s>) -> bool {
        self.visitor.visit_enter(node)
    }

    fn visit_leaf(&mut self, node: &NodeRef<'s>) -> bool {
        self.visitor.visit_leaf(node)
    }

    fn visit_leave(&mut self, node: &NodeRef<'s>) -> bool {
        self.visitor.visit_leave(node)
    }
}

impl fmt::Debug for SelectionResolver<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.visitor.state();
        f.debug_struct("SelectionResolver")
            .field("path", &state.path)
            .field("level", &state.level)
            .field("found", &state.found)
            .finish_non_exhaustive()
    }
}

/// Resolves a name path to a payload of type `T`.
///
/// A payload of any other type at the end of the path counts as not found, exactly as if the
/// path matched nothing.
pub struct TypedSelectionResolver<'p, 's, T> {
    inner: SelectionResolver<'p, 's>,
    _type: PhantomData<fn() -> T>,
}

impl<'p, 's: 'p, T: Any> TypedSelectionResolver<'p, 's, T> {
    /// Creates a resolver for `path`, outermost name first.
    pub fn new(path: &'p [u32]) -> Self {
        Self {
            inner: SelectionResolver::with_filter(path, |payload| payload.is::<T>()),
            _type: PhantomData,
        }
    }

    /// The target path.
    pub fn path(&self) -> &'p [u32] {
        self.inner.path()
    }

    /// Returns `true` once a `T` has been found.
    pub fn is_found(&self) -> bool {
        self.inner.is_found()
    }

    /// The value found so far.
    pub fn selected(&self) -> Option<&'s T> {
        self.inner.selected().and_then(|p| p.get::<T>())
    }

    /// Walks the subtree at `root` and returns the `T` found there.
    pub fn resolve(self, scene: &'s Scene<'_>, root: NodeId) -> Option<&'s T> {
        self.inner.resolve(scene, root).and_then(|p| p.get::<T>())
    }
}

impl<'s, T> HierarchicalVisitor<NodeRef<'s>> for TypedSelectionResolver<'_, 's, T> {
    fn visit_enter(&mut self, node: &NodeRef<'s>) -> bool {
        self.inner.visit_enter(node)
    }

    fn visit_leaf(&mut self, node: &NodeRef<'s>) -> bool {
        self.inner.visit_leaf(node)
    }

    fn visit_leave(&mut self, node: &NodeRef<'s>) -> bool {
        self.inner.visit_leave(node)
    }
}

impl<T> fmt::Debug for TypedSelectionResolver<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedSelectionResolver")
            .field("type", &core::any::type_name::<T>())
            .field("inner", &self.inner)
            .finish()
    }
}
