// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A visitor assembled from per-variant callbacks.
//!
//! ## Overview
//!
//! [`SpecializedVisitor`] implements [`HierarchicalVisitor`] for a base type `B` by forwarding
//! each hook to callbacks registered against view types (see [`Narrow`]).
//!
//! ## Resolution
//!
//! For each hook call with node `n`:
//!
//! 1. If a callback was registered for the view whose exact tag equals `n.tag()`, it runs.
//! 2. Otherwise the callbacks for that hook are tried in registration order, skipping the one
//!    already tried in step 1. The first whose view narrows `n` runs.
//! 3. Otherwise the fallback visitor handles the hook, if one is set.
//! 4. Otherwise the per-hook default from [`HookDefaults`] is returned.
//!
//! Each hook has an independent registry. When two callbacks for one hook share an exact tag,
//! the first registration owns the exact slot; the later one is still tried in step 2.
//!
//! ## State
//!
//! Callbacks receive `&mut S`, the visitor's state, so they can accumulate results without
//! capturing the visitor itself. Read it back with [`SpecializedVisitor::state`] or
//! [`SpecializedVisitor::into_state`].

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::hierarchy::HierarchicalVisitor;
use crate::types::{Hook, HookDefaults, Narrow, Tagged};

type Handler<'v, S, B> = Box<dyn FnMut(&mut S, &B) -> Option<bool> + 'v>;

/// Callbacks registered for one hook.
struct Specializations<'v, S, B: Tagged + ?Sized> {
    exact: BTreeMap<B::Tag, usize>,
    ordered: Vec<Handler<'v, S, B>>,
}

impl<'v, S, B: Tagged + ?Sized> Specializations<'v, S, B> {
    fn new() -> Self {
        Self {
            exact: BTreeMap::new(),
            ordered: Vec::new(),
        }
    }

    fn add<V, F>(&mut self, mut f: F)
    where
        V: Narrow<B> + 'v,
        F: FnMut(&mut S, V) -> bool + 'v,
    {
        let index = self.ordered.len();
        self.ordered.push(Box::new(move |state: &mut S, base: &B| {
            V::narrow(base).map(|view| f(state, view))
        }));
        self.exact.entry(V::exact_tag()).or_insert(index);
    }

    fn dispatch(&mut self, state: &mut S, node: &B) -> Option<bool> {
        let exact = self.exact.get(&node.tag()).copied();
        if let Some(handler) = exact.and_then(|i| self.ordered.get_mut(i)) {
            if let Some(result) = handler(state, node) {
                return Some(result);
            }
        }
        self.ordered
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exact)
            .find_map(|(_, handler)| handler(state, node))
    }
}

/// Dispatches hook calls to callbacks registered against view types.
///
/// See the [module docs](self) for the resolution order.
///
/// ## Example
///
/// ```
/// use breach_visitor::hierarchy::HierarchicalVisitor;
/// use breach_visitor::specialized::SpecializedVisitor;
/// use breach_visitor::types::{Narrow, Tagged};
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// enum Shape { Circle, Square }
///
/// struct Node(Shape);
/// impl Tagged for Node {
///     type Tag = Shape;
///     fn tag(&self) -> Shape { self.0 }
/// }
///
/// struct Circle;
/// impl Narrow<Node> for Circle {
///     fn exact_tag() -> Shape { Shape::Circle }
///     fn narrow(n: &Node) -> Option<Self> { (n.0 == Shape::Circle).then_some(Circle) }
/// }
///
/// let mut v = SpecializedVisitor::<Node, u32>::new(0);
/// v.add_leaf::<Circle, _>(|count, _| { *count += 1; true });
/// assert!(v.visit_leaf(&Node(Shape::Circle)));
/// assert!(v.visit_leaf(&Node(Shape::Square)));
/// assert_eq!(*v.state(), 1);
/// ```
pub struct SpecializedVisitor<'v, B: Tagged + ?Sized, S = ()> {
    state: S,
    defaults: HookDefaults,
    fallback: Option<Box<dyn HierarchicalVisitor<B> + 'v>>,
    enter: Specializations<'v, S, B>,
    leaf: Specializations<'v, S, B>,
    leave: Specializations<'v, S, B>,
}

impl<'v, B: Tagged + ?Sized, S> SpecializedVisitor<'v, B, S> {
    /// Creates a visitor with no callbacks, no fallback, and [`HookDefaults::CONTINUE`].
    pub fn new(state: S) -> Self {
        Self {
            state,
            defaults: HookDefaults::CONTINUE,
            fallback: None,
            enter: Specializations::new(),
            leaf: Specializations::new(),
            leave: Specializations::new(),
        }
    }

    /// Replaces the per-hook defaults.
    #[must_use]
    pub fn with_defaults(mut self, defaults: HookDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the fallback visitor.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl HierarchicalVisitor<B> + 'v) -> Self {
        self.set_fallback(fallback);
        self
    }

    /// Sets the fallback visitor, replacing any previous one.
    pub fn set_fallback(&mut self, fallback: impl HierarchicalVisitor<B> + 'v) {
        self.fallback = Some(Box::new(fallback));
    }

    /// Removes the fallback visitor.
    pub fn clear_fallback(&mut self) {
        self.fallback = None;
    }

    /// Registers an enter callback for nodes that narrow to `V`.
    pub fn add_enter<V, F>(&mut self, f: F) -> &mut Self
    where
        V: Narrow<B> + 'v,
        F: FnMut(&mut S, V) -> bool + 'v,
    {
        self.enter.add::<V, F>(f);
        self
    }

    /// Registers a leaf callback for nodes that narrow to `V`.
    pub fn add_leaf<V, F>(&mut self, f: F) -> &mut Self
    where
        V: Narrow<B> + 'v,
        F: FnMut(&mut S, V) -> bool + 'v,
    {
        self.leaf.add::<V, F>(f);
        self
    }

    /// Registers a leave callback for nodes that narrow to `V`.
    pub fn add_leave<V, F>(&mut self, f: F) -> &mut Self
    where
        V: Narrow<B> + 'v,
        F: FnMut(&mut S, V) -> bool + 'v,
    {
        self.leave.add::<V, F>(f);
        self
    }

    /// Returns the visitor state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Returns the visitor state mutably.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Consumes the visitor and returns its state.
    pub fn into_state(self) -> S {
        self.state
    }

    fn resolve(&mut self, hook: Hook, node: &B) -> bool {
        let specs = match hook {
            Hook::Enter => &mut self.enter,
            Hook::Leaf => &mut self.leaf,
            Hook::Leave => &mut self.leave,
        };
        if let Some(result) = specs.dispatch(&mut self.state, node) {
            return result;
        }
        if let Some(fallback) = self.fallback.as_mut() {
            log::trace!("{hook:?} on {:?} handled by fallback", node.tag());
            return match hook {
                Hook::Enter => fallback.visit_enter(node),
                Hook::Leaf => fallback.visit_leaf(node),
                Hook::Leave => fallback.visit_leave(node),
            };
        }
        log::trace!("{hook:?} on {:?} uses default", node.tag());
        self.defaults.get(hook)
    }
}

impl<B: Tagged + ?Sized, S> HierarchicalVisitor<B> for SpecializedVisitor<'_, B, S> {
    fn visit_enter(&mut self, node: &B) -> bool {
        self.resolve(Hook::Enter, node)
    }

    fn visit_leaf(&mut self, node: &B) -> bool {
        self.resolve(Hook::Leaf, node)
    }

    fn visit_leave(&mut self, node: &B) -> bool {
        self.resolve(Hook::Leave, node)
    }
}

impl<B: Tagged + ?Sized, S: fmt::Debug> fmt::Debug for SpecializedVisitor<'_, B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedVisitor")
            .field("state", &self.state)
            .field("defaults", &self.defaults)
            .field("has_fallback", &self.fallback.is_some())
            .field("enter", &self.enter.ordered.len())
            .field("leaf", &self.leaf.ordered.len())
            .field("leave", &self.leave.ordered.len())
            .finish_non_exhaustive()
    }
}
