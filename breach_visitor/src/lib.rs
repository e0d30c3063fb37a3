// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breach Visitor: hierarchical visitors with runtime-tag specialization.
//!
//! ## Overview
//!
//! This crate defines the enter/leaf/leave traversal protocol used by the Breach scene graph,
//! and a dispatcher that builds a visitor out of callbacks registered per node kind.
//! It does not know about any particular tree.
//! A tree type implements [`Visitable`](crate::hierarchy::Visitable) (usually with
//! [`walk_composite`](crate::hierarchy::walk_composite) and
//! [`walk_leaf`](crate::hierarchy::walk_leaf)), and its node handle implements
//! [`Tagged`](crate::types::Tagged).
//!
//! ## Protocol
//!
//! - `visit_enter` runs before a composite's children. `false` skips them and the composite's
//!   `visit_leave`.
//! - `visit_leaf` runs for a leaf.
//! - `visit_leave` runs after a composite's children and produces the composite's result.
//! - A child returning `false` stops its remaining siblings.
//!
//! ## Specialization
//!
//! [`SpecializedVisitor`](crate::specialized::SpecializedVisitor) lets callers register a
//! callback per hook and per view type. A view type implements
//! [`Narrow`](crate::types::Narrow): it names the tag it matches exactly and narrows compatible
//! nodes. Resolution is deterministic:
//!
//! 1) the callback whose view exactly matches the node's tag,
//! 2) else the first registered callback whose view accepts the node,
//! 3) else the fallback visitor,
//! 4) else the per-hook default.
//!
//! An exact match always beats a compatible one, regardless of registration order.
//!
//! ## Workflow
//!
//! ```
//! use breach_visitor::hierarchy::{HierarchicalVisitor, Visitable, walk_composite, walk_leaf};
//! use breach_visitor::specialized::SpecializedVisitor;
//! use breach_visitor::types::{Narrow, Tagged};
//!
//! enum Tree { Leaf(u32), Group(Vec<Tree>) }
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
//! enum Kind { Leaf, Group }
//!
//! impl Tagged for Tree {
//!     type Tag = Kind;
//!     fn tag(&self) -> Kind {
//!         match self { Tree::Leaf(_) => Kind::Leaf, Tree::Group(_) => Kind::Group }
//!     }
//! }
//!
//! impl Visitable<Tree> for Tree {
//!     fn accept(&self, v: &mut dyn HierarchicalVisitor<Tree>) -> bool {
//!         match self {
//!             Tree::Leaf(_) => walk_leaf(v, self),
//!             Tree::Group(cs) => walk_composite(v, self, cs, |v, c| c.accept(v)),
//!         }
//!     }
//! }
//!
//! struct Value(u32);
//! impl Narrow<Tree> for Value {
//!     fn exact_tag() -> Kind { Kind::Leaf }
//!     fn narrow(t: &Tree) -> Option<Self> {
//!         match t { Tree::Leaf(x) => Some(Value(*x)), _ => None }
//!     }
//! }
//!
//! let tree = Tree::Group(vec![Tree::Leaf(2), Tree::Group(vec![Tree::Leaf(3)])]);
//! let mut sum = SpecializedVisitor::<Tree, u32>::new(0);
//! sum.add_leaf::<Value, _>(|acc, v| { *acc += v.0; true });
//! assert!(tree.accept(&mut sum));
//! assert_eq!(sum.into_state(), 5);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod hierarchy;
pub mod specialized;
pub mod types;
