// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowed node handles and the typed views used for visitor specialization.
//!
//! ## Overview
//!
//! [`NodeRef`] is the base type visitors see. It is tagged with [`NodeTraits`], and each view
//! below narrows from it:
//!
//! | View | Exact tag | Accepts |
//! |---|---|---|
//! | [`Leaf`] | `LEAF` | every leaf |
//! | [`Composite`] | `COMPOSITE` | every composite |
//! | [`Configurer`] | `CONFIGURER` | every configuring node |
//! | [`Transformer`] | `TRANSFORMER` | every transforming node |
//! | [`Selectable`] | `SELECTABLE \| CONFIGURER` | every selectable node |
//! | [`SelectableLeaf`] | `LEAF \| SELECTABLE \| CONFIGURER` | selectable leaves |
//! | [`SelectableComposite`] | `COMPOSITE \| SELECTABLE \| CONFIGURER` | selectable composites |
//!
//! A view accepts a node when the node's tag contains the view's tag, so a selectable leaf that
//! also carries a texture configurer and a transform still narrows to [`SelectableLeaf`], through
//! the ordered tier rather than the exact one.

use core::fmt;
use core::ops::Deref;

use breach_visitor::hierarchy::{HierarchicalVisitor, Visitable, walk_composite, walk_leaf};
use breach_visitor::types::{Narrow, Tagged};

use crate::backend::Pass;
use crate::node::{Body, RenderNode};
use crate::payload::Payload;
use crate::scene::Scene;
use crate::types::{NodeId, NodeTraits};

/// A live node in a scene.
#[derive(Copy, Clone)]
pub struct NodeRef<'s> {
    pub(crate) scene: &'s Scene<'s>,
    pub(crate) id: NodeId,
    pub(crate) node: &'s RenderNode<'s>,
}

impl<'s> NodeRef<'s> {
    /// The node's handle.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's capability tag.
    pub fn tag(&self) -> NodeTraits {
        self.node.traits()
    }

    /// Returns `true` for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self.node.body, Body::Leaf(_))
    }

    /// Returns `true` for composites.
    pub fn is_composite(&self) -> bool {
        matches!(self.node.body, Body::Composite(_))
    }

    /// The selection name, if selectable.
    pub fn name(&self) -> Option<u32> {
        self.node.selectable.map(|s| s.name)
    }

    /// The payload; empty when the node is not selectable.
    pub fn payload(&self) -> Payload<'s> {
        self.node
            .selectable
            .map(|s| s.payload)
            .unwrap_or_default()
    }

    /// Child handles in render order. Empty for leaves.
    pub fn child_ids(&self) -> &'s [NodeId] {
        self.node.children()
    }

    /// Live children in render order. Stale handles are skipped.
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'s>> + use<'s> {
        let scene = self.scene;
        self.node
            .children()
            .iter()
            .filter_map(move |&id| scene.node(id))
    }

    /// Runs the configure phase.
    pub fn configure(&self, pass: &mut Pass<'_>) {
        self.node.configure(pass);
    }

    /// Runs the load-transform phase.
    pub fn load_transform(&self, pass: &mut Pass<'_>) {
        self.node.load_transform(pass);
    }

    /// Runs the render phase: draws a leaf, or drives each child through the full pass.
    pub fn render(&self, pass: &mut Pass<'_>) {
        match &self.node.body {
            Body::Leaf(draw) => draw.render(pass),
            Body::Composite(children) => {
                for &child in children {
                    match self.scene.node(child) {
                        Some(c) => c.full_render(pass),
                        None => log::warn!("skipping stale child {child:?} of {:?}", self.id),
                    }
                }
            }
        }
    }

    /// Runs the unload-transform phase.
    pub fn unload_transform(&self, pass: &mut Pass<'_>) {
        self.node.unload_transform(pass);
    }

    /// Runs the deconfigure phase.
    pub fn deconfigure(&self, pass: &mut Pass<'_>) {
        self.node.deconfigure(pass);
    }

    /// Runs all five phases in order.
    pub fn full_render(&self, pass: &mut Pass<'_>) {
        self.configure(pass);
        self.load_transform(pass);
        self.render(pass);
        self.unload_transform(pass);
        self.deconfigure(pass);
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

impl Tagged for NodeRef<'_> {
    type Tag = NodeTraits;

    fn tag(&self) -> NodeTraits {
        self.node.traits()
    }
}

impl<'s> Visitable<NodeRef<'s>> for NodeRef<'s> {
    fn accept(&self, visitor: &mut dyn HierarchicalVisitor<NodeRef<'s>>) -> bool {
        match &self.node.body {
            Body::Leaf(_) => walk_leaf(visitor, self),
            Body::Composite(children) => {
                walk_composite(visitor, self, children.iter().copied(), |v, id| {
                    match self.scene.node(id) {
                        Some(child) => child.accept(v),
                        None => {
                            log::warn!("skipping stale child {id:?} of {:?}", self.id);
                            true
                        }
                    }
                })
            }
        }
    }
}

macro_rules! view {
    ($(#[$meta:meta])* $name:ident, $tag:expr) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name<'s>(NodeRef<'s>);

        impl<'s> $name<'s> {
            /// The underlying node.
            pub fn node(&self) -> NodeRef<'s> {
                self.0
            }
        }

        impl<'s> Deref for $name<'s> {
            type Target = NodeRef<'s>;

            fn deref(&self) -> &NodeRef<'s> {
                &self.0
            }
        }

        impl<'s> Narrow<NodeRef<'s>> for $name<'s> {
            fn exact_tag() -> NodeTraits {
                $tag
            }

            fn narrow(base: &NodeRef<'s>) -> Option<Self> {
                base.tag().contains($tag).then_some(Self(*base))
            }
        }
    };
}

view!(
    /// Any leaf.
    Leaf,
    NodeTraits::LEAF
);
view!(
    /// Any composite.
    Composite,
    NodeTraits::COMPOSITE
);
view!(
    /// Any node with configure/deconfigure behavior.
    Configurer,
    NodeTraits::CONFIGURER
);
view!(
    /// Any node with load/unload transform behavior.
    Transformer,
    NodeTraits::TRANSFORMER
);
view!(
    /// Any selectable node.
    Selectable,
    NodeTraits::SELECTABLE.union(NodeTraits::CONFIGURER)
);
view!(
    /// A selectable leaf.
    SelectableLeaf,
    NodeTraits::LEAF
        .union(NodeTraits::SELECTABLE)
        .union(NodeTraits::CONFIGURER)
);
view!(
    /// A selectable composite.
    SelectableComposite,
    NodeTraits::COMPOSITE
        .union(NodeTraits::SELECTABLE)
        .union(NodeTraits::CONFIGURER)
);
