// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node descriptions and the capabilities they are composed of.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::backend::Pass;
use crate::payload::Payload;
use crate::types::{NodeId, NodeTraits};

/// Submits primitives for a leaf.
pub trait Draw {
    /// Draws into `pass`.
    fn render(&self, pass: &mut Pass<'_>);
}

impl<F: Fn(&mut Pass<'_>)> Draw for F {
    fn render(&self, pass: &mut Pass<'_>) {
        self(pass);
    }
}

/// Brackets rendering with state changes.
///
/// `deconfigure` always runs after `configure`, after the node's transform has been unloaded.
pub trait Configure {
    /// Applies state before the node renders.
    fn configure(&self, pass: &mut Pass<'_>);
    /// Reverts what [`configure`](Self::configure) applied.
    fn deconfigure(&self, pass: &mut Pass<'_>);
}

/// Brackets rendering with a coordinate transform.
pub trait Transform {
    /// Pushes the transform.
    fn load_transform(&self, pass: &mut Pass<'_>);
    /// Pops the transform.
    fn unload_transform(&self, pass: &mut Pass<'_>);
}

impl<T: Configure + ?Sized> Configure for &T {
    fn configure(&self, pass: &mut Pass<'_>) {
        (**self).configure(pass);
    }

    fn deconfigure(&self, pass: &mut Pass<'_>) {
        (**self).deconfigure(pass);
    }
}

impl<T: Transform + ?Sized> Transform for &T {
    fn load_transform(&self, pass: &mut Pass<'_>) {
        (**self).load_transform(pass);
    }

    fn unload_transform(&self, pass: &mut Pass<'_>) {
        (**self).unload_transform(pass);
    }
}

/// Structural shape of a node. Closed: a node is a leaf or a composite.
pub(crate) enum Body<'a> {
    Leaf(Box<dyn Draw + 'a>),
    Composite(Vec<NodeId>),
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct Selectable<'a> {
    pub(crate) name: u32,
    pub(crate) payload: Payload<'a>,
}

/// Description of a scene node: its shape plus any capabilities.
///
/// Build one with [`RenderNode::leaf`] or [`RenderNode::composite`], add capabilities, then
/// insert it into a [`Scene`](crate::Scene).
///
/// ```
/// use breach_scene::{Pass, Payload, RenderNode, Scene};
/// use breach_scene::parts::{Texture, TextureId, Texturer};
///
/// let answer = 42_u32;
/// let mut scene = Scene::new();
/// let group = scene.insert(
///     RenderNode::composite()
///         .selectable(1, Payload::EMPTY)
///         .configured_by(Texturer::new(Texture::new(TextureId(5)))),
/// );
/// let leaf = scene
///     .insert_child(group, RenderNode::leaf(|_: &mut Pass<'_>| {}).selectable(7, Payload::new(&answer)))
///     .unwrap();
/// assert_eq!(scene.node(leaf).and_then(|n| n.name()), Some(7));
/// ```
pub struct RenderNode<'a> {
    pub(crate) body: Body<'a>,
    pub(crate) selectable: Option<Selectable<'a>>,
    pub(crate) configurers: Vec<Box<dyn Configure + 'a>>,
    pub(crate) transformers: Vec<Box<dyn Transform + 'a>>,
}

impl<'a> RenderNode<'a> {
    fn with_body(body: Body<'a>) -> Self {
        Self {
            body,
            selectable: None,
            configurers: Vec::new(),
            transformers: Vec::new(),
        }
    }

    /// A leaf that renders with `draw`.
    pub fn leaf(draw: impl Draw + 'a) -> Self {
        Self::with_body(Body::Leaf(Box::new(draw)))
    }

    /// A composite with no children yet.
    pub fn composite() -> Self {
        Self::with_body(Body::Composite(Vec::new()))
    }

    /// Makes the node selectable under `name`, exposing `payload` once picked.
    ///
    /// In select passes the name is pushed before any configurer runs and popped after all of
    /// them have been reverted.
    #[must_use]
    pub fn selectable(mut self, name: u32, payload: Payload<'a>) -> Self {
        self.selectable = Some(Selectable { name, payload });
        self
    }

    /// Adds a configurer. Configurers apply in insertion order and revert in reverse.
    #[must_use]
    pub fn configured_by(mut self, configurer: impl Configure + 'a) -> Self {
        self.configurers.push(Box::new(configurer));
        self
    }

    /// Adds a transformer. Transformers load in insertion order and unload in reverse.
    #[must_use]
    pub fn transformed_by(mut self, transformer: impl Transform + 'a) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// The capability tag of this node.
    pub fn traits(&self) -> NodeTraits {
        let mut traits = match self.body {
            Body::Leaf(_) => NodeTraits::LEAF,
            Body::Composite(_) => NodeTraits::COMPOSITE,
        };
        if self.selectable.is_some() {
            traits |= NodeTraits::SELECTABLE | NodeTraits::CONFIGURER;
        }
        if !self.configurers.is_empty() {
            traits |= NodeTraits::CONFIGURER;
        }
        if !self.transformers.is_empty() {
            traits |= NodeTraits::TRANSFORMER;
        }
        traits
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.body {
            Body::Leaf(_) => &[],
            Body::Composite(children) => children,
        }
    }

    pub(crate) fn configure(&self, pass: &mut Pass<'_>) {
        if let Some(sel) = self.selectable.filter(|_| pass.is_selecting()) {
            pass.push_name(sel.name);
        }
        for c in &self.configurers {
            c.configure(pass);
        }
    }

    pub(crate) fn deconfigure(&self, pass: &mut Pass<'_>) {
        for c in self.configurers.iter().rev() {
            c.deconfigure(pass);
        }
        if self.selectable.is_some() && pass.is_selecting() {
            pass.pop_name();
        }
    }

    pub(crate) fn load_transform(&self, pass: &mut Pass<'_>) {
        for t in &self.transformers {
            t.load_transform(pass);
        }
    }

    pub(crate) fn unload_transform(&self, pass: &mut Pass<'_>) {
        for t in self.transformers.iter().rev() {
            t.unload_transform(pass);
        }
    }
}

impl fmt::Debug for RenderNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderNode")
            .field("traits", &self.traits())
            .field("children", &self.children())
            .field("selectable", &self.selectable)
            .field("configurers", &self.configurers.len())
            .field("transformers", &self.transformers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::MatrixTransformer;
    use glam::Mat4;

    struct Nop;
    impl Configure for Nop {
        fn configure(&self, _: &mut Pass<'_>) {}
        fn deconfigure(&self, _: &mut Pass<'_>) {}
    }

    #[test]
    fn traits_reflect_composition() {
        let leaf = RenderNode::leaf(|_: &mut Pass<'_>| {});
        assert_eq!(leaf.traits(), NodeTraits::LEAF);

        let sel = RenderNode::leaf(|_: &mut Pass<'_>| {}).selectable(1, Payload::EMPTY);
        assert_eq!(
            sel.traits(),
            NodeTraits::LEAF | NodeTraits::SELECTABLE | NodeTraits::CONFIGURER
        );

        let full = RenderNode::composite()
            .configured_by(Nop)
            .transformed_by(MatrixTransformer::new(Mat4::IDENTITY));
        assert_eq!(
            full.traits(),
            NodeTraits::COMPOSITE | NodeTraits::CONFIGURER | NodeTraits::TRANSFORMER
        );
    }

    #[test]
    fn leaf_has_no_children() {
        let leaf = RenderNode::leaf(|_: &mut Pass<'_>| {});
        assert!(leaf.children().is_empty());
    }
}
