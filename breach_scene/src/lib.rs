// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breach Scene: a render graph of leaf and composite nodes driven through a five-phase pass.
//!
//! Breach Scene describes what to draw as a tree of nodes over externally owned domain objects,
//! and drives it against a graphics [`Backend`] once per frame and once per hit test.
//!
//! - A node is a leaf (it draws) or a composite (it drives its children). Nothing else.
//! - Capabilities compose onto either shape: configurers bracket rendering with state changes,
//!   transformers bracket it with a coordinate transform, and a selectable node carries a name
//!   and a [`Payload`].
//! - Every node runs the same sequence: configure, load transform, render, unload transform,
//!   deconfigure.
//! - Nodes are visited with the [`breach_visitor`] protocol; [`NodeRef`] is the base type and the
//!   types in [`view`] are the specializations.
//!
//! ## The pass
//!
//! A [`Pass`] is threaded through every phase. It carries the [`RenderMode`], the name path, and
//! the backend. In [`RenderMode::Select`] each selectable node pushes its name before its
//! configurers run and pops it after they have been reverted, so every primitive submitted
//! below it is tagged with the full path of names from the root.
//!
//! ## Ownership
//!
//! The [`Scene`] owns node descriptions in generational slots addressed by [`NodeId`].
//! Composites list children by handle and never own them. Domain objects are borrowed for the
//! scene's lifetime parameter, so a payload cannot outlive what it points to.
//!
//! ## Example
//!
//! ```
//! use breach_scene::{Pass, Payload, RecordingBackend, RenderMode, RenderNode, Scene};
//! use breach_scene::primitives::RegularPolygon;
//!
//! struct Target { score: u32 }
//! let bullseye = Target { score: 10 };
//!
//! let mut scene = Scene::new();
//! let targets = scene.insert(RenderNode::composite().selectable(1, Payload::EMPTY));
//! scene
//!     .insert_child(
//!         targets,
//!         RenderNode::leaf(RegularPolygon::new(20)).selectable(7, Payload::new(&bullseye)),
//!     )
//!     .unwrap();
//!
//! let mut backend = RecordingBackend::new();
//! scene.full_render(targets, &mut Pass::new(RenderMode::Select, &mut backend));
//! assert_eq!(backend.submissions().count(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo and glam.
//! - `libm`: `no_std` math for Kurbo and glam.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
mod node;
mod payload;
mod recording;
mod scene;
mod types;

pub mod parts;
pub mod primitives;
pub mod view;

pub use backend::{
    Backend, BlendFactor, Buffers, Capabilities, DepthFunc, Face, MatrixMode, Pass, Primitive,
    Topology, Vertex,
};
pub use node::{Configure, Draw, RenderNode, Transform};
pub use payload::Payload;
pub use recording::{Command, RecordingBackend};
pub use scene::{Scene, SceneError};
pub use types::{NodeId, NodeTraits, RenderMode};
pub use view::NodeRef;

pub use breach_visitor;
