// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breach Selection: from a click to the domain object under it.
//!
//! Picking runs in three steps:
//!
//! 1) [`pick`] drives a select pass over one or more scene roots against a
//!    [`SelectionBackend`]. Every primitive is tagged with the name path of the selectable
//!    nodes above it.
//! 2) The backend's records are decoded into a [`Selection`]: [`Hit`]s with a depth range and
//!    a name path, nearest first.
//! 3) A [`SelectionResolver`] or [`TypedSelectionResolver`] walks the same scene with the
//!    nearest hit's path and returns the payload of the node it names.
//!
//! [`SoftwareSelector`] is a CPU backend for headless picking and tests.
//!
//! ## Example
//!
//! ```
//! use breach_scene::{Pass, Payload, RenderNode, Scene, Topology, Vertex};
//! use breach_selection::{SoftwareSelector, pick};
//! use glam::Vec3;
//! use kurbo::Rect;
//!
//! struct Target { score: u32 }
//! let target = Target { score: 25 };
//!
//! fn square(pass: &mut Pass<'_>) {
//!     let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
//!     let quad = corners.map(|(x, y)| Vertex::at(Vec3::new(x, y, 0.0)));
//!     pass.submit(Topology::Quads, Vec3::Z, &quad);
//! }
//!
//! let mut scene = Scene::new();
//! let targets = scene.insert(RenderNode::composite().selectable(1, Payload::EMPTY));
//! scene
//!     .insert_child(targets, RenderNode::leaf(square).selectable(7, Payload::new(&target)))
//!     .unwrap();
//!
//! let mut selector = SoftwareSelector::new(Rect::new(0.0, 0.0, 640.0, 480.0));
//! let selection = pick(&scene, &[targets], &mut selector).unwrap();
//! assert_eq!(selection.nearest().unwrap().names, [1, 7]);
//!
//! let hit = selection.nearest_typed::<Target>(&scene, targets).unwrap();
//! assert_eq!(hit.score, 25);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to the scene crate, Kurbo and glam.
//! - `libm`: `no_std` math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod decode;
mod pick;
mod resolver;
mod software;

pub use decode::{DecodeError, Hit, Selection};
pub use pick::{RawSelection, SelectionBackend, pick};
pub use resolver::{SelectionResolver, TypedSelectionResolver};
pub use software::{DEFAULT_CAPACITY, SoftwareSelector};
