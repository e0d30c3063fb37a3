// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small shooting gallery built on the Breach crates.
//!
//! The room's walls, the targets and the breaches each get a scene root. Every object is a
//! selectable leaf carrying itself as payload, so a pick resolves straight back to the
//! [`Target`](targets::Target) or [`Wall`](walls::Wall) under the cursor.
//!
//! See [`gallery::Gallery`] for the assembled scene and the shooting rules, and [`reveal`] for
//! how a frame shows the view through open breaches.

pub mod breaches;
pub mod crosshair;
pub mod gallery;
pub mod logging;
pub mod reveal;
pub mod targets;
pub mod walls;
