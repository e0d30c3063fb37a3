// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graphics backend interface and the render pass threaded through every phase.
//!
//! ## Overview
//!
//! Nodes never talk to a global graphics state. Each phase receives a [`Pass`], which carries
//! the [`RenderMode`], the active name path, and the [`Backend`] that receives state changes
//! and primitive submissions.
//!
//! The name path lives in the pass itself. Selectable nodes push their name through
//! [`Pass::push_name`] during select passes; every [`Pass::submit`] hands the backend the path
//! active at that moment.

use alloc::vec::Vec;
use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::parts::{Material, Texture};
use crate::types::RenderMode;

bitflags::bitflags! {
    /// Fixed-function capabilities that can be toggled on a backend.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// 2D texturing.
        const TEXTURE_2D          = 0b0000_0001;
        /// Face culling.
        const CULL_FACE           = 0b0000_0010;
        /// Alpha test against [`Backend::alpha_threshold`].
        const ALPHA_TEST          = 0b0000_0100;
        /// Source-alpha blending.
        const BLEND               = 0b0000_1000;
        /// Depth offset for filled polygons.
        const POLYGON_OFFSET_FILL = 0b0001_0000;
        /// Depth testing.
        const DEPTH_TEST          = 0b0010_0000;
    }
}

bitflags::bitflags! {
    /// Framebuffer planes cleared by [`Backend::clear`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Buffers: u8 {
        /// Color planes, alpha included.
        const COLOR = 0b01;
        /// Depth buffer.
        const DEPTH = 0b10;
    }
}

/// Weighting applied to one side of a blend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `1`.
    One,
    /// `0`.
    Zero,
    /// Incoming alpha.
    SrcAlpha,
    /// `1 - ` incoming alpha.
    OneMinusSrcAlpha,
    /// Alpha already in the framebuffer.
    DstAlpha,
    /// `1 - ` alpha already in the framebuffer.
    OneMinusDstAlpha,
}

/// Matrix stack a transform applies to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatrixMode {
    /// Model-view stack.
    #[default]
    ModelView,
    /// Projection stack.
    Projection,
}

/// Polygon faces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// Front faces.
    Front,
    /// Back faces.
    Back,
    /// Both faces.
    FrontAndBack,
}

/// Depth comparison.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    /// Pass if nearer.
    #[default]
    Less,
    /// Pass if nearer or equal.
    LessEqual,
    /// Pass if farther.
    Greater,
    /// Always pass.
    Always,
}

/// How a vertex list is assembled into polygons.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Independent triangles, three vertices each.
    Triangles,
    /// A fan around the first vertex.
    TriangleFan,
    /// Independent quads, four vertices each.
    Quads,
}

/// A vertex in object space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    /// Position.
    pub position: Vec3,
    /// Texture coordinate.
    pub tex_coord: Vec2,
}

impl Vertex {
    /// Creates a vertex.
    pub const fn new(position: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            tex_coord,
        }
    }

    /// Creates a vertex without texture coordinates.
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            tex_coord: Vec2::ZERO,
        }
    }
}

/// A batch of vertices submitted in one call.
#[derive(Copy, Clone, Debug)]
pub struct Primitive<'v> {
    /// Assembly rule.
    pub topology: Topology,
    /// Face normal shared by all vertices.
    pub normal: Vec3,
    /// Vertices in submission order.
    pub vertices: &'v [Vertex],
}

/// The graphics backend a pass drives.
///
/// Only the name stack, the matrix stacks and primitive submission are required. The state
/// setters default to no-ops, so a headless backend can ignore them.
pub trait Backend {
    /// Pushes a name onto the backend's hit-record name stack.
    fn push_name(&mut self, name: u32);

    /// Pops the top name.
    fn pop_name(&mut self);

    /// Pushes the current matrix of `mode` and multiplies it by `m`.
    fn push_matrix(&mut self, mode: MatrixMode, m: &Mat4);

    /// Restores the matrix of `mode` saved by the matching [`push_matrix`](Self::push_matrix).
    fn pop_matrix(&mut self, mode: MatrixMode);

    /// Submits a primitive with the name path active at the time of the call.
    fn submit(&mut self, primitive: &Primitive<'_>, names: &[u32]);

    /// Binds `texture` for 2D texturing.
    fn bind_texture(&mut self, texture: &Texture) {
        let _ = texture;
    }

    /// Unbinds any bound texture.
    fn unbind_texture(&mut self) {}

    /// Enables capabilities.
    fn enable(&mut self, caps: Capabilities) {
        let _ = caps;
    }

    /// Disables capabilities.
    fn disable(&mut self, caps: Capabilities) {
        let _ = caps;
    }

    /// Selects which faces are culled.
    fn cull_face(&mut self, face: Face) {
        let _ = face;
    }

    /// Sets the material for both faces.
    fn set_material(&mut self, material: &Material) {
        let _ = material;
    }

    /// Alpha-test reference; fragments at or below it are discarded.
    fn alpha_threshold(&mut self, threshold: f32) {
        let _ = threshold;
    }

    /// Sets the flat color used when lighting is off, and the tint of textured quads.
    fn set_color(&mut self, color: Vec4) {
        let _ = color;
    }

    /// Enables or disables writes to the color channels and, separately, the alpha channel.
    fn color_mask(&mut self, rgb: bool, alpha: bool) {
        let _ = (rgb, alpha);
    }

    /// Sets the blend equation factors used while [`Capabilities::BLEND`] is on.
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        let _ = (src, dst);
    }

    /// Sets the value [`Buffers::COLOR`] clears to.
    fn clear_color(&mut self, color: Vec4) {
        let _ = color;
    }

    /// Clears `buffers`, honoring the color mask.
    fn clear(&mut self, buffers: Buffers) {
        let _ = buffers;
    }

    /// Sets the depth comparison.
    fn depth_func(&mut self, func: DepthFunc) {
        let _ = func;
    }

    /// Sets the polygon depth offset.
    fn polygon_offset(&mut self, factor: f32, units: f32) {
        let _ = (factor, units);
    }
}

/// One pass over a scene.
///
/// Holds the mode, the explicit name path, and the backend.
pub struct Pass<'p> {
    mode: RenderMode,
    names: Vec<u32>,
    backend: &'p mut dyn Backend,
}

impl<'p> Pass<'p> {
    /// Starts a pass in `mode` against `backend`.
    pub fn new(mode: RenderMode, backend: &'p mut dyn Backend) -> Self {
        Self {
            mode,
            names: Vec::new(),
            backend,
        }
    }

    /// The mode of this pass.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Returns `true` for [`RenderMode::Select`].
    pub fn is_selecting(&self) -> bool {
        self.mode == RenderMode::Select
    }

    /// The active name path, outermost first.
    pub fn names(&self) -> &[u32] {
        &self.names
    }

    /// Pushes `name` onto the name path and the backend's name stack.
    pub fn push_name(&mut self, name: u32) {
        self.names.push(name);
        self.backend.push_name(name);
    }

    /// Pops the innermost name.
    ///
    /// Popping an empty path is a contract violation: it asserts in debug builds and is
    /// ignored otherwise.
    pub fn pop_name(&mut self) {
        debug_assert!(!self.names.is_empty(), "pop_name on an empty name stack");
        if self.names.pop().is_none() {
            log::warn!("pop_name on an empty name stack ignored");
            return;
        }
        self.backend.pop_name();
    }

    /// Submits a primitive tagged with the current name path.
    pub fn submit(&mut self, topology: Topology, normal: Vec3, vertices: &[Vertex]) {
        let primitive = Primitive {
            topology,
            normal,
            vertices,
        };
        self.backend.submit(&primitive, &self.names);
    }

    /// The backend, for state changes.
    pub fn backend(&mut self) -> &mut dyn Backend {
        &mut *self.backend
    }
}

impl core::fmt::Debug for Pass<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pass")
            .field("mode", &self.mode)
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordingBackend};
    use alloc::vec;

    #[test]
    fn submit_carries_active_names() {
        let mut rec = RecordingBackend::default();
        let mut pass = Pass::new(RenderMode::Select, &mut rec);
        pass.push_name(3);
        pass.push_name(7);
        pass.submit(Topology::Triangles, Vec3::Z, &[Vertex::at(Vec3::ZERO); 3]);
        pass.pop_name();
        pass.submit(Topology::Triangles, Vec3::Z, &[Vertex::at(Vec3::ZERO); 3]);
        pass.pop_name();
        assert!(pass.names().is_empty());
        assert_eq!(
            rec.commands(),
            &[
                Command::PushName(3),
                Command::PushName(7),
                Command::Submit {
                    topology: Topology::Triangles,
                    vertices: 3,
                    names: vec![3, 7],
                },
                Command::PopName,
                Command::Submit {
                    topology: Topology::Triangles,
                    vertices: 3,
                    names: vec![3],
                },
                Command::PopName,
            ]
        );
    }

    #[test]
    fn mode_queries() {
        let mut rec = RecordingBackend::default();
        let pass = Pass::new(RenderMode::Select, &mut rec);
        assert!(pass.is_selecting());
        assert_eq!(pass.mode(), RenderMode::Select);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "empty name stack")]
    fn popping_empty_name_stack_asserts() {
        let mut rec = RecordingBackend::default();
        let mut pass = Pass::new(RenderMode::Select, &mut rec);
        pass.pop_name();
    }
}
