// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A backend that records every call, for tests and tracing.

use alloc::vec::Vec;
use glam::{Mat4, Vec4};

use crate::backend::{
    Backend, BlendFactor, Buffers, Capabilities, DepthFunc, Face, MatrixMode, Primitive, Topology,
};
use crate::parts::{Material, Texture, TextureId};

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// [`Backend::push_name`].
    PushName(u32),
    /// [`Backend::pop_name`].
    PopName,
    /// [`Backend::push_matrix`].
    PushMatrix(MatrixMode, Mat4),
    /// [`Backend::pop_matrix`].
    PopMatrix(MatrixMode),
    /// [`Backend::bind_texture`].
    BindTexture(TextureId),
    /// [`Backend::unbind_texture`].
    UnbindTexture,
    /// [`Backend::enable`].
    Enable(Capabilities),
    /// [`Backend::disable`].
    Disable(Capabilities),
    /// [`Backend::cull_face`].
    CullFace(Face),
    /// [`Backend::set_material`].
    SetMaterial(Material),
    /// [`Backend::alpha_threshold`].
    AlphaThreshold(f32),
    /// [`Backend::set_color`].
    SetColor(Vec4),
    /// [`Backend::color_mask`], as `(rgb, alpha)`.
    ColorMask(bool, bool),
    /// [`Backend::blend_func`].
    BlendFunc(BlendFactor, BlendFactor),
    /// [`Backend::clear_color`].
    ClearColor(Vec4),
    /// [`Backend::clear`].
    Clear(Buffers),
    /// [`Backend::depth_func`].
    DepthFunc(DepthFunc),
    /// [`Backend::polygon_offset`].
    PolygonOffset(f32, f32),
    /// [`Backend::submit`], reduced to its shape and name path.
    Submit {
        /// Assembly rule.
        topology: Topology,
        /// Vertex count.
        vertices: usize,
        /// Name path at submission.
        names: Vec<u32>,
    },
}

/// Records backend calls in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls, oldest first.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drains the recorded calls.
    pub fn take(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.commands)
    }

    /// Recorded submissions only.
    pub fn submissions(&self) -> impl Iterator<Item = &Command> + '_ {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Submit { .. }))
    }
}

impl Backend for RecordingBackend {
    fn push_name(&mut self, name: u32) {
        self.commands.push(Command::PushName(name));
    }

    fn pop_name(&mut self) {
        self.commands.push(Command::PopName);
    }

    fn push_matrix(&mut self, mode: MatrixMode, m: &Mat4) {
        self.commands.push(Command::PushMatrix(mode, *m));
    }

    fn pop_matrix(&mut self, mode: MatrixMode) {
        self.commands.push(Command::PopMatrix(mode));
    }

    fn submit(&mut self, primitive: &Primitive<'_>, names: &[u32]) {
        self.commands.push(Command::Submit {
            topology: primitive.topology,
            vertices: primitive.vertices.len(),
            names: names.to_vec(),
        });
    }

    fn bind_texture(&mut self, texture: &Texture) {
        self.commands.push(Command::BindTexture(texture.id));
    }

    fn unbind_texture(&mut self) {
        self.commands.push(Command::UnbindTexture);
    }

    fn enable(&mut self, caps: Capabilities) {
        self.commands.push(Command::Enable(caps));
    }

    fn disable(&mut self, caps: Capabilities) {
        self.commands.push(Command::Disable(caps));
    }

    fn cull_face(&mut self, face: Face) {
        self.commands.push(Command::CullFace(face));
    }

    fn set_material(&mut self, material: &Material) {
        self.commands.push(Command::SetMaterial(*material));
    }

    fn alpha_threshold(&mut self, threshold: f32) {
        self.commands.push(Command::AlphaThreshold(threshold));
    }

    fn set_color(&mut self, color: Vec4) {
        self.commands.push(Command::SetColor(color));
    }

    fn color_mask(&mut self, rgb: bool, alpha: bool) {
        self.commands.push(Command::ColorMask(rgb, alpha));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.commands.push(Command::BlendFunc(src, dst));
    }

    fn clear_color(&mut self, color: Vec4) {
        self.commands.push(Command::ClearColor(color));
    }

    fn clear(&mut self, buffers: Buffers) {
        self.commands.push(Command::Clear(buffers));
    }

    fn depth_func(&mut self, func: DepthFunc) {
        self.commands.push(Command::DepthFunc(func));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.commands.push(Command::PolygonOffset(factor, units));
    }
}
