// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable configurers and transformers.

use glam::{Mat4, Vec3, Vec4};

use crate::backend::{Capabilities, MatrixMode, Pass};
use crate::node::{Configure, Transform};
use crate::types::RenderMode;

/// Multiplies a fixed matrix onto one of the backend's matrix stacks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MatrixTransformer {
    /// Target stack.
    pub mode: MatrixMode,
    /// Matrix multiplied onto the stack.
    pub transformation: Mat4,
}

impl MatrixTransformer {
    /// A model-view transformer.
    pub const fn new(transformation: Mat4) -> Self {
        Self {
            mode: MatrixMode::ModelView,
            transformation,
        }
    }

    /// A model-view transformer mapping the unit square onto the parallelogram at `offset`
    /// spanned by `axis_x` and `axis_y`.
    pub fn from_axes(offset: Vec3, axis_x: Vec3, axis_y: Vec3) -> Self {
        Self::new(axes_to_matrix(offset, axis_x, axis_y))
    }

    /// Changes the target stack.
    #[must_use]
    pub const fn with_mode(mut self, mode: MatrixMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Builds the column basis `[x, y, normalize(x × y), offset]`.
///
/// The third column is unit length so normals transform without scaling.
pub fn axes_to_matrix(offset: Vec3, axis_x: Vec3, axis_y: Vec3) -> Mat4 {
    let axis_z = axis_x.cross(axis_y).normalize_or_zero();
    Mat4::from_cols(
        axis_x.extend(0.0),
        axis_y.extend(0.0),
        axis_z.extend(0.0),
        offset.extend(1.0),
    )
}

impl Transform for MatrixTransformer {
    fn load_transform(&self, pass: &mut Pass<'_>) {
        pass.backend().push_matrix(self.mode, &self.transformation);
    }

    fn unload_transform(&self, pass: &mut Pass<'_>) {
        pass.backend().pop_matrix(self.mode);
    }
}

/// Handle of a texture owned by the backend.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// No texture.
    pub const NONE: Self = Self(0);
}

/// Texture sampling filter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Nearest texel.
    Nearest,
    /// Bilinear.
    #[default]
    Linear,
}

/// Texture coordinate wrapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Wrap {
    /// Tile.
    #[default]
    Repeat,
    /// Clamp to the edge texel.
    Clamp,
}

/// A texture handle with its sampling parameters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Texture {
    /// Backend handle.
    pub id: TextureId,
    /// Minification filter.
    pub min_filter: Filter,
    /// Magnification filter.
    pub mag_filter: Filter,
    /// Wrapping along s.
    pub wrap_s: Wrap,
    /// Wrapping along t.
    pub wrap_t: Wrap,
}

impl Texture {
    /// No texture.
    pub const NONE: Self = Self::new(TextureId::NONE);

    /// A texture with linear filtering and repeat wrapping.
    pub const fn new(id: TextureId) -> Self {
        Self {
            id,
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            wrap_s: Wrap::Repeat,
            wrap_t: Wrap::Repeat,
        }
    }
}

/// Binds a texture around rendering. Inactive in select passes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Texturer {
    /// Texture to bind.
    pub texture: Texture,
}

impl Texturer {
    /// Creates a texturer for `texture`.
    pub const fn new(texture: Texture) -> Self {
        Self { texture }
    }
}

impl Configure for Texturer {
    fn configure(&self, pass: &mut Pass<'_>) {
        if pass.is_selecting() || self.texture.id == TextureId::NONE {
            return;
        }
        let backend = pass.backend();
        backend.enable(Capabilities::TEXTURE_2D);
        backend.bind_texture(&self.texture);
    }

    fn deconfigure(&self, pass: &mut Pass<'_>) {
        if pass.is_selecting() {
            return;
        }
        let backend = pass.backend();
        backend.unbind_texture();
        backend.disable(Capabilities::TEXTURE_2D);
    }
}

/// Surface lighting coefficients. Applied in render passes only.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Ambient reflectance.
    pub ambient: Vec4,
    /// Diffuse reflectance.
    pub diffuse: Vec4,
    /// Specular reflectance.
    pub specular: Vec4,
    /// Specular exponent in `[0, 128]`.
    pub shininess: f32,
}

impl Material {
    /// The fixed-function default material.
    pub const DEFAULT: Self = Self {
        ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
        diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
        specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
        shininess: 0.0,
    };

    /// Fully lit, no highlight.
    pub const MATTE: Self = Self {
        ambient: Vec4::ONE,
        diffuse: Vec4::ONE,
        specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
        shininess: 0.0,
    };

    /// Fully lit with a sharp white highlight.
    pub const GLOSSY: Self = Self {
        ambient: Vec4::ONE,
        diffuse: Vec4::ONE,
        specular: Vec4::ONE,
        shininess: 40.0,
    };
}

impl Default for Material {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Configure for Material {
    fn configure(&self, pass: &mut Pass<'_>) {
        if pass.mode() == RenderMode::Render {
            pass.backend().set_material(self);
        }
    }

    fn deconfigure(&self, _: &mut Pass<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordingBackend};
    use alloc::vec;

    #[test]
    fn axes_matrix_maps_unit_square() {
        let m = axes_to_matrix(
            Vec3::new(1.0, -1.0, 2.0),
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        );
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, -1.0, 2.0));
        assert_eq!(
            m.transform_point3(Vec3::new(1.0, 1.0, 0.0)),
            Vec3::new(-1.0, 1.0, 2.0)
        );
        // (-2,0,0) x (0,2,0) = (0,0,-4), normalized.
        assert_eq!(m.z_axis, Vec4::new(0.0, 0.0, -1.0, 0.0));
    }

    #[test]
    fn texturer_is_inactive_when_selecting() {
        let t = Texturer::new(Texture::new(TextureId(3)));
        let mut rec = RecordingBackend::new();
        {
            let mut pass = Pass::new(RenderMode::Select, &mut rec);
            t.configure(&mut pass);
            t.deconfigure(&mut pass);
        }
        assert!(rec.commands().is_empty());

        {
            let mut pass = Pass::new(RenderMode::Render, &mut rec);
            t.configure(&mut pass);
            t.deconfigure(&mut pass);
        }
        assert_eq!(
            rec.take(),
            vec![
                Command::Enable(Capabilities::TEXTURE_2D),
                Command::BindTexture(TextureId(3)),
                Command::UnbindTexture,
                Command::Disable(Capabilities::TEXTURE_2D),
            ]
        );
    }

    #[test]
    fn material_applies_in_render_mode_only() {
        let mut rec = RecordingBackend::new();
        Material::GLOSSY.configure(&mut Pass::new(RenderMode::Feedback, &mut rec));
        assert!(rec.commands().is_empty());
        Material::GLOSSY.configure(&mut Pass::new(RenderMode::Render, &mut rec));
        assert_eq!(rec.take(), vec![Command::SetMaterial(Material::GLOSSY)]);
    }
}
