// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in drawable shapes.
//!
//! Each shape lives in the unit square (or unit disc) of its local XY plane and may carry a
//! placement, a [`MatrixTransformer`] loaded around the geometry. With a placement a shape can be
//! drawn standalone from inside another leaf's `render` via its `draw` method.

use alloc::vec::Vec;
use core::f32::consts::TAU;
use glam::{Vec2, Vec3};
use kurbo::Rect;

use crate::backend::{Face, Pass, Topology, Vertex};
use crate::node::{Draw, Transform};
use crate::parts::MatrixTransformer;
use crate::types::RenderMode;

/// A unit square split into `x_steps × y_steps` quads.
///
/// In render passes each quad gets texture coordinates interpolated over `texture_rect`,
/// whose width or height may be negative to mirror the mapping. Select and feedback passes
/// submit a single quad. A double-sided rectangle is drawn a second time with the normal
/// flipped and front faces culled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TessellatedRectangle {
    /// Optional placement.
    pub placement: Option<MatrixTransformer>,
    /// Columns.
    pub x_steps: u32,
    /// Rows.
    pub y_steps: u32,
    /// Texture sub-rectangle mapped onto the square.
    pub texture_rect: Rect,
    /// Draw the back side too.
    pub double_sided: bool,
}

impl TessellatedRectangle {
    /// Creates an unplaced rectangle. Step counts below one are raised to one.
    pub fn new(x_steps: u32, y_steps: u32, texture_rect: Rect, double_sided: bool) -> Self {
        Self {
            placement: None,
            x_steps: x_steps.max(1),
            y_steps: y_steps.max(1),
            texture_rect,
            double_sided,
        }
    }

    /// Places the square at `offset`, spanning `axis_x` and `axis_y`.
    #[must_use]
    pub fn placed(mut self, offset: Vec3, axis_x: Vec3, axis_y: Vec3) -> Self {
        self.placement = Some(MatrixTransformer::from_axes(offset, axis_x, axis_y));
        self
    }

    /// Draws with the placement loaded.
    pub fn draw(&self, pass: &mut Pass<'_>) {
        if let Some(p) = &self.placement {
            p.load_transform(pass);
        }
        self.emit(pass, false);
        if self.double_sided {
            pass.backend().cull_face(Face::Front);
            self.emit(pass, true);
            pass.backend().cull_face(Face::Back);
        }
        if let Some(p) = &self.placement {
            p.unload_transform(pass);
        }
    }

    fn emit(&self, pass: &mut Pass<'_>, reverse_normal: bool) {
        let normal = if reverse_normal { Vec3::NEG_Z } else { Vec3::Z };
        match pass.mode() {
            RenderMode::Render => {
                let vertices = self.tessellate();
                pass.submit(Topology::Quads, normal, &vertices);
            }
            RenderMode::Select | RenderMode::Feedback => {
                let quad = [
                    Vertex::at(Vec3::new(0.0, 0.0, 0.0)),
                    Vertex::at(Vec3::new(1.0, 0.0, 0.0)),
                    Vertex::at(Vec3::new(1.0, 1.0, 0.0)),
                    Vertex::at(Vec3::new(0.0, 1.0, 0.0)),
                ];
                pass.submit(Topology::Quads, normal, &quad);
            }
        }
    }

    fn tessellate(&self) -> Vec<Vertex> {
        let (xs, ys) = (self.x_steps as f32, self.y_steps as f32);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "texture coordinates are single precision."
        )]
        let (t0, tsize) = (
            Vec2::new(self.texture_rect.x0 as f32, self.texture_rect.y0 as f32),
            Vec2::new(
                self.texture_rect.width() as f32,
                self.texture_rect.height() as f32,
            ),
        );
        let vertex = |i: u32, j: u32| {
            let uv = Vec2::new(i as f32 / xs, j as f32 / ys);
            Vertex::new(uv.extend(0.0), t0 + uv * tsize)
        };
        let mut out = Vec::with_capacity((self.x_steps * self.y_steps * 4) as usize);
        for j in 0..self.y_steps {
            for i in 0..self.x_steps {
                out.extend([
                    vertex(i, j),
                    vertex(i + 1, j),
                    vertex(i + 1, j + 1),
                    vertex(i, j + 1),
                ]);
            }
        }
        out
    }
}

impl Draw for TessellatedRectangle {
    fn render(&self, pass: &mut Pass<'_>) {
        self.draw(pass);
    }
}

/// A regular polygon inscribed in the unit circle, as a triangle fan.
///
/// The rim starts at `(1, 0)` and is closed by repeating that exact vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegularPolygon {
    /// Optional placement.
    pub placement: Option<MatrixTransformer>,
    /// Side count, at least three.
    pub sides: u32,
}

impl RegularPolygon {
    /// Creates an unplaced polygon. Side counts below three are raised to three.
    pub fn new(sides: u32) -> Self {
        Self {
            placement: None,
            sides: sides.max(3),
        }
    }

    /// Centers the polygon at `center`, with `axis_x` and `axis_y` as radii.
    #[must_use]
    pub fn placed(mut self, center: Vec3, axis_x: Vec3, axis_y: Vec3) -> Self {
        self.placement = Some(MatrixTransformer::from_axes(center, axis_x, axis_y));
        self
    }

    /// Draws with the placement loaded.
    pub fn draw(&self, pass: &mut Pass<'_>) {
        if let Some(p) = &self.placement {
            p.load_transform(pass);
        }
        pass.submit(Topology::TriangleFan, Vec3::Z, &self.fan());
        if let Some(p) = &self.placement {
            p.unload_transform(pass);
        }
    }

    fn fan(&self) -> Vec<Vertex> {
        let step = TAU / self.sides as f32;
        let rim = Vertex::new(Vec3::X, Vec2::new(1.0, 0.5));
        let mut out = Vec::with_capacity(self.sides as usize + 2);
        out.push(Vertex::new(Vec3::ZERO, Vec2::splat(0.5)));
        out.push(rim);
        for k in 1..self.sides {
            let dir = Vec2::from_angle(k as f32 * step);
            out.push(Vertex::new(
                Vec3::new(dir.x, -dir.y, 0.0),
                Vec2::splat(0.5) + dir * 0.5,
            ));
        }
        out.push(rim);
        out
    }
}

impl Draw for RegularPolygon {
    fn render(&self, pass: &mut Pass<'_>) {
        self.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordingBackend};
    use crate::MatrixMode;

    #[test]
    fn rectangle_tessellates_in_render_mode() {
        let r = TessellatedRectangle::new(4, 2, Rect::new(0.0, 0.0, 2.0, 1.0), false);
        let v = r.tessellate();
        assert_eq!(v.len(), 4 * 2 * 4);
        assert_eq!(v[0].tex_coord, Vec2::ZERO);
        let last = v[v.len() - 2];
        assert_eq!(last.position, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(last.tex_coord, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn negative_texture_size_mirrors() {
        let r = TessellatedRectangle::new(1, 1, Rect::new(0.0, 0.0, -1.0, -1.0), false);
        let v = r.tessellate();
        assert_eq!(v[2].tex_coord, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn rectangle_select_is_single_quad() {
        let r = TessellatedRectangle::new(10, 10, Rect::new(0.0, 0.0, 1.0, 1.0), true)
            .placed(Vec3::ZERO, Vec3::X, Vec3::Y);
        let mut rec = RecordingBackend::new();
        r.draw(&mut Pass::new(RenderMode::Select, &mut rec));
        let quads = |n| Command::Submit {
            topology: Topology::Quads,
            vertices: n,
            names: alloc::vec![],
        };
        assert_eq!(
            rec.commands(),
            &[
                Command::PushMatrix(MatrixMode::ModelView, glam::Mat4::IDENTITY),
                quads(4),
                Command::CullFace(Face::Front),
                quads(4),
                Command::CullFace(Face::Back),
                Command::PopMatrix(MatrixMode::ModelView),
            ]
        );
    }

    #[test]
    fn polygon_fan_closes_on_first_rim_vertex() {
        let p = RegularPolygon::new(20);
        let fan = p.fan();
        assert_eq!(fan.len(), 22);
        assert_eq!(fan[1], fan[21]);
        assert_eq!(fan[0].position, Vec3::ZERO);
        for v in &fan[1..] {
            assert!(v.position.is_normalized(), "rim vertex off the unit circle");
        }
    }

    #[test]
    fn polygon_has_at_least_three_sides() {
        assert_eq!(RegularPolygon::new(1).sides, 3);
    }
}
