// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The room's walls.

use breach_scene::primitives::TessellatedRectangle;
use breach_scene::{Draw, Pass};
use glam::{Vec2, Vec3};
use kurbo::Rect;

/// A parallelogram wall: a corner and the two sides leaving it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    corner: Vec3,
    axis_a: Vec3,
    axis_b: Vec3,
    tessellation_scale: f32,
    texture_scale: f32,
}

impl Wall {
    /// World size to texture repeat ratio shared by all walls, so they show the same grain.
    pub const STANDARD_TEXTURE_SCALE: f32 = 2.0;
    /// World size to tessel count ratio shared by all walls.
    pub const STANDARD_TESSELLATION_SCALE: f32 = 10.0;

    /// A wall with the standard scales.
    pub fn new(corner: Vec3, axis_a: Vec3, axis_b: Vec3) -> Self {
        Self::with_scales(
            corner,
            axis_a,
            axis_b,
            Self::STANDARD_TESSELLATION_SCALE,
            Self::STANDARD_TEXTURE_SCALE,
        )
    }

    /// A wall with explicit tessellation and texture scales.
    pub fn with_scales(
        corner: Vec3,
        axis_a: Vec3,
        axis_b: Vec3,
        tessellation_scale: f32,
        texture_scale: f32,
    ) -> Self {
        Self {
            corner,
            axis_a,
            axis_b,
            tessellation_scale,
            texture_scale,
        }
    }

    /// The first corner.
    pub fn corner(&self) -> Vec3 {
        self.corner
    }

    /// From the first corner to the second.
    pub fn axis_a(&self) -> Vec3 {
        self.axis_a
    }

    /// From the first corner to the fourth.
    pub fn axis_b(&self) -> Vec3 {
        self.axis_b
    }

    /// Unit normal, `axis_a × axis_b`.
    pub fn normal(&self) -> Vec3 {
        self.axis_a.cross(self.axis_b).normalize_or_zero()
    }

    /// Projects a world point onto the wall's plane.
    pub fn project_onto(&self, point: Vec3) -> Vec3 {
        let n = self.normal();
        point - n * (point - self.corner).dot(n)
    }

    /// Coordinates of a world point along the two axes, `(0, 0)` at the corner and `(1, 1)` at
    /// the opposite one. The point is projected onto the plane first.
    pub fn in_wall_coordinates(&self, point: Vec3) -> Vec2 {
        let d = point - self.corner;
        let (a, b) = (self.axis_a, self.axis_b);
        let (aa, ab, bb) = (a.dot(a), a.dot(b), b.dot(b));
        let det = aa * bb - ab * ab;
        if det.abs() <= f32::EPSILON {
            log::warn!("degenerate wall {self:?}");
            return Vec2::ZERO;
        }
        let (da, db) = (d.dot(a), d.dot(b));
        Vec2::new(bb * da - ab * db, aa * db - ab * da) / det
    }

    /// The world point at wall coordinates `uv`.
    pub fn at(&self, uv: Vec2) -> Vec3 {
        self.corner + self.axis_a * uv.x + self.axis_b * uv.y
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "tessel counts are small and positive."
    )]
    fn steps(&self, axis: Vec3) -> u32 {
        (axis.length() * self.tessellation_scale).round() as u32
    }
}

/// The six walls of the room: two ends, floor, ceiling and two sides.
pub fn default_walls() -> Vec<Wall> {
    const LAYOUT: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, -1.0, 2.0], [-2.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
        ([-1.0, -1.0, -2.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
        ([-1.0, -1.0, -2.0], [0.0, 0.0, 4.0], [2.0, 0.0, 0.0]),
        ([-1.0, 1.0, 2.0], [0.0, 0.0, -4.0], [2.0, 0.0, 0.0]),
        ([-1.0, -1.0, 2.0], [0.0, 0.0, -4.0], [0.0, 2.0, 0.0]),
        ([1.0, -1.0, -2.0], [0.0, 0.0, 4.0], [0.0, 2.0, 0.0]),
    ];
    LAYOUT
        .iter()
        .map(|&(c, a, b)| Wall::new(Vec3::from(c), Vec3::from(a), Vec3::from(b)))
        .collect()
}

/// Draws a wall as a double-sided tessellated rectangle.
///
/// Texturing is left to an ancestor so all walls share one texture bind.
#[derive(Debug, Clone, Copy)]
pub struct WallRenderer {
    face: TessellatedRectangle,
}

impl WallRenderer {
    /// A renderer for `wall`.
    pub fn new(wall: &Wall) -> Self {
        let (a, b) = (wall.axis_a(), wall.axis_b());
        let texture = Rect::new(
            0.0,
            0.0,
            f64::from(a.length() * wall.texture_scale),
            f64::from(b.length() * wall.texture_scale),
        );
        Self {
            face: TessellatedRectangle::new(wall.steps(a), wall.steps(b), texture, true)
                .placed(wall.corner(), a, b),
        }
    }
}

impl Draw for WallRenderer {
    fn render(&self, pass: &mut Pass<'_>) {
        self.face.draw(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn far_wall() -> Wall {
        default_walls()[1]
    }

    #[test]
    fn wall_coordinates_span_the_parallelogram() {
        let wall = far_wall();
        let uv = wall.in_wall_coordinates(Vec3::new(0.0, 0.0, -2.0));
        assert!((uv - Vec2::splat(0.5)).length() < 1e-6);
        assert_eq!(wall.at(Vec2::ONE), Vec3::new(1.0, 1.0, -2.0));
    }

    #[test]
    fn off_plane_points_project_back() {
        let wall = far_wall();
        let p = wall.project_onto(Vec3::new(0.2, 0.3, -1.5));
        assert!((p - Vec3::new(0.2, 0.3, -2.0)).length() < 1e-6);
        let skewed = Wall::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let uv = skewed.in_wall_coordinates(skewed.at(Vec2::new(0.25, 0.75)) + Vec3::Z);
        assert!((uv - Vec2::new(0.25, 0.75)).length() < 1e-5);
    }

    #[test]
    fn renderer_tessellates_by_size() {
        let r = WallRenderer::new(&far_wall());
        assert_eq!((r.face.x_steps, r.face.y_steps), (20, 20));
        assert_eq!(r.face.texture_rect, Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(r.face.double_sided);
    }

    #[test]
    fn far_wall_faces_the_room() {
        assert_eq!(far_wall().normal(), Vec3::Z);
        assert_eq!(default_walls()[0].normal(), Vec3::NEG_Z);
    }
}
