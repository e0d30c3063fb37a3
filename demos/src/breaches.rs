// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breaches: openings shot into walls.
//!
//! A breach is placed in wall coordinates. Its shot point is pulled inward so the opening stays
//! on the wall, and a shot that would overlap another open breach on the same wall is refused.
//! The placement transform maps the square `[-1, 1]²` onto the opening, rotated so that the
//! opening's up matches the player's up at the time of the shot.

use std::cell::Cell;

use breach_scene::parts::{Material, Texture, Texturer};
use breach_scene::primitives::TessellatedRectangle;
use breach_scene::{
    BlendFactor, Capabilities, Configure, DepthFunc, Draw, Face, MatrixMode, Pass, RenderMode,
    Transform,
};
use glam::{Mat4, Vec2, Vec3, Vec4};
use kurbo::Rect;

use crate::walls::Wall;

/// Opening width in world units.
pub const BREACH_WIDTH: f32 = 0.8;
/// Opening height in world units.
pub const BREACH_HEIGHT: f32 = 0.8;

/// Where an open breach sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the wall carrying the breach.
    pub wall: usize,
    /// Center in wall coordinates.
    pub shot_point: Vec2,
    /// Maps `[-1, 1]²` in the XY plane onto the opening.
    pub transformation: Mat4,
}

/// A breach that is closed until shot.
#[derive(Debug)]
pub struct BreachSlot {
    color: Vec4,
    placement: Cell<Option<Placement>>,
}

impl BreachSlot {
    /// A closed breach.
    pub fn new(color: Vec4) -> Self {
        Self {
            color,
            placement: Cell::new(None),
        }
    }

    /// Tint of the breach.
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Whether the breach has been shot.
    pub fn is_open(&self) -> bool {
        self.placement.get().is_some()
    }

    /// The current placement, if open.
    pub fn placement(&self) -> Option<Placement> {
        self.placement.get()
    }
}

/// The two breaches of the gallery, blue and orange.
pub fn default_breaches() -> Vec<BreachSlot> {
    vec![
        BreachSlot::new(Vec4::new(0.0, 0.5, 1.0, 1.0)),
        BreachSlot::new(Vec4::new(1.0, 0.5, 0.0, 1.0)),
    ]
}

/// Pulls `shot_point` inward so the whole opening fits on `wall`.
///
/// On a wall too small for the opening the point is returned unchanged.
pub fn adjusted_shot_point(wall: &Wall, shot_point: Vec2) -> Vec2 {
    let half = Vec2::new(
        BREACH_WIDTH / 2.0 / wall.axis_a().length(),
        BREACH_HEIGHT / 2.0 / wall.axis_b().length(),
    );
    let mut p = shot_point;
    if p.x - half.x < 0.0 {
        p.x = half.x;
    }
    if p.x + half.x > 1.0 {
        p.x = 1.0 - half.x;
    }
    if p.y - half.y < 0.0 {
        p.y = half.y;
    }
    if p.y + half.y > 1.0 {
        p.y = 1.0 - half.y;
    }
    if p.x < 0.0 || p.y < 0.0 {
        return shot_point;
    }
    p
}

/// The transform placing an opening at `shot_point` on `wall`, turned to match `up`.
pub fn transformation_from_wall(wall: &Wall, shot_point: Vec2, up: Vec3) -> Mat4 {
    let (a, b) = (wall.axis_a().normalize_or_zero(), wall.axis_b().normalize_or_zero());
    let up = up.normalize_or_zero();
    let up_angle = -up.dot(a).atan2(up.dot(b));
    let basis = Mat4::from_cols(
        (a * (BREACH_WIDTH / 2.0)).extend(0.0),
        (b * (BREACH_HEIGHT / 2.0)).extend(0.0),
        wall.normal().extend(0.0),
        wall.at(shot_point).extend(1.0),
    );
    basis * Mat4::from_rotation_z(up_angle)
}

/// Why a shot did not open a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No breach with that index.
    NoSuchBreach,
    /// The opening would overlap another open breach on the same wall.
    Overlap {
        /// Index of the breach in the way.
        other: usize,
    },
}

/// Opens `breaches[index]` on `walls[wall]` at `shot_point`, or moves it there if already open.
pub fn shoot_breach(
    breaches: &[BreachSlot],
    index: usize,
    walls: &[Wall],
    wall: usize,
    shot_point: Vec2,
    up: Vec3,
) -> Result<Placement, Refusal> {
    let (Some(slot), Some(on)) = (breaches.get(index), walls.get(wall)) else {
        return Err(Refusal::NoSuchBreach);
    };
    let point = adjusted_shot_point(on, shot_point);
    let scale = Vec2::new(on.axis_a().length(), on.axis_b().length());
    let min_distance = (BREACH_WIDTH * BREACH_WIDTH + BREACH_HEIGHT * BREACH_HEIGHT) / 2.0 * 0.9;
    for (other, placed) in breaches.iter().enumerate() {
        if other == index {
            continue;
        }
        let Some(p) = placed.placement().filter(|p| p.wall == wall) else {
            continue;
        };
        if (scale * (point - p.shot_point)).length_squared() < min_distance {
            log::info!("breach {index} refused: overlaps breach {other}");
            return Err(Refusal::Overlap { other });
        }
    }
    let placement = Placement {
        wall,
        shot_point: point,
        transformation: transformation_from_wall(on, point, up),
    };
    slot.placement.set(Some(placement));
    log::info!("breach {index} opened on wall {wall} at {point}");
    Ok(placement)
}

/// Loads the breach's current placement. Identity while closed, so pushes and pops pair up.
#[derive(Debug, Clone, Copy)]
pub struct BreachTransform<'b> {
    slot: &'b BreachSlot,
}

impl<'b> BreachTransform<'b> {
    /// The transform of `slot`.
    pub fn new(slot: &'b BreachSlot) -> Self {
        Self { slot }
    }
}

impl Transform for BreachTransform<'_> {
    fn load_transform(&self, pass: &mut Pass<'_>) {
        let m = self
            .slot
            .placement()
            .map_or(Mat4::IDENTITY, |p| p.transformation);
        pass.backend().push_matrix(MatrixMode::ModelView, &m);
    }

    fn unload_transform(&self, pass: &mut Pass<'_>) {
        pass.backend().pop_matrix(MatrixMode::ModelView);
    }
}

/// Draws an open breach's highlight: once through occluders, once onto the porting wall.
///
/// Breaches draw in render passes only.
#[derive(Debug, Clone, Copy)]
pub struct BreachRenderer<'b> {
    slot: &'b BreachSlot,
    highlight: Texturer,
    face: TessellatedRectangle,
}

impl<'b> BreachRenderer<'b> {
    /// Material of the highlight outline.
    pub const HIGHLIGHT: Material = Material {
        ambient: Vec4::new(10.0, 5.0, 0.0, 1.0),
        diffuse: Vec4::new(10.0, 5.0, 0.0, 1.0),
        specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
        shininess: 0.0,
    };

    /// A renderer for `slot` using `highlight` as the outline texture.
    pub fn new(slot: &'b BreachSlot, highlight: Texture) -> Self {
        Self {
            slot,
            highlight: Texturer::new(highlight),
            face: TessellatedRectangle::new(10, 10, Rect::new(0.0, 0.0, -1.0, -1.0), false)
                .placed(Vec3::new(1.0, 1.0, 0.0), Vec3::X * -2.0, Vec3::Y * -2.0),
        }
    }
}

impl Draw for BreachRenderer<'_> {
    fn render(&self, pass: &mut Pass<'_>) {
        if !self.slot.is_open() || pass.mode() != RenderMode::Render {
            return;
        }
        self.highlight.configure(pass);
        {
            let backend = pass.backend();
            backend.color_mask(true, false);
            backend.set_material(&Self::HIGHLIGHT);
            backend.enable(Capabilities::BLEND | Capabilities::POLYGON_OFFSET_FILL);
            backend.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
            backend.polygon_offset(0.0, -10.0);
            backend.disable(Capabilities::CULL_FACE);
            backend.depth_func(DepthFunc::Greater);
        }
        self.face.draw(pass);
        {
            let backend = pass.backend();
            backend.depth_func(DepthFunc::Less);
            backend.enable(Capabilities::CULL_FACE);
            backend.cull_face(Face::Front);
        }
        self.face.draw(pass);
        {
            let backend = pass.backend();
            backend.cull_face(Face::Back);
            backend.polygon_offset(0.0, 0.0);
            backend.disable(Capabilities::BLEND | Capabilities::POLYGON_OFFSET_FILL);
            backend.color_mask(true, true);
        }
        self.highlight.deconfigure(pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walls::default_walls;
    use breach_scene::{Command, RecordingBackend};

    const FAR: usize = 1;

    #[test]
    fn shot_point_stays_on_the_wall() {
        let wall = default_walls()[FAR];
        assert_eq!(
            adjusted_shot_point(&wall, Vec2::new(0.05, 0.97)),
            Vec2::new(0.2, 0.8)
        );
        assert_eq!(
            adjusted_shot_point(&wall, Vec2::new(0.5, 0.5)),
            Vec2::new(0.5, 0.5)
        );
        let narrow = Wall::new(Vec3::ZERO, Vec3::X * 0.3, Vec3::Y * 2.0);
        assert_eq!(
            adjusted_shot_point(&narrow, Vec2::new(0.3, 0.5)),
            Vec2::new(0.3, 0.5)
        );
    }

    #[test]
    fn upright_transformation_maps_corners() {
        let wall = default_walls()[FAR];
        let m = transformation_from_wall(&wall, Vec2::splat(0.5), Vec3::Y);
        let corner = m.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((corner - Vec3::new(0.4, 0.4, -2.0)).length() < 1e-6);
    }

    #[test]
    fn tilted_player_turns_the_opening() {
        let wall = default_walls()[FAR];
        let m = transformation_from_wall(&wall, Vec2::splat(0.5), Vec3::X);
        // The opening's local up now points along the player's up.
        let up = m.transform_vector3(Vec3::Y).normalize();
        assert!((up - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn overlapping_breaches_are_refused() {
        let walls = default_walls();
        let breaches = default_breaches();
        let at = Vec2::new(0.5, 0.5);
        shoot_breach(&breaches, 0, &walls, FAR, at, Vec3::Y).unwrap();
        assert_eq!(
            shoot_breach(&breaches, 1, &walls, FAR, at + Vec2::X * 0.1, Vec3::Y),
            Err(Refusal::Overlap { other: 0 })
        );
        // Reshooting the same breach ignores itself.
        shoot_breach(&breaches, 0, &walls, FAR, at + Vec2::X * 0.1, Vec3::Y).unwrap();
        // Another wall is always free.
        assert!(shoot_breach(&breaches, 1, &walls, 5, at, Vec3::Y).is_ok());
        assert_eq!(
            shoot_breach(&breaches, 2, &walls, FAR, at, Vec3::Y),
            Err(Refusal::NoSuchBreach)
        );
    }

    #[test]
    fn closed_breaches_push_identity_and_draw_nothing() {
        let slot = BreachSlot::new(Vec4::ONE);
        let mut rec = RecordingBackend::new();
        {
            let mut pass = Pass::new(RenderMode::Render, &mut rec);
            let t = BreachTransform::new(&slot);
            t.load_transform(&mut pass);
            BreachRenderer::new(&slot, Texture::NONE).render(&mut pass);
            t.unload_transform(&mut pass);
        }
        assert_eq!(
            rec.commands(),
            &[
                Command::PushMatrix(MatrixMode::ModelView, Mat4::IDENTITY),
                Command::PopMatrix(MatrixMode::ModelView),
            ]
        );
    }

    #[test]
    fn open_breach_highlights_in_render_mode_only() {
        let walls = default_walls();
        let breaches = default_breaches();
        shoot_breach(&breaches, 0, &walls, FAR, Vec2::splat(0.5), Vec3::Y).unwrap();
        let renderer = BreachRenderer::new(&breaches[0], Texture::NONE);

        let mut rec = RecordingBackend::new();
        renderer.render(&mut Pass::new(RenderMode::Select, &mut rec));
        assert!(rec.commands().is_empty());

        renderer.render(&mut Pass::new(RenderMode::Render, &mut rec));
        let submits = rec
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Submit { .. }))
            .count();
        assert_eq!(submits, 2);
        assert!(rec.commands().contains(&Command::DepthFunc(DepthFunc::Greater)));
        assert!(rec.commands().contains(&Command::BlendFunc(
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha
        )));
        let masks: Vec<_> = rec
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::ColorMask(..)))
            .collect();
        assert_eq!(masks, [&Command::ColorMask(true, false), &Command::ColorMask(true, true)]);
    }
}
