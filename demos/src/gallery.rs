// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shooting gallery: a room of walls, a set of targets and two breaches, assembled into one
//! scene with a root per object kind.
//!
//! Shooting picks under the cursor and resolves the nearest hit against the targets first and
//! the walls second. A hit target is marked and disappears; a hit wall receives a breach at the
//! unprojected hit point.
//!
//! Two more roots serve the view through open breaches: the backdrop and the breach masks.
//! They are drawn by [`Gallery::render`] only and never picked.

use breach_scene::parts::{Material, Texture, TextureId, Texturer};
use breach_scene::{
    Backend, BlendFactor, Buffers, Capabilities, Draw, MatrixMode, NodeId, Pass, Payload,
    RenderMode, RenderNode, Scene, SceneError,
};
use breach_selection::{DecodeError, SoftwareSelector, TypedSelectionResolver};
use glam::{Mat4, Vec2, Vec3, Vec4};
use kurbo::Size;

use crate::breaches::{
    BreachRenderer, BreachSlot, BreachTransform, Placement, Refusal, default_breaches,
    shoot_breach,
};
use crate::crosshair::{Crosshair, CrosshairRenderer};
use crate::reveal::{self, BackdropLook, BreachMask, MaskLook, make_opaque};
use crate::targets::{Target, TargetLook, TargetRenderer, default_targets};
use crate::walls::{Wall, WallRenderer, default_walls};

/// Name of the targets root.
pub const TARGETS_NAME: u32 = 1;
/// Name of the walls root.
pub const WALLS_NAME: u32 = 2;
/// Name of the breaches root.
pub const BREACHES_NAME: u32 = 3;

/// Texture bound around the targets.
pub const TARGET_TEXTURE: Texture = Texture::new(TextureId(1));
/// Texture bound around the walls.
pub const WALL_TEXTURE: Texture = Texture::new(TextureId(2));
/// Texture of the breach outlines.
pub const HIGHLIGHT_TEXTURE: Texture = Texture::new(TextureId(3));
/// Alpha mask written through open breaches.
pub const BREACH_MASK_TEXTURE: Texture = Texture::new(TextureId(4));
/// Crosshair pointer.
pub const POINTER_TEXTURE: Texture = Texture::new(TextureId(5));
/// Crosshair breach indicator.
pub const INDICATOR_TEXTURE: Texture = Texture::new(TextureId(6));
/// On-screen size of the crosshair in pixels.
pub const CROSSHAIR_SIZE: Vec2 = Vec2::splat(32.0);

/// A perspective camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Viewing direction.
    pub look: Vec3,
    /// Up direction.
    pub up: Vec3,
}

impl Camera {
    /// Vertical field of view in degrees.
    pub const FOV_Y: f32 = 45.0;
    /// Near clipping distance.
    pub const NEAR: f32 = 0.01;
    /// Far clipping distance.
    pub const FAR: f32 = 10.0;

    /// The world to eye transform.
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.look, self.up)
    }

    /// The eye to clip transform for a viewport of `aspect` width over height.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(Self::FOV_Y.to_radians(), aspect, Self::NEAR, Self::FAR)
    }
}

impl Default for Camera {
    /// Near the open end of the room, looking down its length.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 0.75),
            look: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

/// Everything the gallery draws and shoots at.
#[derive(Debug)]
pub struct World {
    /// Shootable targets.
    pub targets: Vec<Target>,
    /// The room.
    pub walls: Vec<Wall>,
    /// Breach slots, closed until shot.
    pub breaches: Vec<BreachSlot>,
    /// Indicators of the breaches, by index into `breaches`.
    pub crosshair: Crosshair,
}

impl World {
    /// The standard room, targets and breaches, with the two breach indicators in opposite
    /// corners of the crosshair.
    pub fn new() -> Self {
        let crosshair = Crosshair::new();
        crosshair.add_breach(0, 0);
        crosshair.add_breach(2, 1);
        Self {
            targets: default_targets(),
            walls: default_walls(),
            breaches: default_breaches(),
            crosshair,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`Gallery::shoot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shot {
    /// The target at this index was hit.
    Target(usize),
    /// A breach opened on a wall.
    Breach {
        /// Index of the breach.
        breach: usize,
        /// Index of the wall.
        wall: usize,
        /// Where the breach now sits.
        placement: Placement,
    },
    /// A wall was hit but the breach could not open there.
    Blocked(Refusal),
    /// Nothing shootable was under the cursor.
    Missed,
}

/// A [`World`] assembled into a scene.
#[derive(Debug)]
pub struct Gallery<'w> {
    world: &'w World,
    scene: Scene<'w>,
    targets: NodeId,
    walls: NodeId,
    breaches: NodeId,
    backdrop: NodeId,
    masks: NodeId,
}

impl<'w> Gallery<'w> {
    /// Builds the scene for `world`.
    pub fn new(world: &'w World) -> Result<Self, SceneError> {
        let mut scene = Scene::new();

        let targets = scene.insert(
            RenderNode::composite()
                .configured_by(Texturer::new(TARGET_TEXTURE))
                .selectable(TARGETS_NAME, Payload::EMPTY),
        );
        for (name, target) in (1..).zip(&world.targets) {
            scene.insert_child(
                targets,
                RenderNode::leaf(TargetRenderer::new(target))
                    .configured_by(TargetLook::new(target))
                    .selectable(name, Payload::new(target)),
            )?;
        }

        let walls = scene.insert(
            RenderNode::composite()
                .configured_by(Texturer::new(WALL_TEXTURE))
                .selectable(WALLS_NAME, Payload::EMPTY),
        );
        for (name, wall) in (1..).zip(&world.walls) {
            scene.insert_child(
                walls,
                RenderNode::leaf(WallRenderer::new(wall))
                    .configured_by(Material::GLOSSY)
                    .selectable(name, Payload::new(wall)),
            )?;
        }

        let breaches =
            scene.insert(RenderNode::composite().selectable(BREACHES_NAME, Payload::EMPTY));
        for (name, slot) in (1..).zip(&world.breaches) {
            scene.insert_child(
                breaches,
                RenderNode::leaf(BreachRenderer::new(slot, HIGHLIGHT_TEXTURE))
                    .transformed_by(BreachTransform::new(slot))
                    .selectable(name, Payload::new(slot)),
            )?;
        }

        let backdrop = scene.insert(
            RenderNode::leaf(reveal::backdrop()).configured_by(BackdropLook::new(TARGET_TEXTURE)),
        );
        let masks =
            scene.insert(RenderNode::composite().configured_by(MaskLook::new(BREACH_MASK_TEXTURE)));
        for slot in &world.breaches {
            scene.insert_child(
                masks,
                RenderNode::leaf(BreachMask::new(slot)).transformed_by(BreachTransform::new(slot)),
            )?;
        }

        log::debug!("gallery assembled: {scene:?}");
        Ok(Self {
            world,
            scene,
            targets,
            walls,
            breaches,
            backdrop,
            masks,
        })
    }

    /// The assembled scene.
    pub fn scene(&self) -> &Scene<'w> {
        &self.scene
    }

    /// The world behind the scene.
    pub fn world(&self) -> &'w World {
        self.world
    }

    /// Shootable roots: targets, walls, breaches.
    pub fn roots(&self) -> [NodeId; 3] {
        [self.targets, self.walls, self.breaches]
    }

    /// Draws a frame seen from `camera` into a window of `window` pixels, then the crosshair.
    ///
    /// With a breach open, the backdrop is drawn first and every open breach clears the
    /// framebuffer alpha under its mask, so the walls blended over it let the backdrop through.
    /// Empty windows draw nothing.
    pub fn render(&self, camera: &Camera, window: Size, backend: &mut dyn Backend) {
        if window.is_zero_area() {
            log::warn!("skipping a frame for an empty window");
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "aspect ratios fit single precision."
        )]
        let aspect = (window.width / window.height) as f32;
        let revealing = self.world.breaches.iter().any(BreachSlot::is_open);

        backend.clear_color(Vec4::W);
        backend.clear(Buffers::COLOR | Buffers::DEPTH);
        backend.enable(Capabilities::CULL_FACE);
        backend.push_matrix(MatrixMode::Projection, &camera.projection(aspect));
        backend.push_matrix(MatrixMode::ModelView, &camera.view());
        {
            let mut pass = Pass::new(RenderMode::Render, &mut *backend);
            if revealing {
                self.scene.full_render(self.backdrop, &mut pass);
            }
            make_opaque(pass.backend());
            if revealing {
                self.scene.full_render(self.masks, &mut pass);
            }

            pass.backend().enable(Capabilities::BLEND);
            pass.backend().blend_func(BlendFactor::DstAlpha, BlendFactor::OneMinusDstAlpha);
            self.scene.full_render(self.walls, &mut pass);
            pass.backend().disable(Capabilities::BLEND);
            make_opaque(pass.backend());

            self.scene.full_render(self.targets, &mut pass);
            self.scene.full_render(self.breaches, &mut pass);
        }
        backend.pop_matrix(MatrixMode::ModelView);
        backend.pop_matrix(MatrixMode::Projection);

        #[allow(
            clippy::cast_possible_truncation,
            reason = "window sizes fit single precision."
        )]
        let (width, height) = (window.width as f32, window.height as f32);
        backend.push_matrix(
            MatrixMode::Projection,
            &Mat4::orthographic_rh_gl(0.0, width, 0.0, height, -1.0, 1.0),
        );
        backend.push_matrix(MatrixMode::ModelView, &Mat4::IDENTITY);
        backend.disable(Capabilities::DEPTH_TEST);
        CrosshairRenderer::new(
            &self.world.crosshair,
            &self.world.breaches,
            CROSSHAIR_SIZE,
            window,
            POINTER_TEXTURE,
            INDICATOR_TEXTURE,
        )
        .render(&mut Pass::new(RenderMode::Render, &mut *backend));
        backend.enable(Capabilities::DEPTH_TEST);
        backend.pop_matrix(MatrixMode::ModelView);
        backend.pop_matrix(MatrixMode::Projection);
    }

    /// Shoots at the selector's cursor. A wall hit opens or moves breach `breach`.
    pub fn shoot(
        &self,
        camera: &Camera,
        selector: &mut SoftwareSelector,
        breach: usize,
    ) -> Result<Shot, DecodeError> {
        let viewport = selector.viewport();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "aspect ratios fit single precision."
        )]
        let aspect = (viewport.width() / viewport.height()) as f32;
        selector.load_matrix(MatrixMode::Projection, camera.projection(aspect));
        selector.load_matrix(MatrixMode::ModelView, camera.view());
        selector.enable(Capabilities::CULL_FACE);

        let selection = breach_selection::pick(&self.scene, &self.roots(), selector)?;
        let Some(hit) = selection.nearest() else {
            log::info!("shot at {:?} missed", selector.cursor());
            return Ok(Shot::Missed);
        };

        let resolved = TypedSelectionResolver::<Target>::new(&hit.names)
            .resolve(&self.scene, self.targets)
            .and_then(|target| index_of(&self.world.targets, target).map(|i| (target, i)));
        if let Some((target, index)) = resolved {
            log::info!("target {index} hit at {}", target.center());
            target.set_hit();
            return Ok(Shot::Target(index));
        }

        let Some(wall) =
            TypedSelectionResolver::<Wall>::new(&hit.names).resolve(&self.scene, self.walls)
        else {
            return Ok(Shot::Missed);
        };
        let (Some(index), Some(point)) = (
            index_of(&self.world.walls, wall),
            selector.unproject((hit.depth_min + hit.depth_max) / 2.0),
        ) else {
            log::warn!("cannot place a shot on wall {:?}", hit.names);
            return Ok(Shot::Missed);
        };
        let uv = wall.in_wall_coordinates(point);
        log::debug!("wall {index} hit at {point}, {uv} in wall coordinates");
        Ok(
            match shoot_breach(
                &self.world.breaches,
                breach,
                &self.world.walls,
                index,
                uv,
                camera.up,
            ) {
                Ok(placement) => Shot::Breach {
                    breach,
                    wall: index,
                    placement,
                },
                Err(refusal) => Shot::Blocked(refusal),
            },
        )
    }
}

fn index_of<T>(items: &[T], item: &T) -> Option<usize> {
    items.iter().position(|i| core::ptr::eq(i, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use breach_scene::{Command, RecordingBackend};
    use kurbo::Rect;

    fn selector() -> SoftwareSelector {
        SoftwareSelector::new(Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    #[test]
    fn shots_go_through_targets_then_hit_the_far_wall() {
        let world = World::new();
        let gallery = Gallery::new(&world).unwrap();
        let camera = Camera::default();
        let mut s = selector();

        for expected in [2, 3, 1] {
            assert_eq!(
                gallery.shoot(&camera, &mut s, 0).unwrap(),
                Shot::Target(expected)
            );
            assert!(world.targets[expected].is_hit());
        }

        let Shot::Breach {
            breach,
            wall,
            placement,
        } = gallery.shoot(&camera, &mut s, 0).unwrap()
        else {
            panic!("expected a breach");
        };
        assert_eq!((breach, wall), (0, 1));
        assert!((placement.shot_point - Vec2::splat(0.5)).length() < 1e-3);
        assert!(world.breaches[0].is_open());

        assert_eq!(
            gallery.shoot(&camera, &mut s, 1).unwrap(),
            Shot::Blocked(Refusal::Overlap { other: 0 })
        );
        assert!(!world.breaches[1].is_open());
    }

    #[test]
    fn looking_at_the_floor_hits_it() {
        let world = World::new();
        let gallery = Gallery::new(&world).unwrap();
        let camera = Camera {
            look: Vec3::NEG_Y,
            up: Vec3::NEG_Z,
            ..Camera::default()
        };
        match gallery.shoot(&camera, &mut selector(), 1).unwrap() {
            Shot::Breach { breach, wall, .. } => assert_eq!((breach, wall), (1, 2)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn looking_out_of_the_room_misses() {
        let world = World::new();
        let gallery = Gallery::new(&world).unwrap();
        let camera = Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            look: Vec3::Z,
            ..Camera::default()
        };
        assert_eq!(
            gallery.shoot(&camera, &mut selector(), 0).unwrap(),
            Shot::Missed
        );
    }

    const WINDOW: Size = Size::new(800.0, 600.0);

    #[test]
    fn render_balances_matrices() {
        let world = World::new();
        let gallery = Gallery::new(&world).unwrap();
        let mut rec = RecordingBackend::new();
        gallery.render(&Camera::default(), WINDOW, &mut rec);
        let (mut pushes, mut pops) = (0, 0);
        for c in rec.commands() {
            match c {
                Command::PushMatrix(..) => pushes += 1,
                Command::PopMatrix(..) => pops += 1,
                _ => {}
            }
        }
        assert_eq!(pushes, pops);
        assert!(rec.commands().contains(&Command::PushMatrix(
            MatrixMode::Projection,
            Camera::default().projection(4.0 / 3.0)
        )));
        // Closed breaches draw nothing; the crosshair draws its pointer.
        let drawn = rec.submissions().count();
        assert_eq!(drawn, 2 * (world.targets.len() + world.walls.len()) + 1);
        // Nothing is revealed either.
        assert!(!rec.commands().contains(&Command::Clear(Buffers::DEPTH)));

        let mut empty = RecordingBackend::new();
        gallery.render(&Camera::default(), Size::new(800.0, 0.0), &mut empty);
        assert!(empty.commands().is_empty());
    }

    #[test]
    fn open_breach_reveals_the_backdrop_through_the_walls() {
        let world = World::new();
        let gallery = Gallery::new(&world).unwrap();
        shoot_breach(&world.breaches, 0, &world.walls, 1, Vec2::splat(0.5), Vec3::Y).unwrap();
        let mut rec = RecordingBackend::new();
        gallery.render(&Camera::default(), WINDOW, &mut rec);
        let c = rec.commands();

        let after = |from: usize, wanted: &Command| {
            c[from..]
                .iter()
                .position(|x| x == wanted)
                .map(|i| i + from)
                .unwrap_or_else(|| panic!("no {wanted:?} after {from}"))
        };
        let submits = |range: core::ops::Range<usize>| {
            c[range]
                .iter()
                .filter(|x| matches!(x, Command::Submit { .. }))
                .count()
        };

        let backdrop = after(
            0,
            &Command::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
        );
        let opaque = after(backdrop, &Command::Clear(Buffers::COLOR));
        assert_eq!(c[opaque - 1], Command::ColorMask(false, true));
        assert_eq!(submits(backdrop..opaque), 1);

        let masks = after(opaque, &Command::Clear(Buffers::DEPTH));
        let masked = after(masks, &Command::ColorMask(false, true));
        let walls = after(
            masked,
            &Command::BlendFunc(BlendFactor::DstAlpha, BlendFactor::OneMinusDstAlpha),
        );
        assert_eq!(submits(masked..walls), 1);
        assert_eq!(c[walls - 1], Command::Enable(Capabilities::BLEND));

        let unblended = after(walls, &Command::Disable(Capabilities::BLEND));
        assert_eq!(submits(walls..unblended), 2 * world.walls.len());
        let opaque_again = after(unblended, &Command::Clear(Buffers::COLOR));
        // Targets, the highlight drawn twice, then the pointer and one indicator.
        assert_eq!(
            submits(opaque_again..c.len()),
            2 * world.targets.len() + 2 + 2
        );
        assert_eq!(c.last(), Some(&Command::PopMatrix(MatrixMode::Projection)));
    }
}
