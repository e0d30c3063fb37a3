// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The view through open breaches.
//!
//! A frame with an open breach is drawn in layers. A backdrop is drawn behind the room first.
//! The framebuffer alpha is then reset to opaque, and each open breach writes its mask texture
//! into the alpha channel only. Walls blend against the destination alpha, so they vanish where
//! a mask cleared it and the backdrop shows through.
//!
//! Everything here acts in render passes only.

use breach_scene::parts::{Material, Texture, Texturer};
use breach_scene::primitives::TessellatedRectangle;
use breach_scene::{Backend, BlendFactor, Buffers, Capabilities, Configure, Draw, Pass, RenderMode};
use glam::{Vec3, Vec4};
use kurbo::Rect;

use crate::breaches::BreachSlot;

/// Center of the backdrop.
pub const BACKDROP_CENTER: Vec3 = Vec3::new(0.0, 0.0, -3.0);
/// Side length of the backdrop.
pub const BACKDROP_SIZE: f32 = 1.9;

/// Clears the color alpha to one, leaving the color planes untouched.
pub fn make_opaque(backend: &mut dyn Backend) {
    backend.clear_color(Vec4::W);
    backend.color_mask(false, true);
    backend.clear(Buffers::COLOR);
    backend.color_mask(true, true);
}

/// The square drawn behind the room, facing it.
pub fn backdrop() -> TessellatedRectangle {
    let half = BACKDROP_SIZE / 2.0;
    TessellatedRectangle::new(10, 10, Rect::new(0.0, 0.0, 1.0, 1.0), false).placed(
        BACKDROP_CENTER - Vec3::new(half, half, 0.0),
        Vec3::X * BACKDROP_SIZE,
        Vec3::Y * BACKDROP_SIZE,
    )
}

/// State for drawing the backdrop: textured, unlit white, alpha-tested and blended over.
#[derive(Debug, Clone, Copy)]
pub struct BackdropLook {
    texturer: Texturer,
}

impl BackdropLook {
    /// Alpha-test reference of the backdrop texture.
    pub const ALPHA_THRESHOLD: f32 = 0.75;

    /// A look binding `texture`.
    pub const fn new(texture: Texture) -> Self {
        Self {
            texturer: Texturer::new(texture),
        }
    }
}

impl Configure for BackdropLook {
    fn configure(&self, pass: &mut Pass<'_>) {
        if pass.mode() != RenderMode::Render {
            return;
        }
        Material::MATTE.configure(pass);
        self.texturer.configure(pass);
        let backend = pass.backend();
        backend.set_color(Vec4::ONE);
        backend.enable(Capabilities::BLEND | Capabilities::ALPHA_TEST);
        backend.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
        backend.alpha_threshold(Self::ALPHA_THRESHOLD);
    }

    fn deconfigure(&self, pass: &mut Pass<'_>) {
        if pass.mode() != RenderMode::Render {
            return;
        }
        pass.backend().disable(Capabilities::BLEND | Capabilities::ALPHA_TEST);
        self.texturer.deconfigure(pass);
    }
}

/// State around the breach masks: a fresh depth buffer on both sides, the mask texture bound,
/// and writes restricted to the alpha channel.
#[derive(Debug, Clone, Copy)]
pub struct MaskLook {
    texturer: Texturer,
}

impl MaskLook {
    /// A look binding `texture` as the mask.
    pub const fn new(texture: Texture) -> Self {
        Self {
            texturer: Texturer::new(texture),
        }
    }
}

impl Configure for MaskLook {
    fn configure(&self, pass: &mut Pass<'_>) {
        if pass.mode() != RenderMode::Render {
            return;
        }
        pass.backend().clear(Buffers::DEPTH);
        self.texturer.configure(pass);
        pass.backend().color_mask(false, true);
    }

    fn deconfigure(&self, pass: &mut Pass<'_>) {
        if pass.mode() != RenderMode::Render {
            return;
        }
        pass.backend().color_mask(true, true);
        self.texturer.deconfigure(pass);
        pass.backend().clear(Buffers::DEPTH);
    }
}

/// Writes the mask of one breach over `[-1, 1]²`, to be drawn under its placement.
#[derive(Debug, Clone, Copy)]
pub struct BreachMask<'b> {
    slot: &'b BreachSlot,
    face: TessellatedRectangle,
}

impl<'b> BreachMask<'b> {
    /// The mask of `slot`.
    pub fn new(slot: &'b BreachSlot) -> Self {
        Self {
            slot,
            face: TessellatedRectangle::new(1, 1, Rect::new(0.0, 0.0, 1.0, 1.0), false).placed(
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::X * 2.0,
                Vec3::Y * 2.0,
            ),
        }
    }
}

impl Draw for BreachMask<'_> {
    fn render(&self, pass: &mut Pass<'_>) {
        if self.slot.is_open() && pass.mode() == RenderMode::Render {
            self.face.draw(pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaches::{default_breaches, shoot_breach};
    use crate::walls::default_walls;
    use breach_scene::parts::TextureId;
    use breach_scene::{Command, RecordingBackend, Topology};
    use glam::Vec2;

    #[test]
    fn opaque_reset_touches_alpha_only() {
        let mut rec = RecordingBackend::new();
        make_opaque(&mut rec);
        assert_eq!(
            rec.commands(),
            &[
                Command::ClearColor(Vec4::W),
                Command::ColorMask(false, true),
                Command::Clear(Buffers::COLOR),
                Command::ColorMask(true, true),
            ]
        );
    }

    #[test]
    fn backdrop_sits_behind_the_far_wall() {
        let m = backdrop().placement.unwrap().transformation;
        let center = m.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert!((center - BACKDROP_CENTER).length() < 1e-6);
        let corner = m.transform_point3(Vec3::new(1.0, 1.0, 0.0));
        assert!((corner - Vec3::new(0.95, 0.95, -3.0)).length() < 1e-6);
        assert_eq!(m.transform_vector3(Vec3::Z), Vec3::Z);
    }

    #[test]
    fn backdrop_look_is_inert_outside_render() {
        let look = BackdropLook::new(Texture::new(TextureId(1)));
        let mut rec = RecordingBackend::new();
        {
            let mut pass = Pass::new(RenderMode::Select, &mut rec);
            look.configure(&mut pass);
            look.deconfigure(&mut pass);
        }
        assert!(rec.commands().is_empty());

        {
            let mut pass = Pass::new(RenderMode::Render, &mut rec);
            look.configure(&mut pass);
            look.deconfigure(&mut pass);
        }
        let c = rec.commands();
        assert!(c.contains(&Command::BindTexture(TextureId(1))));
        assert!(c.contains(&Command::AlphaThreshold(BackdropLook::ALPHA_THRESHOLD)));
        assert!(c.contains(&Command::BlendFunc(
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha
        )));
        assert_eq!(c.last(), Some(&Command::Disable(Capabilities::TEXTURE_2D)));
    }

    #[test]
    fn masks_write_alpha_between_depth_clears() {
        let walls = default_walls();
        let breaches = default_breaches();
        shoot_breach(&breaches, 0, &walls, 1, Vec2::splat(0.5), Vec3::Y).unwrap();
        let look = MaskLook::new(Texture::new(TextureId(4)));

        let mut rec = RecordingBackend::new();
        {
            let mut pass = Pass::new(RenderMode::Render, &mut rec);
            look.configure(&mut pass);
            for slot in &breaches {
                BreachMask::new(slot).render(&mut pass);
            }
            look.deconfigure(&mut pass);
        }
        let c = rec.commands();
        assert_eq!(c.first(), Some(&Command::Clear(Buffers::DEPTH)));
        assert_eq!(c.last(), Some(&Command::Clear(Buffers::DEPTH)));
        let submits: Vec<_> = c
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Command::Submit { .. }))
            .collect();
        // Only the open breach writes its mask.
        assert_eq!(submits.len(), 1);
        assert_eq!(
            submits[0].1,
            &Command::Submit {
                topology: Topology::Quads,
                vertices: 4,
                names: Vec::new(),
            }
        );
        let masked = c
            .iter()
            .position(|c| c == &Command::ColorMask(false, true))
            .unwrap();
        let unmasked = c
            .iter()
            .position(|c| c == &Command::ColorMask(true, true))
            .unwrap();
        assert!(masked < submits[0].0 && submits[0].0 < unmasked);
    }
}
