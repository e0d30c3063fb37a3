// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The crosshair overlay.
//!
//! A [`Crosshair`] has four indicator positions, one per corner of the pointer. Each position
//! may hold a breach, referenced by its index in the world's breach table. The renderer draws
//! the pointer at the window center, then one tinted indicator per open breach. The indicator
//! texture is rotated a quarter turn per position so each one points at its own corner.

use std::cell::Cell;

use breach_scene::parts::Texture;
use breach_scene::{BlendFactor, Capabilities, Draw, Pass, RenderMode, Topology, Vertex};
use glam::{Vec2, Vec3, Vec4};
use kurbo::Size;

use crate::breaches::BreachSlot;

/// Indicator positions around the pointer.
pub const POSITIONS: usize = 4;

/// Breach indicators around the pointer.
#[derive(Debug, Default)]
pub struct Crosshair {
    positions: [Cell<Option<usize>>; POSITIONS],
}

impl Crosshair {
    /// A crosshair without indicators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `breach` at `position` and returns the breach shown there before.
    ///
    /// Positions past [`POSITIONS`] are ignored.
    pub fn add_breach(&self, position: usize, breach: usize) -> Option<usize> {
        let Some(slot) = self.positions.get(position) else {
            log::warn!("crosshair position {position} out of range");
            return None;
        };
        slot.replace(Some(breach))
    }

    /// Clears `position` and returns the breach shown there.
    pub fn remove_breach(&self, position: usize) -> Option<usize> {
        self.positions.get(position)?.take()
    }

    /// Number of occupied positions.
    pub fn breach_count(&self) -> usize {
        self.positions.iter().filter(|p| p.get().is_some()).count()
    }

    /// The breach shown at `position`.
    pub fn breach_at(&self, position: usize) -> Option<usize> {
        self.positions.get(position)?.get()
    }
}

const TEX_CORNERS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// Draws a [`Crosshair`] in window coordinates, origin at the bottom left.
///
/// Expects an orthographic projection over the window and an identity model-view. Draws in
/// render passes only.
#[derive(Debug, Clone, Copy)]
pub struct CrosshairRenderer<'w> {
    crosshair: &'w Crosshair,
    breaches: &'w [BreachSlot],
    size: Vec2,
    window: Size,
    pointer: Texture,
    indicator: Texture,
}

impl<'w> CrosshairRenderer<'w> {
    /// A renderer for `crosshair`, whose indices point into `breaches`.
    ///
    /// `size` is the on-screen size of the pointer and indicators in pixels.
    pub fn new(
        crosshair: &'w Crosshair,
        breaches: &'w [BreachSlot],
        size: Vec2,
        window: Size,
        pointer: Texture,
        indicator: Texture,
    ) -> Self {
        Self {
            crosshair,
            breaches,
            size,
            window,
            pointer,
            indicator,
        }
    }

    /// The centered quad with its texture rotated `rotation` quarter turns.
    fn quad(&self, rotation: usize) -> [Vertex; 4] {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "window sizes fit single precision."
        )]
        let center = Vec2::new(self.window.width as f32, self.window.height as f32) / 2.0;
        let low = center - self.size / 2.0;
        core::array::from_fn(|k| {
            let corner = low + TEX_CORNERS[k] * self.size;
            Vertex::new(
                Vec3::new(corner.x, corner.y, 0.0),
                TEX_CORNERS[(rotation + k) % 4],
            )
        })
    }
}

impl Draw for CrosshairRenderer<'_> {
    fn render(&self, pass: &mut Pass<'_>) {
        if pass.mode() != RenderMode::Render {
            return;
        }
        {
            let backend = pass.backend();
            backend.enable(Capabilities::TEXTURE_2D);
            backend.bind_texture(&self.pointer);
            backend.enable(Capabilities::BLEND);
            backend.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
            backend.set_color(Vec4::ONE);
        }
        pass.submit(Topology::Quads, Vec3::Z, &self.quad(0));

        if self.crosshair.breach_count() > 0 {
            pass.backend().bind_texture(&self.indicator);
            for position in 0..POSITIONS {
                let Some(slot) = self
                    .crosshair
                    .breach_at(position)
                    .and_then(|b| self.breaches.get(b))
                else {
                    continue;
                };
                if !slot.is_open() {
                    continue;
                }
                pass.backend().set_color(slot.color());
                pass.submit(Topology::Quads, Vec3::Z, &self.quad(position));
            }
        }

        let backend = pass.backend();
        backend.disable(Capabilities::BLEND);
        backend.unbind_texture();
        backend.disable(Capabilities::TEXTURE_2D);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaches::{default_breaches, shoot_breach};
    use crate::walls::default_walls;
    use breach_scene::parts::TextureId;
    use breach_scene::{Command, RecordingBackend};

    const POINTER: Texture = Texture::new(TextureId(5));
    const INDICATOR: Texture = Texture::new(TextureId(6));

    #[test]
    fn positions_hold_one_breach_each() {
        let crosshair = Crosshair::new();
        assert_eq!(crosshair.breach_count(), 0);
        assert_eq!(crosshair.add_breach(0, 1), None);
        assert_eq!(crosshair.add_breach(2, 0), None);
        assert_eq!(crosshair.breach_count(), 2);
        // Replacing keeps the count.
        assert_eq!(crosshair.add_breach(0, 3), Some(1));
        assert_eq!(crosshair.breach_count(), 2);
        assert_eq!(crosshair.breach_at(0), Some(3));

        assert_eq!(crosshair.remove_breach(2), Some(0));
        assert_eq!(crosshair.remove_breach(2), None);
        assert_eq!(crosshair.breach_count(), 1);

        assert_eq!(crosshair.add_breach(POSITIONS, 0), None);
        assert_eq!(crosshair.breach_at(POSITIONS), None);
        assert_eq!(crosshair.remove_breach(POSITIONS), None);
        assert_eq!(crosshair.breach_count(), 1);
    }

    #[test]
    fn quads_are_centered_with_rotated_texture() {
        let crosshair = Crosshair::new();
        let r = CrosshairRenderer::new(
            &crosshair,
            &[],
            Vec2::splat(32.0),
            Size::new(800.0, 600.0),
            POINTER,
            INDICATOR,
        );
        let pointer = r.quad(0);
        assert_eq!(pointer[0].position, Vec3::new(384.0, 284.0, 0.0));
        assert_eq!(pointer[2].position, Vec3::new(416.0, 316.0, 0.0));
        assert_eq!(pointer.map(|v| v.tex_coord), TEX_CORNERS);

        let turned = r.quad(1);
        assert_eq!(turned[0].position, pointer[0].position);
        assert_eq!(turned[0].tex_coord, Vec2::new(1.0, 0.0));
        assert_eq!(turned[3].tex_coord, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn only_open_breaches_get_indicators() {
        let walls = default_walls();
        let breaches = default_breaches();
        let crosshair = Crosshair::new();
        crosshair.add_breach(0, 0);
        crosshair.add_breach(2, 1);
        let r = CrosshairRenderer::new(
            &crosshair,
            &breaches,
            Vec2::splat(32.0),
            Size::new(640.0, 480.0),
            POINTER,
            INDICATOR,
        );

        let mut rec = RecordingBackend::new();
        r.render(&mut Pass::new(RenderMode::Render, &mut rec));
        assert_eq!(rec.submissions().count(), 1);
        assert_eq!(rec.commands().last(), Some(&Command::Disable(Capabilities::TEXTURE_2D)));

        shoot_breach(&breaches, 1, &walls, 1, Vec2::splat(0.5), Vec3::Y).unwrap();
        rec.take();
        r.render(&mut Pass::new(RenderMode::Render, &mut rec));
        assert_eq!(rec.submissions().count(), 2);
        let c = rec.commands();
        let tint = c
            .iter()
            .position(|c| c == &Command::SetColor(breaches[1].color()))
            .unwrap();
        assert_eq!(c[tint - 1], Command::BindTexture(TextureId(6)));
        assert!(matches!(c[tint + 1], Command::Submit { vertices: 4, .. }));

        rec.take();
        r.render(&mut Pass::new(RenderMode::Select, &mut rec));
        assert!(rec.commands().is_empty());
    }
}
