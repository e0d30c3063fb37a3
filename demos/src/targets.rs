// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scored targets.

use std::cell::Cell;

use breach_scene::parts::Material;
use breach_scene::primitives::{RegularPolygon, TessellatedRectangle};
use breach_scene::{Capabilities, Configure, Draw, Pass, RenderMode};
use glam::Vec3;
use kurbo::Rect;

/// A round target facing +Z.
#[derive(Debug)]
pub struct Target {
    center: Vec3,
    size: f32,
    hit: Cell<bool>,
}

impl Target {
    /// A target centered at `center` with diameter `size`.
    pub fn new(center: Vec3, size: f32) -> Self {
        Self {
            center,
            size,
            hit: Cell::new(false),
        }
    }

    /// Center of the target.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Diameter of the target.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Whether the target has been shot.
    pub fn is_hit(&self) -> bool {
        self.hit.get()
    }

    /// Marks the target as shot. A shot target is no longer drawn or picked.
    pub fn set_hit(&self) {
        self.hit.set(true);
    }
}

/// The twenty targets of the gallery.
pub fn default_targets() -> Vec<Target> {
    const LAYOUT: [(f32, f32, f32, f32); 20] = [
        (0.0, 0.0, -4.0, 4.0),
        (0.0, 0.0, -1.0, 0.4),
        (0.0, 0.0, 0.1, 0.4),
        (0.0, 0.0, -0.5, 0.4),
        (0.6, 0.3, 1.0, 0.4),
        (0.5, 0.7, 0.5, 0.4),
        (0.3, 0.6, -0.5, 0.4),
        (0.8, 0.2, -1.0, 0.4),
        (0.6, -0.3, 1.0, 0.4),
        (0.5, -0.7, 0.5, 0.4),
        (0.3, -0.6, -0.5, 0.4),
        (0.8, -0.2, -1.0, 0.4),
        (-0.6, 0.3, 1.0, 0.4),
        (-0.5, 0.7, 0.5, 0.4),
        (-0.3, 0.6, -0.5, 0.4),
        (-0.8, 0.2, -1.0, 0.4),
        (-0.6, -0.3, 1.0, 0.4),
        (-0.5, -0.7, 0.5, 0.4),
        (-0.3, -0.6, -0.5, 0.4),
        (-0.8, -0.2, -1.0, 0.4),
    ];
    LAYOUT
        .iter()
        .map(|&(x, y, z, size)| Target::new(Vec3::new(x, y, z), size))
        .collect()
}

/// State for drawing a target.
///
/// Render passes alpha-test the texture and keep the alpha channel untouched. Select passes
/// turn culling off so the target is hit from both sides. Nothing happens once it is shot.
#[derive(Debug, Clone, Copy)]
pub struct TargetLook<'t> {
    target: &'t Target,
}

impl<'t> TargetLook<'t> {
    /// The look of `target`.
    pub fn new(target: &'t Target) -> Self {
        Self { target }
    }
}

impl Configure for TargetLook<'_> {
    fn configure(&self, pass: &mut Pass<'_>) {
        if self.target.is_hit() {
            return;
        }
        match pass.mode() {
            RenderMode::Render => {
                let backend = pass.backend();
                backend.enable(Capabilities::ALPHA_TEST);
                backend.alpha_threshold(0.75);
                backend.color_mask(true, false);
                Material::MATTE.configure(pass);
            }
            RenderMode::Select => pass.backend().disable(Capabilities::CULL_FACE),
            RenderMode::Feedback => {}
        }
    }

    fn deconfigure(&self, pass: &mut Pass<'_>) {
        if self.target.is_hit() {
            return;
        }
        match pass.mode() {
            RenderMode::Render => {
                let backend = pass.backend();
                backend.disable(Capabilities::ALPHA_TEST);
                backend.color_mask(true, true);
            }
            RenderMode::Select => pass.backend().enable(Capabilities::CULL_FACE),
            RenderMode::Feedback => {}
        }
    }
}

/// Draws a target: a textured double-sided square when rendering, a disc when selecting.
///
/// The disc stands in for the alpha-tested texture, which select mode cannot see.
#[derive(Debug, Clone, Copy)]
pub struct TargetRenderer<'t> {
    target: &'t Target,
    face: TessellatedRectangle,
    disc: RegularPolygon,
}

impl<'t> TargetRenderer<'t> {
    /// Radius of the selection disc relative to the target size.
    pub const DISC_RATIO: f32 = 1.0 / 2.045;

    /// A renderer for `target`.
    pub fn new(target: &'t Target) -> Self {
        let (center, size) = (target.center(), target.size());
        let corner = center - Vec3::new(size / 2.0, size / 2.0, 0.0);
        let radius = size * Self::DISC_RATIO;
        Self {
            target,
            face: TessellatedRectangle::new(10, 10, Rect::new(0.0, 0.0, 1.0, 1.0), true).placed(
                corner,
                Vec3::X * size,
                Vec3::Y * size,
            ),
            disc: RegularPolygon::new(20).placed(center, Vec3::X * radius, Vec3::Y * radius),
        }
    }
}

impl Draw for TargetRenderer<'_> {
    fn render(&self, pass: &mut Pass<'_>) {
        if self.target.is_hit() {
            return;
        }
        match pass.mode() {
            RenderMode::Render | RenderMode::Feedback => self.face.draw(pass),
            RenderMode::Select => self.disc.draw(pass),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breach_scene::{Command, RecordingBackend, Topology};

    fn submissions(rec: &RecordingBackend) -> Vec<Topology> {
        rec.commands()
            .iter()
            .filter_map(|c| match c {
                Command::Submit { topology, .. } => Some(*topology),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn select_draws_the_disc_with_culling_off() {
        let target = Target::new(Vec3::ZERO, 0.4);
        let (look, draw) = (TargetLook::new(&target), TargetRenderer::new(&target));
        let mut rec = RecordingBackend::new();
        {
            let mut pass = Pass::new(RenderMode::Select, &mut rec);
            look.configure(&mut pass);
            draw.render(&mut pass);
            look.deconfigure(&mut pass);
        }
        assert_eq!(submissions(&rec), [Topology::TriangleFan]);
        assert_eq!(
            rec.commands().first(),
            Some(&Command::Disable(Capabilities::CULL_FACE))
        );
        assert_eq!(
            rec.commands().last(),
            Some(&Command::Enable(Capabilities::CULL_FACE))
        );
    }

    #[test]
    fn render_draws_both_faces() {
        let target = Target::new(Vec3::ZERO, 0.4);
        let mut rec = RecordingBackend::new();
        TargetRenderer::new(&target).render(&mut Pass::new(RenderMode::Render, &mut rec));
        assert_eq!(submissions(&rec), [Topology::Quads, Topology::Quads]);
    }

    #[test]
    fn shot_targets_vanish() {
        let target = Target::new(Vec3::ZERO, 0.4);
        target.set_hit();
        let mut rec = RecordingBackend::new();
        {
            let mut pass = Pass::new(RenderMode::Render, &mut rec);
            TargetLook::new(&target).configure(&mut pass);
            TargetRenderer::new(&target).render(&mut pass);
        }
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn layout_has_twenty_targets() {
        let targets = default_targets();
        assert_eq!(targets.len(), 20);
        assert!(targets.iter().all(|t| !t.is_hit()));
    }
}
