// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A CPU hit tester with fixed-function select semantics.
//!
//! ## Overview
//!
//! [`SoftwareSelector`] answers one question per pass: which submitted polygons cover the
//! cursor? It keeps model-view and projection stacks like a fixed-function pipeline, so
//! transformers drive it unchanged, and it writes hit records in the select-buffer layout.
//!
//! - Polygons are split into triangles, clipped against the near plane in homogeneous
//!   coordinates, and tested against the cursor with inclusive edges.
//! - Window depth is interpolated at the cursor; polygons beyond the far plane do not hit.
//! - A record covers everything hit between two name stack changes. It is written when the
//!   stack next changes and when the pass ends.
//! - When a record does not fit in the capacity the pass reports overflow.
//!
//! Face culling is honored when enabled through [`Capabilities::CULL_FACE`]; counter-clockwise
//! polygons in normalized device coordinates are front-facing.

use alloc::vec;
use alloc::vec::Vec;

use breach_scene::{Backend, Capabilities, Face, MatrixMode, Primitive, Topology};
use glam::{Mat4, Vec2, Vec3, Vec4};
use kurbo::{Point, Rect};

use crate::decode::raw_depth;
use crate::pick::{RawSelection, SelectionBackend};

/// Words reserved for hit records unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 512;

const EPSILON: f32 = 1e-6;

/// Emulates select mode on the CPU.
#[derive(Clone, Debug)]
pub struct SoftwareSelector {
    viewport: Rect,
    cursor: Point,
    capacity: usize,
    modelview: Vec<Mat4>,
    projection: Vec<Mat4>,
    culling: bool,
    cull_face: Face,
    names: Vec<u32>,
    pending: Option<(f32, f32)>,
    buffer: Vec<u32>,
    hits: i32,
    overflowed: bool,
    active: bool,
}

impl SoftwareSelector {
    /// Creates a selector for `viewport` with the cursor at its center and identity matrices.
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            cursor: viewport.center(),
            capacity: DEFAULT_CAPACITY,
            modelview: vec![Mat4::IDENTITY],
            projection: vec![Mat4::IDENTITY],
            culling: false,
            cull_face: Face::Back,
            names: Vec::new(),
            pending: None,
            buffer: Vec::new(),
            hits: 0,
            overflowed: false,
            active: false,
        }
    }

    /// Sets how many words the hit records may occupy.
    #[must_use]
    pub fn with_capacity(mut self, words: usize) -> Self {
        self.capacity = words;
        self
    }

    /// Word capacity of the hit records.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The viewport in window coordinates.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Changes the viewport.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// The pick point in window coordinates, y down.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Moves the pick point.
    pub fn set_cursor(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    /// Replaces the top of a matrix stack.
    pub fn load_matrix(&mut self, mode: MatrixMode, m: Mat4) {
        let stack = self.stack_mut(mode);
        match stack.last_mut() {
            Some(top) => *top = m,
            None => stack.push(m),
        }
    }

    /// The top of a matrix stack.
    pub fn matrix(&self, mode: MatrixMode) -> Mat4 {
        let stack = match mode {
            MatrixMode::ModelView => &self.modelview,
            MatrixMode::Projection => &self.projection,
        };
        stack.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Returns `true` between `begin_selection` and `end_selection`.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The world point under the cursor at window `depth`, through the current matrices.
    ///
    /// Returns `None` when the matrices are singular or the point lies at infinity.
    pub fn unproject(&self, depth: f32) -> Option<Vec3> {
        let mvp = self.matrix(MatrixMode::Projection) * self.matrix(MatrixMode::ModelView);
        if (-EPSILON..EPSILON).contains(&mvp.determinant()) {
            return None;
        }
        let ndc = self.cursor_ndc();
        let v = mvp.inverse() * Vec4::new(ndc.x, ndc.y, depth * 2.0 - 1.0, 1.0);
        if (-EPSILON..EPSILON).contains(&v.w) {
            return None;
        }
        Some(v.truncate() / v.w)
    }

    fn stack_mut(&mut self, mode: MatrixMode) -> &mut Vec<Mat4> {
        match mode {
            MatrixMode::ModelView => &mut self.modelview,
            MatrixMode::Projection => &mut self.projection,
        }
    }

    /// The cursor in normalized device coordinates.
    fn cursor_ndc(&self) -> Vec2 {
        let (w, h) = (self.viewport.width(), self.viewport.height());
        let x = 2.0 * (self.cursor.x - self.viewport.x0) / w - 1.0;
        let y = 1.0 - 2.0 * (self.cursor.y - self.viewport.y0) / h;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "device coordinates are single precision."
        )]
        Vec2::new(x as f32, y as f32)
    }

    fn culls(&self, area: f32) -> bool {
        if !self.culling {
            return false;
        }
        match self.cull_face {
            Face::Front => area > 0.0,
            Face::Back => area < 0.0,
            Face::FrontAndBack => true,
        }
    }

    fn record(&mut self, depth: f32) {
        self.pending = Some(match self.pending {
            Some((min, max)) => (min.min(depth), max.max(depth)),
            None => (depth, depth),
        });
    }

    /// Writes the pending record, if any.
    fn flush(&mut self) {
        let Some((min, max)) = self.pending.take() else {
            return;
        };
        if self.overflowed {
            return;
        }
        if self.buffer.len() + 3 + self.names.len() > self.capacity {
            log::warn!(
                "select buffer of {} words overflowed after {} hits",
                self.capacity,
                self.hits
            );
            self.overflowed = true;
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "name stacks are far shorter than u32::MAX."
        )]
        self.buffer.push(self.names.len() as u32);
        self.buffer.push(raw_depth(min));
        self.buffer.push(raw_depth(max));
        self.buffer.extend_from_slice(&self.names);
        self.hits += 1;
    }

    /// Tests one object-space triangle against the cursor.
    fn test_triangle(&mut self, mvp: Mat4, cursor: Vec2, corners: [Vec3; 3]) {
        let clip = corners.map(|p| mvp * p.extend(1.0));
        let polygon = clip_near(&clip);
        if polygon.len() < 3 {
            return;
        }
        let mut ndc = Vec::with_capacity(polygon.len());
        for v in &polygon {
            if v.w <= EPSILON {
                return;
            }
            ndc.push(v.truncate() / v.w);
        }
        for i in 1..ndc.len() - 1 {
            let (a, b, c) = (ndc[0], ndc[i], ndc[i + 1]);
            let area = signed_area(a.truncate(), b.truncate(), c.truncate());
            if (-EPSILON..EPSILON).contains(&area) || self.culls(area) {
                continue;
            }
            let l0 = signed_area(cursor, b.truncate(), c.truncate()) / area;
            let l1 = signed_area(a.truncate(), cursor, c.truncate()) / area;
            let l2 = signed_area(a.truncate(), b.truncate(), cursor) / area;
            if l0 < -EPSILON || l1 < -EPSILON || l2 < -EPSILON {
                continue;
            }
            let depth = (l0 * a.z + l1 * b.z + l2 * c.z) * 0.5 + 0.5;
            if (0.0..=1.0).contains(&depth) {
                self.record(depth);
            }
        }
    }
}

/// Twice the signed area of `abc`; positive when counter-clockwise.
fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

/// Clips a triangle in clip space to the half-space `z >= -w`.
fn clip_near(triangle: &[Vec4; 3]) -> Vec<Vec4> {
    let inside = |v: &Vec4| v.z + v.w >= 0.0;
    let mut out = Vec::with_capacity(4);
    for (i, &cur) in triangle.iter().enumerate() {
        let next = triangle[(i + 1) % 3];
        let (d0, d1) = (cur.z + cur.w, next.z + next.w);
        if inside(&cur) {
            out.push(cur);
        }
        if inside(&cur) != inside(&next) {
            out.push(cur.lerp(next, d0 / (d0 - d1)));
        }
    }
    out
}

/// Splits a vertex list into triangles by index.
fn triangles(topology: Topology, count: usize) -> Vec<[usize; 3]> {
    match topology {
        Topology::Triangles => (0..count / 3).map(|t| [3 * t, 3 * t + 1, 3 * t + 2]).collect(),
        Topology::TriangleFan => (1..count.saturating_sub(1)).map(|i| [0, i, i + 1]).collect(),
        Topology::Quads => (0..count / 4)
            .flat_map(|q| {
                let b = 4 * q;
                [[b, b + 1, b + 2], [b, b + 2, b + 3]]
            })
            .collect(),
    }
}

impl Backend for SoftwareSelector {
    fn push_name(&mut self, name: u32) {
        if !self.active {
            return;
        }
        self.flush();
        self.names.push(name);
    }

    fn pop_name(&mut self) {
        if !self.active {
            return;
        }
        self.flush();
        if self.names.pop().is_none() {
            log::warn!("pop_name on an empty selector name stack ignored");
        }
    }

    fn push_matrix(&mut self, mode: MatrixMode, m: &Mat4) {
        let stack = self.stack_mut(mode);
        let top = stack.last().copied().unwrap_or(Mat4::IDENTITY);
        stack.push(top * *m);
    }

    fn pop_matrix(&mut self, mode: MatrixMode) {
        let stack = self.stack_mut(mode);
        if stack.len() > 1 {
            stack.pop();
        } else {
            log::warn!("pop_matrix on the base {mode:?} matrix ignored");
        }
    }

    fn enable(&mut self, caps: Capabilities) {
        if caps.contains(Capabilities::CULL_FACE) {
            self.culling = true;
        }
    }

    fn disable(&mut self, caps: Capabilities) {
        if caps.contains(Capabilities::CULL_FACE) {
            self.culling = false;
        }
    }

    fn cull_face(&mut self, face: Face) {
        self.cull_face = face;
    }

    fn submit(&mut self, primitive: &Primitive<'_>, _names: &[u32]) {
        if !self.active {
            return;
        }
        let mvp = self.matrix(MatrixMode::Projection) * self.matrix(MatrixMode::ModelView);
        let cursor = self.cursor_ndc();
        let vertices = primitive.vertices;
        for [a, b, c] in triangles(primitive.topology, vertices.len()) {
            let corners = [vertices[a].position, vertices[b].position, vertices[c].position];
            self.test_triangle(mvp, cursor, corners);
        }
    }
}

impl SelectionBackend for SoftwareSelector {
    fn begin_selection(&mut self) {
        self.active = true;
        self.names.clear();
        self.pending = None;
        self.buffer.clear();
        self.hits = 0;
        self.overflowed = false;
    }

    fn end_selection(&mut self) -> RawSelection {
        self.flush();
        self.active = false;
        if !self.names.is_empty() {
            log::warn!("select pass ended with {} names pushed", self.names.len());
            self.names.clear();
        }
        let hit_count = if self.overflowed { -1 } else { self.hits };
        log::debug!("select pass wrote {} words, hit count {hit_count}", self.buffer.len());
        RawSelection {
            hit_count,
            buffer: core::mem::take(&mut self.buffer),
        }
    }
}
