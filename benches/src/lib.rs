// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixtures shared by the Breach benchmarks.

use breach_scene::{NodeId, Pass, Payload, RenderNode, Scene, Topology, Vertex};
use breach_selection::Hit;
use glam::Vec3;

/// A scored cell of a [`grid_scene`].
#[derive(Debug)]
pub struct Cell(pub u32);

/// `n` cells numbered from zero.
pub fn cells(n: u32) -> Vec<Cell> {
    (0..n).map(Cell).collect()
}

/// An `n × n` grid of quads covering `[-1, 1]²`, each a selectable leaf named by its cell
/// number under root name 1. Higher cell numbers sit further back.
pub fn grid_scene(cells: &[Cell], n: u32) -> (Scene<'_>, NodeId) {
    let mut scene = Scene::new();
    let root = scene.insert(RenderNode::composite().selectable(1, Payload::EMPTY));
    let step = 2.0 / n as f32;
    for cell in cells {
        let (row, col) = (cell.0 / n, cell.0 % n);
        let (x0, y0) = (-1.0 + col as f32 * step, -1.0 + row as f32 * step);
        let z = -(cell.0 as f32) / cells.len() as f32;
        let quad = [
            Vertex::at(Vec3::new(x0, y0, z)),
            Vertex::at(Vec3::new(x0 + step, y0, z)),
            Vertex::at(Vec3::new(x0 + step, y0 + step, z)),
            Vertex::at(Vec3::new(x0, y0 + step, z)),
        ];
        let draw = move |pass: &mut Pass<'_>| pass.submit(Topology::Quads, Vec3::Z, &quad);
        if scene
            .insert_child(root, RenderNode::leaf(draw).selectable(cell.0, Payload::new(cell)))
            .is_err()
        {
            break;
        }
    }
    (scene, root)
}

/// A select buffer of `count` records with paths of `depth` names, farthest first.
pub fn hit_buffer(count: u32, depth: u32) -> (i32, Vec<u32>) {
    let mut buffer = Vec::new();
    for i in 0..count {
        let d = 1.0 - i as f32 / count as f32;
        Hit {
            depth_min: d,
            depth_max: d,
            names: (0..depth).map(|k| k + i).collect(),
        }
        .encode_into(&mut buffer);
    }
    (i32::try_from(count).unwrap_or(i32::MAX), buffer)
}
