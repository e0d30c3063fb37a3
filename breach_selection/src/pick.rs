// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-test passes.

use alloc::vec::Vec;

use breach_scene::{Backend, NodeId, Pass, RenderMode, Scene};

use crate::decode::{DecodeError, Selection};

/// What a backend reports at the end of a select pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawSelection {
    /// Number of hit records, or a negative value if the buffer overflowed.
    pub hit_count: i32,
    /// The records, in the layout described in [`decode`](crate::decode).
    pub buffer: Vec<u32>,
}

impl RawSelection {
    /// Decodes the records.
    pub fn decode(&self) -> Result<Selection, DecodeError> {
        Selection::decode(self.hit_count, &self.buffer)
    }
}

/// A backend with a hit-testing mode.
pub trait SelectionBackend: Backend {
    /// Switches to hit testing and clears the previous records.
    fn begin_selection(&mut self);

    /// Leaves hit testing and returns the records gathered since [`begin_selection`].
    ///
    /// [`begin_selection`]: SelectionBackend::begin_selection
    fn end_selection(&mut self) -> RawSelection;
}

/// Runs a select pass over each of `roots` in order and decodes the hits, nearest first.
pub fn pick<B: SelectionBackend>(
    scene: &Scene<'_>,
    roots: &[NodeId],
    backend: &mut B,
) -> Result<Selection, DecodeError> {
    backend.begin_selection();
    {
        let mut pass = Pass::new(RenderMode::Select, &mut *backend);
        for &root in roots {
            scene.full_render(root, &mut pass);
        }
    }
    let raw = backend.end_selection();
    let selection = raw.decode()?;
    log::debug!(
        "pick over {} roots: {} hits, nearest {:?}",
        roots.len(),
        selection.len(),
        selection.nearest().map(|h| h.names.as_slice())
    );
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use breach_scene::{MatrixMode, Payload, Primitive, RenderNode};
    use glam::Mat4;

    /// Reports one hit per submission at a fixed depth.
    #[derive(Default)]
    struct Canned {
        selecting: bool,
        depth: u32,
        raw: RawSelection,
    }

    impl Backend for Canned {
        fn push_name(&mut self, _: u32) {}
        fn pop_name(&mut self) {}
        fn push_matrix(&mut self, _: MatrixMode, _: &Mat4) {}
        fn pop_matrix(&mut self, _: MatrixMode) {}

        fn submit(&mut self, _: &Primitive<'_>, names: &[u32]) {
            assert!(self.selecting);
            self.depth -= 1;
            let hit = crate::Hit {
                depth_min: crate::decode::normalize_depth(self.depth),
                depth_max: crate::decode::normalize_depth(self.depth),
                names: names.to_vec(),
            };
            hit.encode_into(&mut self.raw.buffer);
            self.raw.hit_count += 1;
        }
    }

    impl SelectionBackend for Canned {
        fn begin_selection(&mut self) {
            self.selecting = true;
            self.raw = RawSelection::default();
        }

        fn end_selection(&mut self) -> RawSelection {
            self.selecting = false;
            core::mem::take(&mut self.raw)
        }
    }

    fn nop(pass: &mut Pass<'_>) {
        pass.submit(breach_scene::Topology::Triangles, glam::Vec3::Z, &[]);
    }

    #[test]
    fn pick_spans_roots_and_sorts_hits() {
        let mut scene = Scene::new();
        let targets = scene.insert(RenderNode::composite().selectable(1, Payload::EMPTY));
        scene
            .insert_child(targets, RenderNode::leaf(nop).selectable(4, Payload::EMPTY))
            .unwrap();
        let walls = scene.insert(RenderNode::composite().selectable(2, Payload::EMPTY));
        scene
            .insert_child(walls, RenderNode::leaf(nop).selectable(0, Payload::EMPTY))
            .unwrap();

        let mut backend = Canned {
            depth: 100,
            ..Canned::default()
        };
        let selection = pick(&scene, &[targets, walls], &mut backend).unwrap();
        assert!(!backend.selecting);
        // Later submissions are nearer in this backend.
        assert_eq!(selection.nearest().unwrap().names, vec![2, 0]);
        assert_eq!(selection.hits()[1].names, vec![1, 4]);
    }

    #[test]
    fn overflow_is_an_error() {
        let raw = RawSelection {
            hit_count: -1,
            buffer: vec![],
        };
        assert_eq!(raw.decode(), Err(DecodeError::Overflow));
    }
}
