// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene arena: node storage, structure edits, rendering and traversal entry points.

use alloc::vec::Vec;

use breach_visitor::hierarchy::{HierarchicalVisitor, Visitable};

use crate::backend::Pass;
use crate::node::{Body, RenderNode};
use crate::types::NodeId;
use crate::view::NodeRef;

/// Errors from structural edits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The handle does not refer to a live node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// The parent is a leaf.
    #[error("node {0:?} is not a composite")]
    NotComposite(NodeId),
    /// The child already reaches the parent.
    #[error("adding {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Intended parent.
        parent: NodeId,
        /// Intended child.
        child: NodeId,
    },
}

impl Default for Scene<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Arena of render nodes.
///
/// The scene owns node descriptions; the domain objects they draw and expose as payloads are
/// borrowed for `'a`. Composites list children by [`NodeId`] and do not own them: removing a
/// composite leaves its children in place, and a node may be listed under several composites.
pub struct Scene<'a> {
    nodes: Vec<Option<Slot<'a>>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

struct Slot<'a> {
    generation: u32,
    node: RenderNode<'a>,
}

impl core::fmt::Debug for Scene<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Scene<'a> {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Inserts a detached node and returns its handle.
    pub fn insert(&mut self, node: RenderNode<'a>) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Slot { generation, node });
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Slot { generation, node }));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Inserts `node` and appends it to `parent`'s children.
    ///
    /// Nothing is inserted if `parent` is stale or a leaf.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        node: RenderNode<'a>,
    ) -> Result<NodeId, SceneError> {
        self.composite_children(parent)?;
        let id = self.insert(node);
        self.push_child(parent, id)?;
        Ok(id)
    }

    /// Appends an existing node to `parent`'s children.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.is_alive(child) {
            return Err(SceneError::StaleNode(child));
        }
        self.composite_children(parent)?;
        if self.reaches(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        self.composite_children(parent)?.push(child);
        Ok(())
    }

    /// Removes a node. Its children stay in the scene. Returns `false` if `id` was stale.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        true
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns `true` if no node is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A handle to a live node.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let slot = self.slot(id)?;
        Some(NodeRef {
            scene: self,
            id,
            node: &slot.node,
        })
    }

    /// Child handles of `id` in render order. Empty for leaves and stale handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.node.children()).unwrap_or(&[])
    }

    /// Runs all five phases on `root` and, for composites, on every descendant.
    pub fn full_render(&self, root: NodeId, pass: &mut Pass<'_>) {
        match self.node(root) {
            Some(node) => node.full_render(pass),
            None => log::warn!("full_render on stale root {root:?}"),
        }
    }

    /// Runs `visitor` over the subtree at `root`. Returns `false` for a stale root.
    pub fn accept<'s>(
        &'s self,
        root: NodeId,
        visitor: &mut dyn HierarchicalVisitor<NodeRef<'s>>,
    ) -> bool {
        match self.node(root) {
            Some(node) => node.accept(visitor),
            None => {
                log::warn!("accept on stale root {root:?}");
                false
            }
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<'a>> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|s| s.generation == id.1)
    }

    fn composite_children(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, SceneError> {
        let slot = self
            .nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|s| s.generation == id.1)
            .ok_or(SceneError::StaleNode(id))?;
        match &mut slot.node.body {
            Body::Composite(children) => Ok(children),
            Body::Leaf(_) => Err(SceneError::NotComposite(id)),
        }
    }

    /// Returns `true` if `to` is `from` or a live descendant of it.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut stack = alloc::vec![from];
        let mut seen = Vec::new();
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            stack.extend(self.children(id).iter().copied());
        }
        false
    }
}
