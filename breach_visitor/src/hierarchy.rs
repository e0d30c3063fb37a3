// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three-hook traversal protocol.
//!
//! ## Overview
//!
//! A [`HierarchicalVisitor`] observes a tree through three hooks. Each hook returns `true` to
//! continue and `false` to stop or skip:
//!
//! - `visit_enter(composite)` runs before descent. `false` skips the children and the matching
//!   `visit_leave`, and the composite's `accept` returns `false`.
//! - `visit_leaf(leaf)` runs for a leaf. Its result is the leaf's `accept` result.
//! - `visit_leave(composite)` runs after the children. Its result is the composite's `accept`
//!   result.
//!
//! Children are visited in order until one `accept` returns `false`; the remaining siblings are
//! skipped, but `visit_leave` is still called for the composite.
//!
//! The helpers [`walk_composite`] and [`walk_leaf`] implement this contract so that tree types
//! only have to supply their children.

/// Observes a hierarchy through enter/leaf/leave hooks.
///
/// Every hook defaults to `true`, so an implementation only overrides the hooks it cares about.
pub trait HierarchicalVisitor<N: ?Sized> {
    /// Called before descending into a composite. Return `false` to skip its subtree.
    fn visit_enter(&mut self, node: &N) -> bool {
        let _ = node;
        true
    }

    /// Called for a leaf.
    fn visit_leaf(&mut self, node: &N) -> bool {
        let _ = node;
        true
    }

    /// Called after a composite's children.
    fn visit_leave(&mut self, node: &N) -> bool {
        let _ = node;
        true
    }
}

impl<N: ?Sized, V: HierarchicalVisitor<N> + ?Sized> HierarchicalVisitor<N> for &mut V {
    fn visit_enter(&mut self, node: &N) -> bool {
        (**self).visit_enter(node)
    }

    fn visit_leaf(&mut self, node: &N) -> bool {
        (**self).visit_leaf(node)
    }

    fn visit_leave(&mut self, node: &N) -> bool {
        (**self).visit_leave(node)
    }
}

/// A visitor that continues everywhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct PassThrough;

impl<N: ?Sized> HierarchicalVisitor<N> for PassThrough {}

/// Something that can run a [`HierarchicalVisitor`] over itself.
pub trait Visitable<N: ?Sized> {
    /// Runs `visitor` over this node and its descendants.
    ///
    /// Returns `false` if traversal was stopped.
    fn accept(&self, visitor: &mut dyn HierarchicalVisitor<N>) -> bool;
}

/// Visits a leaf.
pub fn walk_leaf<N: ?Sized>(visitor: &mut dyn HierarchicalVisitor<N>, node: &N) -> bool {
    visitor.visit_leaf(node)
}

/// Visits a composite and its children in order.
///
/// `child` is called for each child until it returns `false`.
pub fn walk_composite<N, C, I>(
    visitor: &mut dyn HierarchicalVisitor<N>,
    node: &N,
    children: I,
    mut child: impl FnMut(&mut dyn HierarchicalVisitor<N>, C) -> bool,
) -> bool
where
    N: ?Sized,
    I: IntoIterator<Item = C>,
{
    if !visitor.visit_enter(node) {
        return false;
    }
    for c in children {
        if !child(&mut *visitor, c) {
            break;
        }
    }
    visitor.visit_leave(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    enum Toy {
        Leaf(u32),
        Group(u32, Vec<Toy>),
    }

    impl Toy {
        fn id(&self) -> u32 {
            match self {
                Self::Leaf(id) | Self::Group(id, _) => *id,
            }
        }
    }

    impl Visitable<Toy> for Toy {
        fn accept(&self, visitor: &mut dyn HierarchicalVisitor<Toy>) -> bool {
            match self {
                Self::Leaf(_) => walk_leaf(visitor, self),
                Self::Group(_, children) => {
                    walk_composite(visitor, self, children.iter(), |v, c| c.accept(v))
                }
            }
        }
    }

    #[derive(Default)]
    struct Trace {
        events: Vec<(char, u32)>,
        stop_enter: Option<u32>,
        stop_leaf: Option<u32>,
        leave_result: bool,
    }

    impl HierarchicalVisitor<Toy> for Trace {
        fn visit_enter(&mut self, node: &Toy) -> bool {
            self.events.push(('E', node.id()));
            self.stop_enter != Some(node.id())
        }

        fn visit_leaf(&mut self, node: &Toy) -> bool {
            self.events.push(('L', node.id()));
            self.stop_leaf != Some(node.id())
        }

        fn visit_leave(&mut self, node: &Toy) -> bool {
            self.events.push(('X', node.id()));
            self.leave_result
        }
    }

    fn sample() -> Toy {
        Toy::Group(
            1,
            vec![
                Toy::Leaf(2),
                Toy::Group(3, vec![Toy::Leaf(4)]),
                Toy::Leaf(5),
            ],
        )
    }

    #[test]
    fn full_walk_order() {
        let mut t = Trace {
            leave_result: true,
            ..Default::default()
        };
        assert!(sample().accept(&mut t));
        assert_eq!(
            t.events,
            vec![
                ('E', 1),
                ('L', 2),
                ('E', 3),
                ('L', 4),
                ('X', 3),
                ('L', 5),
                ('X', 1)
            ]
        );
    }

    #[test]
    fn enter_false_skips_subtree_and_leave() {
        let mut t = Trace {
            stop_enter: Some(3),
            leave_result: true,
            ..Default::default()
        };
        // Group 3 returns false, so leaf 5 is skipped but leave(1) still runs.
        assert!(sample().accept(&mut t));
        assert_eq!(t.events, vec![('E', 1), ('L', 2), ('E', 3), ('X', 1)]);
    }

    #[test]
    fn leaf_false_stops_siblings_but_not_leave() {
        let mut t = Trace {
            stop_leaf: Some(2),
            leave_result: false,
            ..Default::default()
        };
        assert!(!sample().accept(&mut t));
        assert_eq!(t.events, vec![('E', 1), ('L', 2), ('X', 1)]);
    }

    #[test]
    fn pass_through_visits_everything() {
        assert!(sample().accept(&mut PassThrough));
    }
}
