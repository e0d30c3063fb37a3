// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walks the gallery scene with callbacks registered per node kind.
//!
//! Selectable leaves are handled by an exact registration, other leaves by a looser one, and
//! composites report their name path on the way in and out.
//!
//! Run:
//! - `cargo run -p breach_demos --example visitor_dispatch`

use breach_demos::gallery::{Gallery, World};
use breach_demos::logging::{LoggingConfig, init_logging};
use breach_demos::targets::Target;
use breach_demos::walls::Wall;
use breach_scene::NodeRef;
use breach_scene::view::{Composite, Leaf, SelectableComposite, SelectableLeaf};
use breach_visitor::specialized::SpecializedVisitor;

#[derive(Debug, Default)]
struct Census {
    path: Vec<u32>,
    targets: usize,
    walls: usize,
    other: usize,
}

fn main() {
    init_logging(LoggingConfig::default());

    let world = World::new();
    let Ok(gallery) = Gallery::new(&world) else {
        log::error!("cannot assemble the gallery");
        return;
    };

    let mut census = SpecializedVisitor::<NodeRef<'_>, Census>::new(Census::default());
    census
        .add_enter::<SelectableComposite<'_>, _>(|c, node| {
            c.path.extend(node.name());
            println!("enter {:?}", c.path);
            true
        })
        .add_enter::<Composite<'_>, _>(|_, _| true)
        .add_leave::<SelectableComposite<'_>, _>(|c, _| {
            println!("leave {:?}", c.path);
            c.path.pop();
            true
        })
        .add_leaf::<SelectableLeaf<'_>, _>(|c, node| {
            let payload = node.payload();
            if payload.is::<Target>() {
                c.targets += 1;
            } else if payload.is::<Wall>() {
                c.walls += 1;
            } else {
                c.other += 1;
            }
            true
        })
        .add_leaf::<Leaf<'_>, _>(|c, _| {
            c.other += 1;
            true
        });

    for root in gallery.roots() {
        gallery.scene().accept(root, &mut census);
    }
    let census = census.into_state();
    println!(
        "{} targets, {} walls, {} other leaves",
        census.targets, census.walls, census.other
    );
}
