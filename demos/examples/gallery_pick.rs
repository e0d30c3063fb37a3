// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shoots down the length of the gallery until the far wall takes a breach.
//!
//! Each shot runs a select pass through the CPU selector, decodes the hits and resolves the
//! nearest one against the targets, then the walls.
//!
//! Run:
//! - `cargo run -p breach_demos --example gallery_pick`
//! - `RUST_LOG=debug cargo run -p breach_demos --example gallery_pick` for pick traces

use breach_demos::gallery::{Camera, Gallery, Shot, World};
use breach_demos::logging::{LoggingConfig, init_logging};
use breach_selection::SoftwareSelector;
use kurbo::{Point, Rect};

fn main() {
    init_logging(LoggingConfig::default());

    let world = World::new();
    let gallery = match Gallery::new(&world) {
        Ok(gallery) => gallery,
        Err(err) => {
            log::error!("cannot assemble the gallery: {err}");
            return;
        }
    };
    let camera = Camera::default();
    let mut selector = SoftwareSelector::new(Rect::new(0.0, 0.0, 800.0, 600.0));

    // Straight ahead until something other than a target is hit, then once to the left.
    let mut breach = 0;
    for _ in 0..6 {
        match gallery.shoot(&camera, &mut selector, breach) {
            Ok(Shot::Target(index)) => println!("target {index} down"),
            Ok(Shot::Breach {
                breach: b,
                wall,
                placement,
            }) => {
                println!(
                    "breach {b} on wall {wall} at {:.3}",
                    placement.shot_point
                );
                breach = (b + 1) % world.breaches.len();
                selector.set_cursor(Point::new(100.0, 300.0));
            }
            Ok(Shot::Blocked(refusal)) => println!("blocked: {refusal:?}"),
            Ok(Shot::Missed) => println!("missed"),
            Err(err) => println!("pick failed: {err}"),
        }
    }

    let standing = world.targets.iter().filter(|t| !t.is_hit()).count();
    println!("{standing} of {} targets standing", world.targets.len());
}
