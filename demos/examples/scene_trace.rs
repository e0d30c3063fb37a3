// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traces the backend calls of one rendered frame.
//!
//! Shows the five render phases at work: configurers bracket their subtree, transformers push
//! and pop matrices, selectable nodes only touch the name stack in select passes.
//!
//! Run:
//! - `cargo run -p breach_demos --example scene_trace`

use breach_demos::gallery::{Camera, Gallery, World};
use breach_demos::logging::{LoggingConfig, init_logging};
use breach_scene::{Command, Pass, RecordingBackend, RenderMode};
use kurbo::Size;

fn main() {
    init_logging(LoggingConfig::default());

    let world = World::new();
    let Ok(gallery) = Gallery::new(&world) else {
        log::error!("cannot assemble the gallery");
        return;
    };
    let [targets, walls, _] = gallery.roots();

    let mut rec = RecordingBackend::new();
    gallery.render(&Camera::default(), Size::new(800.0, 600.0), &mut rec);
    let frame = rec.take();
    println!("render frame: {} commands", frame.len());
    for command in frame.iter().take(16) {
        println!("  {command:?}");
    }

    // A select pass over the walls only: names frame every submission.
    {
        let mut pass = Pass::new(RenderMode::Select, &mut rec);
        gallery.scene().full_render(walls, &mut pass);
    }
    println!("select pass over walls:");
    for command in rec.take() {
        if let Command::Submit { names, .. } = command {
            println!("  submit under {names:?}");
        }
    }

    world.targets[0].set_hit();
    {
        let mut pass = Pass::new(RenderMode::Render, &mut rec);
        gallery.scene().full_render(targets, &mut pass);
    }
    println!(
        "targets after one hit: {} submissions",
        rec.submissions().count()
    );
}
