// Copyright 2025 the Breach Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use breach_benches::{Cell, cells, grid_scene, hit_buffer};
use breach_scene::{Pass, RecordingBackend, RenderMode};
use breach_selection::{Selection, SoftwareSelector, TypedSelectionResolver, pick};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &count in &[16_u32, 256, 4096] {
        let (hits, buffer) = hit_buffer(count, 4);
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_function(format!("records_n{count}"), |b| {
            b.iter(|| black_box(Selection::decode(hits, black_box(&buffer))));
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for &n in &[8_u32, 32, 128] {
        let cells = cells(n * n);
        let (scene, root) = grid_scene(&cells, n);
        // The last cell is the longest walk.
        let path = [1, n * n - 1];
        group.throughput(Throughput::Elements(u64::from(n * n)));
        group.bench_function(format!("typed_last_cell_n{n}"), |b| {
            b.iter(|| {
                black_box(TypedSelectionResolver::<Cell>::new(&path).resolve(&scene, root))
            });
        });
    }
    group.finish();
}

fn bench_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("pick");
    for &n in &[8_u32, 32] {
        let cells = cells(n * n);
        let (scene, root) = grid_scene(&cells, n);
        group.throughput(Throughput::Elements(u64::from(n * n)));
        group.bench_function(format!("software_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut s = SoftwareSelector::new(Rect::new(0.0, 0.0, 256.0, 256.0));
                    s.set_cursor(Point::new(17.0, 203.0));
                    s
                },
                |mut s| black_box(pick(&scene, &[root], &mut s)),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("record_render_n{n}"), |b| {
            b.iter_batched(
                RecordingBackend::new,
                |mut rec| {
                    scene.full_render(root, &mut Pass::new(RenderMode::Render, &mut rec));
                    black_box(rec.commands().len())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_resolve, bench_pick);
criterion_main!(benches);
