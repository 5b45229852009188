// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Layout and routing benchmarks
//!
//! Run with: cargo bench -p meshscope-layout --bench layout_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use meshscope_core::{aggregate, Graph, LayoutKind, Point, RawRecord, RouterSettings};
use meshscope_layout::{
    compute_positions, EdgeRouter, LayoutEngine, LayoutParams, RepositioningController,
};

/// Mesh of `services` operations, each calling three others
fn mesh(services: usize) -> Graph {
    let mut records = Vec::new();
    for i in 0..services {
        for hop in 1..=3 {
            let j = (i + hop * 7) % services;
            records.push(RawRecord::new(
                format!("svc{}.op{}", i % 10, i),
                format!("svc{}.op{}", j % 10, j),
            ));
        }
    }
    aggregate(&[records])
}

fn bench_layouts(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for size in [50usize, 200, 500].iter() {
        let graph = mesh(*size);
        let params = LayoutParams::default().with_iterations(100);
        group.throughput(Throughput::Elements(*size as u64));

        for kind in LayoutKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.as_str(), size), size, |b, _| {
                b.iter(|| {
                    compute_positions(
                        black_box(kind),
                        black_box(&graph.nodes),
                        black_box(&graph.edges),
                        &params,
                    )
                });
            });
        }
    }

    group.finish();
}

fn bench_routing(c: &mut Criterion) {
    let mut graph = mesh(500);
    LayoutEngine::default().apply(LayoutKind::Grid, &mut graph);
    let router = EdgeRouter::new(RouterSettings::default());

    c.bench_function("route_500", |b| {
        b.iter(|| {
            let mut edges = graph.edges.clone();
            router.route(black_box(&graph.nodes), &mut edges)
        });
    });
}

fn bench_drag(c: &mut Criterion) {
    let mut graph = mesh(500);
    LayoutEngine::default().apply(LayoutKind::Circular, &mut graph);
    let controller = RepositioningController::default();
    let node_id = graph.nodes[0].id.clone();

    c.bench_function("drag_500", |b| {
        let mut step = 0.0;
        b.iter(|| {
            step += 1.0;
            controller
                .drag_to(&mut graph, black_box(&node_id), Point::new(step % 800.0, 300.0))
                .ok()
        });
    });
}

criterion_group!(benches, bench_layouts, bench_routing, bench_drag);
criterion_main!(benches);
