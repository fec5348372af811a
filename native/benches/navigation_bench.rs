//! Benchmark for focus navigation graph builds.
//!
//! Run with: cargo bench --package vyengine --bench navigation_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vyengine::{build_graph, NavNode, Point};

fn grid(side: i32) -> Vec<NavNode> {
    (0..side * side)
        .map(|i| NavNode {
            center: Point::new((i % side) * 40 + (i / side % 2) * 7, (i / side) * 30),
            navigatable: i % 11 != 0,
        })
        .collect()
}

fn benchmark_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for side in [4, 16, 32] {
        let nodes = grid(side);
        group.throughput(Throughput::Elements(nodes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(nodes.len()), &nodes, |b, nodes| {
            b.iter(|| black_box(build_graph(black_box(nodes))));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build_graph);
criterion_main!(benches);
