//! Benchmarks for graph construction and queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meshgraph::prelude::*;
use nalgebra::Point3;

/// An `n` x `n` grid as a triangle soup: every triangle has its own three
/// corners, so the builder has to merge them back together.
fn create_grid_soup(n: usize) -> (Vec<Point3<f64>>, Vec<u32>) {
    let mut positions = Vec::with_capacity(n * n * 6);
    let mut indices = Vec::with_capacity(n * n * 6);

    for j in 0..n {
        for i in 0..n {
            let (x, y) = (i as f64, j as f64);
            let corners = [
                Point3::new(x, y, 0.0),
                Point3::new(x + 1.0, y, 0.0),
                Point3::new(x + 1.0, y + 1.0, 0.0),
                Point3::new(x, y, 0.0),
                Point3::new(x + 1.0, y + 1.0, 0.0),
                Point3::new(x, y + 1.0, 0.0),
            ];
            for p in corners {
                indices.push(positions.len() as u32);
                positions.push(p);
            }
        }
    }

    (positions, indices)
}

fn create_grid_graph(n: usize) -> MeshGraph {
    let (positions, indices) = create_grid_soup(n);
    build(&positions, &indices).unwrap()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_grid");

    for n in [10, 30] {
        let (positions, indices) = create_grid_soup(n);
        for (name, dedup) in [
            ("hashed", DedupStrategy::Hashed),
            ("linear", DedupStrategy::LinearScan),
        ] {
            let options = BuildOptions::default().with_dedup(dedup);
            group.bench_with_input(BenchmarkId::new(name, n), &n, |b, _| {
                b.iter(|| build_with_options(&positions, &indices, &options).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let graph = create_grid_graph(50);

    c.bench_function("neighbors_all", |b| {
        b.iter(|| {
            let mut count = 0;
            for v in graph.vertex_ids() {
                count += graph.neighbors(v.into()).len();
            }
            count
        });
    });

    c.bench_function("vertex_normals", |b| {
        b.iter(|| graph.vertex_normals());
    });

    c.bench_function("edge_normals", |b| {
        b.iter(|| graph.edge_normals());
    });

    c.bench_function("triangle_contains_point", |b| {
        let p = Point3::new(10.25, 10.75, 0.0);
        b.iter(|| graph.triangle_ids().filter(|&t| graph.triangle_contains_point(t, black_box(&p))).count());
    });

    c.bench_function("grow_selection_10_rings", |b| {
        let start = [VertexId::new(graph.num_vertices() / 2)];
        b.iter(|| grow_selection_by(&graph, &start, 10));
    });
}

fn bench_records(c: &mut Criterion) {
    let graph = create_grid_graph(30);
    let records = graph.to_records();

    c.bench_function("to_records", |b| {
        b.iter(|| graph.to_records());
    });

    c.bench_function("from_records", |b| {
        b.iter(|| MeshGraph::from_records(&records).unwrap());
    });
}

criterion_group!(benches, bench_construction, bench_queries, bench_records);
criterion_main!(benches);
