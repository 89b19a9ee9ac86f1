//! Criterion benchmarks for element graph mutations.
//! Focus sizes: number of points m in {10, 100, 1000}.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use waymark::geodesic::LatLon;
use waymark::graph::{ElementGraph, LineDraft, LineGeometry, PointDraft, PointId, PolygonDraft};

/// Graph with `m` random points, a line between every consecutive pair and a
/// triangle over every third point.
fn random_graph(m: usize, seed: u64) -> (ElementGraph, Vec<PointId>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = ElementGraph::new();
    let mut ids = Vec::with_capacity(m);
    let mut coords = Vec::with_capacity(m);
    for i in 0..m {
        let at = LatLon::new(rng.gen_range(40.0..50.0), rng.gen_range(0.0..10.0));
        let Ok(p) = g.add_point(PointDraft::new(format!("p{i}"), at)) else {
            continue;
        };
        ids.push(p.id);
        coords.push(at);
    }
    for pair in coords.windows(2) {
        let _ = g.add_line_segment(LineDraft::new("l", pair[0], LineGeometry::coordinate(pair[1])));
    }
    for tri in ids.chunks_exact(3) {
        let _ = g.add_polygon(PolygonDraft::new("t", tri.to_vec()));
    }
    (g, ids)
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    for &m in &[10usize, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("build", m), &m, |b, &m| {
            b.iter(|| random_graph(m, 7))
        });

        group.bench_with_input(BenchmarkId::new("delete_point", m), &m, |b, &m| {
            b.iter_batched(
                || random_graph(m, 8),
                |(mut g, ids)| {
                    if let Some(id) = ids.first() {
                        let _ = g.delete_point(id);
                    }
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("export_load", m), &m, |b, &m| {
            let (g, _) = random_graph(m, 9);
            let snapshot = g.export_layers();
            b.iter_batched(
                || snapshot.clone(),
                |s| ElementGraph::from_snapshot(s, Default::default()),
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph);
criterion_main!(benches);
