//! Spectral benchmark: dense vs. Lanczos vs. shifted inverse iteration.

use asgraph_features::config::ExtractionConfig;
use asgraph_features::graph::{barabasi_albert, ScaleClass};
use asgraph_features::matrix::MatrixCache;
use asgraph_features::spectral::SpectralSolver;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_adjacency_spectrum(c: &mut Criterion) {
    let config = ExtractionConfig::default();
    let graph = barabasi_albert(800, 2, 3);
    let matrices = MatrixCache::build(&graph).expect("non-empty graph");

    let mut g = c.benchmark_group("adjacency_spectrum_ba_800");
    g.sample_size(10);
    for scale in [ScaleClass::Small, ScaleClass::Large] {
        let solver = SpectralSolver::new(&matrices, scale, &config);
        g.bench_function(scale.as_str(), |b| b.iter(|| black_box(solver.adjacency_spectrum())));
    }
    g.finish();
}

fn bench_fiedler(c: &mut Criterion) {
    let config = ExtractionConfig::default();
    let graph = barabasi_albert(5_000, 2, 3);
    let matrices = MatrixCache::build(&graph).expect("non-empty graph");
    let solver = SpectralSolver::new(&matrices, ScaleClass::Large, &config);

    let mut g = c.benchmark_group("fiedler");
    g.sample_size(10);
    g.bench_function("shift_invert_ba_5000", |b| b.iter(|| black_box(solver.fiedler_value())));
    g.finish();
}

fn bench_matrix_cache(c: &mut Criterion) {
    let graph = barabasi_albert(20_000, 2, 3);
    c.bench_function("matrix_cache_ba_20000", |b| {
        b.iter(|| black_box(MatrixCache::build(black_box(&graph))))
    });
}

criterion_group!(benches, bench_adjacency_spectrum, bench_fiedler, bench_matrix_cache);
criterion_main!(benches);
