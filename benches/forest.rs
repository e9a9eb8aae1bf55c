//! Forest benchmark: fit + score on synthetic feature matrices.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use spikewatch::config::ForestConfig;
use spikewatch::features::FEATURE_DIM;
use spikewatch::model::IsolationForest;

fn make_matrix(rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, FEATURE_DIM), |(i, j)| ((i * 31 + j * 17) % 97) as f64)
}

fn bench_fit_and_score(c: &mut Criterion) {
    let forest = IsolationForest::new(ForestConfig::default());
    let mut g = c.benchmark_group("forest_fit_score");
    for rows in [64, 256, 1024] {
        let x = make_matrix(rows);
        g.bench_function(format!("rows_{}", rows).as_str(), |b| {
            b.iter(|| {
                let fitted = forest.fit(black_box(x.view())).unwrap();
                black_box(fitted.score_samples(x.view()))
            })
        });
    }
    g.finish();
}

fn bench_score_only(c: &mut Criterion) {
    let x = make_matrix(1024);
    let fitted = IsolationForest::new(ForestConfig::default()).fit(x.view()).unwrap();

    c.bench_function("forest_score_1024", |b| {
        b.iter(|| black_box(fitted.score_samples(black_box(x.view()))))
    });
}

criterion_group!(benches, bench_fit_and_score, bench_score_only);
criterion_main!(benches);
