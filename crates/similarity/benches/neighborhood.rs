//! Benchmarks for neighbor ranking
//!
//! Run with: cargo bench --package similarity
//!
//! Builds a synthetic 1000x1000 matrix and benchmarks full ranking and the
//! 25-candidate neighborhood query.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use similarity::SimilarityMatrix;

fn synthetic_matrix(dim: usize) -> SimilarityMatrix {
    // Deterministic symmetric scores in (0, 1], maximal on the diagonal
    let rows: Vec<Vec<f32>> = (0..dim)
        .map(|a| {
            (0..dim)
                .map(|b| {
                    if a == b {
                        1.0
                    } else {
                        let span = (a as f32 - b as f32).abs();
                        1.0 / (1.0 + span)
                    }
                })
                .collect()
        })
        .collect();
    SimilarityMatrix::from_rows(rows).expect("synthetic matrix should validate")
}

fn bench_full_ranking(c: &mut Criterion) {
    let matrix = synthetic_matrix(1000);

    c.bench_function("neighbors_full_ranking", |b| {
        b.iter(|| {
            let ranked = matrix.neighbors(black_box(500));
            black_box(ranked)
        })
    });
}

fn bench_candidate_neighborhood(c: &mut Criterion) {
    let matrix = synthetic_matrix(1000);

    c.bench_function("neighborhood_25", |b| {
        b.iter(|| {
            let pool = matrix.neighborhood(black_box(500), black_box(25));
            black_box(pool)
        })
    });
}

criterion_group!(benches, bench_full_ranking, bench_candidate_neighborhood);
criterion_main!(benches);
