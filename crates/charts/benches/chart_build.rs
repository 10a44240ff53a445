//! Benchmarks for chart construction
//!
//! Run with: cargo bench --package charts
//!
//! Builds a synthetic 5000-row segment and benchmarks the Bayesian chart
//! builder and the raw vote-count ranking.

use catalog::Movie;
use charts::{ChartBuilder, segments};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_segment(size: u32) -> Vec<Movie> {
    (0..size)
        .map(|i| Movie {
            movie_id: i,
            title: format!("Movie {i}"),
            vote_count: 10 + (i * 37) % 5000,
            vote_average: 3.0 + ((i * 13) % 70) as f32 / 10.0,
            popularity: (i % 100) as f32,
            year: Some(1950 + (i % 70) as u16),
            release_date: None,
            cast: vec![],
            crew: vec![],
            genres: vec!["Drama".to_string()],
        })
        .collect()
}

fn bench_weighted_chart(c: &mut Criterion) {
    let movies = synthetic_segment(5000);
    let segment: Vec<&Movie> = movies.iter().collect();
    let builder = ChartBuilder::new();

    c.bench_function("weighted_chart_5000", |b| {
        b.iter(|| {
            let chart = builder.build(black_box(&segment));
            black_box(chart)
        })
    });
}

fn bench_vote_ranking(c: &mut Criterion) {
    let movies = synthetic_segment(5000);
    let segment: Vec<&Movie> = movies.iter().collect();

    c.bench_function("rank_by_votes_5000", |b| {
        b.iter(|| {
            let chart = segments::rank_by_votes(black_box(&segment), black_box(10));
            black_box(chart)
        })
    });
}

criterion_group!(benches, bench_weighted_chart, bench_vote_ranking);
criterion_main!(benches);
