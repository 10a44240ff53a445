//! The weighted-rating chart builder.
//!
//! ## Algorithm
//! IMDB-style Bayesian shrinkage over an arbitrary catalog segment:
//! 1. `C` = mean vote average over the segment (the prior quality)
//! 2. `m` = 85th-percentile vote count over the segment (minimum-votes bar)
//! 3. Keep rows with `vote_count >= m` and a usable vote average
//! 4. `wr = (v/(v+m))*R + (m/(v+m))*C`
//! 5. Stable sort descending by `wr`, truncate to the cap
//!
//! Low-vote rows are pulled toward the segment mean, so a handful of
//! enthusiastic votes cannot outrank a broadly rated title.

use catalog::{Movie, MovieId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One ranked row of a chart.
///
/// `weighted_rating` is `Some` for Bayesian (genre) charts and `None` for
/// the vote-count-ranked actor/director charts, which skip the formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub movie_id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    pub vote_count: u32,
    pub vote_average: f32,
    pub popularity: f32,
    pub weighted_rating: Option<f64>,
}

impl ChartRow {
    /// Copy the chart-relevant fields out of a catalog row.
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            year: movie.year,
            vote_count: movie.vote_count,
            vote_average: movie.vote_average,
            popularity: movie.popularity,
            weighted_rating: None,
        }
    }
}

/// An immutable ranked chart
pub type Chart = Vec<ChartRow>;

/// Builds weighted-rating charts over catalog segments.
///
/// ## Usage
/// ```ignore
/// let builder = ChartBuilder::new().with_cap(250);
/// let chart = builder.build(&store.by_genre("Drama"));
/// ```
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    percentile: f64,
    cap: usize,
}

impl ChartBuilder {
    /// Create a builder with the standard settings (85th percentile, top 250)
    pub fn new() -> Self {
        Self {
            percentile: 0.85,
            cap: 250,
        }
    }

    /// Configure the vote-count percentile used as the minimum-votes bar
    pub fn with_percentile(mut self, percentile: f64) -> Self {
        self.percentile = percentile;
        self
    }

    /// Configure the maximum chart length
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    /// Build a chart over the given segment.
    ///
    /// Deterministic and idempotent: the same segment always yields a
    /// bit-identical chart. An empty segment short-circuits to an empty
    /// chart before any mean or quantile is taken.
    pub fn build(&self, segment: &[&Movie]) -> Chart {
        if segment.is_empty() {
            return Vec::new();
        }

        // Prior quality over rows with a usable vote average
        let (sum, usable) = segment
            .iter()
            .filter(|m| m.vote_average.is_finite())
            .fold((0.0f64, 0usize), |(sum, n), m| {
                (sum + m.vote_average as f64, n + 1)
            });
        if usable == 0 {
            return Vec::new();
        }
        let c = sum / usable as f64;

        // Minimum-votes bar
        let mut counts: Vec<f64> = segment.iter().map(|m| m.vote_count as f64).collect();
        counts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let m = percentile_linear(&counts, self.percentile);

        debug!(
            "Chart over {} rows: C={:.3}, m={:.1} (p{})",
            segment.len(),
            c,
            m,
            self.percentile
        );

        let mut rows: Vec<ChartRow> = segment
            .par_iter()
            .filter(|movie| (movie.vote_count as f64) >= m && movie.vote_average.is_finite())
            .map(|movie| {
                let v = movie.vote_count as f64;
                let r = movie.vote_average as f64;
                // A segment with no votes at all collapses to the prior
                let wr = if v + m > 0.0 {
                    (v / (v + m)) * r + (m / (v + m)) * c
                } else {
                    c
                };
                ChartRow {
                    weighted_rating: Some(wr),
                    ..ChartRow::from_movie(movie)
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.weighted_rating
                .partial_cmp(&a.weighted_rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows.truncate(self.cap);
        rows
    }
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Linearly interpolated quantile over an ascending-sorted slice.
///
/// Matches the interpolation the offline pipeline's dataframe library uses,
/// so charts computed here agree with charts it may have precomputed.
/// Callers must not pass an empty slice.
fn percentile_linear(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, votes: u32, avg: f32) -> Movie {
        Movie {
            movie_id: id,
            title: title.to_string(),
            vote_count: votes,
            vote_average: avg,
            popularity: 1.0,
            year: Some(2000),
            release_date: None,
            cast: vec![],
            crew: vec![],
            genres: vec!["Drama".to_string()],
        }
    }

    #[test]
    fn test_percentile_linear() {
        assert_eq!(percentile_linear(&[10.0], 0.85), 10.0);
        assert_eq!(percentile_linear(&[10.0, 1000.0], 0.0), 10.0);
        assert_eq!(percentile_linear(&[10.0, 1000.0], 1.0), 1000.0);
        // (n-1)*q = 0.85 -> 10 + 0.85 * 990
        assert!((percentile_linear(&[10.0, 1000.0], 0.85) - 851.5).abs() < 1e-9);
        assert_eq!(percentile_linear(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.5), 3.0);
    }

    #[test]
    fn test_empty_segment_short_circuits() {
        let chart = ChartBuilder::new().build(&[]);
        assert!(chart.is_empty());
    }

    #[test]
    fn test_drama_scenario() {
        // A(votes=1000, avg=8.0) and B(votes=10, avg=9.5): C = 8.75 and the
        // interpolated 85th percentile of {10, 1000} is 851.5, so only A
        // clears the bar and shrinks toward the prior.
        let a = movie(1, "A", 1000, 8.0);
        let b = movie(2, "B", 10, 9.5);
        let chart = ChartBuilder::new().build(&[&a, &b]);

        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].movie_id, 1);
        let wr = chart[0].weighted_rating.unwrap();
        let expected = (1000.0 / 1851.5) * 8.0 + (851.5 / 1851.5) * 8.75;
        assert!((wr - expected).abs() < 1e-12);
        assert!((wr - 8.3449).abs() < 1e-3);
    }

    #[test]
    fn test_idempotent_bit_identical() {
        let movies: Vec<Movie> = (0..40)
            .map(|i| movie(i, &format!("M{i}"), 50 + 13 * i, 5.0 + (i % 5) as f32))
            .collect();
        let segment: Vec<&Movie> = movies.iter().collect();

        let builder = ChartBuilder::new();
        let first = builder.build(&segment);
        let second = builder.build(&segment);
        assert_eq!(first, second);
    }

    #[test]
    fn test_monotonic_in_vote_average() {
        // Same vote counts everywhere: m equals that count, everything is
        // retained, and wr ordering must follow vote_average.
        let movies = vec![
            movie(1, "Low", 100, 5.0),
            movie(2, "Mid", 100, 7.0),
            movie(3, "High", 100, 9.0),
        ];
        let segment: Vec<&Movie> = movies.iter().collect();
        let chart = ChartBuilder::new().build(&segment);

        assert_eq!(chart.len(), 3);
        let ids: Vec<MovieId> = chart.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(chart[0].weighted_rating >= chart[1].weighted_rating);
        assert!(chart[1].weighted_rating >= chart[2].weighted_rating);
    }

    #[test]
    fn test_monotonic_in_vote_count_above_prior() {
        // Both rated above the segment mean; more votes must not hurt.
        let movies = vec![
            movie(1, "Fewer", 200, 8.0),
            movie(2, "More", 2000, 8.0),
            movie(3, "Anchor", 200, 4.0),
        ];
        let segment: Vec<&Movie> = movies.iter().collect();
        // percentile 0 keeps every row so the two 8.0 rows are comparable
        let chart = ChartBuilder::new().with_percentile(0.0).build(&segment);

        let fewer = chart.iter().find(|r| r.movie_id == 1).unwrap();
        let more = chart.iter().find(|r| r.movie_id == 2).unwrap();
        assert!(more.weighted_rating.unwrap() >= fewer.weighted_rating.unwrap());
    }

    #[test]
    fn test_cap_and_tie_stability() {
        // Identical rows tie on wr; stable sort must keep segment order.
        let movies: Vec<Movie> = (0..300).map(|i| movie(i, &format!("M{i}"), 100, 7.0)).collect();
        let segment: Vec<&Movie> = movies.iter().collect();
        let chart = ChartBuilder::new().build(&segment);

        assert_eq!(chart.len(), 250);
        let ids: Vec<MovieId> = chart.iter().map(|r| r.movie_id).collect();
        let expected: Vec<MovieId> = (0..250).collect();
        assert_eq!(ids, expected);
    }
}
