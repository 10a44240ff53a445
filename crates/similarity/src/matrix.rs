//! The precomputed content-similarity matrix.
//!
//! ## Algorithm
//! The offline pipeline emits a square, symmetric matrix of pairwise
//! content-similarity scores over the catalog's row index space. At runtime
//! the matrix is immutable; this module only ranks rows:
//! 1. Enumerate a row as (index, score) pairs
//! 2. Stable-sort descending by score (ties keep ascending index order)
//! 3. The maximal self entry lands at rank 0 and is skipped when building a
//!    candidate neighborhood

use crate::error::{Result, SimilarityError};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Symmetry tolerance for artifact validation
const SYMMETRY_EPS: f32 = 1e-4;

/// One ranked neighbor of a seed row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row index into the catalog / matrix
    pub index: usize,
    /// Content-similarity score against the seed row
    pub score: f32,
}

/// Square symmetric matrix of pairwise content-similarity scores.
///
/// Stored row-major in a single flat buffer. Safe for unsynchronized
/// concurrent reads; nothing mutates it after load.
#[derive(Debug)]
pub struct SimilarityMatrix {
    dim: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from nested rows, validating shape and symmetry.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(SimilarityError::NotSquare {
                    row: i,
                    expected: dim,
                    found: row.len(),
                });
            }
        }

        let scores: Vec<f32> = rows.into_iter().flatten().collect();
        let matrix = Self { dim, scores };
        matrix.validate_symmetry()?;
        Ok(matrix)
    }

    /// Load the similarity artifact (JSON array of rows) from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SimilarityError::ArtifactNotFound {
                    path: path.display().to_string(),
                }
            } else {
                SimilarityError::IoError(e)
            }
        })?;

        let rows: Vec<Vec<f32>> = serde_json::from_str(&raw)?;
        let matrix = Self::from_rows(rows)?;
        info!(
            "Loaded {}x{} similarity matrix from {}",
            matrix.dim,
            matrix.dim,
            path.display()
        );
        Ok(matrix)
    }

    /// Check symmetry within tolerance, in parallel over rows.
    fn validate_symmetry(&self) -> Result<()> {
        let bad = (0..self.dim).into_par_iter().find_map_any(|a| {
            for b in (a + 1)..self.dim {
                let forward = self.scores[a * self.dim + b];
                let backward = self.scores[b * self.dim + a];
                if (forward - backward).abs() > SYMMETRY_EPS {
                    return Some(SimilarityError::Asymmetric { a, b });
                }
            }
            None
        });

        match bad {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Matrix dimension (== catalog row count)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Pairwise score between two rows
    pub fn score(&self, a: usize, b: usize) -> Option<f32> {
        if a < self.dim && b < self.dim {
            Some(self.scores[a * self.dim + b])
        } else {
            None
        }
    }

    /// Full similarity row for a seed index
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index < self.dim {
            Some(&self.scores[index * self.dim..(index + 1) * self.dim])
        } else {
            None
        }
    }

    /// Rank every row against the seed, best first.
    ///
    /// The self entry is included (at rank 0, since self-similarity is
    /// maximal). The sort is stable: equal scores keep ascending index
    /// order, so rankings are deterministic.
    pub fn neighbors(&self, index: usize) -> Vec<Neighbor> {
        let Some(row) = self.row(index) else {
            return Vec::new();
        };

        let mut ranked: Vec<Neighbor> = row
            .iter()
            .enumerate()
            .map(|(i, &score)| Neighbor { index: i, score })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("Ranked {} neighbors for row {}", ranked.len(), index);
        ranked
    }

    /// The content neighborhood of a seed: the top `pool` rows after
    /// skipping the rank-0 self entry. Returns fewer when the matrix is
    /// small, and nothing for an out-of-range seed.
    pub fn neighborhood(&self, index: usize, pool: usize) -> Vec<Neighbor> {
        let ranked = self.neighbors(index);
        ranked.into_iter().skip(1).take(pool).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_3x3() -> SimilarityMatrix {
        SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.2],
            vec![0.8, 1.0, 0.5],
            vec![0.2, 0.5, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_non_square() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]).unwrap_err();
        assert!(matches!(err, SimilarityError::NotSquare { row: 1, .. }));
    }

    #[test]
    fn test_rejects_asymmetric() {
        let err = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.9],
            vec![0.1, 1.0],
        ])
        .unwrap_err();
        assert!(matches!(err, SimilarityError::Asymmetric { a: 0, b: 1 }));
    }

    #[test]
    fn test_neighbors_self_at_rank_zero() {
        let matrix = matrix_3x3();
        let ranked = matrix.neighbors(0);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].index, 0);
        assert_eq!(ranked[1].index, 1);
        assert_eq!(ranked[2].index, 2);
    }

    #[test]
    fn test_neighborhood_skips_self() {
        let matrix = matrix_3x3();
        let pool = matrix.neighborhood(1, 25);

        // Only two other rows exist; the seed itself is excluded.
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|n| n.index != 1));
        assert_eq!(pool[0].index, 0); // 0.8 beats 0.5
        assert_eq!(pool[1].index, 2);
    }

    #[test]
    fn test_neighborhood_ties_keep_index_order() {
        let matrix = SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.5, 0.5],
            vec![0.5, 1.0, 0.5, 0.5],
            vec![0.5, 0.5, 1.0, 0.5],
            vec![0.5, 0.5, 0.5, 1.0],
        ])
        .unwrap();

        let pool = matrix.neighborhood(0, 3);
        let indices: Vec<usize> = pool.iter().map(|n| n.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_seed_is_empty() {
        let matrix = matrix_3x3();
        assert!(matrix.neighbors(99).is_empty());
        assert!(matrix.neighborhood(99, 10).is_empty());
    }
}
