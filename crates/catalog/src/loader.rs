//! Catalog artifact loading and validation.
//!
//! The catalog is shipped as a JSON array of movie records produced by the
//! offline pipeline, in similarity-matrix row order. Loading is a single
//! pass: parse, validate every row in parallel, then build the lookup
//! indices.

use crate::error::{CatalogError, Result};
use crate::types::{CatalogStore, Movie};
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// Load the catalog artifact from disk and build the store.
///
/// Steps:
/// 1. Read and parse the JSON artifact
/// 2. Validate every row (parallel)
/// 3. Build title/id/genre indices (first-seen wins on duplicates)
pub fn load_catalog(path: &Path) -> Result<CatalogStore> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CatalogError::ArtifactNotFound {
                path: path.display().to_string(),
            }
        } else {
            CatalogError::IoError(e)
        }
    })?;

    let movies: Vec<Movie> = serde_json::from_str(&raw)?;
    validate(&movies)?;

    info!("Loaded {} catalog rows from {}", movies.len(), path.display());
    Ok(CatalogStore::from_movies(movies))
}

/// Check that every row respects its documented ranges.
///
/// The engine must not serve garbage rankings, so a bad row fails the whole
/// load rather than being skipped.
fn validate(movies: &[Movie]) -> Result<()> {
    let bad = movies.par_iter().find_map_any(|movie| {
        if !movie.vote_average.is_finite()
            || movie.vote_average < 0.0
            || movie.vote_average > 10.0
        {
            return Some(CatalogError::InvalidValue {
                field: "vote_average",
                movie_id: movie.movie_id,
                value: movie.vote_average.to_string(),
            });
        }
        if !movie.popularity.is_finite() {
            return Some(CatalogError::InvalidValue {
                field: "popularity",
                movie_id: movie.movie_id,
                value: movie.popularity.to_string(),
            });
        }
        None
    });

    match bad {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
