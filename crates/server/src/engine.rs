//! # Recommendation Engine
//!
//! This module composes the loaded oracles into the serving surface:
//! 1. Resolve the request (seed title, segment query, movie id)
//! 2. Read the catalog / similarity matrix / preference model
//! 3. Rank (hybrid re-rank, weighted-rating chart, or raw vote count)
//! 4. Memoize segment charts through the two-tier cache
//!
//! Everything here is a pure read path over immutable, `Arc`-shared
//! artifacts; the only mutable state is the segment caches (idempotent
//! writes) and the review log (serialized appends).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, instrument, warn};

use catalog::{CatalogStore, MovieId, UserId, load_catalog};
use charts::{Chart, ChartBuilder, ChartRow, DirSnapshotStore, SegmentCache, segments};
use predictor::PreferenceModel;
use similarity::SimilarityMatrix;

use crate::error::{EngineError, Result};
use crate::reviews::ReviewStore;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    /// Predicted rating for hybrid results, similarity score for
    /// similar-movie results
    pub score: f32,
}

/// Load the three model artifacts from a directory, in parallel.
///
/// Any failure here is fatal to the caller: the engine must not serve with
/// a partial oracle set.
pub fn load_artifacts(
    model_dir: &Path,
) -> anyhow::Result<(Arc<CatalogStore>, Arc<SimilarityMatrix>, Arc<PreferenceModel>)> {
    info!("Loading model artifacts from {}", model_dir.display());
    let start = Instant::now();

    let catalog_path = model_dir.join("catalog.json");
    let similarity_path = model_dir.join("similarity.json");
    let factors_path = model_dir.join("factors.json");

    // Three independent reads, two-level join for three-way parallelism
    let ((store, matrix), model) = rayon::join(
        || {
            rayon::join(
                || load_catalog(&catalog_path),
                || SimilarityMatrix::load(&similarity_path),
            )
        },
        || PreferenceModel::load(&factors_path),
    );

    let store = store.context("Failed to load catalog artifact")?;
    let matrix = matrix.context("Failed to load similarity artifact")?;
    let model = model.context("Failed to load preference model artifact")?;

    info!("Artifacts loaded in {:.2?}", start.elapsed());
    Ok((Arc::new(store), Arc::new(matrix), Arc::new(model)))
}

/// Main engine coordinating catalog, similarity and preference oracles
pub struct RecommendationEngine {
    catalog: Arc<CatalogStore>,
    similarity: Arc<SimilarityMatrix>,
    predictor: Arc<PreferenceModel>,
    chart_builder: ChartBuilder,
    genre_charts: SegmentCache,
    actor_charts: SegmentCache,
    director_charts: SegmentCache,
    reviews: ReviewStore,
    /// Content-neighborhood size feeding the hybrid re-rank
    neighborhood_size: usize,
    /// Final hybrid result length
    recommend_limit: usize,
    /// Exposed length of segment charts
    chart_limit: usize,
}

impl RecommendationEngine {
    /// Create an engine over loaded oracles.
    ///
    /// Fails with [`EngineError::Unavailable`] when the catalog and the
    /// similarity matrix disagree about the row index space.
    pub fn new(
        catalog: Arc<CatalogStore>,
        similarity: Arc<SimilarityMatrix>,
        predictor: Arc<PreferenceModel>,
    ) -> Result<Self> {
        if catalog.len() != similarity.dim() {
            return Err(EngineError::Unavailable(format!(
                "catalog has {} rows but similarity matrix is {}x{}",
                catalog.len(),
                similarity.dim(),
                similarity.dim()
            )));
        }

        Ok(Self {
            catalog,
            similarity,
            predictor,
            chart_builder: ChartBuilder::new(),
            genre_charts: SegmentCache::new(),
            actor_charts: SegmentCache::new(),
            director_charts: SegmentCache::new(),
            reviews: ReviewStore::new(),
            neighborhood_size: 25,
            recommend_limit: 10,
            chart_limit: 10,
        })
    }

    /// Attach a durable snapshot directory to the segment caches.
    pub fn with_snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.genre_charts = SegmentCache::with_snapshot(DirSnapshotStore::new(dir.clone(), "genre"));
        self.actor_charts = SegmentCache::with_snapshot(DirSnapshotStore::new(dir.clone(), "actor"));
        self.director_charts =
            SegmentCache::with_snapshot(DirSnapshotStore::new(dir, "director"));
        self
    }

    /// Configure the content-neighborhood size (default: 25)
    pub fn with_neighborhood_size(mut self, size: usize) -> Self {
        self.neighborhood_size = size;
        self
    }

    /// The in-memory review log
    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }

    /// Hybrid recommendation: content neighborhood re-ranked by the user's
    /// predicted ratings.
    ///
    /// An unknown seed title yields an empty list; "not found" semantics
    /// belong to the caller. A candidate the preference model has never seen
    /// degrades to its fallback estimate instead of aborting the batch.
    #[instrument(skip(self))]
    pub fn recommend(&self, user_id: UserId, seed_title: &str) -> Vec<Recommendation> {
        let Some(seed_index) = self.catalog.lookup_by_title(seed_title) else {
            debug!("Seed title \"{}\" not in catalog", seed_title);
            return Vec::new();
        };

        // The pool is deliberately larger than the final result so the
        // personalized re-rank has room to reorder it.
        let pool = self.similarity.neighborhood(seed_index, self.neighborhood_size);
        debug!(
            "Content neighborhood for \"{}\": {} candidates",
            seed_title,
            pool.len()
        );

        let mut scored: Vec<Recommendation> = Vec::with_capacity(pool.len());
        for neighbor in &pool {
            let Some(movie) = self.catalog.row(neighbor.index) else {
                // Should not happen once dimensions are validated; degrade
                // this one candidate and keep the batch alive.
                warn!("Similarity row {} has no catalog row, skipping", neighbor.index);
                continue;
            };
            let score = self.predictor.predict(user_id, movie.movie_id);
            scored.push(Recommendation {
                movie_id: movie.movie_id,
                title: movie.title.clone(),
                score,
            });
        }

        // Stable: equal estimates keep their similarity order
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.recommend_limit);
        scored
    }

    /// Movies most content-similar to the given one, without any
    /// personalization. Scores are raw similarity.
    #[instrument(skip(self))]
    pub fn similar(&self, movie_id: MovieId, limit: usize) -> Result<Vec<Recommendation>> {
        let title = self
            .catalog
            .lookup_by_id(movie_id)
            .ok_or_else(|| EngineError::NotFound {
                kind: "movie id",
                query: movie_id.to_string(),
            })?;

        let index = self
            .catalog
            .lookup_by_title(title)
            .ok_or_else(|| EngineError::NotFound {
                kind: "movie title",
                query: title.to_string(),
            })?;

        let similar = self
            .similarity
            .neighborhood(index, limit)
            .into_iter()
            .filter_map(|neighbor| {
                let movie = self.catalog.row(neighbor.index)?;
                Some(Recommendation {
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    score: neighbor.score,
                })
            })
            .collect();
        Ok(similar)
    }

    /// Most popular catalog rows right now, best first.
    pub fn trending(&self, limit: usize) -> Chart {
        let mut rows: Vec<&catalog::Movie> = self.catalog.rows().iter().collect();
        rows.sort_by(|a, b| {
            b.popularity
                .partial_cmp(&a.popularity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows.truncate(limit);
        rows.into_iter().map(ChartRow::from_movie).collect()
    }

    /// Top movies of a genre by Bayesian weighted rating.
    ///
    /// The full 250-row chart is computed once per genre and cached; callers
    /// see its head. An unknown genre is a valid, empty chart.
    #[instrument(skip(self))]
    pub fn top_by_genre(&self, genre: &str) -> Result<Chart> {
        let key = segments::genre_key(genre);
        if key.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "genre",
                reason: "must not be blank".to_string(),
            });
        }

        let chart = self.genre_charts.get_or_compute(&key, || {
            let segment = segments::genre_segment(&self.catalog, &key);
            info!("Building genre chart \"{}\" over {} rows", key, segment.len());
            Ok::<_, EngineError>(self.chart_builder.build(&segment))
        })?;

        Ok(chart.iter().take(self.chart_limit).cloned().collect())
    }

    /// Most-voted movies featuring an actor.
    ///
    /// A query matching no cast credit at all is `NotFound` (distinct from
    /// an empty chart) and is not cached.
    #[instrument(skip(self))]
    pub fn top_by_actor(&self, name: &str) -> Result<Chart> {
        let key = segments::normalize_person(name);
        if key.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "actor",
                reason: "must not be blank".to_string(),
            });
        }

        let chart = self.actor_charts.get_or_compute(&key, || {
            let segment = segments::actor_segment(&self.catalog, name);
            if segment.is_empty() {
                return Err(EngineError::NotFound {
                    kind: "actor",
                    query: name.trim().to_string(),
                });
            }
            info!("Building actor chart \"{}\" over {} rows", key, segment.len());
            Ok(segments::rank_by_votes(&segment, self.chart_limit))
        })?;

        Ok((*chart).clone())
    }

    /// Most-voted movies by a director, matched loosely against the crew
    /// field (normalized substring containment).
    #[instrument(skip(self))]
    pub fn top_by_director(&self, name: &str) -> Result<Chart> {
        let key = segments::normalize_person(name);
        if key.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "director",
                reason: "must not be blank".to_string(),
            });
        }

        let chart = self.director_charts.get_or_compute(&key, || {
            let segment = segments::director_segment(&self.catalog, name);
            if segment.is_empty() {
                return Err(EngineError::NotFound {
                    kind: "director",
                    query: name.trim().to_string(),
                });
            }
            info!("Building director chart \"{}\" over {} rows", key, segment.len());
            Ok(segments::rank_by_votes(&segment, self.chart_limit))
        })?;

        Ok((*chart).clone())
    }
}
