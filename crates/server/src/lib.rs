//! Server crate for the FlickPick recommendation engine.
//!
//! This crate wires the loaded oracles (catalog, similarity matrix,
//! preference model) into the [`RecommendationEngine`] serving surface, and
//! owns the peripheral pieces: the in-memory review log and the TMDB poster
//! client used by callers to enrich results.

pub mod engine;
pub mod error;
pub mod poster;
pub mod reviews;

pub use engine::{Recommendation, RecommendationEngine, load_artifacts};
pub use error::{EngineError, Result};
pub use poster::TmdbPosterClient;
pub use reviews::{Review, ReviewStore};
