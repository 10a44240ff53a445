//! Personalized rating predictor backed by a pre-trained latent-factor model.
//!
//! The offline pipeline trains a biased matrix-factorization model and ships
//! its parameters as a JSON artifact. This crate loads that artifact and
//! serves point predictions:
//!
//! `est = global_mean + user_bias + item_bias + user_factors · item_factors`
//!
//! clamped to the rating scale. Unknown ids never fail the caller: an
//! unmapped user or movie simply drops its terms from the sum, degrading to
//! the bias-only (ultimately global-mean) estimate. That fallback is the
//! documented behavior the hybrid scorer relies on when a catalog row has no
//! internal id in the trained model.

use catalog::{MovieId, UserId};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Lower bound of the rating scale the model was trained on
pub const RATING_MIN: f32 = 1.0;
/// Upper bound of the rating scale the model was trained on
pub const RATING_MAX: f32 = 5.0;

/// Errors that can occur while loading the preference model artifact
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Failed to open model artifact: {path}")]
    ArtifactNotFound { path: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Parameter tables disagree about their shapes
    #[error("Model shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PredictorError>;

/// Raw on-disk layout of the model artifact.
///
/// Public so tests and fixtures can assemble small models in memory instead
/// of going through a file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub global_mean: f32,
    /// External user id -> row into the user parameter tables
    pub users: HashMap<UserId, usize>,
    /// External movie id -> row into the item parameter tables
    pub items: HashMap<MovieId, usize>,
    pub user_bias: Vec<f32>,
    pub item_bias: Vec<f32>,
    pub user_factors: Vec<Vec<f32>>,
    pub item_factors: Vec<Vec<f32>>,
}

/// The loaded, validated preference model. Immutable after construction and
/// safe for unsynchronized concurrent reads.
#[derive(Debug)]
pub struct PreferenceModel {
    global_mean: f32,
    n_factors: usize,
    users: HashMap<UserId, usize>,
    items: HashMap<MovieId, usize>,
    user_bias: Vec<f32>,
    item_bias: Vec<f32>,
    // Flat row-major parameter tables
    user_factors: Vec<f32>,
    item_factors: Vec<f32>,
}

impl PreferenceModel {
    /// Load the model artifact from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PredictorError::ArtifactNotFound {
                    path: path.display().to_string(),
                }
            } else {
                PredictorError::IoError(e)
            }
        })?;

        let artifact: ModelArtifact = serde_json::from_str(&raw)?;
        let model = Self::from_artifact(artifact)?;
        info!(
            "Loaded preference model from {} ({} users, {} items, {} factors)",
            path.display(),
            model.users.len(),
            model.items.len(),
            model.n_factors
        );
        Ok(model)
    }

    /// Validate shapes and flatten the factor tables.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        let n_users = artifact.users.len();
        let n_items = artifact.items.len();

        if artifact.user_bias.len() != n_users {
            return Err(PredictorError::ShapeMismatch(format!(
                "{} user biases for {} users",
                artifact.user_bias.len(),
                n_users
            )));
        }
        if artifact.item_bias.len() != n_items {
            return Err(PredictorError::ShapeMismatch(format!(
                "{} item biases for {} items",
                artifact.item_bias.len(),
                n_items
            )));
        }
        if artifact.user_factors.len() != n_users || artifact.item_factors.len() != n_items {
            return Err(PredictorError::ShapeMismatch(
                "factor table row counts disagree with the id maps".to_string(),
            ));
        }

        let n_factors = artifact
            .user_factors
            .first()
            .or(artifact.item_factors.first())
            .map(Vec::len)
            .unwrap_or(0);

        for (side, table) in [
            ("user", &artifact.user_factors),
            ("item", &artifact.item_factors),
        ] {
            if let Some(row) = table.iter().position(|r| r.len() != n_factors) {
                return Err(PredictorError::ShapeMismatch(format!(
                    "{side} factor row {row} has {} entries, expected {n_factors}",
                    table[row].len()
                )));
            }
        }

        for (side, index, rows) in [
            ("user", &artifact.users, n_users),
            ("item", &artifact.items, n_items),
        ] {
            if index.values().any(|&row| row >= rows) {
                return Err(PredictorError::ShapeMismatch(format!(
                    "{side} index points past the {rows} parameter rows"
                )));
            }
        }

        Ok(Self {
            global_mean: artifact.global_mean,
            n_factors,
            users: artifact.users,
            items: artifact.items,
            user_bias: artifact.user_bias,
            item_bias: artifact.item_bias,
            user_factors: artifact.user_factors.into_iter().flatten().collect(),
            item_factors: artifact.item_factors.into_iter().flatten().collect(),
        })
    }

    /// Predict the rating `user_id` would give `movie_id`, clamped to the
    /// training scale.
    ///
    /// Never fails: ids the model has not seen drop their terms from the
    /// estimate, so an unknown movie degrades to `global_mean + user_bias`
    /// and a fully unknown pair degrades to the global mean.
    pub fn predict(&self, user_id: UserId, movie_id: MovieId) -> f32 {
        let user_row = self.users.get(&user_id).copied();
        let item_row = self.items.get(&movie_id).copied();

        let mut est = self.global_mean;

        if let Some(u) = user_row {
            est += self.user_bias[u];
        }
        if let Some(i) = item_row {
            est += self.item_bias[i];
        }
        if let (Some(u), Some(i)) = (user_row, item_row) {
            let pu = &self.user_factors[u * self.n_factors..(u + 1) * self.n_factors];
            let qi = &self.item_factors[i * self.n_factors..(i + 1) * self.n_factors];
            est += pu.iter().zip(qi).map(|(a, b)| a * b).sum::<f32>();
        } else {
            debug!(
                "Bias-only estimate for user {} / movie {} (known user: {}, known item: {})",
                user_id,
                movie_id,
                user_row.is_some(),
                item_row.is_some()
            );
        }

        est.clamp(RATING_MIN, RATING_MAX)
    }

    /// Whether the model has parameters for this user
    pub fn knows_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    /// Whether the model has parameters for this movie
    pub fn knows_item(&self, movie_id: MovieId) -> bool {
        self.items.contains_key(&movie_id)
    }

    /// Mean rating over the whole training set
    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }
}
