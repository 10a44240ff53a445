//! Error types for the similarity crate.

use thiserror::Error;

/// Errors that can occur while loading or validating the similarity matrix
#[derive(Error, Debug)]
pub enum SimilarityError {
    /// Artifact file could not be found or opened
    #[error("Failed to open similarity artifact: {path}")]
    ArtifactNotFound { path: String },

    /// I/O error occurred while reading the artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Artifact is not valid JSON for the expected schema
    #[error("Malformed similarity artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Matrix is not square
    #[error("Row {row} has {found} entries, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Matrix is not symmetric within tolerance
    #[error("Matrix is not symmetric at ({a}, {b})")]
    Asymmetric { a: usize, b: usize },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SimilarityError>;
