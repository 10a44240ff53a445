//! Error types for the catalog crate.

use thiserror::Error;

/// Errors that can occur while loading and validating the catalog artifact
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Artifact file could not be found or opened
    #[error("Failed to open catalog artifact: {path}")]
    ArtifactNotFound { path: String },

    /// I/O error occurred while reading the artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Artifact is not valid JSON for the expected schema
    #[error("Malformed catalog artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A row carried a value outside its documented range
    #[error("Invalid value for {field} on movie {movie_id}: {value}")]
    InvalidValue {
        field: &'static str,
        movie_id: u32,
        value: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
