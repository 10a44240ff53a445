//! # Similarity Crate
//!
//! This crate wraps the precomputed content-similarity matrix: a square,
//! symmetric table of pairwise scores over the catalog's row index space,
//! produced by the offline pipeline and treated as an opaque, immutable
//! artifact at runtime.
//!
//! ## Components
//!
//! - **matrix**: The `SimilarityMatrix` with stable neighbor ranking and the
//!   candidate-neighborhood query used by the hybrid scorer
//! - **error**: Artifact loading/validation errors
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::SimilarityMatrix;
//! use std::path::Path;
//!
//! let matrix = SimilarityMatrix::load(Path::new("model/similarity.json"))?;
//!
//! // The 25 most content-similar rows to seed row 42, self excluded
//! let pool = matrix.neighborhood(42, 25);
//! ```

pub mod error;
pub mod matrix;

pub use error::{Result, SimilarityError};
pub use matrix::{Neighbor, SimilarityMatrix};
