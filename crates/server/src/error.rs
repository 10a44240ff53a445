//! Engine-level error taxonomy.
//!
//! Expected absence is a value, not a panic: unknown seed titles come back
//! as empty recommendation lists, and these variants cover the cases a
//! caller must be able to tell apart.

use thiserror::Error;

/// Errors surfaced by the recommendation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// A segment query matched nothing, or an id is absent from the lookup
    /// tables. Distinct from an empty-but-valid chart.
    #[error("No results for {kind} \"{query}\"")]
    NotFound { kind: &'static str, query: String },

    /// Input rejected before any oracle access
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The loaded oracles disagree with each other; the engine refuses to
    /// serve rather than produce garbage rankings.
    #[error("Oracles unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, EngineError>;
