//! In-memory review log.
//!
//! Peripheral to the ranking core: reviews live only for the process
//! lifetime. All appends are serialized behind a single mutex so the
//! per-movie id assignment (`id = len + 1`) stays race-free under
//! concurrent access.

use crate::error::{EngineError, Result};
use catalog::MovieId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// A single user review of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// 1-based sequence number, unique within a movie
    pub id: u32,
    /// Star rating, 1 to 5
    pub rating: u8,
    pub text: String,
}

/// Append-only per-movie review lists
#[derive(Debug, Default)]
pub struct ReviewStore {
    inner: Mutex<HashMap<MovieId, Vec<Review>>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a review, assigning the next sequence number for the movie.
    ///
    /// The rating is validated before any state changes; a rejected append
    /// leaves the log untouched.
    pub fn append(&self, movie_id: MovieId, rating: u8, text: &str) -> Result<Review> {
        if !(1..=5).contains(&rating) {
            return Err(EngineError::InvalidInput {
                field: "rating",
                reason: format!("must be an integer between 1 and 5, got {rating}"),
            });
        }

        let mut inner = self.inner.lock().expect("review lock poisoned");
        let entries = inner.entry(movie_id).or_default();
        let review = Review {
            id: entries.len() as u32 + 1,
            rating,
            text: text.trim().to_string(),
        };
        entries.push(review.clone());
        Ok(review)
    }

    /// All reviews for a movie in insertion order, empty if none
    pub fn list(&self, movie_id: MovieId) -> Vec<Review> {
        self.inner
            .lock()
            .expect("review lock poisoned")
            .get(&movie_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_sequential_ids() {
        let store = ReviewStore::new();

        let first = store.append(42, 5, "great").unwrap();
        let second = store.append(42, 4, "ok").unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let listed = store.list(42);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].rating, 5);
        assert_eq!(listed[1].rating, 4);
    }

    #[test]
    fn test_ids_are_per_movie() {
        let store = ReviewStore::new();
        store.append(1, 3, "a").unwrap();
        let other = store.append(2, 3, "b").unwrap();
        assert_eq!(other.id, 1);
    }

    #[test]
    fn test_out_of_range_rating_rejected_without_mutation() {
        let store = ReviewStore::new();

        for bad in [0u8, 6, 255] {
            let err = store.append(7, bad, "nope").unwrap_err();
            assert!(matches!(err, EngineError::InvalidInput { field: "rating", .. }));
        }
        assert!(store.list(7).is_empty());
    }

    #[test]
    fn test_unreviewed_movie_lists_empty() {
        let store = ReviewStore::new();
        assert!(store.list(999).is_empty());
    }

    #[test]
    fn test_text_is_trimmed() {
        let store = ReviewStore::new();
        let review = store.append(1, 4, "  spaced out  ").unwrap();
        assert_eq!(review.text, "spaced out");
    }
}
