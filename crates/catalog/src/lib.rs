//! # Catalog Crate
//!
//! This crate holds the read-only movie catalog: the metadata table produced
//! by the offline pipeline plus the lookup indices the recommendation engine
//! needs.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, CrewEntry, CatalogStore)
//! - **loader**: Load and validate the JSON catalog artifact
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::load_catalog;
//! use std::path::Path;
//!
//! let store = load_catalog(Path::new("model/catalog.json"))?;
//!
//! let idx = store.lookup_by_title("Toy Story").unwrap();
//! let movie = store.row(idx).unwrap();
//! println!("{} has {} votes", movie.title, movie.vote_count);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod loader;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use loader::load_catalog;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    CatalogStore,
    CrewEntry,
    Movie,
    // Normalization
    title_case,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, title: &str, genres: &[&str]) -> Movie {
        Movie {
            movie_id: id,
            title: title.to_string(),
            vote_count: 10 * id,
            vote_average: 7.0,
            popularity: id as f32,
            year: Some(2000),
            release_date: None,
            cast: vec![],
            crew: vec![],
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_catalog() {
        let store = CatalogStore::from_movies(vec![]);
        assert!(store.is_empty());
        assert!(store.lookup_by_title("anything").is_none());
        assert!(store.by_id(1).is_none());
        assert!(store.by_genre("Drama").is_empty());
    }

    #[test]
    fn test_title_and_id_lookups() {
        let store = CatalogStore::from_movies(vec![
            movie(10, "Heat", &["Crime"]),
            movie(20, "Ronin", &["Action"]),
        ]);

        assert_eq!(store.lookup_by_title("Heat"), Some(0));
        assert_eq!(store.lookup_by_title("Ronin"), Some(1));
        assert_eq!(store.lookup_by_id(20), Some("Ronin"));
        assert_eq!(store.index_of_id(10), Some(0));
        assert!(store.lookup_by_title("Missing").is_none());
    }

    #[test]
    fn test_duplicate_titles_first_seen_wins() {
        let store = CatalogStore::from_movies(vec![
            movie(1, "Solaris", &[]),
            movie(2, "Solaris", &[]),
        ]);

        // The 1972 row was seen first; the remake does not shadow it.
        assert_eq!(store.lookup_by_title("Solaris"), Some(0));
        // Both ids still resolve to their own rows.
        assert_eq!(store.index_of_id(1), Some(0));
        assert_eq!(store.index_of_id(2), Some(1));
    }

    #[test]
    fn test_genre_index_is_case_insensitive() {
        let store = CatalogStore::from_movies(vec![
            movie(1, "A", &["Science Fiction"]),
            movie(2, "B", &["science fiction"]),
            movie(3, "C", &["Drama"]),
        ]);

        let sf = store.by_genre("SCIENCE FICTION");
        assert_eq!(sf.len(), 2);
        assert_eq!(sf[0].movie_id, 1);
        assert_eq!(sf[1].movie_id, 2);
    }

    #[test]
    fn test_rows_matching_preserves_row_order() {
        let store = CatalogStore::from_movies(vec![
            movie(1, "A", &[]),
            movie(2, "B", &[]),
            movie(3, "C", &[]),
        ]);

        let picked = store.rows_matching(|m| m.movie_id != 2);
        let ids: Vec<MovieId> = picked.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("drama"), "Drama");
        assert_eq!(title_case("science fiction"), "Science Fiction");
        assert_eq!(title_case("sci-fi"), "Sci-Fi");
        assert_eq!(title_case("FILM NOIR"), "Film Noir");
    }
}
