//! Core domain types for the movie catalog.
//!
//! The catalog is a read-only table of movie metadata loaded once at startup.
//! Its row order doubles as the index space of the similarity matrix, so a
//! movie is either fully present (catalog row + similarity row) or absent
//! entirely.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user (externally assigned, unbounded)
pub type UserId = u32;

/// Unique identifier for a movie (stable, externally meaningful)
pub type MovieId = u32;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A single crew credit. The source metadata is heterogeneous: most entries
/// are plain names, but some rows carry nested groupings (e.g. a directing
/// team credited together).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrewEntry {
    Name(String),
    Group(Vec<String>),
}

impl CrewEntry {
    /// Iterate the individual names inside this entry.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        match self {
            CrewEntry::Name(name) => std::slice::from_ref(name).iter().map(String::as_str),
            CrewEntry::Group(names) => names.as_slice().iter().map(String::as_str),
        }
    }
}

/// Represents a movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: MovieId,
    /// Title is a secondary lookup key; duplicates exist in real data
    pub title: String,
    #[serde(default)]
    pub vote_count: u32,
    /// Community average rating on a 0-10 scale
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub popularity: f32,
    pub year: Option<u16>,
    pub release_date: Option<String>,
    /// Ordered cast list, lead roles first
    #[serde(default)]
    pub cast: Vec<String>,
    /// Crew credits, possibly nested (directors among them)
    #[serde(default)]
    pub crew: Vec<CrewEntry>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Movie {
    /// Flatten the crew field into individual names.
    pub fn crew_names(&self) -> impl Iterator<Item = &str> {
        self.crew.iter().flat_map(CrewEntry::names)
    }
}

// =============================================================================
// Normalization helpers
// =============================================================================

/// Title-case a genre the way the chart lookup keys expect: every alphabetic
/// run starts uppercase, the rest is lowercased ("science fiction" ->
/// "Science Fiction", "sci-fi" -> "Sci-Fi").
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

// =============================================================================
// CatalogStore - The Read-Only In-Memory Table
// =============================================================================

/// Main catalog structure: the movie table plus lookup indices.
///
/// Row order is significant: row `i` of the catalog corresponds to row `i`
/// of the similarity matrix. All indices are built once by
/// [`CatalogStore::from_movies`] and are immutable afterwards.
///
/// Duplicate titles (and ids) resolve **first-seen wins**; the number of
/// shadowed entries is logged at load time rather than silently dropped.
#[derive(Debug)]
pub struct CatalogStore {
    movies: Vec<Movie>,
    /// Title -> row index into `movies` (and the similarity matrix)
    title_index: HashMap<String, usize>,
    /// External movie id -> row index
    id_index: HashMap<MovieId, usize>,
    /// Title-cased genre -> row indices carrying that genre, in row order
    genre_index: HashMap<String, Vec<usize>>,
}

impl CatalogStore {
    /// Build the catalog and all its indices from rows in similarity-matrix
    /// order. This is the only constructor; the indices never change after.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut title_index = HashMap::with_capacity(movies.len());
        let mut id_index = HashMap::with_capacity(movies.len());
        let mut genre_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut shadowed_titles = 0usize;
        let mut shadowed_ids = 0usize;

        for (row, movie) in movies.iter().enumerate() {
            // First-seen wins on both maps, built from the same pass so the
            // two directions cannot disagree.
            if title_index.contains_key(&movie.title) {
                shadowed_titles += 1;
            } else {
                title_index.insert(movie.title.clone(), row);
            }

            if id_index.contains_key(&movie.movie_id) {
                shadowed_ids += 1;
            } else {
                id_index.insert(movie.movie_id, row);
            }

            for genre in &movie.genres {
                genre_index
                    .entry(title_case(genre))
                    .or_insert_with(Vec::new)
                    .push(row);
            }
        }

        if shadowed_titles > 0 || shadowed_ids > 0 {
            tracing::warn!(
                "Catalog has {} duplicate titles and {} duplicate ids (first-seen wins)",
                shadowed_titles,
                shadowed_ids
            );
        }

        Self {
            movies,
            title_index,
            id_index,
            genre_index,
        }
    }

    /// Number of catalog rows (== similarity matrix dimension)
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All rows in matrix order
    pub fn rows(&self) -> &[Movie] {
        &self.movies
    }

    /// Get a movie by its row index
    pub fn row(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Resolve a title to its similarity-matrix row index
    pub fn lookup_by_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Resolve an external movie id to its canonical title
    pub fn lookup_by_id(&self, movie_id: MovieId) -> Option<&str> {
        self.index_of_id(movie_id)
            .map(|row| self.movies[row].title.as_str())
    }

    /// Resolve an external movie id to its row index
    pub fn index_of_id(&self, movie_id: MovieId) -> Option<usize> {
        self.id_index.get(&movie_id).copied()
    }

    /// Get a movie by its external id
    pub fn by_id(&self, movie_id: MovieId) -> Option<&Movie> {
        self.index_of_id(movie_id).map(|row| &self.movies[row])
    }

    /// All movies tagged with the given genre, in row order. The argument is
    /// title-cased before lookup, so "drama" and "Drama" hit the same key.
    pub fn by_genre(&self, genre: &str) -> Vec<&Movie> {
        self.genre_index
            .get(&title_case(genre))
            .map(|rows| rows.iter().map(|&r| &self.movies[r]).collect())
            .unwrap_or_default()
    }

    /// All movies satisfying a predicate, in row order
    pub fn rows_matching<P>(&self, predicate: P) -> Vec<&Movie>
    where
        P: Fn(&Movie) -> bool,
    {
        self.movies.iter().filter(|m| predicate(m)).collect()
    }
}
