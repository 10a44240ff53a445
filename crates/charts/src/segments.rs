//! Segment resolution: carving the catalog into genre/actor/director pools.
//!
//! Genre segments feed the Bayesian chart builder. Actor and director
//! segments are small, so they rank by raw vote count instead; the
//! popularity signal is too weak there for shrinkage to help.
//!
//! All lookups normalize the query the same way the cache normalizes its
//! keys, so "Tom Hanks", "tom hanks" and " TomHanks " resolve to one
//! segment.

use crate::weighted::{Chart, ChartRow};
use catalog::{CatalogStore, Movie, title_case};
use tracing::debug;

/// Normalize a person query: strip all whitespace, lowercase the rest.
pub fn normalize_person(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a genre query into its chart key ("sci-fi" -> "Sci-Fi").
pub fn genre_key(raw: &str) -> String {
    title_case(raw.trim())
}

/// All catalog rows tagged with the genre, in row order.
pub fn genre_segment<'a>(store: &'a CatalogStore, genre: &str) -> Vec<&'a Movie> {
    store.by_genre(genre)
}

/// All catalog rows whose cast contains the queried actor.
///
/// The match is exact under normalization: a cast credit for
/// "Tom Hanks" matches "tomhanks" but not "tom".
pub fn actor_segment<'a>(store: &'a CatalogStore, name: &str) -> Vec<&'a Movie> {
    let wanted = normalize_person(name);
    if wanted.is_empty() {
        return Vec::new();
    }
    let segment = store.rows_matching(|movie| {
        movie.cast.iter().any(|actor| normalize_person(actor) == wanted)
    });
    debug!("Actor segment \"{}\": {} rows", wanted, segment.len());
    segment
}

/// All catalog rows whose crew contains the queried director.
///
/// Looser than the actor lookup: the normalized crew name only needs to
/// *contain* the normalized query, because the crew field is heterogeneous
/// (nested groups, combined credits). A query for "lee" will therefore also
/// match "Spike Lee" and "Ang Lee". That containment semantics is part of
/// the interface.
pub fn director_segment<'a>(store: &'a CatalogStore, name: &str) -> Vec<&'a Movie> {
    let wanted = normalize_person(name);
    if wanted.is_empty() {
        return Vec::new();
    }
    let segment = store.rows_matching(|movie| {
        movie
            .crew_names()
            .any(|member| normalize_person(member).contains(&wanted))
    });
    debug!("Director segment \"{}\": {} rows", wanted, segment.len());
    segment
}

/// Rank a segment by raw vote count, best first, truncated to `limit`.
///
/// Stable: ties keep catalog row order. No weighted rating is computed.
pub fn rank_by_votes(segment: &[&Movie], limit: usize) -> Chart {
    let mut rows: Vec<ChartRow> = segment.iter().map(|m| ChartRow::from_movie(m)).collect();
    rows.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    rows.truncate(limit);
    rows
}
