//! Poster-image enrichment via the TMDB API.
//!
//! Strictly a caller-side concern: ranking never depends on posters, and
//! every failure mode (network, unknown id, missing poster path) collapses
//! to `None` rather than an error.

use catalog::MovieId;
use serde::Deserialize;
use tracing::{debug, warn};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const API_BASE: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Deserialize)]
struct MovieDetails {
    poster_path: Option<String>,
}

/// Thin client for TMDB movie poster lookups
pub struct TmdbPosterClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl TmdbPosterClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Build a client from the `TMDB_API_KEY` environment variable, if set.
    pub fn from_env() -> Option<Self> {
        std::env::var("TMDB_API_KEY").ok().map(Self::new)
    }

    /// Point the client at a different API host (tests)
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Fetch the poster URL for a movie, or None on any failure.
    pub async fn poster_url(&self, movie_id: MovieId) -> Option<String> {
        let url = format!(
            "{}/movie/{}?api_key={}&language=en-US",
            self.api_base, movie_id, self.api_key
        );

        let details: MovieDetails = match self.http.get(&url).send().await {
            Ok(response) => match response.json().await {
                Ok(details) => details,
                Err(e) => {
                    warn!("Unreadable poster response for movie {}: {}", movie_id, e);
                    return None;
                }
            },
            Err(e) => {
                warn!("Poster lookup failed for movie {}: {}", movie_id, e);
                return None;
            }
        };

        match details.poster_path {
            Some(path) => Some(image_url(&path)),
            None => {
                debug!("Movie {} has no poster", movie_id);
                None
            }
        }
    }
}

/// Turn a TMDB poster path into a full image URL
fn image_url(poster_path: &str) -> String {
    format!("{}/{}", IMAGE_BASE, poster_path.trim_start_matches('/'))
}
