//! TMDB (The Movie Database) poster search client.
//!
//! TMDB accepts either a v4 read access token (bearer header) or a v3 API
//! key (query parameter). Only the first page of the movie search is used.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ArtworkCatalog, ArtworkError, Credential};
use crate::config::ArtworkConfig;

/// TMDB poster client.
pub struct TmdbPosterClient {
    client: Client,
    base_url: String,
    image_base_url: String,
    language: String,
}

impl TmdbPosterClient {
    /// Create a new TMDB client.
    pub fn new(config: &ArtworkConfig) -> Result<Self, ArtworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            language: config.language.clone(),
        })
    }

    /// Join a relative poster path onto the image host.
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.image_base_url, poster_path)
    }

    /// Search for movies by title, returning the first page of results.
    async fn search_movies(
        &self,
        title: &str,
        credential: &Credential,
    ) -> Result<Vec<TmdbMovieResult>, ArtworkError> {
        let url = format!("{}/search/movie", self.base_url);

        debug!("TMDB movie search: query='{}'", title);

        let mut request = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json;charset=utf-8")
            .query(&[
                ("query", title),
                ("include_adult", "false"),
                ("language", self.language.as_str()),
                ("page", "1"),
            ]);

        request = match credential {
            Credential::Bearer(token) => request.bearer_auth(token),
            Credential::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
        };

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtworkError::ApiError {
                status: status.as_u16(),
            });
        }

        let search_result: TmdbSearchResponse = response
            .json()
            .await
            .map_err(|e| ArtworkError::ParseError(format!("movie search: {}", e)))?;

        Ok(search_result.results)
    }
}

#[async_trait]
impl ArtworkCatalog for TmdbPosterClient {
    async fn search_poster(
        &self,
        title: &str,
        credential: &Credential,
    ) -> Result<Option<String>, ArtworkError> {
        let results = self.search_movies(title, credential).await?;

        let poster = first_poster_path(&results).map(|path| self.poster_url(path));

        debug!(
            "TMDB poster for '{}': {} results, poster={}",
            title,
            results.len(),
            poster.is_some()
        );

        Ok(poster)
    }
}

/// Poster path of the first result, if it has a non-empty one.
fn first_poster_path(results: &[TmdbMovieResult]) -> Option<&str> {
    results
        .first()
        .and_then(|movie| movie.poster_path.as_deref())
        .filter(|path| !path.is_empty())
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovieResult>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct TmdbMovieResult {
    id: u32,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}
