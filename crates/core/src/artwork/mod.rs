//! Best-effort poster artwork lookup.
//!
//! Posters come from the TMDB movie search. A lookup never fails the caller:
//! missing credentials, empty titles and titles without artwork all settle to
//! "no poster", and request failures become an error message in state.

mod credentials;
mod lookup;
mod tmdb;

pub use credentials::{select_credential, Credential, CredentialConfig};
pub use lookup::{EnrichmentState, PosterLookup};
pub use tmdb::TmdbPosterClient;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when looking up artwork.
#[derive(Debug, Error)]
pub enum ArtworkError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("TMDB request failed ({status})")]
    ApiError { status: u16 },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Searches a catalog for a title's poster.
#[async_trait]
pub trait ArtworkCatalog: Send + Sync {
    /// Full poster URL for the best match of `title`, or `None` when the
    /// catalog has no match or the match has no poster.
    async fn search_poster(
        &self,
        title: &str,
        credential: &Credential,
    ) -> Result<Option<String>, ArtworkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = ArtworkError::ApiError { status: 401 };
        assert_eq!(err.to_string(), "TMDB request failed (401)");
    }
}
