//! Recommendation queries against the MovieLens recommender service.
//!
//! A [`RequestDescription`] (algorithm, ordered parameters, HTTP method,
//! enabled flag) is turned into a [`RecommendationRequest`] and executed by a
//! [`RecommendationService`]. [`QueryClient`] owns the loading/error/data
//! lifecycle around those requests.

mod http;
mod query;
mod request;
mod types;

pub use http::HttpRecommendationClient;
pub use query::{QueryClient, QueryState};
pub use request::RecommendationRequest;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Message used when the service fails without a response body.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch recommendations";

/// Errors that can occur when fetching recommendations.
#[derive(Debug, Error)]
pub enum RecommendationError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Service answered with a non-success status. Displays as the body text.
    #[error("{message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Executes recommendation requests.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Perform one request and return the `items` of the response.
    async fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationItem>, RecommendationError>;
}
