//! reqwest-backed recommendation service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::{HttpMethod, RecommendationItem};
use super::{
    RecommendationError, RecommendationRequest, RecommendationService, FALLBACK_ERROR_MESSAGE,
};
use crate::config::RecommenderConfig;

/// HTTP client for the `/recommend/...` endpoints.
pub struct HttpRecommendationClient {
    client: Client,
    base_url: String,
}

impl HttpRecommendationClient {
    pub fn new(config: &RecommenderConfig) -> Result<Self, RecommendationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationClient {
    async fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationItem>, RecommendationError> {
        let url = format!("{}{}", self.base_url, request.path);

        debug!("Recommendation request: {} {}", request.method, url);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .header(CONTENT_TYPE, "application/json");

        let builder = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        };

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                FALLBACK_ERROR_MESSAGE.to_string()
            } else {
                body
            };
            return Err(RecommendationError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: RecommendationsEnvelope = response
            .json()
            .await
            .map_err(|e| RecommendationError::ParseError(e.to_string()))?;

        debug!(
            "Recommendation response: algorithm={:?}, items={}",
            envelope.algorithm,
            envelope.items.len()
        );

        Ok(envelope.items)
    }
}

// ============================================================================
// Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RecommendationsEnvelope {
    #[serde(default)]
    algorithm: Option<String>,
    #[serde(default)]
    items: Vec<RecommendationItem>,
}
