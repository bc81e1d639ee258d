//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the service traits, allowing
//! query and lookup lifecycles to be tested without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinerec_core::testing::{fixtures, MockRecommendationService};
//!
//! let service = MockRecommendationService::new();
//! service.set_items(vec![fixtures::recommendation_item(1, "Toy Story")]).await;
//!
//! // Hold a path to keep an attempt in flight
//! service.hold("/recommend/popular?k=10").await;
//! ```

mod mock_artwork_catalog;
mod mock_recommendation_service;

pub use mock_artwork_catalog::{MockArtworkCatalog, RecordedPosterQuery};
pub use mock_recommendation_service::{MockRecommendationService, MockResponse};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::recommendations::RecommendationItem;

    /// Create a recommendation item with reasonable defaults.
    pub fn recommendation_item(id: i64, title: &str) -> RecommendationItem {
        RecommendationItem {
            id,
            title: title.to_string(),
            genres: vec!["Drama".to_string()],
            score: 0.5,
            source: "popularity".to_string(),
            reason: format!("Because you might like {}", title),
        }
    }

    /// Create `count` items with ids starting at 1 and decreasing scores.
    pub fn recommendation_items(count: usize) -> Vec<RecommendationItem> {
        (1..=count)
            .map(|i| {
                let mut item = recommendation_item(i as i64, &format!("Movie {}", i));
                item.score = 1.0 - (i as f64 / (count as f64 + 1.0));
                item
            })
            .collect()
    }
}
