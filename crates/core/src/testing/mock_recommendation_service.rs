//! Mock recommendation service for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};

use crate::recommendations::{
    RecommendationError, RecommendationItem, RecommendationRequest, RecommendationService,
};

/// A canned response for one request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Items(Vec<RecommendationItem>),
    Failure { status: u16, message: String },
}

impl MockResponse {
    pub fn items(items: Vec<RecommendationItem>) -> Self {
        MockResponse::Items(items)
    }

    pub fn failure(status: u16, message: &str) -> Self {
        MockResponse::Failure {
            status,
            message: message.to_string(),
        }
    }
}

/// Mock implementation of the RecommendationService trait.
///
/// Provides controllable behavior for testing:
/// - Default items, or queued responses per request path
/// - Track requests for assertions
/// - Simulate failures
/// - Hold requests in flight until released
///
/// Clones share all state, so a test can keep one handle and give another
/// to the client under test.
#[derive(Debug, Clone, Default)]
pub struct MockRecommendationService {
    /// Returned when no queued response matches.
    default_items: Arc<RwLock<Vec<RecommendationItem>>>,
    /// Queued responses by path (including query string).
    responses: Arc<RwLock<HashMap<String, VecDeque<MockResponse>>>>,
    /// Gates by path. Requests wait for a permit before answering.
    gates: Arc<RwLock<HashMap<String, Arc<Semaphore>>>>,
    /// Recorded requests.
    requests: Arc<RwLock<Vec<RecommendationRequest>>>,
    /// If set, the next request will fail with this error.
    next_error: Arc<RwLock<Option<RecommendationError>>>,
    /// Requests that returned an outcome.
    completed: Arc<AtomicUsize>,
}

impl MockRecommendationService {
    /// Create a new mock answering every request with no items.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Response Configuration
    // =========================================================================

    /// Set the items returned for unqueued requests.
    pub async fn set_items(&self, items: Vec<RecommendationItem>) {
        *self.default_items.write().await = items;
    }

    /// Queue a response for the next request to `path`.
    pub async fn push_response(&self, path: &str, response: MockResponse) {
        self.responses
            .write()
            .await
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    // =========================================================================
    // In-flight Control
    // =========================================================================

    /// Make requests to `path` wait until released.
    pub async fn hold(&self, path: &str) {
        self.gates
            .write()
            .await
            .entry(path.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(0)));
    }

    /// Let the oldest waiting request to `path` answer.
    pub async fn release(&self, path: &str) {
        if let Some(gate) = self.gates.read().await.get(path) {
            gate.add_permits(1);
        }
    }

    /// Stop holding `path` and let every waiting request answer.
    pub async fn open(&self, path: &str) {
        if let Some(gate) = self.gates.write().await.remove(path) {
            gate.close();
        }
    }

    // =========================================================================
    // Request Recording
    // =========================================================================

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecommendationRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of requests received.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Number of requests that have produced an outcome.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next request to fail with the given error.
    pub async fn set_next_error(&self, error: RecommendationError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<RecommendationError> {
        self.next_error.write().await.take()
    }

    async fn next_response(&self, path: &str) -> MockResponse {
        let queued = self
            .responses
            .write()
            .await
            .get_mut(path)
            .and_then(|queue| queue.pop_front());

        match queued {
            Some(response) => response,
            None => MockResponse::Items(self.default_items.read().await.clone()),
        }
    }
}

#[async_trait]
impl RecommendationService for MockRecommendationService {
    async fn fetch(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<RecommendationItem>, RecommendationError> {
        self.requests.write().await.push(request.clone());

        let error = self.take_error().await;
        let response = self.next_response(&request.path).await;

        let gate = self.gates.read().await.get(&request.path).cloned();
        if let Some(gate) = gate {
            // A closed gate means the path was opened.
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.completed.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = error {
            return Err(err);
        }

        match response {
            MockResponse::Items(items) => Ok(items),
            MockResponse::Failure { status, message } => {
                Err(RecommendationError::ApiError { status, message })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::{RequestDescription, RecommendationRequest};
    use crate::testing::fixtures;

    fn popular(k: u32) -> RecommendationRequest {
        RecommendationRequest::from_description(&RequestDescription::popular(k))
    }

    #[tokio::test]
    async fn test_queued_responses_then_default() {
        let mock = MockRecommendationService::new();
        mock.set_items(fixtures::recommendation_items(2)).await;
        mock.push_response(
            "/recommend/popular?k=1",
            MockResponse::failure(404, "nope"),
        )
        .await;

        let first = mock.fetch(&popular(1)).await;
        assert!(matches!(
            first,
            Err(RecommendationError::ApiError { status: 404, .. })
        ));

        let second = mock.fetch(&popular(1)).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(mock.request_count().await, 2);
        assert_eq!(mock.completed_count(), 2);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let mock = MockRecommendationService::new();
        mock.set_next_error(RecommendationError::ParseError("bad".to_string()))
            .await;

        assert!(mock.fetch(&popular(1)).await.is_err());
        assert!(mock.fetch(&popular(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_hold_and_release() {
        let mock = MockRecommendationService::new();
        mock.hold("/recommend/popular?k=3").await;

        let handle = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.fetch(&popular(3)).await })
        };

        tokio::task::yield_now().await;
        assert_eq!(mock.request_count().await, 1);
        assert_eq!(mock.completed_count(), 0);

        mock.release("/recommend/popular?k=3").await;
        assert!(handle.await.unwrap().is_ok());
        assert_eq!(mock.completed_count(), 1);
    }
}
