//! Mock artwork catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};

use crate::artwork::{ArtworkCatalog, ArtworkError, Credential};

/// A recorded poster query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPosterQuery {
    pub title: String,
    pub credential: Credential,
}

/// Mock implementation of the ArtworkCatalog trait.
///
/// Posters are matched by exact title. Unknown titles have no poster.
/// Clones share all state.
#[derive(Debug, Clone, Default)]
pub struct MockArtworkCatalog {
    /// Poster URLs by title.
    posters: Arc<RwLock<HashMap<String, String>>>,
    /// Gates by title. Queries wait for a permit before answering.
    gates: Arc<RwLock<HashMap<String, Arc<Semaphore>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedPosterQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ArtworkError>>>,
    /// Queries that returned an outcome.
    completed: Arc<AtomicUsize>,
}

impl MockArtworkCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a poster URL for a title.
    pub async fn add_poster(&self, title: &str, url: &str) {
        self.posters
            .write()
            .await
            .insert(title.to_string(), url.to_string());
    }

    /// Clear all posters.
    pub async fn clear_posters(&self) {
        self.posters.write().await.clear();
    }

    /// Make queries for `title` wait until released.
    pub async fn hold(&self, title: &str) {
        self.gates
            .write()
            .await
            .entry(title.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(0)));
    }

    /// Let the oldest waiting query for `title` answer.
    pub async fn release(&self, title: &str) {
        if let Some(gate) = self.gates.read().await.get(title) {
            gate.add_permits(1);
        }
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedPosterQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Number of queries that have produced an outcome.
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ArtworkError) {
        *self.next_error.write().await = Some(error);
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ArtworkError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl ArtworkCatalog for MockArtworkCatalog {
    async fn search_poster(
        &self,
        title: &str,
        credential: &Credential,
    ) -> Result<Option<String>, ArtworkError> {
        self.queries.write().await.push(RecordedPosterQuery {
            title: title.to_string(),
            credential: credential.clone(),
        });

        let gate = self.gates.read().await.get(title).cloned();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.completed.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self.posters.read().await.get(title).cloned())
    }
}
