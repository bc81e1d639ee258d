//! Stateful, cancellable recommendation query.
//!
//! The client re-derives its request whenever [`QueryClient::sync`] is called
//! and starts an attempt only when the derived request differs from the last
//! one it started. [`QueryClient::refetch`] always starts a new attempt.
//!
//! Every attempt carries a generation number. An attempt that settles after a
//! newer one was started finds its generation outdated and drops its outcome,
//! so the most recently triggered attempt always determines the final state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::request::RecommendationRequest;
use super::types::{RecommendationItem, RequestDescription};
use super::RecommendationService;

/// Observable state of a query.
///
/// `is_loading` may be true while `data`/`error` still hold the outcome of
/// the previous attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    pub data: Option<Vec<RecommendationItem>>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl QueryState {
    /// True once an attempt has completed with either data or an error.
    pub fn is_settled(&self) -> bool {
        !self.is_loading && (self.data.is_some() || self.error.is_some())
    }
}

/// Recommendation query bound to a [`RecommendationService`].
///
/// Attempts run as spawned tokio tasks, so the client must be driven from
/// within a runtime. Dropping the client disposes it.
pub struct QueryClient {
    service: Arc<dyn RecommendationService>,
    description: RequestDescription,
    last_started: Option<RecommendationRequest>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<QueryState>>,
    in_flight: Option<JoinHandle<()>>,
    disposed: bool,
}

impl QueryClient {
    /// Create an idle client. Nothing is requested until `sync` or `refetch`.
    pub fn new(service: Arc<dyn RecommendationService>, description: RequestDescription) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            service,
            description,
            last_started: None,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            in_flight: None,
            disposed: false,
        }
    }

    /// Create a client and immediately sync it.
    pub fn mount(service: Arc<dyn RecommendationService>, description: RequestDescription) -> Self {
        let mut client = Self::new(service, description);
        client.sync();
        client
    }

    pub fn description(&self) -> &RequestDescription {
        &self.description
    }

    /// Replace the description without starting an attempt.
    pub fn set_description(&mut self, description: RequestDescription) {
        self.description = description;
    }

    /// Replace the description and sync.
    pub fn update(&mut self, description: RequestDescription) -> bool {
        self.set_description(description);
        self.sync()
    }

    /// Start an attempt if enabled and the derived request changed since the
    /// last attempt. Returns whether an attempt was started.
    pub fn sync(&mut self) -> bool {
        if self.disposed || !self.description.enabled {
            return false;
        }

        let request = RecommendationRequest::from_description(&self.description);
        if self.last_started.as_ref() == Some(&request) {
            return false;
        }
        self.start_attempt(request);
        true
    }

    /// Start a new attempt for the current description even if its request
    /// is unchanged, superseding any attempt in flight. No-op when disabled.
    pub fn refetch(&mut self) -> bool {
        if self.disposed || !self.description.enabled {
            return false;
        }

        let request = RecommendationRequest::from_description(&self.description);
        self.start_attempt(request);
        true
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Wait until no attempt is loading and return that state.
    ///
    /// A disposed client never settles again, so this returns its frozen
    /// state immediately.
    pub async fn settled(&self) -> QueryState {
        if self.disposed {
            return self.state();
        }
        let mut rx = self.state.subscribe();
        let state = match rx.wait_for(|s| !s.is_loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }

    /// Tear the client down. Outstanding attempts are aborted and no
    /// further state change happens.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        debug!("Query client disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn start_attempt(&mut self, request: RecommendationRequest) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_started = Some(request.clone());

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        debug!(
            algorithm = %self.description.algorithm,
            path = %request.path,
            generation,
            "Starting recommendation attempt"
        );

        let service = Arc::clone(&self.service);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        // Earlier attempts keep running; their outcome is discarded on arrival.
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = service.fetch(&request).await;

            match &outcome {
                Ok(items) => info!(
                    path = %request.path,
                    generation,
                    items = items.len(),
                    "Recommendation attempt succeeded"
                ),
                Err(e) => warn!(
                    path = %request.path,
                    generation,
                    error = %e,
                    "Recommendation attempt failed"
                ),
            }

            let applied = state.send_if_modified(|s| {
                if current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                match outcome {
                    Ok(items) => {
                        s.data = Some(items);
                        s.error = None;
                    }
                    Err(e) => {
                        s.data = None;
                        s.error = Some(e.to_string());
                    }
                }
                s.is_loading = false;
                true
            });

            if !applied {
                debug!(generation, "Discarded superseded recommendation attempt");
            }
        }));
    }
}

impl Drop for QueryClient {
    fn drop(&mut self) {
        self.dispose();
    }
}
