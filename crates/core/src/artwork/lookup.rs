//! Per-title poster enrichment with proactive cancellation.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{select_credential, ArtworkCatalog, CredentialConfig};
use crate::cancel::CancellationToken;

/// Observable state of a poster lookup.
///
/// `resource_url == None` with no error is a valid outcome: no artwork, or no
/// credentials to ask for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentState {
    pub resource_url: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Looks up the poster for one display title at a time.
///
/// Changing the title cancels the lookup for the previous one; the cancelled
/// lookup never touches state. Dropping the lookup disposes it.
pub struct PosterLookup {
    catalog: Arc<dyn ArtworkCatalog>,
    credentials: CredentialConfig,
    title: Option<String>,
    state: Arc<watch::Sender<EnrichmentState>>,
    token: Option<CancellationToken>,
    in_flight: Option<JoinHandle<()>>,
    disposed: bool,
}

impl PosterLookup {
    /// Create a lookup with no title.
    pub fn new(catalog: Arc<dyn ArtworkCatalog>, credentials: CredentialConfig) -> Self {
        let (state, _) = watch::channel(EnrichmentState::default());
        Self {
            catalog,
            credentials,
            title: None,
            state: Arc::new(state),
            token: None,
            in_flight: None,
            disposed: false,
        }
    }

    /// Create a lookup and start resolving `title`.
    pub fn mount(
        catalog: Arc<dyn ArtworkCatalog>,
        credentials: CredentialConfig,
        title: Option<String>,
    ) -> Self {
        let mut lookup = Self::new(catalog, credentials);
        lookup.resolve(title);
        lookup
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Switch to a new title. Returns whether a network lookup was started.
    ///
    /// Setting the current title again does nothing.
    pub fn set_title(&mut self, title: Option<String>) -> bool {
        if self.disposed || title == self.title {
            return false;
        }
        self.resolve(title)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> EnrichmentState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<EnrichmentState> {
        self.state.subscribe()
    }

    /// Wait until no lookup is loading and return that state.
    ///
    /// Returns the frozen state immediately once disposed.
    pub async fn settled(&self) -> EnrichmentState {
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

    /// Cancel the outstanding lookup and stop reacting to changes.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.cancel_in_flight();
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        debug!("Poster lookup disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn cancel_in_flight(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    fn resolve(&mut self, title: Option<String>) -> bool {
        self.cancel_in_flight();
        self.title = title;

        let query = self
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);
        let credential = select_credential(&self.credentials);

        let (query, credential) = match (query, credential) {
            (Some(query), Some(credential)) => (query, credential),
            _ => {
                self.state.send_replace(EnrichmentState::default());
                return false;
            }
        };

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let token = CancellationToken::new();
        self.token = Some(token.clone());

        let catalog = Arc::clone(&self.catalog);
        let state = Arc::clone(&self.state);

        self.in_flight = Some(tokio::spawn(async move {
            let outcome = token
                .run_until_cancelled(catalog.search_poster(&query, &credential))
                .await;

            let Some(outcome) = outcome else {
                debug!(title = %query, "Poster lookup cancelled");
                return;
            };

            if let Err(e) = &outcome {
                warn!(title = %query, error = %e, "Poster lookup failed");
            }

            state.send_if_modified(|s| {
                if token.is_cancelled() {
                    return false;
                }
                match outcome {
                    Ok(resource_url) => {
                        s.resource_url = resource_url;
                        s.error = None;
                    }
                    Err(e) => {
                        s.resource_url = None;
                        s.error = Some(e.to_string());
                    }
                }
                s.is_loading = false;
                true
            });
        }));

        true
    }
}

impl Drop for PosterLookup {
    fn drop(&mut self) {
        self.dispose();
    }
}
