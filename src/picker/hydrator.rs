//! Selected-item hydration.
//!
//! Fetches display records for the ids in the selection, one request per
//! id, concurrently. Ids that cannot be fetched stay selected but are left
//! out of the displayed list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::api::{Identifier, Record};
use crate::endpoint::EndpointConfig;
use crate::source::RecordSource;

/// Fetches one record per id against `endpoint`, concurrently.
///
/// The output is index-aligned with `ids`; failed fetches are `None`.
pub async fn fetch_all(
    source: Arc<dyn RecordSource>,
    endpoint: String,
    ids: Vec<Identifier>,
    auth_token: Option<String>,
) -> Vec<Option<Record>> {
    let mut tasks = JoinSet::new();
    for (index, id) in ids.iter().enumerate() {
        let fetch = source.fetch_one(&endpoint, id, auth_token.as_deref());
        let id = id.clone();
        tasks.spawn(async move { (index, id, fetch.await) });
    }

    let mut records = vec![None; ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(record))) => records[index] = Some(record),
            Ok((_, id, Err(e))) => warn!("[HYDRATE] Failed to fetch {}: {}", id, e),
            Err(e) => warn!("[HYDRATE] Fetch task failed: {}", e),
        }
    }
    records
}

#[derive(Debug, Default)]
struct HydratedState {
    records: Vec<Record>,
    pending: bool,
}

struct HydratorInner {
    source: Arc<dyn RecordSource>,
    generation: AtomicU64,
    state: Mutex<HydratedState>,
}

impl HydratorInner {
    fn state(&self) -> MutexGuard<'_, HydratedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps the "currently selected" records in sync with the selection.
pub struct Hydrator {
    inner: Arc<HydratorInner>,
    runtime: Handle,
}

impl Hydrator {
    /// Creates a hydrator that spawns its work on `runtime`.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(HydratorInner {
                source,
                generation: AtomicU64::new(0),
                state: Mutex::new(HydratedState::default()),
            }),
            runtime,
        }
    }

    /// Starts hydrating `ids`, superseding any earlier hydration.
    pub fn hydrate(&self, ids: Vec<Identifier>, config: &EndpointConfig) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if ids.is_empty() {
            let mut state = self.inner.state();
            state.records.clear();
            state.pending = false;
            return;
        }

        self.inner.state().pending = true;
        debug!("[HYDRATE] Generation {} for {} ids", generation, ids.len());

        let inner = Arc::clone(&self.inner);
        let config = config.clone();
        self.runtime.spawn(async move {
            let endpoint = inner.source.endpoint(&config).await;
            let token = config.token().map(str::to_string);
            let fetched = fetch_all(Arc::clone(&inner.source), endpoint, ids, token).await;

            let mut state = inner.state();
            if inner.generation.load(Ordering::SeqCst) != generation {
                debug!("[HYDRATE] Discarding stale generation {}", generation);
                return;
            }
            state.records = fetched.into_iter().flatten().collect();
            state.pending = false;
        });
    }

    /// Returns the records to display, in selection order.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.inner.state().records.clone()
    }

    /// Whether a hydration is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.state().pending
    }

    /// Ignores any in-flight hydration.
    pub fn shutdown(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
    }
}
