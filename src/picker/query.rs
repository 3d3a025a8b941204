//! Remote query engine.
//!
//! Debounced search-as-you-type against a [`RecordSource`]. Every request
//! that leaves the debounce window takes a sequence number; a settled
//! response is applied only if its number is still the highest issued, so
//! a slow early response can never overwrite a later one.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::debounce::DebounceState;
use crate::api::{Identifier, Record};
use crate::endpoint::EndpointConfig;
use crate::source::{RecordSource, SearchQuery};

/// Phase of the query state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryPhase {
    /// No input, no results.
    #[default]
    Idle,
    /// Waiting for the input to settle.
    Debouncing,
    /// Request in flight.
    Loading,
    /// Latest request answered.
    Settled,
    /// Latest request failed; previous results kept.
    Error,
}

/// Observable query state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    /// Current input text.
    pub input_text: String,
    /// Results of the latest settled request.
    pub results: Vec<Record>,
    /// State machine phase.
    pub phase: QueryPhase,
    /// Sequence number of the latest issued request.
    pub last_request: u64,
}

impl QueryState {
    /// Whether a spinner should be shown.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, QueryPhase::Debouncing | QueryPhase::Loading)
    }
}

/// Inputs the engine needs besides the text, owned by the controller.
#[derive(Debug, Clone, Default)]
struct SearchContext {
    config: EndpointConfig,
    selected: Vec<Identifier>,
}

struct EngineInner {
    source: Arc<dyn RecordSource>,
    debounce: DebounceState,
    /// Highest issued request sequence number.
    issued: AtomicU64,
    state: Mutex<QueryState>,
    context: Mutex<SearchContext>,
    closed: AtomicBool,
}

impl EngineInner {
    fn state(&self) -> MutexGuard<'_, QueryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn context(&self) -> SearchContext {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Invalidates every request issued so far.
    fn invalidate(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Issues the next sequence number if `debounce_id` is still current.
    ///
    /// Keystrokes and resets supersede the debounce generation before
    /// taking the state lock.
    fn issue(&self, debounce_id: u64) -> Option<u64> {
        let mut state = self.state();
        if self.closed.load(Ordering::SeqCst) || !self.debounce.is_valid(debounce_id) {
            return None;
        }
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        state.phase = QueryPhase::Loading;
        state.last_request = seq;
        Some(seq)
    }

    async fn run_search(self: Arc<Self>, text: String, debounce_id: u64) {
        let Some(seq) = self.issue(debounce_id) else {
            debug!("[QUERY] Superseded before sending {:?}", text);
            return;
        };
        let context = self.context();
        debug!("[QUERY] Request #{} for {:?}", seq, text);

        let endpoint = self.source.endpoint(&context.config).await;
        let query = SearchQuery::new(text)
            .with_selected(context.selected)
            .with_token(context.config.token().map(str::to_string));
        let outcome = self.source.search(&endpoint, &query).await;

        let mut state = self.state();
        if self.closed.load(Ordering::SeqCst) || self.issued.load(Ordering::SeqCst) != seq {
            debug!("[QUERY] Discarding stale response #{}", seq);
            return;
        }

        // A keystroke may have started a new debounce window meanwhile; the
        // results still apply but the phase stays Debouncing.
        let debouncing = state.phase == QueryPhase::Debouncing;
        match outcome {
            Ok(records) => {
                debug!("[QUERY] Request #{} settled with {} results", seq, records.len());
                state.results = records;
                if !debouncing {
                    state.phase = QueryPhase::Settled;
                }
            }
            Err(e) => {
                warn!("[QUERY] Search against {} failed: {}", endpoint, e);
                if !debouncing {
                    state.phase = QueryPhase::Error;
                }
            }
        }
    }
}

/// Debounced search engine.
pub struct QueryEngine {
    inner: Arc<EngineInner>,
    runtime: Handle,
}

impl QueryEngine {
    /// Creates an engine that spawns its work on `runtime`.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, delay: Duration, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                source,
                debounce: DebounceState::new(delay),
                issued: AtomicU64::new(0),
                state: Mutex::new(QueryState::default()),
                context: Mutex::new(SearchContext::default()),
                closed: AtomicBool::new(false),
            }),
            runtime,
        }
    }

    /// Handles a change of the input text.
    pub fn on_input_change(&self, text: impl Into<String>) {
        if self.inner.closed.load(Ordering::SeqCst) {
            return;
        }

        let text = text.into();
        let debounce_id = self.inner.debounce.trigger();

        {
            let mut state = self.inner.state();
            state.input_text.clone_from(&text);

            if text.is_empty() && !self.inner.source.browses_on_empty() {
                self.inner.invalidate();
                state.results.clear();
                state.phase = QueryPhase::Idle;
                debug!("[QUERY] Input cleared");
                return;
            }
            state.phase = QueryPhase::Debouncing;
        }

        let inner = Arc::clone(&self.inner);
        self.runtime.spawn(async move {
            if inner.debounce.wait(debounce_id).await.is_none() {
                return;
            }
            inner.run_search(text, debounce_id).await;
        });
    }

    /// Re-runs the current input (after the selection or config changed).
    pub fn refresh(&self) {
        let text = self.inner.state().input_text.clone();
        self.on_input_change(text);
    }

    /// Clears results and invalidates pending and in-flight requests.
    ///
    /// The input text is kept so the user still sees what they typed.
    pub fn reset(&self) {
        self.inner.debounce.cancel();
        let mut state = self.inner.state();
        let seq = self.inner.invalidate();
        state.results.clear();
        state.phase = QueryPhase::Idle;
        state.last_request = seq;
        debug!("[QUERY] Reset");
    }

    /// Sets the endpoint configuration used by the next request.
    pub fn set_config(&self, config: EndpointConfig) {
        self.inner
            .context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .config = config;
    }

    /// Sets the selection passed to sources that exclude or pin it.
    pub fn set_selected(&self, selected: Vec<Identifier>) {
        self.inner
            .context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .selected = selected;
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> QueryState {
        self.inner.state().clone()
    }

    /// Returns the source this engine queries.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.inner.source
    }

    /// Cancels the debounce timer and ignores any in-flight response.
    pub fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.debounce.cancel();
        self.inner.invalidate();
        debug!("[QUERY] Engine shut down");
    }
}

impl Drop for QueryEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
