//! Picker controller.
//!
//! Composes the query engine, the selection store and the hydrator:
//! - input text drives the engine
//! - picking a result adds to the selection, removing a chip removes
//! - every selection change re-hydrates and reports through `on_change`
//! - external prop changes replace the selection or reset the engine

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info};

use super::hydrator::Hydrator;
use super::options::{Labels, PickerOptions, ResultsDisplay};
use super::query::{QueryEngine, QueryState};
use super::selection::{ChangeCallback, SelectionMode, SelectionStore, SelectionValue};
use crate::api::{Identifier, Record};
use crate::endpoint::EndpointConfig;
use crate::source::RecordSource;

/// A debounced remote selector.
pub struct PickerController {
    labels: Labels,
    display: ResultsDisplay,
    config: EndpointConfig,
    selection: SelectionStore,
    engine: QueryEngine,
    hydrator: Hydrator,
    /// Set by an explicit dismiss; cleared by the next keystroke.
    popover_dismissed: bool,
}

impl PickerController {
    /// Creates a picker over `source`, spawning network work on `runtime`.
    ///
    /// The seed selection is hydrated right away; sources that browse on
    /// empty input also issue their initial listing.
    #[must_use]
    pub fn new(source: Arc<dyn RecordSource>, options: PickerOptions, runtime: Handle) -> Self {
        let selection = SelectionStore::new(options.seed).with_policy(options.insert_policy);
        let engine = QueryEngine::new(Arc::clone(&source), options.debounce, runtime.clone());
        let hydrator = Hydrator::new(Arc::clone(&source), runtime);

        engine.set_config(options.endpoint.clone());
        engine.set_selected(selection.ids().to_vec());

        let controller = Self {
            labels: options.labels,
            display: options.display,
            config: options.endpoint,
            selection,
            engine,
            hydrator,
            popover_dismissed: false,
        };

        info!(
            "[PICKER] Created {:?} picker with {} selected",
            controller.selection.mode(),
            controller.selection.len()
        );
        controller.rehydrate();
        if source.browses_on_empty() {
            controller.engine.on_input_change(String::new());
        }
        controller
    }

    /// Sets the change callback.
    #[must_use]
    pub fn with_on_change(mut self, callback: ChangeCallback) -> Self {
        self.selection.set_on_change(Some(callback));
        self
    }

    /// Handles a keystroke in the search field.
    pub fn input(&mut self, text: impl Into<String>) {
        self.popover_dismissed = false;
        self.engine.on_input_change(text);
    }

    /// Returns the current input text.
    #[must_use]
    pub fn input_text(&self) -> String {
        self.engine.snapshot().input_text
    }

    /// Adds an id to the selection and closes the popover.
    pub fn pick(&mut self, id: Identifier) {
        self.popover_dismissed = true;
        if self.selection.add(id) {
            self.selection_changed();
        }
    }

    /// Picks the result at `index` of the current result list.
    pub fn pick_result(&mut self, index: usize) -> Option<Record> {
        let record = self.engine.snapshot().results.into_iter().nth(index)?;
        self.pick(record.id.clone());
        Some(record)
    }

    /// Toggles an id (checklist behaviour).
    pub fn toggle(&mut self, id: Identifier) {
        if self.selection.contains(&id) {
            self.remove(&id);
        } else {
            self.popover_dismissed = false;
            if self.selection.add(id) {
                self.selection_changed();
            }
        }
    }

    /// Removes an id (chip removal).
    pub fn remove(&mut self, id: &Identifier) {
        self.selection.remove(id);
        self.selection_changed();
    }

    /// Applies a new selection prop from the embedding application.
    ///
    /// Ignored when it matches the current selection, so a parent echoing
    /// `on_change` back does not loop.
    pub fn sync_selection(&mut self, value: SelectionValue) {
        let ids = value.into_ids();
        if ids.as_slice() == self.selection.ids() {
            return;
        }
        debug!("[PICKER] Selection prop changed to {:?}", ids);
        self.selection.replace(ids);
        self.selection_changed();
    }

    /// Applies a new endpoint configuration.
    ///
    /// Results from the previous endpoint are discarded and the popover
    /// closes; the selection is re-hydrated from the new endpoint.
    pub fn set_endpoint_config(&mut self, config: EndpointConfig) {
        if config == self.config {
            return;
        }
        info!("[PICKER] Endpoint configuration changed");
        self.config = config.clone();
        self.engine.set_config(config);
        self.engine.reset();
        self.popover_dismissed = true;
        self.rehydrate();
        if self.engine.source().browses_on_empty() {
            self.engine.refresh();
        }
    }

    /// Closes the result popover until the next keystroke.
    pub fn dismiss_popover(&mut self) {
        self.popover_dismissed = true;
    }

    /// Whether the result list should be shown.
    #[must_use]
    pub fn is_popover_visible(&self) -> bool {
        match self.display {
            ResultsDisplay::Inline => true,
            ResultsDisplay::Popover => {
                !self.popover_dismissed && !self.engine.snapshot().input_text.is_empty()
            }
        }
    }

    /// Returns a copy of the query state.
    #[must_use]
    pub fn query_state(&self) -> QueryState {
        self.engine.snapshot()
    }

    /// Returns the hydrated records of the selection.
    #[must_use]
    pub fn selected_records(&self) -> Vec<Record> {
        self.hydrator.records()
    }

    /// Whether the selected records are still being fetched.
    #[must_use]
    pub fn is_hydrating(&self) -> bool {
        self.hydrator.is_pending()
    }

    /// Returns the selection store.
    #[must_use]
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    /// Returns the selection in its reported shape.
    #[must_use]
    pub fn value(&self) -> SelectionValue {
        self.selection.value()
    }

    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    #[must_use]
    pub fn display(&self) -> ResultsDisplay {
        self.display
    }

    #[must_use]
    pub fn endpoint_config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Cancels timers and ignores in-flight responses.
    pub fn shutdown(&self) {
        self.engine.shutdown();
        self.hydrator.shutdown();
    }

    fn selection_changed(&mut self) {
        self.engine.set_selected(self.selection.ids().to_vec());
        self.rehydrate();
        let source = self.engine.source();
        let has_query = !self.engine.snapshot().input_text.is_empty();
        if source.uses_selection() && (has_query || source.browses_on_empty()) {
            self.engine.refresh();
        }
    }

    fn rehydrate(&self) {
        self.hydrator.hydrate(self.selection.ids().to_vec(), &self.config);
    }
}

impl Drop for PickerController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
