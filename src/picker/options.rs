//! Picker options and presets.

use std::sync::Arc;
use std::time::Duration;

use super::debounce::DEFAULT_DEBOUNCE_MS;
use super::selection::{InsertPolicy, SelectionMode, SelectionValue};
use crate::api::{Identifier, RemoteSite, RestClient};
use crate::endpoint::{EndpointConfig, EndpointResolver};
use crate::source::{PostSource, RecordSource, SiteListSource, SiteSearchSource};

/// Default blog selected by the blog selector.
pub const DEFAULT_BLOG_ID: u64 = 1;

/// User-visible strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Search field label.
    pub search: String,
    /// Heading of the selected-items list.
    pub selected: String,
    /// Shown when a settled search has no results.
    pub no_results: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            search: "Search Posts".to_string(),
            selected: "Currently Selected".to_string(),
            no_results: "No Results Found. Sorry.".to_string(),
        }
    }
}

/// How the result list is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultsDisplay {
    /// Popover under the search field, open while typing.
    #[default]
    Popover,
    /// Always-visible checklist.
    Inline,
}

/// Everything a picker is configured with, apart from its source.
#[derive(Debug, Clone)]
pub struct PickerOptions {
    /// Initial selection; its shape fixes the mode.
    pub seed: SelectionValue,
    /// Endpoint configuration.
    pub endpoint: EndpointConfig,
    /// UI strings.
    pub labels: Labels,
    /// Debounce quiet interval.
    pub debounce: Duration,
    /// Multi-mode insert position.
    pub insert_policy: InsertPolicy,
    /// Result list presentation.
    pub display: ResultsDisplay,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            seed: SelectionValue::default(),
            endpoint: EndpointConfig::default(),
            labels: Labels::default(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            insert_policy: InsertPolicy::default(),
            display: ResultsDisplay::default(),
        }
    }
}

impl PickerOptions {
    #[must_use]
    pub fn with_seed(mut self, seed: SelectionValue) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: EndpointConfig) -> Self {
        self.endpoint = endpoint;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_insert_policy(mut self, policy: InsertPolicy) -> Self {
        self.insert_policy = policy;
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: ResultsDisplay) -> Self {
        self.display = display;
        self
    }
}

/// Ready-made picker flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerPreset {
    /// Post search with a popover and selected chips.
    Posts,
    /// Site checklist filtered from the full network list.
    AssociatedSites,
    /// Single blog chosen by remote search.
    SelectBlog,
}

impl PickerPreset {
    /// Builds default options for this preset around a seed.
    #[must_use]
    pub fn options(self, seed: SelectionValue) -> PickerOptions {
        match self {
            Self::Posts => PickerOptions::default().with_seed(seed),
            Self::AssociatedSites => {
                let search = match seed.mode() {
                    SelectionMode::Multi => "Associated Sites",
                    SelectionMode::Single => "Associated Site",
                };
                PickerOptions::default()
                    .with_seed(seed)
                    .with_display(ResultsDisplay::Inline)
                    .with_labels(Labels {
                        search: search.to_string(),
                        ..Labels::default()
                    })
            }
            Self::SelectBlog => {
                let seed = match seed.into_ids().into_iter().next() {
                    Some(id) => SelectionValue::Single(Some(id)),
                    None => SelectionValue::Single(Some(Identifier::Int(DEFAULT_BLOG_ID))),
                };
                PickerOptions::default().with_seed(seed).with_labels(Labels {
                    search: "Select Blog".to_string(),
                    selected: "Selected Blog".to_string(),
                    ..Labels::default()
                })
            }
        }
    }

    /// Builds the record source for this preset.
    #[must_use]
    pub fn source(
        self,
        client: Arc<dyn RestClient>,
        resolver: Arc<EndpointResolver>,
        preloaded_sites: Option<Vec<RemoteSite>>,
    ) -> Arc<dyn RecordSource> {
        match self {
            Self::Posts => Arc::new(PostSource::new(client, resolver)),
            Self::AssociatedSites => {
                let source = SiteListSource::new(client, resolver);
                match preloaded_sites {
                    Some(sites) => Arc::new(source.with_preloaded(sites)),
                    None => Arc::new(source),
                }
            }
            Self::SelectBlog => Arc::new(SiteSearchSource::new(client, resolver)),
        }
    }
}
