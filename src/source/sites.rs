//! Multisite `blogs` collections.
//!
//! Two strategies share the same routes:
//! - [`SiteSearchSource`] asks the server to search, excluding the current
//!   selection.
//! - [`SiteListSource`] fetches the whole network once per query (or uses a
//!   preloaded list) and filters locally, pinning selected sites first.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{
    EndpointFuture, RecordFuture, RecordSource, RecordsFuture, ResourceKind, SearchQuery,
    records_from_array,
};
use crate::api::{ApiRequest, FetchError, Identifier, Record, RemoteSite, RestClient};
use crate::endpoint::{EndpointConfig, EndpointResolver};

/// Unselected matches shown by the local filter.
pub const SITE_LIST_MATCH_LIMIT: usize = 5;

fn site_record(value: &Value) -> Option<Record> {
    RemoteSite::from_json(value).and_then(|site| site.to_record())
}

fn fetch_site(client: &Arc<dyn RestClient>, endpoint: &str, id: &Identifier) -> RecordFuture {
    let url = format!("{}/{}", endpoint.trim_end_matches('/'), id);
    let response = client.get_json(ApiRequest::new(url));

    Box::pin(async move {
        let value = response.await?;
        site_record(&value).ok_or(FetchError::UnexpectedShape("site object"))
    })
}

fn site_endpoint(resolver: &Arc<EndpointResolver>, config: &EndpointConfig) -> EndpointFuture {
    let endpoint = resolver.site_collection(config);
    Box::pin(async move { endpoint })
}

/// Server-side site search.
pub struct SiteSearchSource {
    client: Arc<dyn RestClient>,
    resolver: Arc<EndpointResolver>,
}

impl SiteSearchSource {
    /// Creates a site search source.
    #[must_use]
    pub fn new(client: Arc<dyn RestClient>, resolver: Arc<EndpointResolver>) -> Self {
        Self { client, resolver }
    }

    /// Builds the search request: `per_page`, `search`, `exclude`.
    #[must_use]
    pub fn search_request(endpoint: &str, query: &SearchQuery) -> ApiRequest {
        let mut request = ApiRequest::new(endpoint).with_param("per_page", query.per_page.to_string());
        if !query.text.is_empty() {
            request = request.with_param("search", query.text.clone());
        }
        if !query.selected.is_empty() {
            let exclude = query
                .selected
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            request = request.with_param("exclude", exclude);
        }
        request
    }
}

impl RecordSource for SiteSearchSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Site
    }

    fn uses_selection(&self) -> bool {
        true
    }

    fn endpoint(&self, config: &EndpointConfig) -> EndpointFuture {
        site_endpoint(&self.resolver, config)
    }

    fn search(&self, endpoint: &str, query: &SearchQuery) -> RecordsFuture {
        let response = self.client.get_json(Self::search_request(endpoint, query));

        Box::pin(async move {
            let value = response.await?;
            records_from_array(&value, site_record)
        })
    }

    fn fetch_one(&self, endpoint: &str, id: &Identifier, _auth_token: Option<&str>) -> RecordFuture {
        fetch_site(&self.client, endpoint, id)
    }
}

/// Full site list, filtered locally.
pub struct SiteListSource {
    client: Arc<dyn RestClient>,
    resolver: Arc<EndpointResolver>,
    /// Sites handed over by the embedding application; skips the fetch.
    preloaded: Option<Arc<Vec<RemoteSite>>>,
}

impl SiteListSource {
    /// Creates a source that fetches the list on every query.
    #[must_use]
    pub fn new(client: Arc<dyn RestClient>, resolver: Arc<EndpointResolver>) -> Self {
        Self {
            client,
            resolver,
            preloaded: None,
        }
    }

    /// Uses a preloaded site list instead of fetching.
    #[must_use]
    pub fn with_preloaded(mut self, sites: Vec<RemoteSite>) -> Self {
        self.preloaded = Some(Arc::new(sites));
        self
    }

    /// Selected sites first, then up to [`SITE_LIST_MATCH_LIMIT`] unselected
    /// sites whose label contains the text (case-insensitive).
    #[must_use]
    pub fn filter(sites: &[RemoteSite], query: &SearchQuery) -> Vec<Record> {
        let needle = query.text.to_lowercase();
        let records: Vec<Record> = sites.iter().filter_map(RemoteSite::to_record).collect();

        let selected = records.iter().filter(|r| query.selected.contains(&r.id));
        let matches = records
            .iter()
            .filter(|r| !query.selected.contains(&r.id))
            .filter(|r| r.label.to_lowercase().contains(&needle))
            .take(SITE_LIST_MATCH_LIMIT);

        selected.chain(matches).cloned().collect()
    }
}

impl RecordSource for SiteListSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Site
    }

    fn browses_on_empty(&self) -> bool {
        true
    }

    fn uses_selection(&self) -> bool {
        true
    }

    fn endpoint(&self, config: &EndpointConfig) -> EndpointFuture {
        site_endpoint(&self.resolver, config)
    }

    fn search(&self, endpoint: &str, query: &SearchQuery) -> RecordsFuture {
        let query = query.clone();

        if let Some(sites) = &self.preloaded {
            let sites = Arc::clone(sites);
            return Box::pin(async move { Ok(Self::filter(&sites, &query)) });
        }

        let request = ApiRequest::new(endpoint).with_param("per_page", "0");
        let response = self.client.get_json(request);

        Box::pin(async move {
            let value = response.await?;
            let items = value
                .as_array()
                .ok_or(FetchError::UnexpectedShape("array of sites"))?;
            let sites: Vec<RemoteSite> = items.iter().filter_map(RemoteSite::from_json).collect();
            debug!("[SITES] Filtering {} sites locally", sites.len());
            Ok(Self::filter(&sites, &query))
        })
    }

    fn fetch_one(&self, endpoint: &str, id: &Identifier, _auth_token: Option<&str>) -> RecordFuture {
        let known = self
            .preloaded
            .as_ref()
            .and_then(|sites| sites.iter().find(|s| s.identifier().as_ref() == Some(id)))
            .and_then(RemoteSite::to_record);

        match known {
            Some(record) => Box::pin(async move { Ok(record) }),
            None => fetch_site(&self.client, endpoint, id),
        }
    }
}
