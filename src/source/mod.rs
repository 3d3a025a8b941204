//! Record sources.
//!
//! A [`RecordSource`] is the resource kind a picker is parameterized by: it
//! knows which collection to query, how to phrase a search against it, and
//! how to project the payload into [`Record`]s.
//!
//! - **posts**: `wp/v2`-shaped collections resolved through the
//!   [`EndpointResolver`](crate::endpoint::EndpointResolver)
//! - **sites**: multisite `blogs` routes, either searched remotely or
//!   listed once and filtered locally

pub mod posts;
pub mod sites;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::api::{FetchError, Identifier, Record};
use crate::endpoint::EndpointConfig;

pub use posts::PostSource;
pub use sites::{SiteListSource, SiteSearchSource};

/// Fixed page size for every search.
pub const PER_PAGE: u32 = 20;

/// Boxed future resolving to an endpoint URL.
pub type EndpointFuture = Pin<Box<dyn Future<Output = String> + Send + 'static>>;

/// Boxed future resolving to a result list.
pub type RecordsFuture = Pin<Box<dyn Future<Output = Result<Vec<Record>, FetchError>> + Send + 'static>>;

/// Boxed future resolving to a single record.
pub type RecordFuture = Pin<Box<dyn Future<Output = Result<Record, FetchError>> + Send + 'static>>;

/// Kind of resource a source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Posts, pages, custom post types.
    Post,
    /// Sites of a multisite network.
    Site,
}

/// Parameters of one search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// User input; empty means "browse".
    pub text: String,
    /// Page size.
    pub per_page: u32,
    /// Currently selected ids, for sources that exclude or pin them.
    pub selected: Vec<Identifier>,
    /// Nonce forwarded as `_wpnonce`.
    pub auth_token: Option<String>,
}

impl SearchQuery {
    /// Creates a query with the default page size.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            per_page: PER_PAGE,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_selected(mut self, selected: Vec<Identifier>) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Returns true when the query lists instead of searching.
    #[must_use]
    pub fn is_browse(&self) -> bool {
        self.text.is_empty()
    }
}

/// A searchable remote collection.
///
/// Futures are `'static` so the query engine can drive them from spawned
/// tasks; implementations clone what they need out of `self`.
pub trait RecordSource: Send + Sync {
    /// Returns the resource kind.
    fn kind(&self) -> ResourceKind;

    /// Whether an empty input should still list records.
    fn browses_on_empty(&self) -> bool {
        false
    }

    /// Whether results depend on [`SearchQuery::selected`].
    fn uses_selection(&self) -> bool {
        false
    }

    /// Resolves the collection URL for a configuration.
    fn endpoint(&self, config: &EndpointConfig) -> EndpointFuture;

    /// Runs a search against the collection.
    fn search(&self, endpoint: &str, query: &SearchQuery) -> RecordsFuture;

    /// Fetches one record by id (`{endpoint}/{id}`).
    fn fetch_one(&self, endpoint: &str, id: &Identifier, auth_token: Option<&str>) -> RecordFuture;
}

/// Projects a JSON array through `parse`, skipping items it rejects.
pub(crate) fn records_from_array(
    value: &Value,
    parse: impl Fn(&Value) -> Option<Record>,
) -> Result<Vec<Record>, FetchError> {
    let items = value
        .as_array()
        .ok_or(FetchError::UnexpectedShape("array of records"))?;
    Ok(items.iter().filter_map(parse).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_query_defaults() {
        let query = SearchQuery::new("budget");
        assert_eq!(query.per_page, PER_PAGE);
        assert!(!query.is_browse());
        assert!(SearchQuery::new("").is_browse());
    }

    #[test]
    fn test_records_from_array_skips_rejected() {
        let value = json!([{ "id": 1 }, { "id": 0 }, { "id": 2 }]);
        let records = records_from_array(&value, |v| {
            Identifier::from_json(&v["id"]).map(|id| Record { id, label: "x".into() })
        })
        .unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_records_from_non_array_is_error() {
        let result = records_from_array(&json!({ "code": "rest_no_route" }), |_| None);
        assert_eq!(result, Err(FetchError::UnexpectedShape("array of records")));
    }
}
