//! Post collections (`wp/v2/posts` and friends).

use std::sync::Arc;

use tracing::debug;

use super::{
    EndpointFuture, RecordFuture, RecordSource, RecordsFuture, ResourceKind, SearchQuery,
    records_from_array,
};
use crate::api::{ApiRequest, FetchError, Identifier, RemotePost, RestClient};
use crate::endpoint::{EndpointConfig, EndpointResolver};

/// Searches a post-type collection.
pub struct PostSource {
    client: Arc<dyn RestClient>,
    resolver: Arc<EndpointResolver>,
}

impl PostSource {
    /// Creates a post source.
    #[must_use]
    pub fn new(client: Arc<dyn RestClient>, resolver: Arc<EndpointResolver>) -> Self {
        Self { client, resolver }
    }

    /// Builds the search request for a query.
    #[must_use]
    pub fn search_request(endpoint: &str, query: &SearchQuery) -> ApiRequest {
        let mut request = ApiRequest::new(endpoint);
        request = if query.is_browse() {
            request
                .with_param("per_page", query.per_page.to_string())
                .with_param("orderby", "date")
        } else {
            request
                .with_param("search", query.text.clone())
                .with_param("per_page", query.per_page.to_string())
        };

        match query.auth_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => request.with_param("_wpnonce", token),
            None => request,
        }
    }
}

impl RecordSource for PostSource {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Post
    }

    fn endpoint(&self, config: &EndpointConfig) -> EndpointFuture {
        let resolver = Arc::clone(&self.resolver);
        let config = config.clone();
        Box::pin(async move { resolver.resolve(&config).await })
    }

    fn search(&self, endpoint: &str, query: &SearchQuery) -> RecordsFuture {
        let request = Self::search_request(endpoint, query);
        let response = self.client.get_json(request);

        Box::pin(async move {
            let value = response.await?;
            let records = records_from_array(&value, RemotePost::record_from_json)?;
            debug!("[POSTS] Search returned {} records", records.len());
            Ok(records)
        })
    }

    fn fetch_one(&self, endpoint: &str, id: &Identifier, auth_token: Option<&str>) -> RecordFuture {
        let mut request = ApiRequest::new(format!("{}/{}", endpoint.trim_end_matches('/'), id));
        if let Some(token) = auth_token.filter(|t| !t.is_empty()) {
            request = request.with_param("_wpnonce", token);
        }
        let response = self.client.get_json(request);

        Box::pin(async move {
            let value = response.await?;
            RemotePost::record_from_json(&value).ok_or(FetchError::UnexpectedShape("post object"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://example.com/wp-json/wp/v2/posts";

    #[test]
    fn test_search_request_with_text() {
        let request = PostSource::search_request(ENDPOINT, &SearchQuery::new("budget"));

        assert_eq!(request.url, ENDPOINT);
        assert_eq!(request.param("search"), Some("budget"));
        assert_eq!(request.param("per_page"), Some("20"));
        assert_eq!(request.param("orderby"), None);
        assert_eq!(request.param("_wpnonce"), None);
    }

    #[test]
    fn test_browse_request_orders_by_date() {
        let request = PostSource::search_request(ENDPOINT, &SearchQuery::new(""));

        assert_eq!(request.param("search"), None);
        assert_eq!(request.param("orderby"), Some("date"));
    }

    #[test]
    fn test_token_forwarded_as_nonce() {
        let query = SearchQuery::new("x").with_token(Some("abc123".into()));
        let request = PostSource::search_request(ENDPOINT, &query);

        assert_eq!(request.param("_wpnonce"), Some("abc123"));
    }
}
