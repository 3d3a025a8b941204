//! REST access layer.
//!
//! Everything that talks to a `wp-json` API goes through the [`RestClient`]
//! trait so pickers can be driven by the real HTTP client or by an
//! in-memory fake in tests.
//!
//! # Architecture
//!
//! - **types**: wire types (`RemotePost`, `RemoteSite`) and the display
//!   projection (`Record`, `Identifier`)
//! - **http**: reqwest-backed `HttpRestClient`
//! - **html**: HTML entity decoding for rendered titles and site names

pub mod html;
pub mod http;
pub mod types;

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use thiserror::Error;

pub use html::decode_entities;
pub use http::HttpRestClient;
pub use types::{Identifier, Record, RemotePost, RemoteSite, UNTITLED};

/// Errors produced while fetching from the REST API.
///
/// None of these are fatal to a picker: callers log them and keep their
/// previous state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network unreachable, connection reset, timeout.
    #[error("Network error: {0}")]
    Transport(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Body was not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    Decode(String),

    /// JSON was valid but not the expected shape.
    #[error("Unexpected payload: expected {0}")]
    UnexpectedShape(&'static str),
}

/// A `GET` request against the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a request for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        assert!(!url.is_empty(), "request URL must not be empty");

        Self {
            url,
            query: Vec::new(),
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns the value of a query parameter, if set.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Human-readable form used in log lines (not percent-encoded).
    #[must_use]
    pub fn display_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.url, query)
    }
}

/// Boxed future returned by [`RestClient::get_json`].
pub type JsonFuture = Pin<Box<dyn Future<Output = Result<Value, FetchError>> + Send + 'static>>;

/// Read-only JSON access to a REST API.
pub trait RestClient: Send + Sync {
    /// Issues a `GET` and parses the body as JSON.
    ///
    /// Non-success statuses must be reported as [`FetchError::Status`].
    fn get_json(&self, request: ApiRequest) -> JsonFuture;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_params_keep_order() {
        let req = ApiRequest::new("https://example.com/wp-json/wp/v2/posts")
            .with_param("search", "budget")
            .with_param("per_page", "20");

        assert_eq!(req.param("search"), Some("budget"));
        assert_eq!(req.param("orderby"), None);
        assert_eq!(
            req.display_url(),
            "https://example.com/wp-json/wp/v2/posts?search=budget&per_page=20"
        );
    }

    #[test]
    fn test_display_url_without_query() {
        let req = ApiRequest::new("https://example.com/wp-json/wp/v2/posts/5");
        assert_eq!(req.display_url(), "https://example.com/wp-json/wp/v2/posts/5");
    }

    #[test]
    #[should_panic(expected = "request URL must not be empty")]
    fn test_empty_url_panics() {
        let _ = ApiRequest::new("");
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            status: 404,
            url: "https://example.com/x".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/x");
    }
}
