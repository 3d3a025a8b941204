//! reqwest-backed REST client.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{ApiRequest, FetchError, JsonFuture, RestClient};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("relpick/", env!("CARGO_PKG_VERSION"));

/// HTTP client for `wp-json` endpoints.
#[derive(Debug, Clone)]
pub struct HttpRestClient {
    /// Shared connection pool.
    client: reqwest::Client,
}

impl HttpRestClient {
    /// Creates a client with the given request timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        assert!(!timeout.is_zero(), "HTTP timeout must be positive");

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }
}

impl Default for HttpRestClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl RestClient for HttpRestClient {
    fn get_json(&self, request: ApiRequest) -> JsonFuture {
        let client = self.client.clone();

        Box::pin(async move {
            debug!("[HTTP] GET {}", request.display_url());

            let response = client
                .get(&request.url)
                .query(&request.query)
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    status: status.as_u16(),
                    url: request.url,
                });
            }

            response.json::<Value>().await.map_err(|e| {
                if e.is_decode() {
                    FetchError::Decode(e.to_string())
                } else {
                    FetchError::Transport(e.to_string())
                }
            })
        })
    }
}
