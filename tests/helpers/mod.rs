//! Shared helpers for integration tests.
//!
//! `MockRestClient` answers requests from a route table and records every
//! request it receives. Routes can carry a delay so tests under a paused
//! tokio clock can control the order in which responses land.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Value, json};

use relpick::api::{ApiRequest, FetchError, JsonFuture, RestClient};
use relpick::endpoint::{ApiEnvironment, EndpointResolver};

/// Origin used by every test environment.
pub const ORIGIN: &str = "https://example.com";

/// Posts collection under [`ORIGIN`].
pub const POSTS: &str = "https://example.com/wp-json/wp/v2/posts";

/// Blogs collection under [`ORIGIN`].
pub const BLOGS: &str = "https://example.com/wp-json/hpu/v1/blogs";

struct Route {
    url: String,
    search: Option<String>,
    delay: Duration,
    response: Result<Value, FetchError>,
}

/// Scriptable REST client.
#[derive(Default)]
pub struct MockRestClient {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockRestClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answers `url` (any query) with `value`.
    pub fn respond(&self, url: &str, value: Value) {
        self.route(url, None, Duration::ZERO, Ok(value));
    }

    /// Answers `url` with `value` after `delay`.
    pub fn respond_after(&self, url: &str, delay: Duration, value: Value) {
        self.route(url, None, delay, Ok(value));
    }

    /// Answers a search for `text` on `url` after `delay`.
    pub fn respond_search(&self, url: &str, text: &str, delay: Duration, value: Value) {
        self.route(url, Some(text), delay, Ok(value));
    }

    /// Fails every request to `url`.
    pub fn fail(&self, url: &str, error: FetchError) {
        self.route(url, None, Duration::ZERO, Err(error));
    }

    fn route(
        &self,
        url: &str,
        search: Option<&str>,
        delay: Duration,
        response: Result<Value, FetchError>,
    ) {
        self.routes.lock().unwrap().push(Route {
            url: url.to_string(),
            search: search.map(str::to_string),
            delay,
            response,
        });
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests whose URL equals `url`.
    pub fn requests_to(&self, url: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url == url)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl RestClient for MockRestClient {
    fn get_json(&self, request: ApiRequest) -> JsonFuture {
        self.requests.lock().unwrap().push(request.clone());

        // Later routes win so tests can override earlier answers.
        let routes = self.routes.lock().unwrap();
        let matched = routes.iter().rev().find(|route| {
            route.url == request.url
                && route
                    .search
                    .as_deref()
                    .is_none_or(|text| request.param("search") == Some(text))
        });
        let (delay, response) = match matched {
            Some(route) => (route.delay, route.response.clone()),
            None => (
                Duration::ZERO,
                Err(FetchError::Status {
                    status: 404,
                    url: request.url.clone(),
                }),
            ),
        };

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        })
    }
}

/// Resolver over `client` with the [`ORIGIN`] environment.
pub fn resolver(client: &Arc<MockRestClient>) -> Arc<EndpointResolver> {
    let client: Arc<dyn RestClient> = client.clone();
    Arc::new(EndpointResolver::new(client, ApiEnvironment::new(ORIGIN)))
}

/// A `wp/v2` post object.
pub fn post(id: u64, title: &str) -> Value {
    json!({ "id": id, "title": { "rendered": title } })
}

/// A `blogs` site object.
pub fn site(id: u64, name: &str, path: &str) -> Value {
    json!({ "id": id, "name": name, "path": path })
}

/// Lets spawned tasks run until the paused clock has advanced by `ms`.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
