//! Endpoint resolution.
//!
//! Turns an [`EndpointConfig`] into the absolute collection URL a picker
//! queries. Resolution may need one remote lookup (a site's path from its
//! blog id); that lookup never fails the resolve, it degrades to the root
//! path instead.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiRequest, Identifier, RestClient};

/// Default REST namespace.
pub const DEFAULT_NAMESPACE: &str = "wp/v2";

/// Resource type used with the default namespace.
pub const DEFAULT_RESOURCE_TYPE: &str = "posts";

/// Namespace serving the multisite `blogs` routes.
pub const DEFAULT_SITE_NAMESPACE: &str = "hpu/v1";

/// REST prefix under a site's path.
const REST_PREFIX: &str = "wp-json";

/// Ambient values that a browser page would have provided globally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEnvironment {
    /// Origin used when no domain override is given (`https://example.com`).
    pub origin: String,
    /// Default API root (`https://example.com/wp-json/`).
    pub api_root: Option<String>,
}

impl ApiEnvironment {
    /// Creates an environment for the given origin.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into();
        assert!(!origin.is_empty(), "origin must not be empty");

        Self {
            origin: origin.trim_end_matches('/').to_string(),
            api_root: None,
        }
    }

    /// Sets an explicit default API root.
    #[must_use]
    pub fn with_api_root(mut self, api_root: impl Into<String>) -> Self {
        self.api_root = Some(api_root.into());
        self
    }

    /// Returns the default API root, derived from the origin if unset.
    #[must_use]
    pub fn default_api_root(&self) -> String {
        match self.api_root.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(root) => format!("{}/", root.trim_end_matches('/')),
            None => format!("{}/{}/", self.origin, REST_PREFIX),
        }
    }
}

/// Per-picker endpoint options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Query a different host than the ambient origin.
    pub domain_override: Option<String>,
    /// Site path on that host (`/news/`); wins over `remote_site_id`.
    pub path_override: Option<String>,
    /// Blog id whose path must be looked up remotely.
    pub remote_site_id: Option<Identifier>,
    /// REST namespace, `wp/v2` when unset.
    pub namespace: Option<String>,
    /// Resource collection; `posts` only for the default namespace.
    pub resource_type: Option<String>,
    /// Nonce sent as `_wpnonce`.
    pub auth_token: Option<String>,
    /// Namespace of the `blogs` routes, `hpu/v1` when unset.
    pub site_namespace: Option<String>,
}

impl EndpointConfig {
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_override = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path_override = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_site_id(mut self, id: impl Into<Identifier>) -> Self {
        self.remote_site_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    #[must_use]
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_site_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.site_namespace = Some(namespace.into());
        self
    }

    /// Returns the configured token, ignoring blank values.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        non_blank(self.auth_token.as_deref())
    }
}

/// Trims every leading and trailing slash.
#[must_use]
pub fn strip_slashes(value: &str) -> &str {
    value.trim_matches('/')
}

/// Normalizes a site path to `/` or `/segment/.../`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let inner = strip_slashes(path.trim());
    if inner.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", inner)
    }
}

/// Joins an API root, a namespace and an optional resource type.
///
/// No duplicate or missing slashes at any join point and no trailing slash.
#[must_use]
pub fn compose_endpoint(api_root: &str, namespace: &str, resource_type: &str) -> String {
    let mut endpoint = api_root.trim_end_matches('/').to_string();
    for segment in [namespace, resource_type] {
        let segment = strip_slashes(segment);
        if !segment.is_empty() {
            endpoint.push('/');
            endpoint.push_str(segment);
        }
    }
    endpoint
}

/// Returns `None` for missing or whitespace-only strings.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolves endpoint configurations into collection URLs.
pub struct EndpointResolver {
    /// Client for the optional site-path lookup.
    client: Arc<dyn RestClient>,
    /// Injected ambient defaults.
    environment: ApiEnvironment,
}

impl EndpointResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(client: Arc<dyn RestClient>, environment: ApiEnvironment) -> Self {
        Self {
            client,
            environment,
        }
    }

    /// Returns the ambient environment.
    #[must_use]
    pub fn environment(&self) -> &ApiEnvironment {
        &self.environment
    }

    /// Returns the domain to query, without trailing slash.
    #[must_use]
    pub fn domain(&self, config: &EndpointConfig) -> String {
        non_blank(config.domain_override.as_deref())
            .map(|d| d.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.environment.origin.clone())
    }

    /// Returns the `blogs` collection URL on the configured domain.
    #[must_use]
    pub fn site_collection(&self, config: &EndpointConfig) -> String {
        let namespace =
            non_blank(config.site_namespace.as_deref()).unwrap_or(DEFAULT_SITE_NAMESPACE);
        let root = format!("{}/{}/", self.domain(config), REST_PREFIX);
        compose_endpoint(&root, namespace, "blogs")
    }

    /// Resolves the full collection endpoint for a configuration.
    pub async fn resolve(&self, config: &EndpointConfig) -> String {
        let api_root = self.api_root(config).await;

        let custom_namespace = non_blank(config.namespace.as_deref());
        let namespace = custom_namespace.unwrap_or(DEFAULT_NAMESPACE);
        let default_type = if custom_namespace.is_some() {
            ""
        } else {
            DEFAULT_RESOURCE_TYPE
        };
        let resource_type = non_blank(config.resource_type.as_deref()).unwrap_or(default_type);

        let endpoint = compose_endpoint(&api_root, namespace, resource_type);
        debug!("[ENDPOINT] Resolved {}", endpoint);
        endpoint
    }

    /// Computes the API root (`.../wp-json/`) for a configuration.
    async fn api_root(&self, config: &EndpointConfig) -> String {
        if let Some(path) = non_blank(config.path_override.as_deref()) {
            return self.rooted(config, path);
        }

        if let Some(site_id) = &config.remote_site_id {
            let path = self.lookup_site_path(config, site_id).await;
            return self.rooted(config, &path);
        }

        self.environment.default_api_root()
    }

    /// Builds `{domain}{path}wp-json/`.
    fn rooted(&self, config: &EndpointConfig, path: &str) -> String {
        format!("{}{}{}/", self.domain(config), normalize_path(path), REST_PREFIX)
    }

    /// Looks up a site's path, degrading to `/` on any failure.
    async fn lookup_site_path(&self, config: &EndpointConfig, site_id: &Identifier) -> String {
        let url = format!("{}/{}", self.site_collection(config), site_id);
        debug!("[ENDPOINT] Looking up path for site {}", site_id);

        match self.client.get_json(ApiRequest::new(url)).await {
            Ok(value) => match site_path(&value) {
                Some(path) => path,
                None => {
                    warn!("[ENDPOINT] Site {} has no path, using root", site_id);
                    "/".to_string()
                }
            },
            Err(e) => {
                warn!("[ENDPOINT] Failed to look up site {}: {}", site_id, e);
                "/".to_string()
            }
        }
    }
}

/// Reads `path` from a site object, or from the first element of a list.
fn site_path(value: &Value) -> Option<String> {
    let site = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    site.get("path")
        .and_then(Value::as_str)
        .filter(|p| !p.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchError, JsonFuture};
    use serde_json::json;
    use std::sync::Mutex;

    /// Client answering every request with a fixed result.
    struct FixedClient {
        answer: Result<Value, FetchError>,
        requests: Mutex<Vec<String>>,
    }

    impl FixedClient {
        fn new(answer: Result<Value, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl RestClient for FixedClient {
        fn get_json(&self, request: ApiRequest) -> JsonFuture {
            self.requests.lock().unwrap().push(request.display_url());
            let answer = self.answer.clone();
            Box::pin(async move { answer })
        }
    }

    fn resolver(client: Arc<FixedClient>) -> EndpointResolver {
        EndpointResolver::new(client, ApiEnvironment::new("https://origin.test"))
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("sub"), "/sub/");
        assert_eq!(normalize_path("//sub/deep//"), "/sub/deep/");
    }

    #[test]
    fn test_compose_endpoint_slashes() {
        assert_eq!(
            compose_endpoint("https://a.test/wp-json/", "/wp/v2/", "/posts/"),
            "https://a.test/wp-json/wp/v2/posts"
        );
        assert_eq!(
            compose_endpoint("https://a.test/wp-json", "hpu/v1", ""),
            "https://a.test/wp-json/hpu/v1"
        );
    }

    #[test]
    fn test_default_api_root() {
        let env = ApiEnvironment::new("https://origin.test/");
        assert_eq!(env.default_api_root(), "https://origin.test/wp-json/");

        let env = env.with_api_root("https://cdn.test/api");
        assert_eq!(env.default_api_root(), "https://cdn.test/api/");
    }

    #[tokio::test]
    async fn test_path_override() {
        let client = FixedClient::new(Ok(json!({})));
        let config = EndpointConfig::default()
            .with_domain("https://example.com")
            .with_path("/sub/");

        let endpoint = resolver(Arc::clone(&client)).resolve(&config).await;

        assert_eq!(endpoint, "https://example.com/sub/wp-json/wp/v2/posts");
        assert!(client.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_root_path_override() {
        let client = FixedClient::new(Ok(json!({})));
        let config = EndpointConfig::default()
            .with_domain("https://example.com/")
            .with_path("/");

        let endpoint = resolver(client).resolve(&config).await;
        assert_eq!(endpoint, "https://example.com/wp-json/wp/v2/posts");
    }

    #[tokio::test]
    async fn test_ambient_root_used_without_overrides() {
        let client = FixedClient::new(Ok(json!({})));
        let endpoint = resolver(client)
            .resolve(&EndpointConfig::default().with_resource_type("pages"))
            .await;

        assert_eq!(endpoint, "https://origin.test/wp-json/wp/v2/pages");
    }

    #[tokio::test]
    async fn test_custom_namespace_has_no_default_type() {
        let client = FixedClient::new(Ok(json!({})));
        let endpoint = resolver(client)
            .resolve(&EndpointConfig::default().with_namespace("/hpu/v1/"))
            .await;

        assert_eq!(endpoint, "https://origin.test/wp-json/hpu/v1");
    }

    #[tokio::test]
    async fn test_site_id_lookup() {
        let client = FixedClient::new(Ok(json!({ "id": 4, "path": "/news/" })));
        let config = EndpointConfig::default().with_site_id(4);

        let endpoint = resolver(Arc::clone(&client)).resolve(&config).await;

        assert_eq!(endpoint, "https://origin.test/news/wp-json/wp/v2/posts");
        assert_eq!(
            client.requests.lock().unwrap().as_slice(),
            ["https://origin.test/wp-json/hpu/v1/blogs/4"]
        );
    }

    #[tokio::test]
    async fn test_site_lookup_failure_degrades_to_root() {
        let client = FixedClient::new(Err(FetchError::Status {
            status: 500,
            url: "x".into(),
        }));
        let config = EndpointConfig::default()
            .with_domain("https://example.com")
            .with_site_id(4);

        let endpoint = resolver(client).resolve(&config).await;
        assert_eq!(endpoint, "https://example.com/wp-json/wp/v2/posts");
    }

    #[tokio::test]
    async fn test_site_lookup_without_path_degrades_to_root() {
        let client = FixedClient::new(Ok(json!({ "id": 4 })));
        let endpoint = resolver(client)
            .resolve(&EndpointConfig::default().with_site_id(4))
            .await;

        assert_eq!(endpoint, "https://origin.test/wp-json/wp/v2/posts");
    }

    #[test]
    fn test_site_collection() {
        let client = FixedClient::new(Ok(json!({})));
        let resolver = resolver(client);

        assert_eq!(
            resolver.site_collection(&EndpointConfig::default()),
            "https://origin.test/wp-json/hpu/v1/blogs"
        );
        assert_eq!(
            resolver.site_collection(
                &EndpointConfig::default()
                    .with_domain("https://net.test")
                    .with_site_namespace("net/v2")
            ),
            "https://net.test/wp-json/net/v2/blogs"
        );
    }

    #[test]
    fn test_site_path_from_list() {
        assert_eq!(
            site_path(&json!([{ "path": "/a/" }])),
            Some("/a/".to_string())
        );
        assert_eq!(site_path(&json!([])), None);
    }
}
