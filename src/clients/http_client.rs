//! HTTP client for the Shopify Admin REST API.
//!
//! This module provides the [`HttpClient`] type: authenticated GET/PUT/POST
//! calls with cursor pagination and retry handling.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use tracing::Instrument;

use crate::clients::errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
    RetryReason,
};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::RetryPolicy;
use crate::config::{ConfigSource, ConfigSourceKind, StoreConfig};
use crate::error::ConfigError;
use crate::logging;

/// Header carrying the Admin API access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for the Shopify Admin REST API.
///
/// The client handles:
/// - Access token injection from the loaded [`StoreConfig`]
/// - `Link` header pagination for GET requests
/// - Retries with backoff for transport failures and 429 responses
///
/// Configuration is loaded once when the client is built. Call
/// [`reload`](Self::reload) to pick up changes from the attached source.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,no_run
/// use shopify_http_client::HttpClient;
/// use serde_json::json;
///
/// # async fn run() -> Result<(), shopify_http_client::HttpError> {
/// let client = HttpClient::from_default_source()?;
///
/// let pages = client.get(&client.admin_url("products.json?limit=250")).await?;
/// println!("fetched {} pages", pages.len());
///
/// let url = client.admin_url("products/1.json");
/// let body = client.put(&url, json!({"product": {"id": 1, "title": "New"}})).await?;
/// println!("{body}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// The configuration currently in use.
    config: RwLock<Arc<StoreConfig>>,
    /// Where the configuration came from, used by `reload`.
    source: Option<Arc<dyn ConfigSource>>,
    retry_policy: RetryPolicy,
    /// Value of the `module` field on every log span.
    module_tag: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

enum Failure {
    RateLimited(HttpResponse),
    Transport(reqwest::Error),
}

impl HttpClient {
    /// Creates a new builder for constructing an `HttpClient`.
    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Creates a client for an already resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::ClientBuild`] if the HTTP client cannot be created.
    pub fn new(config: StoreConfig) -> Result<Self, HttpError> {
        Self::builder().config(config).build()
    }

    /// Creates a client that loads its configuration from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Config`] if the source cannot be loaded.
    pub fn from_source(source: impl ConfigSource + 'static) -> Result<Self, HttpError> {
        Self::builder().source(source).build()
    }

    /// Creates a client using the source selected by `SHOPIFY_CONFIG_SOURCE`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Config`] if the configuration cannot be loaded.
    pub fn from_default_source() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    /// Returns the configuration currently in use.
    #[must_use]
    pub fn config(&self) -> Arc<StoreConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Returns the Admin API base URL for the configured store.
    #[must_use]
    pub fn admin_api_url(&self) -> String {
        self.config().admin_api_url()
    }

    /// Joins a resource path onto the Admin API base URL.
    #[must_use]
    pub fn admin_url(&self, path: &str) -> String {
        self.config().admin_url(path)
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the module tag attached to log spans.
    #[must_use]
    pub fn module_tag(&self) -> &str {
        &self.module_tag
    }

    /// Re-reads the configuration from the attached source.
    ///
    /// On failure the previous configuration stays in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSource`] if the client was built from a fixed
    /// configuration, or the source's error if loading fails.
    pub fn reload(&self) -> Result<Arc<StoreConfig>, ConfigError> {
        let source = self.source.as_ref().ok_or(ConfigError::NoSource)?;
        let fresh = Arc::new(source.load()?);
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&fresh);
        tracing::info!(source = %source.describe(), "Reloaded store configuration");
        Ok(fresh)
    }

    /// Fetches `url` and every page reachable through `Link: rel="next"`.
    ///
    /// Returns the raw body of each page, first page first.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if any page fails. Pages fetched before the
    /// failure are discarded.
    pub async fn get(&self, url: &str) -> Result<Vec<Vec<u8>>, HttpError> {
        let pages = self
            .paginate(url)
            .instrument(self.span(HttpMethod::Get))
            .await?;
        Ok(pages.into_iter().map(|(_, response)| response.body).collect())
    }

    /// Like [`get`](Self::get), parsing every page body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Decode`] if a page is not valid JSON, or any
    /// error [`get`](Self::get) can return.
    pub async fn get_json(&self, url: &str) -> Result<Vec<serde_json::Value>, HttpError> {
        let pages = self
            .paginate(url)
            .instrument(self.span(HttpMethod::Get))
            .await?;
        pages
            .into_iter()
            .map(|(page_url, response)| {
                response.json().map_err(|e| HttpError::Decode {
                    url: page_url,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    /// Sends a PUT with a JSON payload and returns the response body text.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Response`] for any status other than 200, 201 or
    /// a retried 429.
    pub async fn put(
        &self,
        url: &str,
        payload: impl Into<serde_json::Value>,
    ) -> Result<String, HttpError> {
        self.send_with_body(HttpMethod::Put, url, payload.into())
            .await
    }

    /// Sends a POST with a JSON payload and returns the response body text.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Response`] for any status other than 200, 201 or
    /// a retried 429.
    pub async fn post(
        &self,
        url: &str,
        payload: impl Into<serde_json::Value>,
    ) -> Result<String, HttpError> {
        self.send_with_body(HttpMethod::Post, url, payload.into())
            .await
    }

    /// Sends a single request with retry handling. Pagination is not followed.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - The URL cannot be used (`Network`)
    /// - A non-success, non-429 response is received (`Response`)
    /// - Transport failures or 429s outlast the retry budget (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let span = self.span(request.http_method);
        self.execute(&request).instrument(span).await
    }

    fn span(&self, method: HttpMethod) -> tracing::Span {
        tracing::info_span!("shopify_http", module = %self.module_tag, method = %method)
    }

    async fn send_with_body(
        &self,
        method: HttpMethod,
        url: &str,
        payload: serde_json::Value,
    ) -> Result<String, HttpError> {
        let request = HttpRequest::builder(method, url).body(payload).build()?;
        let response = self.execute(&request).instrument(self.span(method)).await?;
        Ok(response.text().into_owned())
    }

    async fn paginate(&self, url: &str) -> Result<Vec<(String, HttpResponse)>, HttpError> {
        let mut pages = Vec::new();
        let mut next = Some(url.to_string());

        while let Some(page_url) = next.take() {
            let request = HttpRequest::builder(HttpMethod::Get, page_url).build()?;
            let response = self.execute(&request).await?;

            next = response.link.next.clone();
            if let Some(next_url) = &next {
                tracing::debug!(page = pages.len() + 1, next = %next_url, "Following pagination link");
            }
            pages.push((request.url, response));
        }

        Ok(pages)
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;
        let headers = Self::request_headers(&self.config())?;
        let attempts = self.retry_policy.attempts();
        let method = request.http_method;

        tracing::info!("{} {}", method.log_verb(), request.url);

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let failure = match self.send_once(request, &headers).await {
                Ok(response) => {
                    if let Some(reason) = response.deprecation_reason() {
                        tracing::warn!(
                            "Deprecated request to Shopify API at {}, received reason: {}",
                            request.url,
                            reason
                        );
                    }

                    if method.is_success(response.code) {
                        return Ok(response);
                    }
                    if response.code != 429 {
                        tracing::error!(
                            status = response.code,
                            request_id = response.request_id().unwrap_or("-"),
                            "Unable to {} {}",
                            method,
                            request.url
                        );
                        return Err(HttpResponseError {
                            code: response.code,
                            message: response.text().into_owned(),
                            error_reference: response.request_id().map(String::from),
                        }
                        .into());
                    }
                    Failure::RateLimited(response)
                }
                Err(error) if error.is_builder() => return Err(HttpError::Network(error)),
                Err(error) => Failure::Transport(error),
            };

            let (reason, retry_after) = match &failure {
                Failure::RateLimited(response) => (RetryReason::RateLimited, response.retry_after),
                Failure::Transport(_) => (RetryReason::Transport, None),
            };

            if tries >= attempts {
                return Err(Self::exhausted(failure, tries, reason));
            }

            let delay = self.retry_policy.delay_for(reason, tries, retry_after);
            match &failure {
                Failure::RateLimited(response) => tracing::error!(
                    request_id = response.request_id().unwrap_or("-"),
                    call_limit = ?response.api_call_limit,
                    attempt = tries,
                    "Too many requests to {}, sleeping for {:?}",
                    request.url,
                    delay
                ),
                Failure::Transport(error) => tracing::error!(
                    error = %error,
                    attempt = tries,
                    "Unable to {} {}, will sleep for {:?} and try again",
                    method,
                    request.url,
                    delay
                ),
            }

            tokio::time::sleep(delay).await;
        }
    }

    async fn send_once(
        &self,
        request: &HttpRequest,
        headers: &HeaderMap,
    ) -> Result<HttpResponse, reqwest::Error> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
        };

        req_builder = req_builder.headers(headers.clone());
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        Ok(HttpResponse::new(code, res_headers, body))
    }

    /// Builds the per-request headers. The token value is marked sensitive.
    fn request_headers(config: &StoreConfig) -> Result<HeaderMap, InvalidHttpRequestError> {
        let mut token = HeaderValue::from_str(config.access_token().as_ref())
            .map_err(|_| InvalidHttpRequestError::InvalidAccessToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(ACCESS_TOKEN_HEADER), token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Maps the last failure to the error surfaced to the caller.
    ///
    /// With a single-attempt budget the failure itself is returned.
    fn exhausted(failure: Failure, tries: u32, reason: RetryReason) -> HttpError {
        match failure {
            Failure::RateLimited(response) if tries == 1 => HttpResponseError {
                code: response.code,
                message: response.text().into_owned(),
                error_reference: response.request_id().map(String::from),
            }
            .into(),
            Failure::Transport(error) if tries == 1 => HttpError::Network(error),
            Failure::RateLimited(response) => MaxHttpRetriesExceededError {
                code: Some(response.code),
                tries,
                reason,
                message: response.text().into_owned(),
            }
            .into(),
            Failure::Transport(error) => MaxHttpRetriesExceededError {
                code: None,
                tries,
                reason,
                message: error.to_string(),
            }
            .into(),
        }
    }
}

/// Builder for constructing [`HttpClient`] instances.
///
/// # Defaults
///
/// - configuration: loaded from the source selected by `SHOPIFY_CONFIG_SOURCE`
/// - `retry_policy`: [`RetryPolicy::default`]
/// - `timeout`: 60 seconds (see [`no_timeout`](Self::no_timeout))
/// - `module_tag`: [`logging::entry_point_name`]
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_http_client::{AccessToken, HttpClient, RetryPolicy, StoreConfig};
///
/// let client = HttpClient::builder()
///     .config(StoreConfig::new("acme", "2023-10", AccessToken::new("token")))
///     .retry_policy(RetryPolicy::default().with_max_attempts(10))
///     .timeout(Duration::from_secs(30))
///     .module_tag("sync_inventory")
///     .build()
///     .unwrap();
///
/// assert_eq!(client.module_tag(), "sync_inventory");
/// ```
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: Option<StoreConfig>,
    source: Option<Arc<dyn ConfigSource>>,
    retry_policy: Option<RetryPolicy>,
    timeout: Option<Duration>,
    no_timeout: bool,
    module_tag: Option<String>,
}

impl HttpClientBuilder {
    /// Uses a fixed configuration. Takes precedence over [`source`](Self::source)
    /// for the initial load; the source is still used by `reload`.
    #[must_use]
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads configuration from `source`.
    #[must_use]
    pub fn source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.no_timeout = false;
        self
    }

    /// Disables the per-request timeout, for calls that may legitimately
    /// stream for a long time.
    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.no_timeout = true;
        self
    }

    /// Sets the `module` field attached to log spans.
    #[must_use]
    pub fn module_tag(mut self, tag: impl Into<String>) -> Self {
        self.module_tag = Some(tag.into());
        self
    }

    /// Builds the [`HttpClient`], loading configuration if needed.
    ///
    /// Nothing is sent over the network; a missing configuration key fails
    /// here.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Config`] if configuration cannot be loaded, or
    /// [`HttpError::ClientBuild`] if the HTTP client cannot be created.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let (config, source) = match (self.config, self.source) {
            (Some(config), source) => (config, source),
            (None, Some(source)) => (source.load()?, Some(source)),
            (None, None) => {
                let source: Arc<dyn ConfigSource> =
                    Arc::from(ConfigSourceKind::from_env()?.into_source()?);
                (source.load()?, Some(source))
            }
        };

        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let mut client_builder = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(format!(
                "shopify-http-client v{SDK_VERSION} | Rust {rust_version}"
            ));
        if !self.no_timeout {
            client_builder = client_builder.timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        }
        let client = client_builder.build().map_err(HttpError::ClientBuild)?;

        Ok(HttpClient {
            client,
            config: RwLock::new(Arc::new(config)),
            source,
            retry_policy: self.retry_policy.unwrap_or_default(),
            module_tag: self
                .module_tag
                .unwrap_or_else(logging::entry_point_name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AccessToken, EnvConfigSource};

    fn acme() -> StoreConfig {
        StoreConfig::new("acme", "2023-10", AccessToken::new("test-access-token"))
    }

    fn env_vars(token: &str) -> EnvConfigSource {
        EnvConfigSource::from_vars([
            ("shopify_store_name", "acme"),
            ("shopify_admin_api_version", "2023-10"),
            ("shopify_access_token", token),
            ("shopify_deafult_location", "1"),
        ])
    }

    #[test]
    fn test_client_construction_with_config() {
        let client = HttpClient::new(acme()).unwrap();

        assert_eq!(
            client.admin_api_url(),
            "https://acme.myshopify.com/admin/api/2023-10"
        );
        assert_eq!(
            client.admin_url("orders.json"),
            "https://acme.myshopify.com/admin/api/2023-10/orders.json"
        );
        assert_eq!(client.retry_policy(), &RetryPolicy::default());
        assert!(!client.module_tag().is_empty());
    }

    #[test]
    fn test_request_headers_carry_token_and_json_content_type() {
        let headers = HttpClient::request_headers(&acme()).unwrap();

        let token = headers.get(ACCESS_TOKEN_HEADER).unwrap();
        assert_eq!(token.to_str().unwrap(), "test-access-token");
        assert!(token.is_sensitive());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let config = StoreConfig::new("acme", "2023-10", AccessToken::new("bad\ntoken"));
        assert_eq!(
            HttpClient::request_headers(&config).unwrap_err(),
            InvalidHttpRequestError::InvalidAccessToken
        );
    }

    #[test]
    fn test_reload_without_source_fails() {
        let client = HttpClient::new(acme()).unwrap();
        assert_eq!(client.reload().unwrap_err(), ConfigError::NoSource);
    }

    #[test]
    fn test_reload_replaces_configuration() {
        let client = HttpClient::builder()
            .config(acme())
            .source(env_vars("rotated-token"))
            .build()
            .unwrap();
        assert_eq!(client.config().access_token().as_ref(), "test-access-token");

        let fresh = client.reload().unwrap();
        assert_eq!(fresh.access_token().as_ref(), "rotated-token");
        assert_eq!(client.config().access_token().as_ref(), "rotated-token");
    }

    #[test]
    fn test_from_source_fails_before_any_request_when_key_missing() {
        let source = EnvConfigSource::from_vars([("shopify_store_name", "acme")]);
        let result = HttpClient::from_source(source);
        assert!(matches!(
            result,
            Err(HttpError::Config(ConfigError::MissingKey {
                key: "shopify_admin_api_version",
                ..
            }))
        ));
    }

    #[test]
    fn test_parse_response_headers_lowercases_and_groups() {
        let mut headers = HeaderMap::new();
        headers.append("link", HeaderValue::from_static("<a>; rel=\"next\""));
        headers.append("x-request-id", HeaderValue::from_static("one"));
        headers.append("x-request-id", HeaderValue::from_static("two"));

        let parsed = HttpClient::parse_response_headers(&headers);
        assert_eq!(parsed.get("link").unwrap().len(), 1);
        assert_eq!(
            parsed.get("x-request-id").unwrap(),
            &vec!["one".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
