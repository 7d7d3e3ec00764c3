//! HTTP client types for the Shopify Admin REST API.
//!
//! # Overview
//!
//! - [`HttpClient`]: the async client exposing `get`, `put` and `post`
//! - [`HttpRequest`]: a single validated request
//! - [`HttpResponse`]: a parsed response with pagination and rate limit data
//! - [`RetryPolicy`]: how transport failures and 429s are retried
//!
//! # Retry Behavior
//!
//! - **Transport errors** (DNS, connect, timeout): retried after 60 s, doubling
//! - **429 (Rate Limited)**: retried after at least 120 s (or `Retry-After`), doubling
//! - **Any other non-success status**: returned immediately as [`HttpError::Response`]
//!
//! After [`RetryPolicy::max_attempts`] tries the call fails with
//! [`HttpError::MaxRetries`].
//!
//! # Pagination
//!
//! [`HttpClient::get`] follows `Link: <...>; rel="next"` headers in a loop and
//! returns every page body in order.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod retry;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
    RetryReason,
};
pub use http_client::{
    HttpClient, HttpClientBuilder, ACCESS_TOKEN_HEADER, DEFAULT_TIMEOUT, SDK_VERSION,
};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse, LinkHeader};
pub use retry::{
    RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, DEFAULT_RATE_LIMIT_DELAY,
    DEFAULT_TRANSPORT_DELAY,
};
