//! HTTP-specific error types.
//!
//! - [`HttpResponseError`]: the API answered with a status that is neither a
//!   success nor retryable
//! - [`MaxHttpRetriesExceededError`]: transport failures or rate limiting
//!   outlasted the retry budget
//! - [`InvalidHttpRequestError`]: a request failed validation before sending
//! - [`HttpError`]: unified error type for all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_http_client::{HttpClient, HttpError};
//!
//! match client.put(&url, &payload).await {
//!     Ok(body) => println!("Updated: {body}"),
//!     Err(HttpError::Response(e)) if e.code == 404 => println!("No such resource"),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::MaxRetries(e)) => println!("Gave up after {} tries", e.tries),
//!     Err(other) => println!("{other}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::error::ConfigError;

/// Error returned when a request receives a non-successful, non-retryable response.
///
/// The message holds the raw response body so API error details are kept.
///
/// ```rust
/// use shopify_http_client::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: r#"{"errors":"Not Found"}"#.to_string(),
///     error_reference: Some("abc-123".to_string()),
/// };
///
/// assert_eq!(error.to_string(), r#"HTTP 404: {"errors":"Not Found"}"#);
/// ```
#[derive(Debug, Error)]
#[error("HTTP {code}: {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The response body text.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Why a request was retried.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetryReason {
    /// The request failed before a response was received (DNS, connect, timeout).
    Transport,
    /// The API answered 429 Too Many Requests.
    RateLimited,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("transport error"),
            Self::RateLimited => f.write_str("rate limited"),
        }
    }
}

/// Error returned when the retry budget is exhausted.
///
/// ```rust
/// use shopify_http_client::clients::{MaxHttpRetriesExceededError, RetryReason};
///
/// let error = MaxHttpRetriesExceededError {
///     code: Some(429),
///     tries: 5,
///     reason: RetryReason::RateLimited,
///     message: "Exceeded 2 calls per second for api client.".to_string(),
/// };
///
/// assert!(error.to_string().starts_with("Exceeded maximum retry count of 5 (rate limited)"));
/// ```
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries} ({reason}). Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response, `None` for transport failures.
    pub code: Option<u16>,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// The failure that caused the last retry.
    pub reason: RetryReason,
    /// The last response body or transport error message.
    pub message: String,
}

/// Error returned when a request fails validation before it is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A PUT or POST request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// The request URL is empty.
    #[error("Cannot send a request without a URL.")]
    EmptyUrl,

    /// The configured access token cannot be sent as a header value.
    #[error("The configured access token contains characters not allowed in an HTTP header.")]
    InvalidAccessToken,
}

/// Unified error type for all client operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A non-success, non-retryable HTTP response.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error that was not retried.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The store configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// A page body was not valid JSON.
    #[error("Unable to decode response from {url}: {reason}")]
    Decode {
        /// The URL of the page that failed to decode.
        url: String,
        /// The parser error message.
        reason: String,
    },
}

impl HttpError {
    /// Returns the HTTP status code associated with this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => e.code,
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_response_error_includes_status_code_in_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"errors":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"HTTP 404: {"errors":"Not Found"}"#);
    }

    #[test]
    fn test_max_retries_error_includes_retry_count_and_reason() {
        let error = MaxHttpRetriesExceededError {
            code: None,
            tries: 3,
            reason: RetryReason::Transport,
            message: "connection refused".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("3"));
        assert!(message.contains("transport error"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use post without specifying data.");
    }

    #[test]
    fn test_status_distinguishes_error_codes() {
        let not_found: HttpError = HttpResponseError {
            code: 404,
            message: String::new(),
            error_reference: None,
        }
        .into();
        let server: HttpError = HttpResponseError {
            code: 500,
            message: String::new(),
            error_reference: None,
        }
        .into();
        let config: HttpError = ConfigError::NoSource.into();

        assert_eq!(not_found.status(), Some(404));
        assert_eq!(server.status(), Some(500));
        assert_eq!(config.status(), None);
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let http_error: &dyn std::error::Error = &HttpResponseError {
            code: 400,
            message: "test".to_string(),
            error_reference: None,
        };
        let _ = http_error;

        let invalid_error: &dyn std::error::Error = &InvalidHttpRequestError::EmptyUrl;
        let _ = invalid_error;
    }
}
