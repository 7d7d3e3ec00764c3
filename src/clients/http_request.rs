//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] type and its builder. Requests
//! carry absolute URLs because pagination hands back absolute `Link` targets.

use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
}

impl HttpMethod {
    /// Returns `true` if `code` counts as success for this method.
    ///
    /// GET accepts only 200. POST and PUT accept 200 and 201.
    #[must_use]
    pub const fn is_success(self, code: u16) -> bool {
        match self {
            Self::Get => code == 200,
            Self::Post | Self::Put => code == 200 || code == 201,
        }
    }

    /// Returns the progressive verb used in request log lines.
    #[must_use]
    pub const fn log_verb(self) -> &'static str {
        match self {
            Self::Get => "Getting",
            Self::Post => "Posting to",
            Self::Put => "Putting to",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A single request to the Admin API.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use shopify_http_client::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(
///     HttpMethod::Get,
///     "https://acme.myshopify.com/admin/api/2023-10/products.json",
/// )
/// .build()
/// .unwrap();
///
/// let put_request = HttpRequest::builder(
///     HttpMethod::Put,
///     "https://acme.myshopify.com/admin/api/2023-10/products/1.json",
/// )
/// .body(json!({"product": {"id": 1, "title": "Renamed"}}))
/// .build()
/// .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute URL for this request.
    pub url: String,
    /// The JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `url` is empty
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.url.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyUrl);
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    url: String,
    body: Option<serde_json::Value>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            http_method: method,
            url: url.into(),
            body: None,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            url: self.url,
            body: self.body,
        };
        request.verify()?;
        Ok(request)
    }
}
