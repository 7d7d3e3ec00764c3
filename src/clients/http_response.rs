//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type along with parsers for the
//! Shopify headers the client acts on: `Link` pagination, the call-limit
//! bucket and `Retry-After`.

use std::borrow::Cow;
use std::collections::HashMap;

/// Rate limit information parsed from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// The header format is "X/Y" where X is the current request count and Y is
/// the bucket size.
///
/// # Example
///
/// ```rust
/// use shopify_http_client::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("40/80").unwrap();
/// assert_eq!(limit.request_count, 40);
/// assert_eq!(limit.bucket_size, 80);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// The current number of requests made in this bucket.
    pub request_count: u32,
    /// The maximum number of requests allowed in this bucket.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses the rate limit header value, returning `None` if it is malformed.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (count, size) = header_value.trim().split_once('/')?;
        Some(Self {
            request_count: count.parse().ok()?,
            bucket_size: size.parse().ok()?,
        })
    }
}

/// Cursor links parsed from an RFC 5988 `Link` header.
///
/// Shopify answers paginated listings with a header such as
/// `<https://...?page_info=abc>; rel="next", <https://...?page_info=xyz>; rel="previous"`.
/// Each link target is taken verbatim from between the angle brackets, so
/// URLs containing commas (for example `fields=id,title`) survive intact.
///
/// ```rust
/// use shopify_http_client::clients::LinkHeader;
///
/// let link = LinkHeader::parse(r#"<https://acme.myshopify.com/admin/api/2023-10/products.json?page_info=abc>; rel="next""#);
/// assert_eq!(
///     link.next.as_deref(),
///     Some("https://acme.myshopify.com/admin/api/2023-10/products.json?page_info=abc")
/// );
/// assert!(link.previous.is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkHeader {
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub previous: Option<String>,
}

impl LinkHeader {
    /// Parses a `Link` header value.
    ///
    /// A link's relation is read from its `rel` parameter (`rel="next"`,
    /// `rel="previous"`, or a space-separated list of both). Links without a
    /// `rel` parameter fall back to a substring match on their parameters,
    /// with `next` checked first. The first matching link of each kind wins.
    #[must_use]
    pub fn parse(header_value: &str) -> Self {
        let mut result = Self::default();

        for segment in header_value.split('<').skip(1) {
            let Some((url, params)) = segment.split_once('>') else {
                continue;
            };
            let url = url.trim();
            if url.is_empty() {
                continue;
            }

            let (is_next, is_previous) = match rel_tokens(params) {
                Some(tokens) => (
                    tokens.iter().any(|t| t.eq_ignore_ascii_case("next")),
                    tokens
                        .iter()
                        .any(|t| t.eq_ignore_ascii_case("previous") || t.eq_ignore_ascii_case("prev")),
                ),
                None if params.contains("next") => (true, false),
                None => (false, params.contains("previous")),
            };

            if is_next {
                result.next.get_or_insert_with(|| url.to_string());
            }
            if is_previous {
                result.previous.get_or_insert_with(|| url.to_string());
            }
        }

        result
    }
}

/// Returns the relation types of a link's `rel` parameter, if it has one.
fn rel_tokens(params: &str) -> Option<Vec<&str>> {
    params.split(';').find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("rel") {
            return None;
        }
        let value = value.split(',').next().unwrap_or_default();
        Some(value.trim().trim_matches('"').split_whitespace().collect())
    })
}

/// An HTTP response from the Admin API.
///
/// The body is kept as raw bytes; callers decide how to interpret it.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers keyed by lowercase name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: Vec<u8>,
    /// Pagination links (from the `Link` header).
    pub link: LinkHeader,
    /// Rate limit information (from `X-Shopify-Shop-Api-Call-Limit`).
    pub api_call_limit: Option<ApiCallLimit>,
    /// Seconds to wait before retrying (from `Retry-After`).
    pub retry_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, parsing the Shopify headers it carries.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Vec<u8>) -> Self {
        let link = headers
            .get("link")
            .map(|values| LinkHeader::parse(&values.join(",")))
            .unwrap_or_default();

        let api_call_limit = first(&headers, "x-shopify-shop-api-call-limit")
            .and_then(ApiCallLimit::parse);

        let retry_after = first(&headers, "retry-after")
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs >= 0.0);

        Self {
            code,
            headers,
            body,
            link,
            api_call_limit,
            retry_after,
        }
    }

    /// Returns the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        first(&self.headers, "x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        first(&self.headers, "x-shopify-api-deprecated-reason")
    }
}

fn first<'a>(headers: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|values| values.first())
        .map(String::as_str)
}
