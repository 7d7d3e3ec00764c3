//! # Shopify HTTP Client
//!
//! A small async client for the Shopify Admin REST API: authenticated
//! GET/PUT/POST calls, `Link` header pagination, and retries for transport
//! failures and rate limiting.
//!
//! ## Overview
//!
//! - Store configuration via [`StoreConfig`], loaded from
//!   `~/.Shopify-Config.json` ([`FileConfigSource`]) or `shopify_*`
//!   environment variables ([`EnvConfigSource`])
//! - [`HttpClient`] with `get`, `get_json`, `put` and `post`
//! - Bounded retries with exponential backoff via [`RetryPolicy`]
//! - `tracing` instrumentation, with [`logging::init`] for quick setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shopify_http_client::{logging, HttpClient};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! logging::init("info")?;
//!
//! // Reads ~/.Shopify-Config.json unless SHOPIFY_CONFIG_SOURCE=env
//! let client = HttpClient::from_default_source()?;
//!
//! // Every page of the listing, first page first
//! let pages = client.get_json(&client.admin_url("products.json?limit=250")).await?;
//!
//! let location = client.config().default_location().map(str::to_string);
//! if let Some(location_id) = location {
//!     let body = client
//!         .post(
//!             &client.admin_url("inventory_levels/set.json"),
//!             json!({"location_id": location_id, "inventory_item_id": 1, "available": 5}),
//!         )
//!         .await?;
//!     println!("{body}");
//! }
//! # let _ = pages;
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use shopify_http_client::{AccessToken, HttpClient, StoreConfig};
//!
//! let config = StoreConfig::new("acme", "2023-10", AccessToken::new("token"))
//!     .with_default_location("123456");
//! let client = HttpClient::new(config).unwrap();
//!
//! assert_eq!(
//!     client.admin_api_url(),
//!     "https://acme.myshopify.com/admin/api/2023-10"
//! );
//! ```
//!
//! ## Design Principles
//!
//! - **Load once**: configuration is resolved when the client is built and
//!   only re-read on [`HttpClient::reload`]
//! - **Typed failures**: a 404 and a 500 are distinct [`HttpError::Response`]
//!   values carrying their status code
//! - **Bounded waiting**: retries stop after [`RetryPolicy::max_attempts`]
//! - **Thread-safe**: all public types are `Send + Sync`

pub mod clients;
pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    load_config, AccessToken, ConfigSource, ConfigSourceKind, EnvConfigSource,
    FileConfigSource, StoreConfig,
};
pub use error::ConfigError;

pub use clients::{
    ApiCallLimit, HttpClient, HttpClientBuilder, HttpError, HttpMethod, HttpRequest,
    HttpResponse, HttpResponseError, InvalidHttpRequestError, LinkHeader,
    MaxHttpRetriesExceededError, RetryPolicy, RetryReason,
};
