//! Store configuration and the sources it is loaded from.
//!
//! A [`StoreConfig`] carries the four values every request needs: the store
//! name, the Admin API version, the access token and the default inventory
//! location. It is resolved through a [`ConfigSource`]:
//!
//! - [`FileConfigSource`]: a JSON object in `~/.Shopify-Config.json`
//! - [`EnvConfigSource`]: `shopify_*` environment variables, optionally
//!   backed by a `.env` file
//!
//! Which source [`load_config`] uses is decided by the
//! `SHOPIFY_CONFIG_SOURCE` environment variable (see [`ConfigSourceKind`]).
//!
//! # Example
//!
//! ```rust
//! use shopify_http_client::{AccessToken, StoreConfig};
//!
//! let config = StoreConfig::new("acme", "2023-10", AccessToken::new("token"));
//! assert_eq!(
//!     config.admin_api_url(),
//!     "https://acme.myshopify.com/admin/api/2023-10"
//! );
//! ```

mod env;
mod file;
mod newtypes;

pub use env::EnvConfigSource;
pub use file::FileConfigSource;
pub use newtypes::AccessToken;

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Key holding the store name (the `{store}` in `{store}.myshopify.com`).
pub const STORE_NAME_KEY: &str = "shopify_store_name";
/// Key holding the Admin API version string, e.g. `2023-10`.
pub const API_VERSION_KEY: &str = "shopify_admin_api_version";
/// Key holding the Admin API access token.
pub const ACCESS_TOKEN_KEY: &str = "shopify_access_token";
/// Key holding the default inventory location. The spelling is the one
/// deployed configuration files use.
pub const DEFAULT_LOCATION_KEY: &str = "shopify_deafult_location";
/// Correctly spelled alias accepted for [`DEFAULT_LOCATION_KEY`].
pub const DEFAULT_LOCATION_ALIAS: &str = "shopify_default_location";

/// Environment variable selecting the configuration source.
pub const CONFIG_SOURCE_VAR: &str = "SHOPIFY_CONFIG_SOURCE";

/// Resolved configuration for a single Shopify store.
///
/// Values are taken as-is; no shape validation is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    store_name: String,
    api_version: String,
    access_token: AccessToken,
    default_location: Option<String>,
}

impl StoreConfig {
    /// Creates a configuration without a default location.
    #[must_use]
    pub fn new(
        store_name: impl Into<String>,
        api_version: impl Into<String>,
        access_token: AccessToken,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            api_version: api_version.into(),
            access_token,
            default_location: None,
        }
    }

    /// Sets the default inventory location.
    #[must_use]
    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.default_location = Some(location.into());
        self
    }

    /// Returns the store name.
    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Returns the Admin API version string.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the default inventory location, if configured.
    #[must_use]
    pub fn default_location(&self) -> Option<&str> {
        self.default_location.as_deref()
    }

    /// Builds the Admin API base URL,
    /// `https://{store}.myshopify.com/admin/api/{version}`.
    #[must_use]
    pub fn admin_api_url(&self) -> String {
        format!(
            "https://{}.myshopify.com/admin/api/{}",
            self.store_name, self.api_version
        )
    }

    /// Joins a resource path onto [`admin_api_url`](Self::admin_api_url).
    ///
    /// ```rust
    /// use shopify_http_client::{AccessToken, StoreConfig};
    ///
    /// let config = StoreConfig::new("acme", "2023-10", AccessToken::new("t"));
    /// assert_eq!(
    ///     config.admin_url("/products.json"),
    ///     "https://acme.myshopify.com/admin/api/2023-10/products.json"
    /// );
    /// ```
    #[must_use]
    pub fn admin_url(&self, path: &str) -> String {
        format!("{}/{}", self.admin_api_url(), path.trim_start_matches('/'))
    }
}

/// A place the store configuration can be loaded from.
///
/// Implementations must be cheap to call repeatedly; [`HttpClient::reload`]
/// calls [`load`](Self::load) each time a reload is requested.
///
/// [`HttpClient::reload`]: crate::clients::HttpClient::reload
pub trait ConfigSource: fmt::Debug + Send + Sync {
    /// Reads and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the source is unavailable or a required
    /// key is missing.
    fn load(&self) -> Result<StoreConfig, ConfigError>;

    /// Human readable description used in error messages and logs.
    fn describe(&self) -> String;
}

/// Selects which [`ConfigSource`] implementation [`load_config`] uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigSourceKind {
    /// `~/.Shopify-Config.json`.
    #[default]
    File,
    /// `shopify_*` environment variables with an optional `.env` file.
    Env,
}

impl ConfigSourceKind {
    /// Reads the kind from `SHOPIFY_CONFIG_SOURCE`, defaulting to [`File`](Self::File).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSourceKind`] for unrecognized values.
    pub fn from_env() -> Result<Self, ConfigError> {
        std::env::var(CONFIG_SOURCE_VAR)
            .ok()
            .map_or(Ok(Self::default()), |value| value.parse())
    }

    /// Instantiates the default source for this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDirectoryUnavailable`] when the file source
    /// cannot locate the home directory.
    pub fn into_source(self) -> Result<Box<dyn ConfigSource>, ConfigError> {
        Ok(match self {
            Self::File => Box::new(FileConfigSource::from_home()?),
            Self::Env => Box::new(EnvConfigSource::new()),
        })
    }
}

impl FromStr for ConfigSourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "env" | "environment" => Ok(Self::Env),
            _ => Err(ConfigError::InvalidSourceKind {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Env => f.write_str("env"),
        }
    }
}

/// Loads the store configuration from the source selected by
/// `SHOPIFY_CONFIG_SOURCE`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the selector is invalid, the source cannot be
/// read, or a required key is missing.
pub fn load_config() -> Result<StoreConfig, ConfigError> {
    ConfigSourceKind::from_env()?.into_source()?.load()
}

// Verify StoreConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreConfig>();
};
