//! Error types for configuration loading.
//!
//! Every configuration source returns `Result<T, ConfigError>`. Loading is
//! fail-fast: a missing file or key is reported before any request is sent.
//!
//! # Example
//!
//! ```rust
//! use shopify_http_client::ConfigError;
//!
//! let error = ConfigError::MissingKey {
//!     key: "shopify_access_token",
//!     origin: "environment".to_string(),
//! };
//! assert!(error.to_string().contains("shopify_access_token"));
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving the store configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The home directory of the current user could not be determined.
    #[error("Unable to determine the home directory for the configuration file.")]
    HomeDirectoryUnavailable,

    /// The configuration file does not exist.
    #[error("Configuration file '{}' not found.", path.display())]
    FileNotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("Unable to read configuration file '{}': {reason}", path.display())]
    ReadFailed {
        /// The path that was read.
        path: PathBuf,
        /// The underlying I/O error message.
        reason: String,
    },

    /// The configuration file is not a JSON object of string values.
    #[error("Configuration file '{}' is not valid: {reason}", path.display())]
    InvalidJson {
        /// The path that was parsed.
        path: PathBuf,
        /// The parser error message.
        reason: String,
    },

    /// A required key is absent from the configuration source.
    #[error("Missing required configuration key '{key}' in {origin}.")]
    MissingKey {
        /// The name of the missing key.
        key: &'static str,
        /// A description of the source that was consulted.
        origin: String,
    },

    /// The `.env` file could not be parsed.
    #[error("Unable to load dotenv file '{}': {reason}", path.display())]
    Dotenv {
        /// The dotenv file path.
        path: PathBuf,
        /// The parser error message.
        reason: String,
    },

    /// The configuration source selector holds an unknown value.
    #[error("Unknown configuration source '{value}'. Expected 'file' or 'env'.")]
    InvalidSourceKind {
        /// The value that was provided.
        value: String,
    },

    /// `reload` was called on a client that has no configuration source attached.
    #[error("No configuration source attached; nothing to reload from.")]
    NoSource,
}
