//! JSON file configuration source.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{
    AccessToken, ConfigSource, StoreConfig, ACCESS_TOKEN_KEY, API_VERSION_KEY, STORE_NAME_KEY,
};
use crate::error::ConfigError;

/// File name looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".Shopify-Config.json";

/// On-disk layout. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawFileConfig {
    shopify_store_name: Option<String>,
    shopify_admin_api_version: Option<String>,
    shopify_access_token: Option<AccessToken>,
    #[serde(alias = "shopify_default_location")]
    shopify_deafult_location: Option<String>,
}

/// Loads [`StoreConfig`] from a JSON object on disk.
///
/// The store name, API version and access token are required. The default
/// location is optional because older configuration files do not carry it.
///
/// # Example
///
/// ```rust,no_run
/// use shopify_http_client::{ConfigSource, FileConfigSource};
///
/// let source = FileConfigSource::from_home()?;
/// let config = source.load()?;
/// println!("{}", config.admin_api_url());
/// # Ok::<(), shopify_http_client::ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    /// Uses an explicit file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `~/.Shopify-Config.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HomeDirectoryUnavailable`] if the home directory
    /// cannot be determined.
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirectoryUnavailable)?;
        Ok(Self::new(home.join(CONFIG_FILE_NAME)))
    }

    /// Returns the file path this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn missing(&self, key: &'static str) -> ConfigError {
        ConfigError::MissingKey {
            key,
            origin: self.describe(),
        }
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<StoreConfig, ConfigError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: self.path.clone(),
                }
            } else {
                ConfigError::ReadFailed {
                    path: self.path.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let raw: RawFileConfig =
            serde_json::from_str(&contents).map_err(|e| ConfigError::InvalidJson {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let store_name = raw
            .shopify_store_name
            .ok_or_else(|| self.missing(STORE_NAME_KEY))?;
        let api_version = raw
            .shopify_admin_api_version
            .ok_or_else(|| self.missing(API_VERSION_KEY))?;
        let access_token = raw
            .shopify_access_token
            .ok_or_else(|| self.missing(ACCESS_TOKEN_KEY))?;

        let config = StoreConfig::new(store_name, api_version, access_token);
        Ok(match raw.shopify_deafult_location {
            Some(location) => config.with_default_location(location),
            None => config,
        })
    }

    fn describe(&self) -> String {
        format!("file '{}'", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_all_keys() {
        let file = write_config(
            r#"{
                "shopify_store_name": "acme",
                "shopify_admin_api_version": "2023-10",
                "shopify_access_token": "shpat_x",
                "shopify_deafult_location": "12345"
            }"#,
        );

        let config = FileConfigSource::new(file.path()).load().unwrap();
        assert_eq!(config.store_name(), "acme");
        assert_eq!(config.api_version(), "2023-10");
        assert_eq!(config.access_token().as_ref(), "shpat_x");
        assert_eq!(config.default_location(), Some("12345"));
    }

    #[test]
    fn test_location_is_optional_and_alias_is_accepted() {
        let without = write_config(
            r#"{"shopify_store_name":"a","shopify_admin_api_version":"v","shopify_access_token":"t"}"#,
        );
        let config = FileConfigSource::new(without.path()).load().unwrap();
        assert!(config.default_location().is_none());

        let aliased = write_config(
            r#"{"shopify_store_name":"a","shopify_admin_api_version":"v","shopify_access_token":"t","shopify_default_location":"99"}"#,
        );
        let config = FileConfigSource::new(aliased.path()).load().unwrap();
        assert_eq!(config.default_location(), Some("99"));
    }

    #[test]
    fn test_missing_token_is_reported_by_key() {
        let file =
            write_config(r#"{"shopify_store_name":"a","shopify_admin_api_version":"v"}"#);

        let result = FileConfigSource::new(file.path()).load();
        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { key: "shopify_access_token", .. })
        ));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let result = FileConfigSource::new(&path).load();
        assert_eq!(result, Err(ConfigError::FileNotFound { path }));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let file = write_config("{ not json");
        let result = FileConfigSource::new(file.path()).load();
        assert!(matches!(result, Err(ConfigError::InvalidJson { .. })));
    }

    #[test]
    fn test_non_string_value_is_reported() {
        let file = write_config(
            r#"{"shopify_store_name":1,"shopify_admin_api_version":"v","shopify_access_token":"t"}"#,
        );
        let result = FileConfigSource::new(file.path()).load();
        assert!(matches!(result, Err(ConfigError::InvalidJson { .. })));
    }

    #[test]
    fn test_describe_names_the_path() {
        let source = FileConfigSource::new("/tmp/x.json");
        assert_eq!(source.describe(), "file '/tmp/x.json'");
        assert_eq!(source.path(), Path::new("/tmp/x.json"));
    }
}
