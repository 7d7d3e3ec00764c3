//! Environment variable configuration source.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{
    AccessToken, ConfigSource, StoreConfig, ACCESS_TOKEN_KEY, API_VERSION_KEY,
    DEFAULT_LOCATION_ALIAS, DEFAULT_LOCATION_KEY, STORE_NAME_KEY,
};
use crate::error::ConfigError;

/// Dotenv file consulted by [`EnvConfigSource::new`], relative to the working directory.
pub const DEFAULT_DOTENV_FILE: &str = ".env";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Vars {
    Process,
    Fixed(HashMap<String, String>),
}

/// Loads [`StoreConfig`] from `shopify_*` environment variables.
///
/// All four keys are required. Variables missing from the environment are
/// looked up in the dotenv file when one exists; the file is parsed with
/// `dotenvy` but never written into the process environment, and real
/// environment variables always win.
///
/// # Example
///
/// ```rust
/// use shopify_http_client::{ConfigSource, EnvConfigSource};
///
/// let source = EnvConfigSource::from_vars([
///     ("shopify_store_name", "acme"),
///     ("shopify_admin_api_version", "2023-10"),
///     ("shopify_access_token", "token"),
///     ("shopify_deafult_location", "42"),
/// ]);
/// let config = source.load().unwrap();
/// assert_eq!(config.default_location(), Some("42"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvConfigSource {
    vars: Vars,
    dotenv_path: Option<PathBuf>,
}

impl EnvConfigSource {
    /// Reads the process environment, backed by `./.env` if present.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vars: Vars::Process,
            dotenv_path: Some(PathBuf::from(DEFAULT_DOTENV_FILE)),
        }
    }

    /// Reads from a fixed set of variables instead of the process environment.
    ///
    /// No dotenv file is consulted unless one is set with
    /// [`with_dotenv`](Self::with_dotenv).
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: Vars::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            dotenv_path: None,
        }
    }

    /// Uses the given dotenv file as a fallback.
    #[must_use]
    pub fn with_dotenv(mut self, path: impl Into<PathBuf>) -> Self {
        self.dotenv_path = Some(path.into());
        self
    }

    /// Disables the dotenv fallback.
    #[must_use]
    pub fn without_dotenv(mut self) -> Self {
        self.dotenv_path = None;
        self
    }

    /// Returns the dotenv fallback path, if any.
    #[must_use]
    pub fn dotenv_path(&self) -> Option<&Path> {
        self.dotenv_path.as_deref()
    }

    fn read_dotenv(&self) -> Result<HashMap<String, String>, ConfigError> {
        let Some(path) = self.dotenv_path.as_deref().filter(|p| p.is_file()) else {
            return Ok(HashMap::new());
        };

        let to_error = |e: dotenvy::Error| ConfigError::Dotenv {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        dotenvy::from_path_iter(path)
            .map_err(to_error)?
            .map(|item| item.map_err(to_error))
            .collect()
    }

    fn lookup(&self, key: &str, dotenv: &HashMap<String, String>) -> Option<String> {
        let from_vars = match &self.vars {
            Vars::Process => std::env::var(key).ok(),
            Vars::Fixed(vars) => vars.get(key).cloned(),
        };
        from_vars.or_else(|| dotenv.get(key).cloned())
    }
}

impl Default for EnvConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvConfigSource {
    fn load(&self) -> Result<StoreConfig, ConfigError> {
        let dotenv = self.read_dotenv()?;
        let require = |key: &'static str| {
            self.lookup(key, &dotenv)
                .ok_or_else(|| ConfigError::MissingKey {
                    key,
                    origin: self.describe(),
                })
        };

        let store_name = require(STORE_NAME_KEY)?;
        let api_version = require(API_VERSION_KEY)?;
        let access_token = AccessToken::new(require(ACCESS_TOKEN_KEY)?);
        let location = self
            .lookup(DEFAULT_LOCATION_KEY, &dotenv)
            .or_else(|| self.lookup(DEFAULT_LOCATION_ALIAS, &dotenv))
            .ok_or_else(|| ConfigError::MissingKey {
                key: DEFAULT_LOCATION_KEY,
                origin: self.describe(),
            })?;

        Ok(StoreConfig::new(store_name, api_version, access_token).with_default_location(location))
    }

    fn describe(&self) -> String {
        match &self.dotenv_path {
            Some(path) => format!("environment (dotenv '{}')", path.display()),
            None => "environment".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("shopify_store_name", "acme"),
            ("shopify_admin_api_version", "2023-10"),
            ("shopify_access_token", "token"),
            ("shopify_deafult_location", "42"),
        ]
    }

    #[test]
    fn test_loads_all_four_keys() {
        let config = EnvConfigSource::from_vars(full_vars()).load().unwrap();
        assert_eq!(config.store_name(), "acme");
        assert_eq!(config.api_version(), "2023-10");
        assert_eq!(config.access_token().as_ref(), "token");
        assert_eq!(config.default_location(), Some("42"));
    }

    #[test]
    fn test_location_is_required() {
        let vars: Vec<_> = full_vars()
            .into_iter()
            .filter(|(k, _)| *k != "shopify_deafult_location")
            .collect();

        let result = EnvConfigSource::from_vars(vars).load();
        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { key: "shopify_deafult_location", .. })
        ));
    }

    #[test]
    fn test_location_alias_is_accepted() {
        let mut vars: Vec<_> = full_vars()
            .into_iter()
            .filter(|(k, _)| *k != "shopify_deafult_location")
            .collect();
        vars.push(("shopify_default_location", "7"));

        let config = EnvConfigSource::from_vars(vars).load().unwrap();
        assert_eq!(config.default_location(), Some("7"));
    }

    #[test]
    fn test_dotenv_fills_missing_values_only() {
        let mut dotenv = tempfile::NamedTempFile::new().unwrap();
        writeln!(dotenv, "shopify_access_token=from-dotenv").unwrap();
        writeln!(dotenv, "shopify_store_name=ignored").unwrap();

        let vars: Vec<_> = full_vars()
            .into_iter()
            .filter(|(k, _)| *k != "shopify_access_token")
            .collect();

        let config = EnvConfigSource::from_vars(vars)
            .with_dotenv(dotenv.path())
            .load()
            .unwrap();
        assert_eq!(config.access_token().as_ref(), "from-dotenv");
        assert_eq!(config.store_name(), "acme");
    }

    #[test]
    fn test_missing_dotenv_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = EnvConfigSource::from_vars(full_vars())
            .with_dotenv(dir.path().join(".env"))
            .load()
            .unwrap();
        assert_eq!(config.store_name(), "acme");
    }

    #[test]
    fn test_describe_mentions_dotenv() {
        let source = EnvConfigSource::from_vars(full_vars()).with_dotenv("/x/.env");
        assert_eq!(source.describe(), "environment (dotenv '/x/.env')");
        assert_eq!(source.without_dotenv().describe(), "environment");
    }

    #[test]
    fn test_new_uses_local_dotenv() {
        let source = EnvConfigSource::new();
        assert_eq!(source.dotenv_path(), Some(Path::new(".env")));
    }
}
