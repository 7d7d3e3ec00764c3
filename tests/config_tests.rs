//! Integration tests for configuration sources and client construction.

use std::io::Write;

use shopify_http_client::{
    ConfigError, ConfigSource, ConfigSourceKind, EnvConfigSource, FileConfigSource, HttpClient,
};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_file_source_feeds_client() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        ".Shopify-Config.json",
        r#"{
            "shopify_store_name": "acme",
            "shopify_admin_api_version": "2023-10",
            "shopify_access_token": "shpat_file",
            "shopify_deafult_location": "555"
        }"#,
    );

    let client = HttpClient::from_source(FileConfigSource::new(&path)).unwrap();

    assert_eq!(
        client.admin_api_url(),
        "https://acme.myshopify.com/admin/api/2023-10"
    );
    assert_eq!(client.config().default_location(), Some("555"));
}

#[test]
fn test_reload_picks_up_file_changes() {
    let dir = tempfile::tempdir().unwrap();
    let body = |version: &str| {
        format!(
            r#"{{"shopify_store_name":"acme","shopify_admin_api_version":"{version}","shopify_access_token":"t"}}"#
        )
    };
    let path = write_file(&dir, "config.json", &body("2023-10"));

    let client = HttpClient::from_source(FileConfigSource::new(&path)).unwrap();
    assert_eq!(client.config().api_version(), "2023-10");

    write_file(&dir, "config.json", &body("2024-01"));
    client.reload().unwrap();
    assert_eq!(
        client.admin_api_url(),
        "https://acme.myshopify.com/admin/api/2024-01"
    );
}

#[test]
fn test_failed_reload_keeps_previous_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "config.json",
        r#"{"shopify_store_name":"acme","shopify_admin_api_version":"2023-10","shopify_access_token":"t"}"#,
    );

    let client = HttpClient::from_source(FileConfigSource::new(&path)).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        client.reload(),
        Err(ConfigError::FileNotFound { .. })
    ));
    assert_eq!(client.config().store_name(), "acme");
}

#[test]
fn test_env_source_with_dotenv_file() {
    let dir = tempfile::tempdir().unwrap();
    let dotenv = write_file(
        &dir,
        ".env",
        "shopify_store_name=acme\n\
         shopify_admin_api_version=2023-10\n\
         shopify_access_token=from-dotenv\n\
         shopify_deafult_location=77\n",
    );

    let source = EnvConfigSource::from_vars(Vec::<(String, String)>::new()).with_dotenv(&dotenv);
    let config = source.load().unwrap();

    assert_eq!(config.access_token().as_ref(), "from-dotenv");
    assert_eq!(config.default_location(), Some("77"));
}

#[test]
fn test_env_source_reports_first_missing_key() {
    let result = EnvConfigSource::from_vars([("shopify_store_name", "acme")]).load();

    assert_eq!(
        result,
        Err(ConfigError::MissingKey {
            key: "shopify_admin_api_version",
            origin: "environment".to_string(),
        })
    );
}

#[test]
fn test_source_kind_selects_implementation() {
    let env = ConfigSourceKind::Env.into_source().unwrap();
    assert!(env.describe().starts_with("environment"));
}
