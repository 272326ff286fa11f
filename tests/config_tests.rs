//! Tests for service configuration loading

use action_router::config::{ApiInfo, ServiceConfig, ENV_PATH_PREFIX, ENV_TITLE, ENV_URLS};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(
        r#"
path_prefix = "/api"

[info]
title = "Blog API"
description = "Posts and comments"
version = "1.2.0"
urls = ["https://blog.example.com"]
"#,
    );
    let config = ServiceConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.path_prefix, "/api");
    assert_eq!(
        config.info,
        ApiInfo::new("Blog API", "1.2.0")
            .with_description("Posts and comments")
            .with_url("https://blog.example.com")
    );
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("[info]\ntitle = \"Only title\"\n");
    let config = ServiceConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.info.title, "Only title");
    assert_eq!(config.info.version, "1.0.0");
    assert!(config.info.urls.is_empty());
    assert_eq!(config.path_prefix, "");
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
    assert_eq!(config.info, ApiInfo::default());
}

#[test]
fn test_invalid_files_are_rejected() {
    let file = write_config("path_prefix = [1, 2]");
    let err = ServiceConfig::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Invalid service config"));

    let file = write_config("[info]\nurls = [\"not a url\"]\n");
    assert!(ServiceConfig::load(Some(file.path())).is_err());

    let file = write_config("path_prefix = \"/api/\"\n");
    assert!(ServiceConfig::load(Some(file.path())).is_err());
}

#[test]
fn test_overrides_replace_file_values() {
    let mut config =
        ServiceConfig::from_toml_str("path_prefix = \"/v1\"\n[info]\ntitle = \"File\"\n").unwrap();
    let env: HashMap<&str, &str> = HashMap::from([
        (ENV_TITLE, "Env"),
        (ENV_URLS, "https://a.example.com, https://b.example.com,"),
        (ENV_PATH_PREFIX, "/v2"),
    ]);
    config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.info.title, "Env");
    assert_eq!(
        config.info.urls,
        vec!["https://a.example.com", "https://b.example.com"]
    );
    assert_eq!(config.path_prefix, "/v2");
    assert!(config.validate().is_ok());
}

#[test]
fn test_prefix_validation() {
    let mut config = ServiceConfig::default();
    for (prefix, ok) in [("", true), ("/api", true), ("api", false), ("/api/", false)] {
        config.path_prefix = prefix.to_string();
        assert_eq!(config.validate().is_ok(), ok, "prefix {prefix:?}");
    }
}
