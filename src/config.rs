//! # Service Configuration
//!
//! API information and the route path prefix, loaded from an optional TOML
//! file and then overridden by environment variables.
//!
//! ## File format
//!
//! ```toml
//! path_prefix = "/api"
//!
//! [info]
//! title = "Blog API"
//! description = "Posts and comments"
//! version = "1.2.0"
//! urls = ["https://blog.example.com"]
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Overrides |
//! |---|---|
//! | `ACTION_ROUTER_TITLE` | `info.title` |
//! | `ACTION_ROUTER_DESCRIPTION` | `info.description` |
//! | `ACTION_ROUTER_VERSION` | `info.version` |
//! | `ACTION_ROUTER_URLS` | `info.urls` (comma separated) |
//! | `ACTION_ROUTER_PATH_PREFIX` | `path_prefix` |

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

pub const ENV_TITLE: &str = "ACTION_ROUTER_TITLE";
pub const ENV_DESCRIPTION: &str = "ACTION_ROUTER_DESCRIPTION";
pub const ENV_VERSION: &str = "ACTION_ROUTER_VERSION";
pub const ENV_URLS: &str = "ACTION_ROUTER_URLS";
pub const ENV_PATH_PREFIX: &str = "ACTION_ROUTER_PATH_PREFIX";

/// Document-level information: title, description, version and server URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
    pub version: String,
    /// Base URLs, one `servers` entry each
    pub urls: Vec<String>,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Action Router API".to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
            urls: Vec::new(),
        }
    }
}

impl ApiInfo {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub info: ApiInfo,
    /// Prepended to every registered route path (e.g. `/api`)
    pub path_prefix: String,
}

impl ServiceConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse service config")
    }

    /// Load from `path` (defaults when absent), apply environment overrides
    /// and validate.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed, or when the
    /// resulting configuration is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read service config: {}", path.display()))?;
                Self::from_toml_str(&contents)
                    .with_context(|| format!("Invalid service config: {}", path.display()))?
            }
            Some(path) => {
                debug!(path = %path.display(), "Service config not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;

        info!(
            title = %config.info.title,
            version = %config.info.version,
            servers = config.info.urls.len(),
            path_prefix = %config.path_prefix,
            "Service config loaded"
        );
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(title) = lookup(ENV_TITLE) {
            self.info.title = title;
        }
        if let Some(description) = lookup(ENV_DESCRIPTION) {
            self.info.description = description;
        }
        if let Some(version) = lookup(ENV_VERSION) {
            self.info.version = version;
        }
        if let Some(urls) = lookup(ENV_URLS) {
            self.info.urls = urls
                .split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(prefix) = lookup(ENV_PATH_PREFIX) {
            self.path_prefix = prefix;
        }
    }

    /// Check server URLs and the path prefix.
    ///
    /// # Errors
    ///
    /// Fails on an unparseable or relative server URL, or a non-empty prefix
    /// that does not start with `/` or ends with `/`.
    pub fn validate(&self) -> anyhow::Result<()> {
        for raw in &self.info.urls {
            url::Url::parse(raw).with_context(|| format!("Invalid server URL: {raw}"))?;
        }
        if !self.path_prefix.is_empty() {
            if !self.path_prefix.starts_with('/') {
                bail!("path_prefix must start with '/': {}", self.path_prefix);
            }
            if self.path_prefix.ends_with('/') {
                bail!("path_prefix must not end with '/': {}", self.path_prefix);
            }
        }
        Ok(())
    }
}
