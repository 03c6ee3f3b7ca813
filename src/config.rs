//! Server configuration.
//!
//! Values come from an optional YAML file and are then overridden by a few
//! environment variables (`LISTEN`, `STATIC_ROOT`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the acceptor binds to
    pub listen_addr: String,
    /// Upper bound for the request line plus headers
    pub max_header_bytes: usize,
    /// Upper bound for a Content-Length body, which is read and discarded
    pub max_body_bytes: usize,
    /// Prefix under which registered routes are reachable (e.g. "/app").
    /// Empty means routes match the bare request path.
    pub route_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory the static root is resolved against
    pub base_dir: String,
    /// Static root, with or without a leading separator
    pub root: String,
    /// File served for `/` and directory requests
    pub index_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:35000".to_string(),
            max_header_bytes: 64 * 1024,
            max_body_bytes: 1024 * 1024,
            route_prefix: String::new(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            base_dir: ".".to_string(),
            root: "webroot".to_string(),
            index_file: "index.html".to_string(),
        }
    }
}

impl Config {
    /// Defaults plus environment overrides.
    pub fn load() -> Self {
        Self::default().with_env_overrides()
    }

    /// Reads a YAML file, then applies environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Ok(Self::from_yaml_str(&raw)?.with_env_overrides())
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).context("invalid YAML configuration")
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(listen) = std::env::var("LISTEN") {
            self.server.listen_addr = listen;
        }
        if let Ok(root) = std::env::var("STATIC_ROOT") {
            self.static_files.root = root;
        }
        self
    }
}
