//! Static file resolution.
//!
//! A request path is resolved by appending it to the static root. The root
//! is itself resolved against a base directory after stripping any leading
//! separators, so `/webroot` and `webroot` name the same directory.

use anyhow::{Context, Result};
use std::path::{is_separator, Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tokio::fs;

use crate::config::StaticFilesConfig;
use crate::http::mime;

/// A file found under the static root.
#[derive(Debug)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

pub struct StaticFiles {
    base_dir: PathBuf,
    root: RwLock<PathBuf>,
    index_file: String,
}

impl StaticFiles {
    pub fn new(config: &StaticFilesConfig) -> Self {
        let base_dir = PathBuf::from(&config.base_dir);
        let root = normalize_root(&base_dir, &config.root);
        Self {
            base_dir,
            root: RwLock::new(root),
            index_file: config.index_file.clone(),
        }
    }

    /// Points the resolver at a new root, with or without a leading
    /// separator.
    pub fn set_root(&self, root: &str) {
        let root = normalize_root(&self.base_dir, root);
        tracing::info!(root = %root.display(), "Static root configured");
        *self.root.write().unwrap_or_else(PoisonError::into_inner) = root;
    }

    pub fn root(&self) -> PathBuf {
        self.root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Filesystem path a request path maps to, before any existence check.
    pub fn candidate_path(&self, request_path: &str) -> PathBuf {
        let relative = request_path.trim_start_matches(is_separator);
        self.root().join(relative)
    }

    /// Looks up `request_path` under the root.
    ///
    /// `Ok(None)` means not found: no regular file there, or the path
    /// escapes the root. `Err` is an I/O failure on a file that exists.
    pub async fn resolve(&self, request_path: &str) -> Result<Option<StaticFile>> {
        let root = self.root();
        let mut candidate = self.candidate_path(request_path);

        if request_path.ends_with('/') || is_dir(&candidate).await {
            candidate = candidate.join(&self.index_file);
        }

        let Ok(root_canonical) = fs::canonicalize(&root).await else {
            tracing::warn!(root = %root.display(), "Static root not found or inaccessible");
            return Ok(None);
        };
        let Ok(file_canonical) = fs::canonicalize(&candidate).await else {
            tracing::trace!(path = %candidate.display(), "Static file not found");
            return Ok(None);
        };

        if !file_canonical.starts_with(&root_canonical) {
            tracing::warn!(path = %request_path, "Request path escapes static root");
            return Ok(None);
        }

        match fs::metadata(&file_canonical).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Ok(None),
        }

        let content = fs::read(&file_canonical)
            .await
            .with_context(|| format!("failed to read {}", file_canonical.display()))?;

        tracing::debug!(path = %file_canonical.display(), bytes = content.len(), "Static file resolved");

        Ok(Some(StaticFile {
            content_type: mime::content_type_for_path(&file_canonical),
            path: file_canonical,
            content,
        }))
    }
}

fn normalize_root(base_dir: &Path, root: &str) -> PathBuf {
    base_dir.join(root.trim_start_matches(is_separator))
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false)
}
