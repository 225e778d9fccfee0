//! Static file serving.
//!
//! # Responsibilities
//! - Map a request path onto a file under the static root
//! - Reject anything that escapes the root (`..`, symlinks pointing out)
//! - Infer the content type from the file suffix
//!
//! # Design Decisions
//! - Content type is suffix-based only: `.css` is `text/css`, everything
//!   else `text/html`
//! - Hidden path segments (leading `.`) are never served
//! - Containment is checked on canonical paths, after symlink resolution

use std::io;
use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;

use crate::config::StaticFilesConfig;

/// A file read from the static root.
#[derive(Debug, Clone)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content: Bytes,
    pub content_type: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum StaticFileError {
    #[error("request path '{0}' is not servable")]
    InvalidPath(String),

    #[error("'{}' resolves outside the static root", .0.display())]
    OutsideRoot(PathBuf),

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Suffix-based content type.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("css") => "text/css",
        _ => "text/html",
    }
}

/// Files served from one root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index: String,
}

impl StaticFiles {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            root: config.root.clone(),
            index: config.index.clone(),
        }
    }

    /// Lexically map a request path to a path under the root.
    ///
    /// `/` maps to the index document. Returns `None` for parent-directory
    /// segments and hidden segments.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        if relative.is_empty() {
            return Some(self.root.join(&self.index));
        }

        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(segment) => {
                    if segment.to_str().map_or(true, |s| s.starts_with('.')) {
                        return None;
                    }
                    resolved.push(segment);
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }

    /// Resolve, contain and read the file for `request_path`.
    pub async fn load(&self, request_path: &str) -> Result<StaticFile, StaticFileError> {
        let mut path = self
            .resolve(request_path)
            .ok_or_else(|| StaticFileError::InvalidPath(request_path.to_string()))?;

        if tokio::fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            path.push(&self.index);
        }

        let root = canonical(&self.root).await?;
        let canonical_path = canonical(&path).await?;
        if !canonical_path.starts_with(&root) {
            return Err(StaticFileError::OutsideRoot(canonical_path));
        }

        let content = tokio::fs::read(&canonical_path)
            .await
            .map_err(|source| StaticFileError::Io {
                path: canonical_path.clone(),
                source,
            })?;

        Ok(StaticFile {
            content_type: content_type_for(&path),
            content: Bytes::from(content),
            path,
        })
    }
}

async fn canonical(path: &Path) -> Result<PathBuf, StaticFileError> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|source| StaticFileError::Io {
            path: path.to_path_buf(),
            source,
        })
}
