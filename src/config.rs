//! Client configuration.
//!
//! [`Options`] carries the caller-supplied configuration: the repository the
//! client is created for, the project root path, and an optional cache
//! directory. When a cache directory is configured, raw responses are stored
//! under `<root_path>/<cache_dir>/github`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Subdirectory under the configured cache directory where responses live.
///
/// Named `github` for compatibility with caches written by earlier releases,
/// even though the remote API is GitLab-shaped.
const CACHE_SUBDIR: &str = "github";

/// Configuration for a [`GitLabClient`](crate::GitLabClient).
///
/// # Examples
///
/// ```
/// use gitlab_issues::Options;
///
/// let options = Options::new("org/repo", "/home/me/project").with_cache_dir(".changelog");
/// let cache = options.cache_path().unwrap();
/// assert!(cache.ends_with(".changelog/github"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// The repository the client is created for, in `"org/repo"` form.
    pub repository: String,
    /// The project root; cache paths are resolved relative to it.
    pub root_path: PathBuf,
    /// Cache directory relative to `root_path`. `None` disables caching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
}

impl Options {
    /// Creates options without a cache directory (caching disabled).
    #[must_use]
    pub fn new(repository: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            root_path: root_path.into(),
            cache_dir: None,
        }
    }

    /// Sets the cache directory, enabling response caching.
    #[must_use]
    pub fn with_cache_dir(mut self, cache_dir: impl Into<String>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Returns the effective on-disk cache location, if caching is enabled.
    ///
    /// The location is `<root_path>/<cache_dir>/github`; `None` when no cache
    /// directory was configured.
    #[must_use]
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| self.root_path.join(dir).join(CACHE_SUBDIR))
    }

}
