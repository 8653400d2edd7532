//! Response caching for tracker requests.
//!
//! The client treats the cache as an injected collaborator: anything
//! implementing [`ResponseCache`] can stand in for the on-disk store. Cached
//! entries are raw response bodies keyed by request URL.
//!
//! # Directory structure
//!
//! With a cache directory of `.changelog` the disk layout is:
//!
//! ```text
//! <root_path>/
//! └── .changelog/
//!     └── github/
//!         └── {sanitized-request-url}.json
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//! use gitlab_issues::cache::{CachedResponse, DiskCache, ResponseCache};
//!
//! # fn example() -> gitlab_issues::Result<()> {
//! let cache = DiskCache::new(PathBuf::from("/tmp/cache/github"))?;
//!
//! cache.store("https://example.test/a", &CachedResponse::new("{}"))?;
//! assert!(cache.load("https://example.test/a")?.is_some());
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// A cached raw response body with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    /// The raw response body as received from the tracker.
    pub body: String,
    /// When the response was cached.
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    /// Creates a cached response with the current timestamp.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            cached_at: Utc::now(),
        }
    }

    /// Returns the age of the entry.
    #[must_use]
    pub fn age(&self) -> Duration {
        let diff = Utc::now().signed_duration_since(self.cached_at);
        // Clock skew can place cached_at in the future; clamp to zero.
        diff.to_std().unwrap_or(Duration::ZERO)
    }
}

/// Storage for raw tracker responses, keyed by request URL.
///
/// The client only loads and stores entries; eviction and staleness policy
/// belong to the implementation.
pub trait ResponseCache: Send + Sync {
    /// Loads the cached response for a request URL, if present.
    fn load(&self, key: &str) -> Result<Option<CachedResponse>>;

    /// Stores a response for a request URL, replacing any existing entry.
    fn store(&self, key: &str, response: &CachedResponse) -> Result<()>;
}

/// On-disk response cache.
///
/// Entries are JSON files named after the sanitized request URL, one file
/// per URL.
#[derive(Debug)]
pub struct DiskCache {
    base_path: PathBuf,
}

impl DiskCache {
    /// Creates a cache rooted at `base_path`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[instrument]
    pub fn new(base_path: PathBuf) -> Result<Self> {
        if !base_path.exists() {
            debug!(?base_path, "creating cache directory");
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    /// Returns the entry file path for a request URL.
    ///
    /// URLs contain characters that are not portable in filenames; everything
    /// outside `[A-Za-z0-9._-]` is replaced with `_`.
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{safe}.json"))
    }
}

impl ResponseCache for DiskCache {
    fn load(&self, key: &str) -> Result<Option<CachedResponse>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let cached: CachedResponse = serde_json::from_str(&content).map_err(|e| {
                    warn!(?path, error = %e, "failed to parse cache entry");
                    Error::Io(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("failed to parse cache entry: {e}"),
                    ))
                })?;
                debug!(?path, cached_at = %cached.cached_at, "cache hit");
                Ok(Some(cached))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                warn!(?path, error = %e, "failed to read cache entry");
                Err(Error::Io(e))
            }
        }
    }

    fn store(&self, key: &str, response: &CachedResponse) -> Result<()> {
        let path = self.entry_path(key);
        let content = serde_json::to_string_pretty(response).map_err(|e| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("failed to serialize cache entry: {e}"),
            ))
        })?;
        fs::write(&path, content)?;
        debug!(?path, "cache entry stored");
        Ok(())
    }
}

/// In-memory response cache.
///
/// Holds entries for the lifetime of the value; nothing is persisted. Useful
/// as a deterministic substitute for [`DiskCache`] in tests and embedded
/// callers.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl MemoryCache {
    /// Creates an empty in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Returns whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn load(&self, key: &str) -> Result<Option<CachedResponse>> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, response: &CachedResponse) -> Result<()> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key.to_string(), response.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (DiskCache, TempDir) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let cache =
            DiskCache::new(temp_dir.path().to_path_buf()).expect("failed to create cache");
        (cache, temp_dir)
    }

    #[test]
    fn entry_path_sanitizes_urls() {
        let (cache, _temp) = create_test_cache();

        let path = cache.entry_path("https://gitlab.com/api/v4/users?username=bob");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(name, "https___gitlab.com_api_v4_users_username_bob.json");
    }

    #[test]
    fn load_returns_none_for_missing_entry() {
        let (cache, _temp) = create_test_cache();

        let result = cache.load("https://example.test/none").expect("load");
        assert!(result.is_none());
    }

    #[test]
    fn store_and_load_roundtrip() {
        let (cache, _temp) = create_test_cache();

        let response = CachedResponse::new(r#"{"iid": 42}"#);
        cache.store("https://example.test/a", &response).expect("store");

        let loaded = cache
            .load("https://example.test/a")
            .expect("load")
            .expect("entry exists");
        assert_eq!(loaded.body, r#"{"iid": 42}"#);
    }

    #[test]
    fn store_overwrites_existing_entry() {
        let (cache, _temp) = create_test_cache();

        cache
            .store("https://example.test/a", &CachedResponse::new("old"))
            .expect("first store");
        cache
            .store("https://example.test/a", &CachedResponse::new("new"))
            .expect("second store");

        let loaded = cache
            .load("https://example.test/a")
            .expect("load")
            .expect("entry exists");
        assert_eq!(loaded.body, "new");
    }

    #[test]
    fn distinct_urls_are_isolated() {
        let (cache, _temp) = create_test_cache();

        cache
            .store("https://example.test/a", &CachedResponse::new("a"))
            .expect("store a");
        cache
            .store("https://example.test/b", &CachedResponse::new("b"))
            .expect("store b");

        let a = cache.load("https://example.test/a").unwrap().unwrap();
        let b = cache.load("https://example.test/b").unwrap().unwrap();
        assert_eq!(a.body, "a");
        assert_eq!(b.body, "b");
    }

    #[test]
    fn load_returns_error_for_invalid_entry() {
        let (cache, temp) = create_test_cache();

        let path = cache.entry_path("https://example.test/bad");
        fs::write(&path, "not valid json").expect("write invalid entry");
        let _ = temp;

        let result = cache.load("https://example.test/bad");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn new_creates_missing_directories() {
        let temp = TempDir::new().expect("temp dir");
        let nested = temp.path().join("cache").join("github");
        assert!(!nested.exists());

        let cache = DiskCache::new(nested.clone()).expect("create cache");
        assert!(nested.exists());

        cache
            .store("https://example.test/a", &CachedResponse::new("{}"))
            .expect("store");
    }

    #[test]
    fn cached_response_age_is_small_when_fresh() {
        let response = CachedResponse::new("{}");
        assert!(response.age().as_secs() < 1);
    }

    #[test]
    fn memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        assert!(cache.is_empty());

        cache
            .store("https://example.test/a", &CachedResponse::new("body"))
            .expect("store");
        assert_eq!(cache.len(), 1);

        let loaded = cache
            .load("https://example.test/a")
            .expect("load")
            .expect("entry exists");
        assert_eq!(loaded.body, "body");
    }

    #[test]
    fn memory_cache_misses_return_none() {
        let cache = MemoryCache::new();
        assert!(cache.load("https://example.test/none").unwrap().is_none());
    }
}
