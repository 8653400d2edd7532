//! Tracker API client implementation.
//!
//! This module provides the [`GitLabClient`] struct for fetching issues and
//! users from GitLab-shaped tracker endpoints. Every request carries the
//! token resolved at construction, and raw responses are optionally served
//! from and stored in an injected [`ResponseCache`].

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::header;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::auth::TokenSource;
use crate::cache::{CachedResponse, DiskCache, ResponseCache};
use crate::config::Options;
use crate::error::{Error, Result};
use crate::issue::{Issue, RawIssue};
use crate::user::{RawUser, User};

/// The default tracker host.
pub const DEFAULT_HOST: &str = "https://gitlab.com";

/// Characters escaped when a repository path is used as a single URL path
/// segment. The tracker addresses projects by their URL-encoded full path,
/// so `/` in particular must become `%2F`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// Tracker API client with token authentication and optional response
/// caching.
///
/// The client holds only immutable configuration after construction, so
/// concurrent calls need no synchronization. Each operation issues at most
/// one outbound request; failures surface immediately without retries.
///
/// # Examples
///
/// ```no_run
/// use gitlab_issues::{GitLabClient, Options, auth::EnvTokenSource};
///
/// # async fn example() -> gitlab_issues::Result<()> {
/// let options = Options::new("org/repo", "/home/me/project").with_cache_dir(".changelog");
/// let client = GitLabClient::new(&options, &EnvTokenSource::new())?;
///
/// let issue = client.issue_data("org/repo", 42).await?;
/// println!("#{}: {}", issue.number, issue.title);
/// # Ok(())
/// # }
/// ```
pub struct GitLabClient {
    /// Reusable HTTP client with connection pooling.
    http: reqwest::Client,
    /// The token sent with every request.
    token: SecretString,
    /// Tracker host, without a trailing slash.
    host: String,
    /// The repository the client was created for.
    repository: String,
    /// Response cache, when one is configured or injected.
    cache: Option<Box<dyn ResponseCache>>,
}

impl GitLabClient {
    /// Creates a client for the default host.
    ///
    /// Resolves the token from `tokens` and, when `options.cache_dir` is set,
    /// opens a [`DiskCache`] at `options.cache_path()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAuthToken`] when the token source yields no
    /// token, and an I/O error when the cache directory cannot be created.
    /// The client must never exist in an unauthenticated state.
    #[instrument(skip(options, tokens), fields(repository = %options.repository))]
    pub fn new(options: &Options, tokens: &dyn TokenSource) -> Result<Self> {
        Self::with_host(options, tokens, DEFAULT_HOST)
    }

    /// Creates a client for a custom tracker host.
    ///
    /// # Errors
    ///
    /// Same as [`GitLabClient::new`].
    pub fn with_host(
        options: &Options,
        tokens: &dyn TokenSource,
        host: impl Into<String>,
    ) -> Result<Self> {
        let token = tokens.token().ok_or(Error::MissingAuthToken)?;

        let cache = match options.cache_path() {
            Some(path) => {
                debug!(?path, "enabling on-disk response cache");
                Some(Box::new(DiskCache::new(path)?) as Box<dyn ResponseCache>)
            }
            None => None,
        };

        let host = host.into();
        Ok(Self {
            http: reqwest::Client::new(),
            token,
            host: host.trim_end_matches('/').to_string(),
            repository: options.repository.clone(),
            cache,
        })
    }

    /// Replaces the response cache with an injected implementation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gitlab_issues::{GitLabClient, Options, auth::StaticTokenSource, cache::MemoryCache};
    ///
    /// # fn example() -> gitlab_issues::Result<()> {
    /// let options = Options::new("org/repo", "/tmp");
    /// let client = GitLabClient::new(&options, &StaticTokenSource::new("glpat-xxx"))?
    ///     .with_cache(Box::new(MemoryCache::new()));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_cache(mut self, cache: Box<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Returns the repository the client was created for.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the URL prefix under which a repository's issues live.
    ///
    /// Pure string construction; never touches the network. Callers append
    /// an issue number to build a link.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use gitlab_issues::{GitLabClient, Options, auth::StaticTokenSource};
    /// # fn example() -> gitlab_issues::Result<()> {
    /// # let options = Options::new("org/repo", "/tmp");
    /// # let client = GitLabClient::new(&options, &StaticTokenSource::new("t"))?;
    /// assert_eq!(
    ///     client.issue_url_prefix("org/repo"),
    ///     "https://gitlab.com/org/repo/-/issues/"
    /// );
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn issue_url_prefix(&self, repository: &str) -> String {
        format!("{}/{}/-/issues/", self.host, repository)
    }

    /// Fetches a single issue and normalizes it into the stable schema.
    ///
    /// The repository path is URL-encoded into a single path segment
    /// (`org/repo` becomes `org%2Frepo`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] for non-success responses,
    /// [`Error::MalformedResponse`] when the payload is missing expected
    /// fields (such as the author), and [`Error::Json`] when the body is not
    /// valid JSON.
    #[instrument(skip(self))]
    pub async fn issue_data(&self, repository: &str, issue: u64) -> Result<Issue> {
        let url = format!(
            "{}/api/v4/projects/{}/issues/{}",
            self.host,
            encode_repository(repository),
            issue
        );

        let body = self.fetch(&url).await?;
        let raw: RawIssue = serde_json::from_value(body).map_err(|e| Error::MalformedResponse {
            reason: e.to_string(),
        })?;

        Ok(raw.into_issue())
    }

    /// Looks up a user by login handle and normalizes the result.
    ///
    /// The tracker's user search allows fuzzy matches, so only the first
    /// element of the response is used. When no user matches, a deterministic
    /// fallback record is synthesized instead of failing; unknown users are a
    /// normal case, not an exceptional one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] for non-success responses and
    /// [`Error::MalformedResponse`] when the payload is not the expected
    /// array shape.
    #[instrument(skip(self))]
    pub async fn user_data(&self, login: &str) -> Result<User> {
        let url = format!("{}/api/v4/users?username={}", self.host, login);

        let body = self.fetch(&url).await?;
        let raw: Vec<RawUser> = serde_json::from_value(body).map_err(|e| {
            Error::MalformedResponse {
                reason: e.to_string(),
            }
        })?;

        Ok(match raw.into_iter().next() {
            Some(user) => user.into_user(),
            None => {
                debug!(login, "no matching user, synthesizing fallback record");
                User::fallback(&self.host, login)
            }
        })
    }

    /// Issues an authenticated `GET` and returns the parsed body.
    ///
    /// The cache is consulted first; a cache read failure falls back to the
    /// network rather than failing the call. The body is parsed as JSON
    /// regardless of status, so error payloads keep their diagnostics.
    /// Successful bodies are stored in the cache; non-success statuses are
    /// classified as [`Error::Fetch`].
    async fn fetch(&self, url: &str) -> Result<serde_json::Value> {
        if let Some(cache) = &self.cache {
            match cache.load(url) {
                Ok(Some(hit)) => {
                    debug!(url, "serving response from cache");
                    return Ok(serde_json::from_str(&hit.body)?);
                }
                Ok(None) => {}
                Err(e) => warn!(url, error = %e, "cache read failed, fetching from network"),
            }
        }

        debug!(url, "GET");
        let response = self
            .http
            .get(url)
            .header(
                header::AUTHORIZATION,
                format!("token {}", self.token.expose_secret()),
            )
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let parsed: serde_json::Value = serde_json::from_str(&text)?;

        if !status.is_success() {
            return Err(Error::Fetch {
                status: status
                    .canonical_reason()
                    .map_or_else(|| status.to_string(), str::to_string),
                body: parsed.to_string(),
            });
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(url, &CachedResponse::new(&text)) {
                warn!(url, error = %e, "failed to store response in cache");
            }
        }

        Ok(parsed)
    }
}

/// URL-encodes a repository path for use as a single path segment.
fn encode_repository(repository: &str) -> String {
    utf8_percent_encode(repository, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenSource;

    struct NoToken;

    impl TokenSource for NoToken {
        fn token(&self) -> Option<SecretString> {
            None
        }
    }

    fn test_options() -> Options {
        Options::new("org/repo", "/tmp/project")
    }

    #[test]
    fn encode_repository_escapes_path_separators() {
        assert_eq!(encode_repository("org/repo"), "org%2Frepo");
        assert_eq!(encode_repository("group/sub/repo"), "group%2Fsub%2Frepo");
        assert_eq!(encode_repository("plain"), "plain");
    }

    #[test]
    fn new_fails_without_token() {
        let result = GitLabClient::new(&test_options(), &NoToken);
        assert!(matches!(result, Err(Error::MissingAuthToken)));
    }

    #[test]
    fn new_fails_without_token_even_with_cache_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = Options::new("org/repo", temp.path()).with_cache_dir(".cache");
        let result = GitLabClient::new(&options, &NoToken);
        assert!(matches!(result, Err(Error::MissingAuthToken)));
    }

    #[test]
    fn new_succeeds_with_static_token() {
        let client = GitLabClient::new(&test_options(), &StaticTokenSource::new("glpat-xxx"))
            .expect("construction should succeed");
        assert_eq!(client.repository(), "org/repo");
    }

    #[test]
    fn issue_url_prefix_is_pure() {
        let client =
            GitLabClient::new(&test_options(), &StaticTokenSource::new("glpat-xxx")).unwrap();

        let first = client.issue_url_prefix("org/repo");
        let second = client.issue_url_prefix("org/repo");
        assert_eq!(first, "https://gitlab.com/org/repo/-/issues/");
        assert_eq!(first, second);
    }

    #[test]
    fn with_host_strips_trailing_slash() {
        let client = GitLabClient::with_host(
            &test_options(),
            &StaticTokenSource::new("glpat-xxx"),
            "https://tracker.example.test/",
        )
        .unwrap();

        assert_eq!(
            client.issue_url_prefix("org/repo"),
            "https://tracker.example.test/org/repo/-/issues/"
        );
    }
}
