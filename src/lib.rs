//! GitLab issue tracker API client.
//!
//! This crate provides a thin, authenticated adapter over GitLab-shaped
//! issue tracker endpoints, normalizing responses into a stable schema and
//! optionally caching raw responses on disk.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - [`GitLabClient`]: the API client with token authentication
//! - [`Options`]: caller configuration (repository, root path, cache dir)
//! - [`Issue`] and [`User`]: the normalized, caller-facing record types
//! - [`auth::TokenSource`]: injected credential resolution
//! - [`cache::ResponseCache`]: injected response caching
//! - [`Error`]: error types for tracker API operations
//!
//! # Authentication
//!
//! A token is required: construction fails with [`Error::MissingAuthToken`]
//! when the injected [`auth::TokenSource`] yields none, so a client can
//! never exist in an unauthenticated state. [`auth::EnvTokenSource`] reads
//! the `AUTH_TOKEN` environment variable; [`auth::StaticTokenSource`] wraps
//! a token resolved elsewhere. Tokens are held as
//! [`secrecy::SecretString`] to prevent accidental logging.
//!
//! # Normalization
//!
//! Responses are remapped into the stable schema ([`Issue`], [`User`]);
//! fields outside that schema ride through unchanged on each record's
//! flattened `extra` map. A user lookup that matches nothing synthesizes a
//! deterministic fallback record rather than failing.
//!
//! # Caching
//!
//! With a cache directory configured, raw responses are stored under
//! `<root_path>/<cache_dir>/github`, keyed by request URL. Any
//! [`cache::ResponseCache`] implementation can be injected in its place via
//! [`GitLabClient::with_cache`].
//!
//! # Examples
//!
//! ```no_run
//! use gitlab_issues::{GitLabClient, Options, auth::EnvTokenSource};
//!
//! # async fn example() -> gitlab_issues::Result<()> {
//! let options = Options::new("org/repo", "/home/me/project").with_cache_dir(".changelog");
//! let client = GitLabClient::new(&options, &EnvTokenSource::new())?;
//!
//! let issue = client.issue_data("org/repo", 42).await?;
//! println!("#{} {} by {}", issue.number, issue.title, issue.author.login);
//!
//! let user = client.user_data(&issue.author.login).await?;
//! println!("{} <{}>", user.display_name, user.profile_url);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod issue;
pub mod user;

pub use client::{DEFAULT_HOST, GitLabClient};
pub use config::Options;
pub use error::{Error, Result};
pub use issue::{Author, Issue, Label};
pub use user::User;
