//! Authentication token resolution.
//!
//! The client never reads process environment on its own; it is handed a
//! [`TokenSource`] at construction and resolves the token exactly once.
//! Two sources are provided:
//!
//! - [`EnvTokenSource`]: reads the `AUTH_TOKEN` environment variable
//! - [`StaticTokenSource`]: wraps a token the caller resolved elsewhere
//!
//! Tokens are handled as [`secrecy::SecretString`] to prevent accidental
//! logging of credentials.

use secrecy::SecretString;

/// A source of the authentication token used for tracker requests.
///
/// Returning `None` means no token is available from this source; the client
/// treats that as a fatal construction error.
pub trait TokenSource {
    /// Returns the token, if one is available.
    fn token(&self) -> Option<SecretString>;
}

/// Reads the token from an environment variable.
///
/// An unset variable and an empty value are both treated as "no token".
///
/// # Examples
///
/// ```no_run
/// use gitlab_issues::auth::{EnvTokenSource, TokenSource};
///
/// let source = EnvTokenSource::new();
/// if source.token().is_none() {
///     eprintln!("AUTH_TOKEN is not set");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct EnvTokenSource {
    var: String,
}

impl EnvTokenSource {
    /// The environment variable consulted by [`EnvTokenSource::new`].
    pub const DEFAULT_VAR: &'static str = "AUTH_TOKEN";

    /// Creates a source reading [`Self::DEFAULT_VAR`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_var(Self::DEFAULT_VAR)
    }

    /// Creates a source reading a custom environment variable.
    #[must_use]
    pub fn from_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvTokenSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSource for EnvTokenSource {
    fn token(&self) -> Option<SecretString> {
        match std::env::var(&self.var) {
            Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
            _ => None,
        }
    }
}

/// A fixed token, for callers that resolve credentials themselves.
///
/// # Examples
///
/// ```
/// use gitlab_issues::auth::{StaticTokenSource, TokenSource};
///
/// let source = StaticTokenSource::new("glpat-xxx");
/// assert!(source.token().is_some());
/// ```
#[derive(Clone)]
pub struct StaticTokenSource {
    token: SecretString,
}

impl StaticTokenSource {
    /// Wraps an already-resolved token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self) -> Option<SecretString> {
        Some(self.token.clone())
    }
}
