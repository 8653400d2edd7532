//! Error types for tracker API operations.
//!
//! This module defines the error types that can occur while constructing the
//! client, fetching from the tracker API, or reading and writing the response
//! cache.

/// Errors that can occur during tracker API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No authentication token could be resolved at construction time.
    ///
    /// The client refuses to exist in an unauthenticated state; callers must
    /// provide a [`TokenSource`](crate::auth::TokenSource) that yields a
    /// non-empty token.
    #[error("no authentication token available (set AUTH_TOKEN or supply a token source)")]
    MissingAuthToken,

    /// The tracker responded with a non-success status.
    ///
    /// Carries the HTTP status text and the serialized response body so the
    /// remote's own diagnostics are not lost.
    #[error("fetch error: {status}.\n{body}")]
    Fetch {
        /// The HTTP status text (e.g. `"Not Found"`).
        status: String,
        /// The response body, re-serialized as JSON.
        body: String,
    },

    /// The tracker returned a payload that does not match the expected schema.
    ///
    /// For example, an issue response without an `author` object.
    #[error("malformed tracker response: {reason}")]
    MalformedResponse {
        /// A description of what was missing or mistyped.
        reason: String,
    },

    /// The HTTP transport failed before a response was available.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("failed to parse response body: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred during a cache operation.
    #[error("I/O error during cache operation: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for tracker API operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_auth_token() {
        let err = Error::MissingAuthToken;
        assert!(err.to_string().contains("no authentication token"));
    }

    #[test]
    fn error_display_fetch_includes_status_and_body() {
        let err = Error::Fetch {
            status: "Not Found".to_string(),
            body: r#"{"message":"404 Project Not Found"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            "fetch error: Not Found.\n{\"message\":\"404 Project Not Found\"}"
        );
    }

    #[test]
    fn error_display_malformed_response() {
        let err = Error::MalformedResponse {
            reason: "missing field `author`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed tracker response: missing field `author`"
        );
    }

    #[test]
    fn error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.to_string().contains("I/O error during cache operation"));
    }
}
