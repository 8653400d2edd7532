//! User payloads and normalization.
//!
//! User lookups go through the tracker's search endpoint, which returns an
//! array of candidates; only the first match is used. An empty result is not
//! an error: a deterministic fallback record is synthesized from the
//! requested handle instead, so unknown users behave like known ones.
//!
//! Both the real-record and fallback paths produce the same `display_name`
//! field: real records map the tracker's `name` (defaulting to the handle
//! when absent), the fallback uses the handle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// As-received user payload from the tracker API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    /// The user's login handle.
    pub username: String,
    /// The user's profile URL.
    pub web_url: String,
    /// The user's display name, when set.
    #[serde(default)]
    pub name: Option<String>,
    /// Every other raw field, passed through to the normalized record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A user in the stable caller-facing schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's login handle.
    pub login: String,
    /// The user's display name; equals `login` when the tracker has none.
    pub display_name: String,
    /// The user's profile URL.
    pub profile_url: String,
    /// Raw fields outside the stable schema, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Synthesizes the record for a handle the tracker does not know.
    ///
    /// The result is fully deterministic: the display name is the handle and
    /// the profile URL is `<host>/<login>`.
    #[must_use]
    pub fn fallback(host: &str, login: &str) -> Self {
        Self {
            login: login.to_string(),
            display_name: login.to_string(),
            profile_url: format!("{host}/{login}"),
            extra: Map::new(),
        }
    }
}

impl RawUser {
    /// Normalizes the raw payload into the stable schema.
    #[must_use]
    pub fn into_user(self) -> User {
        let RawUser {
            username,
            web_url,
            name,
            extra,
        } = self;

        let display_name = name.unwrap_or_else(|| username.clone());
        User {
            login: username,
            display_name,
            profile_url: web_url,
            extra,
        }
    }
}
