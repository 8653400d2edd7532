//! Issue payloads and normalization.
//!
//! The tracker's as-received issue shape ([`RawIssue`]) is transient: it is
//! decoded from the response body, normalized into [`Issue`], and never
//! exposed to callers. Normalization remaps the tracker's field names into
//! the stable schema and carries every other raw field through untouched.
//!
//! | Raw field         | Normalized field      |
//! |-------------------|-----------------------|
//! | `iid`             | `number`              |
//! | `labels` (strings)| `labels` (`Label`)    |
//! | `author.username` | `author.login`        |
//! | `author.web_url`  | `author.profile_url`  |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// As-received issue payload from the tracker API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    /// The tracker's project-scoped issue index.
    pub iid: u64,
    /// Issue title.
    pub title: String,
    /// Flat list of label names.
    #[serde(default)]
    pub labels: Vec<String>,
    /// The issue author.
    pub author: RawAuthor,
    /// Link to an associated pull request, when one exists.
    #[serde(default)]
    pub pull_request: Option<RawPullRequest>,
    /// Every other raw field, passed through to the normalized record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// As-received author object nested in an issue payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthor {
    /// The author's login handle.
    pub username: String,
    /// The author's profile URL.
    pub web_url: String,
}

/// As-received pull request reference nested in an issue payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPullRequest {
    /// The pull request URL.
    pub html_url: String,
}

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The label name.
    pub name: String,
}

/// An issue author in the stable schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// The author's login handle.
    pub login: String,
    /// The author's profile URL.
    pub profile_url: String,
}

/// An issue in the stable caller-facing schema.
///
/// Every successful fetch produces a fully-populated record; partial records
/// are never returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// The issue number within its repository.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Link to an associated pull request, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_url: Option<String>,
    /// Labels in the order the tracker returned them, without deduplication.
    pub labels: Vec<Label>,
    /// The issue author.
    pub author: Author,
    /// Raw fields outside the stable schema, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawIssue {
    /// Normalizes the raw payload into the stable schema.
    #[must_use]
    pub fn into_issue(self) -> Issue {
        let RawIssue {
            iid,
            title,
            labels,
            author,
            pull_request,
            extra,
        } = self;

        Issue {
            number: iid,
            title,
            pull_request_url: pull_request.map(|pr| pr.html_url),
            labels: labels.into_iter().map(|name| Label { name }).collect(),
            author: Author {
                login: author.username,
                profile_url: author.web_url,
            },
            extra,
        }
    }
}
