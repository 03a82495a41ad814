//! Issue and pull request models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Label, Milestone, SimpleUser};

/// Marker object GitHub attaches to issues that are pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLink {
    #[serde(default)]
    pub url: Option<String>,
}

/// An issue from `GET /repos/{owner}/{repo}/issues`.
///
/// The issues listing includes pull requests; those carry a
/// `pull_request` link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub user: Option<SimpleUser>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub pull_request: Option<PullRequestLink>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Returns true if this issue is actually a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// A pull request from `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    #[serde(default)]
    pub user: Option<SimpleUser>,
    #[serde(default)]
    pub assignee: Option<SimpleUser>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub draft: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}
