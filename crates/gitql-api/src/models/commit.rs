//! Commit model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SimpleUser;

/// Git-level author or committer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitActor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// The `commit` object nested in a commit listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    #[serde(default)]
    pub author: Option<GitActor>,
    #[serde(default)]
    pub committer: Option<GitActor>,
}

/// A commit from `GET /repos/{owner}/{repo}/commits`.
///
/// `author`/`committer` at the top level are the linked GitHub accounts and
/// are null when the commit email does not map to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub commit: CommitDetails,
    #[serde(default)]
    pub author: Option<SimpleUser>,
    #[serde(default)]
    pub committer: Option<SimpleUser>,
}

impl Commit {
    /// GitHub login of the author, falling back to the git author name.
    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().map(|u| u.login.as_str()).or_else(|| {
            self.commit
                .author
                .as_ref()
                .and_then(|a| a.name.as_deref())
        })
    }

    /// GitHub login of the committer, falling back to the git committer name.
    pub fn committer_name(&self) -> Option<&str> {
        self.committer
            .as_ref()
            .map(|u| u.login.as_str())
            .or_else(|| {
                self.commit
                    .committer
                    .as_ref()
                    .and_then(|a| a.name.as_deref())
            })
    }

    /// Author date of the commit.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }
}
