//! Source paths: the dotted `FROM` target of a query.

use std::fmt;
use std::str::FromStr;

use super::error::{SourceError, SourceResult};
use crate::suggest::find_similar_name;

/// The collection a source path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// `owner.repos`
    Repos,
    /// `owner.repo.issues`
    Issues,
    /// `owner.repo.pull_requests`
    PullRequests,
    /// `owner.repo.commits`
    Commits,
}

const REPO_FIELDS: &[&str] = &[
    "id",
    "name",
    "full_name",
    "description",
    "private",
    "fork",
    "language",
    "forks_count",
    "stargazers_count",
    "open_issues_count",
    "topics",
    "created_at",
    "updated_at",
];

const ISSUE_FIELDS: &[&str] = &[
    "id",
    "number",
    "title",
    "state",
    "user",
    "labels",
    "milestone",
    "comments",
    "is_pull_request",
    "created_at",
    "closed_at",
];

const PULL_REQUEST_FIELDS: &[&str] = &[
    "id",
    "number",
    "title",
    "state",
    "user",
    "assignee",
    "milestone",
    "draft",
    "created_at",
    "closed_at",
    "merged_at",
];

const COMMIT_FIELDS: &[&str] = &["sha", "author", "committer", "message", "date"];

const OWNER_KINDS: &[&str] = &["repos"];
const REPOSITORY_KINDS: &[&str] = &["issues", "pull_requests", "commits"];

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Repos => "repos",
            SourceKind::Issues => "issues",
            SourceKind::PullRequests => "pull_requests",
            SourceKind::Commits => "commits",
        }
    }

    /// Fields every record of this kind carries, in output order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            SourceKind::Repos => REPO_FIELDS,
            SourceKind::Issues => ISSUE_FIELDS,
            SourceKind::PullRequests => PULL_REQUEST_FIELDS,
            SourceKind::Commits => COMMIT_FIELDS,
        }
    }

    pub fn has_field(self, name: &str) -> bool {
        self.fields().contains(&name)
    }

    /// True for kinds that live under a repository rather than an owner.
    pub fn is_repository_scoped(self) -> bool {
        !matches!(self, SourceKind::Repos)
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment.to_ascii_lowercase().as_str() {
            "repos" => Some(SourceKind::Repos),
            "issues" => Some(SourceKind::Issues),
            "pull_requests" => Some(SourceKind::PullRequests),
            "commits" => Some(SourceKind::Commits),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `FROM` target.
///
/// # Example
///
/// ```
/// use gitql_engine::source::{SourceKind, SourcePath};
///
/// let path: SourcePath = "rust-lang.cargo.issues".parse().unwrap();
/// assert_eq!(path.owner, "rust-lang");
/// assert_eq!(path.repo.as_deref(), Some("cargo"));
/// assert_eq!(path.kind, SourceKind::Issues);
/// assert_eq!(path.identifier(), "rust-lang/cargo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourcePath {
    pub owner: String,
    pub repo: Option<String>,
    pub kind: SourceKind,
}

impl SourcePath {
    /// Parses `owner.repos` or `owner.repo.(issues|pull_requests|commits)`.
    ///
    /// Any segments between the owner and the kind form the repository name,
    /// so `owner.socket.io.issues` reads issues of `owner/socket.io`.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Malformed` for a wrong segment count, empty
    /// segments, or a kind used at the wrong depth, and
    /// `SourceError::UnknownKind` for an unrecognized last segment.
    pub fn parse(path: &str) -> SourceResult<Self> {
        let segments: Vec<&str> = path.split('.').collect();

        if segments.iter().any(|s| s.is_empty()) {
            return Err(SourceError::malformed(path, "empty path segment"));
        }

        match segments.as_slice() {
            [owner, kind] => {
                let kind = parse_kind(path, kind, OWNER_KINDS)?;
                if kind.is_repository_scoped() {
                    return Err(SourceError::malformed(
                        path,
                        format!("{} must be written as owner.repo.{}", kind, kind),
                    ));
                }
                Ok(SourcePath {
                    owner: owner.to_string(),
                    repo: None,
                    kind,
                })
            }
            // Repository names may themselves contain dots.
            [owner, repo @ .., kind] if !repo.is_empty() => {
                let kind = parse_kind(path, kind, REPOSITORY_KINDS)?;
                if !kind.is_repository_scoped() {
                    return Err(SourceError::malformed(
                        path,
                        "repos must be written as owner.repos",
                    ));
                }
                Ok(SourcePath {
                    owner: owner.to_string(),
                    repo: Some(repo.join(".")),
                    kind,
                })
            }
            _ => Err(SourceError::malformed(
                path,
                "expected owner.repos or owner.repo.<issues|pull_requests|commits>",
            )),
        }
    }

    /// Key identifying the resolved owner or repository, e.g. `owner/repo`.
    pub fn identifier(&self) -> String {
        match &self.repo {
            Some(repo) => format!("{}/{}", self.owner, repo),
            None => self.owner.clone(),
        }
    }
}

fn parse_kind(path: &str, segment: &str, expected: &[&str]) -> SourceResult<SourceKind> {
    SourceKind::from_segment(segment).ok_or_else(|| SourceError::UnknownKind {
        path: path.to_string(),
        kind: segment.to_string(),
        suggestion: find_similar_name(segment, expected.iter().copied()),
    })
}

impl FromStr for SourcePath {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourcePath::parse(s)
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repo {
            Some(repo) => write!(f, "{}.{}.{}", self.owner, repo, self.kind),
            None => write!(f, "{}.{}", self.owner, self.kind),
        }
    }
}
