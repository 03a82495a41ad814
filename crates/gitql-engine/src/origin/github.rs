//! GitHub as a record origin.

use chrono::{DateTime, SecondsFormat, Utc};
use gitql_api::client::GithubClient;
use gitql_api::models::{Commit, Issue, PullRequest, Repository, User};
use gitql_api::Result;

use super::Origin;
use crate::cache::{LruCache, DEFAULT_CAPACITY};
use crate::record::{Datum, Record};
use crate::source::{SourceKind, SourcePath};

/// A resolved owner or repository, as remembered by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubResource {
    Owner(User),
    Repository(Repository),
}

/// Canonical names of a resolved source, one variant per source kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GithubHandle {
    Repos { owner: String },
    Issues { owner: String, repo: String },
    PullRequests { owner: String, repo: String },
    Commits { owner: String, repo: String },
}

/// [`Origin`] backed by the GitHub REST API.
///
/// Resolved owners and repositories are kept in an LRU cache for the lifetime
/// of the origin, so repeated queries against the same source skip the lookup.
#[derive(Debug)]
pub struct GithubOrigin {
    client: GithubClient,
    resolved: LruCache<String, GithubResource>,
}

impl GithubOrigin {
    pub fn new(client: GithubClient) -> Self {
        Self::with_capacity(client, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(client: GithubClient, capacity: usize) -> Self {
        Self {
            client,
            resolved: LruCache::new(capacity),
        }
    }

    pub fn client(&self) -> &GithubClient {
        &self.client
    }

    pub fn cache(&self) -> &LruCache<String, GithubResource> {
        &self.resolved
    }

    async fn resolve_owner(&mut self, login: &str) -> Result<User> {
        let key = login.to_lowercase();
        if let Some(GithubResource::Owner(user)) = self.resolved.get(&key) {
            return Ok(user.clone());
        }

        let user = self.client.get_user(login).await?;
        self.resolved.insert(key, GithubResource::Owner(user.clone()));
        Ok(user)
    }

    async fn resolve_repository(&mut self, owner: &str, name: &str) -> Result<Repository> {
        let key = format!("{}/{}", owner, name).to_lowercase();
        if let Some(GithubResource::Repository(repo)) = self.resolved.get(&key) {
            return Ok(repo.clone());
        }

        let repo = self.client.get_repository(owner, name).await?;
        self.resolved
            .insert(key, GithubResource::Repository(repo.clone()));
        Ok(repo)
    }
}

impl Origin for GithubOrigin {
    type Handle = GithubHandle;

    async fn resolve(&mut self, path: &SourcePath) -> Result<GithubHandle> {
        let Some(name) = &path.repo else {
            let user = self.resolve_owner(&path.owner).await?;
            return Ok(GithubHandle::Repos { owner: user.login });
        };

        let repo = self.resolve_repository(&path.owner, name).await?;
        let owner = repo.owner.login;
        let repo = repo.name;

        Ok(match path.kind {
            SourceKind::Repos => GithubHandle::Repos { owner },
            SourceKind::Issues => GithubHandle::Issues { owner, repo },
            SourceKind::PullRequests => GithubHandle::PullRequests { owner, repo },
            SourceKind::Commits => GithubHandle::Commits { owner, repo },
        })
    }

    async fn fetch_page(
        &mut self,
        handle: &GithubHandle,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Record>> {
        let records = match handle {
            GithubHandle::Repos { owner } => self
                .client
                .list_user_repos(owner, offset, count)
                .await?
                .iter()
                .map(repository_record)
                .collect(),
            GithubHandle::Issues { owner, repo } => self
                .client
                .list_issues(owner, repo, offset, count)
                .await?
                .iter()
                .map(issue_record)
                .collect(),
            GithubHandle::PullRequests { owner, repo } => self
                .client
                .list_pulls(owner, repo, offset, count)
                .await?
                .iter()
                .map(pull_request_record)
                .collect(),
            GithubHandle::Commits { owner, repo } => self
                .client
                .list_commits(owner, repo, offset, count)
                .await?
                .iter()
                .map(commit_record)
                .collect(),
        };
        Ok(records)
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> Datum {
    Datum::text_or_empty(value.map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)))
}

fn repository_record(repo: &Repository) -> Record {
    Record::new()
        .with("id", repo.id)
        .with("name", repo.name.as_str())
        .with("full_name", repo.full_name.as_str())
        .with("description", Datum::text_or_empty(repo.description.as_ref()))
        .with("private", repo.private)
        .with("fork", repo.fork)
        .with("language", Datum::text_or_empty(repo.language.as_ref()))
        .with("forks_count", repo.forks_count)
        .with("stargazers_count", repo.stargazers_count)
        .with("open_issues_count", repo.open_issues_count)
        .with("topics", Datum::joined(&repo.topics))
        .with("created_at", timestamp(repo.created_at))
        .with("updated_at", timestamp(repo.updated_at))
}

fn issue_record(issue: &Issue) -> Record {
    Record::new()
        .with("id", issue.id)
        .with("number", issue.number)
        .with("title", issue.title.as_str())
        .with("state", issue.state.as_str())
        .with("user", Datum::text_or_empty(issue.user.as_ref().map(|u| &u.login)))
        .with("labels", Datum::joined(issue.labels.iter().map(|l| &l.name)))
        .with(
            "milestone",
            Datum::text_or_empty(issue.milestone.as_ref().map(|m| &m.title)),
        )
        .with("comments", issue.comments)
        .with("is_pull_request", issue.is_pull_request())
        .with("created_at", timestamp(Some(issue.created_at)))
        .with("closed_at", timestamp(issue.closed_at))
}

fn pull_request_record(pull: &PullRequest) -> Record {
    Record::new()
        .with("id", pull.id)
        .with("number", pull.number)
        .with("title", pull.title.as_str())
        .with("state", pull.state.as_str())
        .with("user", Datum::text_or_empty(pull.user.as_ref().map(|u| &u.login)))
        .with(
            "assignee",
            Datum::text_or_empty(pull.assignee.as_ref().map(|u| &u.login)),
        )
        .with(
            "milestone",
            Datum::text_or_empty(pull.milestone.as_ref().map(|m| &m.title)),
        )
        .with("draft", pull.draft)
        .with("created_at", timestamp(Some(pull.created_at)))
        .with("closed_at", timestamp(pull.closed_at))
        .with("merged_at", timestamp(pull.merged_at))
}

fn commit_record(commit: &Commit) -> Record {
    Record::new()
        .with("sha", commit.sha.as_str())
        .with("author", Datum::text_or_empty(commit.author_name()))
        .with("committer", Datum::text_or_empty(commit.committer_name()))
        .with("message", commit.commit.message.as_str())
        .with("date", timestamp(commit.date()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(record: &Record) -> Vec<&str> {
        record.names().collect()
    }

    fn repository() -> Repository {
        serde_json::from_value(serde_json::json!({
            "id": 1296269,
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "owner": { "login": "octocat", "id": 1 },
            "description": null,
            "language": "Rust",
            "stargazers_count": 80,
            "topics": ["api", "octocat"],
            "created_at": "2011-01-26T19:01:12Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_repository_record_fields_and_values() {
        let record = repository_record(&repository());

        assert_eq!(names(&record), SourceKind::Repos.fields());
        assert_eq!(record.get("stargazers_count"), Some(&Datum::Integer(80)));
        assert_eq!(record.get("description"), Some(&Datum::Text(String::new())));
        assert_eq!(record.get("topics"), Some(&Datum::Text("api,octocat".into())));
        assert_eq!(record.get("private"), Some(&Datum::Boolean(false)));
        assert_eq!(
            record.get("created_at"),
            Some(&Datum::Text("2011-01-26T19:01:12Z".into()))
        );
        assert_eq!(record.get("updated_at"), Some(&Datum::Text(String::new())));
    }

    #[test]
    fn test_issue_record_fields_and_values() {
        let issue: Issue = serde_json::from_value(serde_json::json!({
            "id": 1,
            "number": 1347,
            "title": "Found a bug",
            "state": "open",
            "user": { "login": "octocat", "id": 1 },
            "labels": [{ "name": "bug" }, { "name": "help wanted" }],
            "milestone": { "number": 1, "title": "v1.0" },
            "comments": 4,
            "pull_request": { "url": "https://api.github.com/repos/o/r/pulls/1347" },
            "created_at": "2024-03-01T10:00:00Z",
            "closed_at": null
        }))
        .unwrap();
        let record = issue_record(&issue);

        assert_eq!(names(&record), SourceKind::Issues.fields());
        assert_eq!(record.get("user"), Some(&Datum::Text("octocat".into())));
        assert_eq!(record.get("labels"), Some(&Datum::Text("bug,help wanted".into())));
        assert_eq!(record.get("milestone"), Some(&Datum::Text("v1.0".into())));
        assert_eq!(record.get("is_pull_request"), Some(&Datum::Boolean(true)));
        assert_eq!(record.get("closed_at"), Some(&Datum::Text(String::new())));
    }

    #[test]
    fn test_pull_request_record_fields() {
        let pull: PullRequest = serde_json::from_value(serde_json::json!({
            "id": 2,
            "number": 7,
            "title": "Add feature",
            "state": "closed",
            "user": null,
            "draft": true,
            "created_at": "2024-03-01T10:00:00Z",
            "merged_at": "2024-03-02T10:00:00Z"
        }))
        .unwrap();
        let record = pull_request_record(&pull);

        assert_eq!(names(&record), SourceKind::PullRequests.fields());
        assert_eq!(record.get("user"), Some(&Datum::Text(String::new())));
        assert_eq!(record.get("draft"), Some(&Datum::Boolean(true)));
        assert_eq!(
            record.get("merged_at"),
            Some(&Datum::Text("2024-03-02T10:00:00Z".into()))
        );
    }

    #[test]
    fn test_commit_record_fields() {
        let commit: Commit = serde_json::from_value(serde_json::json!({
            "sha": "abc123",
            "commit": {
                "message": "Initial commit",
                "author": { "name": "Mona", "date": "2020-01-01T00:00:00Z" },
                "committer": { "name": "GitHub" }
            },
            "author": { "login": "octocat", "id": 1 },
            "committer": null
        }))
        .unwrap();
        let record = commit_record(&commit);

        assert_eq!(names(&record), SourceKind::Commits.fields());
        assert_eq!(record.get("author"), Some(&Datum::Text("octocat".into())));
        assert_eq!(record.get("committer"), Some(&Datum::Text("GitHub".into())));
        assert_eq!(
            record.get("date"),
            Some(&Datum::Text("2020-01-01T00:00:00Z".into()))
        );
    }
}
