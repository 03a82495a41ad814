//! Typed endpoints used by gitql.

use serde::de::DeserializeOwned;

use crate::client::GithubClient;
use crate::error::Result;
use crate::models::{Commit, Issue, PullRequest, Repository, User};
use crate::pagination::plan_window;

impl GithubClient {
    /// Fetches a user or organization profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` naming the user when the login does not exist.
    pub async fn get_user(&self, login: &str) -> Result<User> {
        self.get(&format!("/users/{}", login), &[])
            .await
            .map_err(|e| e.with_resource("user", login))
    }

    /// Fetches the user the client's token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Auth` for anonymous clients and rejected tokens.
    pub async fn get_authenticated_user(&self) -> Result<User> {
        self.get("/user", &[]).await
    }

    /// Fetches a repository.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` naming `owner/repo` when it does not exist
    /// or is not visible with the current credentials.
    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let full_name = format!("{}/{}", owner, repo);
        self.get(&format!("/repos/{}", full_name), &[])
            .await
            .map_err(|e| e.with_resource("repository", &full_name))
    }

    /// Lists the public repositories of a user, `count` entries from `offset`.
    pub async fn list_user_repos(
        &self,
        login: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Repository>> {
        self.fetch_window(&format!("/users/{}/repos", login), &[], offset, count)
            .await
    }

    /// Lists issues (open and closed, pull requests included).
    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Issue>> {
        self.fetch_window(
            &format!("/repos/{}/{}/issues", owner, repo),
            &[("state", "all".to_string())],
            offset,
            count,
        )
        .await
    }

    /// Lists pull requests (open and closed).
    pub async fn list_pulls(
        &self,
        owner: &str,
        repo: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<PullRequest>> {
        self.fetch_window(
            &format!("/repos/{}/{}/pulls", owner, repo),
            &[("state", "all".to_string())],
            offset,
            count,
        )
        .await
    }

    /// Lists commits on the default branch, newest first.
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        offset: usize,
        count: usize,
    ) -> Result<Vec<Commit>> {
        self.fetch_window(
            &format!("/repos/{}/{}/commits", owner, repo),
            &[],
            offset,
            count,
        )
        .await
    }

    /// Reads the window `[offset, offset + count)` of a paginated listing.
    ///
    /// Stops early when a page comes back short, since later pages are empty.
    async fn fetch_window<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        offset: usize,
        count: usize,
    ) -> Result<Vec<T>> {
        let mut entries = Vec::with_capacity(count);

        for request in plan_window(offset, count) {
            let mut query: Vec<(&str, String)> = params.to_vec();
            query.push(("per_page", request.per_page.to_string()));
            query.push(("page", request.page.to_string()));

            let page: Vec<T> = self.get(endpoint, &query).await?;
            let short = page.len() < request.per_page;
            entries.extend(page.into_iter().skip(request.skip).take(request.take));

            if short {
                break;
            }
        }

        Ok(entries)
    }
}
