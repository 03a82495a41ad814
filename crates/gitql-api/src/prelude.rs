//! Prelude module for convenient imports.
//!
//! ```
//! use gitql_api::prelude::*;
//!
//! // Now you have access to:
//! // - GithubClient, GithubClientBuilder (API client)
//! // - Error, ApiError, Result (error handling)
//! // - Repository, Issue, PullRequest, Commit, User (data models)
//! ```

// Client types
pub use crate::client::{GithubClient, GithubClientBuilder};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Data models
pub use crate::models::{
    Commit, CommitDetails, GitActor, Issue, Label, Milestone, PullRequest, PullRequestLink,
    Repository, SimpleUser, User,
};

// Pagination
pub use crate::pagination::{plan_window, PageRequest, MAX_PER_PAGE};
