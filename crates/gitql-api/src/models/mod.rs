//! Data models returned by the GitHub REST API.
//!
//! Only the fields gitql exposes as record columns are modelled; serde
//! ignores the rest of each payload.

mod commit;
mod common;
mod issue;
mod repository;

pub use commit::{Commit, CommitDetails, GitActor};
pub use common::{Label, Milestone, SimpleUser, User};
pub use issue::{Issue, PullRequest, PullRequestLink};
pub use repository::Repository;
