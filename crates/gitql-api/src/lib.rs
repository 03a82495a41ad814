//! GitHub REST API client used by gitql.
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use gitql_api::prelude::*;
//! ```
//!
//! This re-exports the most commonly used types including [`GithubClient`],
//! error types and the data models returned by the listing endpoints.
//!
//! [`GithubClient`]: crate::client::GithubClient

pub mod client;
pub mod error;
pub mod models;
pub mod pagination;
pub mod prelude;
mod resources;
mod retry;

pub use error::{ApiError, Error, Result};
