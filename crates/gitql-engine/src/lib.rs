//! Query engine for gitql.
//!
//! Compiles SQL-like queries and runs them against paginated record origins,
//! fetching only as many pages as it takes to fill the requested limit.
//!
//! # Example
//!
//! ```no_run
//! use gitql_api::client::GithubClient;
//! use gitql_engine::{Engine, GithubOrigin};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GithubClient::anonymous()?;
//! let mut engine = Engine::new(GithubOrigin::new(client));
//!
//! let output = engine
//!     .execute("SELECT number, title FROM rust-lang.cargo.issues WHERE comments > 10 LIMIT 5")
//!     .await?;
//!
//! for record in &output.records {
//!     println!("{:?}", record);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod origin;
pub mod query;
pub mod record;
pub mod source;
mod suggest;

pub use engine::{Engine, EngineConfig, QueryOutput, DEFAULT_LIMIT, DEFAULT_PAGE_SIZE};
pub use error::{QueryError, QueryResult};
pub use origin::{GithubOrigin, Origin};
pub use record::{Datum, Record};
