//! Data origins: where records come from.
//!
//! An [`Origin`] resolves a [`SourcePath`] into a handle once, then serves
//! windows of records for that handle. The selection loop only ever asks for
//! `count` records starting at `offset`; how the origin maps that onto its own
//! paging is its business.

mod github;

pub use github::{GithubHandle, GithubOrigin, GithubResource};

use crate::record::Record;
use crate::source::SourcePath;

/// A paginated record source.
#[allow(async_fn_in_trait)]
pub trait Origin {
    /// Opaque reference to a resolved owner or repository.
    type Handle: Clone;

    /// Resolves a source path, failing when the owner or repository does not exist.
    async fn resolve(&mut self, path: &SourcePath) -> gitql_api::Result<Self::Handle>;

    /// Returns up to `count` records starting at `offset`.
    ///
    /// An empty result means the source has no records at or past `offset`.
    async fn fetch_page(
        &mut self,
        handle: &Self::Handle,
        offset: usize,
        count: usize,
    ) -> gitql_api::Result<Vec<Record>>;
}
