//! Record sources: what a query reads from and how it walks the records.

mod error;
mod path;
mod selection;

pub use error::{SourceError, SourceResult};
pub use path::{SourceKind, SourcePath};
pub use selection::{RecordSource, Selection, SelectionState};

#[cfg(test)]
mod tests;
