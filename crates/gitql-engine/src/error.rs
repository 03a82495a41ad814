//! Top-level error type for running a query.

use thiserror::Error;

use crate::query::{EvalError, ParseError, TokenizeError};
use crate::source::{SourceError, SourcePath};

pub type QueryResult<T> = Result<T, QueryError>;

/// Any failure while compiling or executing a query.
///
/// A failed query leaves no state behind; the next query starts fresh.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("tokenization error: {0}")]
    Tokenize(#[from] TokenizeError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Eval(#[from] EvalError),

    #[error("{0}")]
    Source(#[from] SourceError),

    /// The origin failed while resolving the source for a reason other than
    /// the source not existing.
    #[error("could not resolve '{path}': {source}")]
    Resolution {
        path: String,
        source: gitql_api::Error,
    },

    /// A page fetch failed mid-query.
    #[error("fetch failed: {0}")]
    Origin(#[source] gitql_api::Error),
}

impl QueryError {
    /// Classifies a resolution failure: a missing owner or repository is a
    /// source error, anything else keeps the origin error.
    pub fn resolution(path: &SourcePath, error: gitql_api::Error) -> Self {
        if error.is_not_found() {
            return QueryError::Source(SourceError::NotFound {
                path: path.to_string(),
                detail: error.to_string(),
            });
        }
        QueryError::Resolution {
            path: path.to_string(),
            source: error,
        }
    }

    /// Byte offset in the query the error points at, when known.
    pub fn index(&self) -> Option<usize> {
        match self {
            QueryError::Tokenize(e) => e.index(),
            QueryError::Parse(e) => e.index(),
            _ => None,
        }
    }

    /// The origin error behind this failure, if any.
    pub fn origin_error(&self) -> Option<&gitql_api::Error> {
        match self {
            QueryError::Resolution { source, .. } | QueryError::Origin(source) => Some(source),
            _ => None,
        }
    }

    pub fn is_type_error(&self) -> bool {
        matches!(self, QueryError::Eval(e) if e.is_type_error())
    }
}
