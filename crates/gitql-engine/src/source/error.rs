//! Errors for source paths.

use thiserror::Error;

pub type SourceResult<T> = Result<T, SourceError>;

/// A `FROM` target that cannot be interpreted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("malformed source path '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("unknown source kind '{kind}' in '{path}'{}", suggestion_suffix(.suggestion))]
    UnknownKind {
        path: String,
        kind: String,
        suggestion: Option<String>,
    },

    /// The origin has no owner or repository by this name.
    #[error("source '{path}' not found: {detail}")]
    NotFound { path: String, detail: String },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(kind) => format!(" (did you mean '{}'?)", kind),
        None => String::new(),
    }
}

impl SourceError {
    pub fn malformed(path: &str, reason: impl Into<String>) -> Self {
        SourceError::Malformed {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
