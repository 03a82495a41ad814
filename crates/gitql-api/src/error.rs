//! Error types for the GitHub API client.

use std::fmt;

/// Errors reported by the GitHub API itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP-level error with status code.
    Http { status: u16, message: String },
    /// Authentication or authorization failure.
    Auth { message: String },
    /// Rate limit exceeded.
    RateLimit { retry_after: Option<u64> },
    /// Resource not found.
    NotFound { resource: String, id: String },
    /// API validation error.
    Validation {
        field: Option<String>,
        message: String,
    },
    /// Network/connection error.
    Network { message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, message } => write!(f, "HTTP error {}: {}", status, message),
            ApiError::Auth { message } => write!(f, "Auth error: {}", message),
            ApiError::RateLimit { retry_after } => match retry_after {
                Some(secs) => write!(f, "Rate limited, retry after {} seconds", secs),
                None => write!(f, "Rate limited"),
            },
            ApiError::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            ApiError::Validation { field, message } => match field {
                Some(f_name) => write!(f, "Validation error on {}: {}", f_name, message),
                None => write!(f, "Validation error: {}", message),
            },
            ApiError::Network { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Returns true if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimit { .. } | ApiError::Network { .. })
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::Network { .. } => 3,
            ApiError::RateLimit { .. } => 4,
            _ => 2,
        }
    }
}

/// Top-level error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered with an error status.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The request could not be built or the response body could not be read.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Converts a transport failure, classifying timeouts and connection
    /// failures as [`ApiError::Network`].
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            Error::Api(ApiError::Network {
                message: error.to_string(),
            })
        } else {
            Error::Http(error)
        }
    }

    /// Names the resource on a bare 404 so callers get a useful message.
    pub(crate) fn with_resource(self, resource: &str, id: &str) -> Self {
        match self {
            Error::Api(ApiError::NotFound { .. }) => Error::Api(ApiError::NotFound {
                resource: resource.to_string(),
                id: id.to_string(),
            }),
            other => other,
        }
    }

    /// Returns the API error, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true when the remote resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound { .. }))
    }

    /// Returns the appropriate CLI exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Api(e) => e.exit_code(),
            Error::Http(_) => 3,
            Error::Json(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_http() {
        let error = ApiError::Http {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP error 503: Service Unavailable");
    }

    #[test]
    fn test_api_error_display_rate_limit() {
        let error = ApiError::RateLimit {
            retry_after: Some(60),
        };
        assert_eq!(error.to_string(), "Rate limited, retry after 60 seconds");
        assert_eq!(
            ApiError::RateLimit { retry_after: None }.to_string(),
            "Rate limited"
        );
    }

    #[test]
    fn test_api_error_display_not_found() {
        let error = ApiError::NotFound {
            resource: "repository".to_string(),
            id: "octocat/nope".to_string(),
        };
        assert_eq!(error.to_string(), "repository not found: octocat/nope");
    }

    #[test]
    fn test_api_error_display_validation() {
        let error = ApiError::Validation {
            field: Some("per_page".to_string()),
            message: "must be at most 100".to_string(),
        };
        assert!(error.to_string().contains("per_page"));
    }

    #[test]
    fn test_api_error_is_retryable() {
        assert!(ApiError::RateLimit { retry_after: Some(5) }.is_retryable());
        assert!(ApiError::Network {
            message: "Connection reset".to_string()
        }
        .is_retryable());
        assert!(!ApiError::Auth {
            message: "Bad credentials".to_string()
        }
        .is_retryable());
        assert!(!ApiError::NotFound {
            resource: "user".to_string(),
            id: "ghost".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_api_error_exit_codes() {
        assert_eq!(
            ApiError::Auth {
                message: "Unauthorized".to_string()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            ApiError::Network {
                message: "Timeout".to_string()
            }
            .exit_code(),
            3
        );
        assert_eq!(ApiError::RateLimit { retry_after: None }.exit_code(), 4);
        assert_eq!(
            ApiError::Http {
                status: 500,
                message: "Server error".to_string()
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn test_with_resource_names_not_found() {
        let error = Error::Api(ApiError::NotFound {
            resource: "resource".to_string(),
            id: "unknown".to_string(),
        })
        .with_resource("repository", "rust-lang/nope");

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "repository not found: rust-lang/nope");
    }

    #[test]
    fn test_with_resource_keeps_other_errors() {
        let error = Error::Api(ApiError::Auth {
            message: "Bad credentials".to_string(),
        })
        .with_resource("user", "octocat");

        assert!(matches!(error.api_error(), Some(ApiError::Auth { .. })));
    }
}
