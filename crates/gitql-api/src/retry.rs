//! Retry logic for HTTP requests with exponential backoff.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::error::{ApiError, Error, Result};

/// Default initial backoff duration for retries (1 second).
pub(crate) const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

/// Default maximum backoff duration for retries (30 seconds).
pub(crate) const DEFAULT_MAX_BACKOFF_SECS: u64 = 30;

/// Default maximum number of retry attempts.
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for retry behavior.
#[derive(Clone, Debug)]
pub(crate) struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration for retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration for retries.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryConfig {
    /// Calculates the backoff duration for a retry attempt.
    ///
    /// If `retry_after` is provided (from the rate limit headers), uses that value.
    /// Otherwise, uses exponential backoff: initial * 2^attempt, capped at max_backoff.
    pub fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        let max_backoff_secs = self.max_backoff.as_secs();
        if let Some(secs) = retry_after {
            Duration::from_secs(secs.min(max_backoff_secs))
        } else {
            let initial_secs = self.initial_backoff.as_secs();
            let backoff_secs = initial_secs.saturating_mul(1u64 << attempt.min(32));
            Duration::from_secs(backoff_secs.min(max_backoff_secs))
        }
    }

    /// A wait longer than the backoff cap is not worth sleeping through.
    fn worth_waiting(&self, retry_after: Option<u64>) -> bool {
        retry_after.map_or(true, |secs| secs <= self.max_backoff.as_secs())
    }
}

/// Decision type for retry logic.
pub(crate) enum RetryDecision<T> {
    /// Request succeeded with this value.
    Success(T),
    /// Request should be retried.
    Retry { retry_after: Option<u64> },
}

/// Returns true when the response signals an exhausted rate limit.
///
/// GitHub answers 429 for secondary limits and 403 with
/// `x-ratelimit-remaining: 0` for the primary one.
fn is_rate_limited(status: u16, headers: &HeaderMap) -> bool {
    status == 429
        || (status == 403
            && headers
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim() == "0")
                .unwrap_or(false))
}

/// Seconds to wait before retrying, from `retry-after` or `x-ratelimit-reset`.
pub(crate) fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    if let Some(secs) = headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        return Some(secs);
    }

    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())?;
    let now = Utc::now().timestamp();
    Some(reset.saturating_sub(now).max(0) as u64)
}

/// Handles the HTTP response, returning a retry decision or error.
pub(crate) async fn handle_response_with_retry<T: DeserializeOwned>(
    config: &RetryConfig,
    response: reqwest::Response,
    attempt: u32,
) -> Result<RetryDecision<T>> {
    let status = response.status();

    if status.is_success() {
        let bytes = response.bytes().await.map_err(Error::from_transport)?;
        let body = serde_json::from_slice::<T>(&bytes)?;
        return Ok(RetryDecision::Success(body));
    }

    if is_rate_limited(status.as_u16(), response.headers()) && attempt < config.max_retries {
        let retry_after = retry_after_secs(response.headers());
        if config.worth_waiting(retry_after) {
            return Ok(RetryDecision::Retry { retry_after });
        }
    }

    // Non-retryable error or max retries exceeded
    Err(parse_error_response(response).await)
}

/// Parses an error response into our error types.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let status_code = status.as_u16();
    let rate_limited = is_rate_limited(status_code, response.headers());
    let retry_after = retry_after_secs(response.headers());

    // GitHub error bodies look like {"message": "...", "documentation_url": "..."}
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    let api_error = match status_code {
        _ if rate_limited => ApiError::RateLimit { retry_after },
        401 | 403 => ApiError::Auth {
            message: if message.is_empty() {
                "Authentication failed".to_string()
            } else {
                message
            },
        },
        404 => ApiError::NotFound {
            resource: "resource".to_string(),
            id: "unknown".to_string(),
        },
        400 | 422 => ApiError::Validation {
            field: None,
            message: if message.is_empty() {
                "Bad request".to_string()
            } else {
                message
            },
        },
        _ => ApiError::Http {
            status: status_code,
            message: if message.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                message
            },
        },
    };

    Error::Api(api_error)
}

/// Executes a request with retry logic.
pub(crate) async fn execute_with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut make_request: F,
) -> Result<T>
where
    T: DeserializeOwned,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response>>,
{
    for attempt in 0..=config.max_retries {
        let response = make_request().await?;

        match handle_response_with_retry(config, response, attempt).await {
            Ok(RetryDecision::Success(value)) => return Ok(value),
            Ok(RetryDecision::Retry { retry_after }) => {
                let backoff = config.calculate_backoff(attempt, retry_after);
                sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }

    // All retries exhausted, return rate limit error
    Err(Error::Api(ApiError::RateLimit { retry_after: None }))
}
