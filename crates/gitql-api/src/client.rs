//! HTTP client wrapper for the GitHub REST API.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::retry::{execute_with_retry, RetryConfig};

#[cfg(test)]
use crate::retry::{DEFAULT_INITIAL_BACKOFF_SECS, DEFAULT_MAX_BACKOFF_SECS, DEFAULT_MAX_RETRIES};

/// Base URL for the GitHub REST API.
pub const BASE_URL: &str = "https://api.github.com";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Media type requested on every call.
const ACCEPT: &str = "application/vnd.github+json";

/// REST API version pinned on every call.
const API_VERSION: &str = "2022-11-28";

/// GitHub rejects requests without a user agent.
const USER_AGENT: &str = concat!("gitql/", env!("CARGO_PKG_VERSION"));

/// Client for interacting with the GitHub REST API.
///
/// The token is optional: anonymous clients work against public data with
/// a much lower rate limit.
#[derive(Clone)]
pub struct GithubClient {
    token: Option<String>,
    http_client: reqwest::Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl GithubClient {
    /// Creates a new client authenticated with the given token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        GithubClientBuilder::new().token(token).build()
    }

    /// Creates a client without credentials.
    pub fn anonymous() -> Result<Self> {
        GithubClientBuilder::new().build()
    }

    /// Creates a client with a custom base URL (used by tests against a mock server).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        GithubClientBuilder::new()
            .token(token)
            .base_url(base_url)
            .build()
    }

    /// Returns a builder for fine-grained configuration.
    pub fn builder() -> GithubClientBuilder {
        GithubClientBuilder::new()
    }

    /// Returns the API token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns a reference to the underlying HTTP client.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Calculates the backoff duration for a retry attempt.
    pub fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        self.retry_config.calculate_backoff(attempt, retry_after)
    }

    /// Performs a GET request to the given endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path (e.g., "/repos/rust-lang/rust")
    /// * `query` - Query string parameters
    ///
    /// # Returns
    /// The deserialized response body. Rate-limited responses are retried
    /// with exponential backoff.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        execute_with_retry(&self.retry_config, || {
            let mut request = self.http_client.get(&url).query(query);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            async move { request.send().await.map_err(Error::from_transport) }
        })
        .await
    }
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("http_client", &self.http_client)
            .finish()
    }
}

/// Builder for [`GithubClient`].
#[derive(Debug, Clone, Default)]
pub struct GithubClientBuilder {
    token: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    initial_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
}

impl GithubClientBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the API token when one is available.
    pub fn maybe_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Overrides the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the maximum number of retries on rate limiting.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the initial backoff between retries.
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    /// Sets the maximum backoff between retries.
    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = Some(backoff);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying HTTP client cannot be built.
    pub fn build(self) -> Result<GithubClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            reqwest::header::HeaderValue::from_static(API_VERSION),
        );

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            )
            .build()?;

        let defaults = RetryConfig::default();
        let retry_config = RetryConfig {
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            initial_backoff: self.initial_backoff.unwrap_or(defaults.initial_backoff),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
        };

        Ok(GithubClient {
            token: self.token.filter(|t| !t.is_empty()),
            http_client,
            base_url: self
                .base_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| BASE_URL.to_string()),
            retry_config,
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
