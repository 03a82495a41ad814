//! Command implementations for the gitql CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod auth;
pub mod completions;
pub mod config;
pub mod keyring;
pub mod query;
pub mod repl;
pub mod tokens;

use gitql_api::client::GithubClient;
use gitql_engine::{Engine, GithubOrigin};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Query compilation or execution error.
    #[error("{0}")]
    Query(#[from] gitql_engine::QueryError),

    /// API error outside of a query.
    #[error("API error: {0}")]
    Api(#[from] gitql_api::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// OS keyring error.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the error code string for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Query(e) if e.origin_error().is_some() => "API_ERROR",
            CommandError::Query(_) => "QUERY_ERROR",
            CommandError::Api(_) => "API_ERROR",
            CommandError::Config(_) => "CONFIG_ERROR",
            CommandError::Keyring(_) => "KEYRING_ERROR",
            CommandError::Io(_) => "IO_ERROR",
            CommandError::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// 1 query, 2 API, 3 I/O or network, 4 rate limit, 5 configuration.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Query(e) => match e.origin_error() {
                Some(origin) => exit_code_from(origin.exit_code()),
                None => 1,
            },
            CommandError::Api(e) => exit_code_from(e.exit_code()),
            CommandError::Config(_) | CommandError::Keyring(_) => 5,
            CommandError::Io(_) => 3,
            CommandError::Json(_) => 1,
        }
    }
}

fn exit_code_from(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(2)
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }

    /// Applies config file preferences the command line did not override.
    pub fn with_config(mut self, config: &Config) -> Self {
        if config.output.color == Some(false) {
            self.use_colors = false;
        }
        self
    }

    /// Prints a diagnostic line to stderr when `--verbose` is set.
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.verbose {
            eprintln!("[gitql] {}", message.as_ref());
        }
    }
}

/// Builds a query engine from the resolved token and config.
pub fn build_engine(token: Option<String>, config: &Config) -> Result<Engine<GithubOrigin>> {
    let client = GithubClient::builder().maybe_token(token).build()?;
    let origin = GithubOrigin::with_capacity(client, config.cache_capacity());
    Ok(Engine::with_config(origin, config.engine_config()))
}
