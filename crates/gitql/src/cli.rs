//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the gitql CLI.

use clap::{Parser, Subcommand, ValueEnum};

/// gitql - SQL-like queries over GitHub
#[derive(Parser, Debug)]
#[command(name = "gitql")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show fetch and timing details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// GitHub token (default: from config/keyring, anonymous if none)
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive prompt (default)
    Repl,

    /// Run a single query
    #[command(alias = "q")]
    Query {
        /// Query text, e.g. "SELECT title FROM rust-lang.cargo.issues LIMIT 5"
        sql: String,
    },

    /// Show how a query is tokenized
    Tokens {
        /// Query text
        sql: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Manage the stored GitHub token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config in $EDITOR
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. query.page_size)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

/// Token storage targets for `auth login`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageTarget {
    Config,
    Keyring,
}

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store a GitHub token
    Login {
        /// Where to keep the token
        #[arg(long, value_enum, default_value = "config")]
        storage: StorageTarget,
    },

    /// Remove the stored token
    Logout,

    /// Show which token would be used
    Status,
}
