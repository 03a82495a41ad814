//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Local commands touch only the config file, the keyring or the terminal.
//! Remote commands need the resolved token and, for queries, an engine.

use crate::cli::{AuthCommands, Cli, Commands, ConfigCommands, Shell, StorageTarget};
use crate::commands::auth::ResolvedToken;
use crate::commands::config::Config;
use crate::commands::{self, build_engine, CommandContext, CommandError, Result};

/// Trait for commands that run without talking to GitHub.
pub trait LocalCommand {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that need the resolved token.
#[allow(async_fn_in_trait)]
pub trait RemoteCommand {
    async fn execute(
        &self,
        ctx: &CommandContext,
        token: ResolvedToken,
        config: &Config,
    ) -> Result<()>;
}

/// Commands that don't talk to GitHub.
pub enum LocalDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Tokens(&'a str),
    Logout,
    Completions(&'a Shell),
}

impl<'a> LocalDispatch<'a> {
    /// Returns None if the command needs a token or an editor.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config {
                command: Some(ConfigCommands::Edit),
            }) => None,
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Tokens { sql }) => Some(Self::Tokens(sql)),
            Some(Commands::Auth {
                command: AuthCommands::Logout,
            }) => Some(Self::Logout),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            _ => None,
        }
    }
}

impl LocalCommand for LocalDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Tokens(sql) => commands::tokens::execute(ctx, sql),
            Self::Logout => commands::auth::execute_logout(ctx),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
        }
    }
}

/// Dispatch the synchronous config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Edit) => Err(CommandError::Config(
            "edit requires async context".into(),
        )),
    }
}

/// Commands that run queries, reach GitHub or open an editor.
pub enum RemoteDispatch<'a> {
    Repl,
    Query(&'a str),
    ConfigEdit,
    Login(StorageTarget),
    Status,
}

impl<'a> RemoteDispatch<'a> {
    /// No subcommand starts the prompt.
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            None | Some(Commands::Repl) => Some(Self::Repl),
            Some(Commands::Query { sql }) => Some(Self::Query(sql)),
            Some(Commands::Config {
                command: Some(ConfigCommands::Edit),
            }) => Some(Self::ConfigEdit),
            Some(Commands::Auth {
                command: AuthCommands::Login { storage },
            }) => Some(Self::Login(*storage)),
            Some(Commands::Auth {
                command: AuthCommands::Status,
            }) => Some(Self::Status),
            _ => None,
        }
    }

    /// Whether the command needs a token resolved before it runs.
    pub fn needs_token(&self) -> bool {
        matches!(self, Self::Repl | Self::Query(_) | Self::Status)
    }
}

impl RemoteCommand for RemoteDispatch<'_> {
    async fn execute(
        &self,
        ctx: &CommandContext,
        token: ResolvedToken,
        config: &Config,
    ) -> Result<()> {
        match self {
            Self::Repl => {
                ctx.debug(format!("token source: {}", token.source));
                let mut engine = build_engine(token.token, config)?;
                commands::repl::execute(ctx, &mut engine).await
            }
            Self::Query(sql) => {
                ctx.debug(format!("token source: {}", token.source));
                let mut engine = build_engine(token.token, config)?;
                commands::query::execute(ctx, &mut engine, sql).await
            }
            Self::ConfigEdit => commands::config::execute_edit(ctx).await,
            Self::Login(storage) => commands::auth::execute_login(ctx, *storage).await,
            Self::Status => commands::auth::execute_status(ctx, &token).await,
        }
    }
}
