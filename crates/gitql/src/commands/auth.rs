//! Token resolution and the `auth` commands.
//!
//! The token is looked up in this order: `--token` flag or `GITHUB_TOKEN`,
//! the OS keyring (when `token_storage = "keyring"`), the config file.
//! Without a token, queries run anonymously against the lower rate limit.

use std::fmt;
use std::io::{self, IsTerminal};

use dialoguer::Password;
use gitql_api::client::GithubClient;
use owo_colors::OwoColorize;

use super::config::{load_config, mask_token, save_config, Config};
use super::keyring;
use super::{CommandContext, CommandError, Result};
use crate::cli::StorageTarget;

/// Where the active token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `--token` flag or `GITHUB_TOKEN`.
    Environment,
    Keyring,
    Config,
    Anonymous,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenSource::Environment => "flag or GITHUB_TOKEN",
            TokenSource::Keyring => "keyring",
            TokenSource::Config => "config file",
            TokenSource::Anonymous => "none (anonymous)",
        };
        f.write_str(name)
    }
}

/// A token together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    pub token: Option<String>,
    pub source: TokenSource,
}

/// Resolves the GitHub token with priority: flag/env > keyring > config.
pub fn resolve_token(cli_token: Option<&str>, config: &Config) -> Result<ResolvedToken> {
    // clap already folds GITHUB_TOKEN into the flag.
    if let Some(token) = cli_token.filter(|t| !t.is_empty()) {
        return Ok(ResolvedToken {
            token: Some(token.to_string()),
            source: TokenSource::Environment,
        });
    }

    if config.uses_keyring() {
        if let Some(token) = keyring::get_token()? {
            return Ok(ResolvedToken {
                token: Some(token),
                source: TokenSource::Keyring,
            });
        }
    }

    if let Some(token) = config.token.clone().filter(|t| !t.is_empty()) {
        return Ok(ResolvedToken {
            token: Some(token),
            source: TokenSource::Config,
        });
    }

    Ok(ResolvedToken {
        token: None,
        source: TokenSource::Anonymous,
    })
}

/// Prompts for a token with hidden input, verifies it and stores it.
pub async fn execute_login(ctx: &CommandContext, storage: StorageTarget) -> Result<()> {
    if !io::stdin().is_terminal() {
        return Err(CommandError::Config(
            "Cannot prompt for a token without a terminal. Use 'gitql config set token <TOKEN>' or set GITHUB_TOKEN.".to_string(),
        ));
    }

    if storage == StorageTarget::Keyring && !keyring::is_available() {
        return Err(CommandError::Keyring(
            "OS keyring is not available. Use '--storage config' instead.".to_string(),
        ));
    }

    let token: String = Password::new()
        .with_prompt("GitHub token")
        .interact()
        .map_err(|e| CommandError::Io(io::Error::other(e.to_string())))?;
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(CommandError::Config("Token cannot be empty".to_string()));
    }

    let client = GithubClient::new(token.clone())?;
    let user = client.get_authenticated_user().await?;
    ctx.debug(format!("Token belongs to {}", user.login));

    let mut config = load_config()?;
    store_token(&mut config, &token, storage)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "login": user.login,
            "storage": storage_name(storage),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let message = format!("Logged in as {}", user.login);
        if ctx.use_colors {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
        println!("Token stored in {}.", storage_name(storage));
    }

    Ok(())
}

/// Records `token` in `config` or the keyring, keeping only one copy.
fn store_token(config: &mut Config, token: &str, storage: StorageTarget) -> Result<()> {
    match storage {
        StorageTarget::Config => {
            config.token = Some(token.to_string());
            config.token_storage = Some("config".to_string());
        }
        StorageTarget::Keyring => {
            keyring::store_token(token)?;
            config.token = None;
            config.token_storage = Some("keyring".to_string());
        }
    }
    Ok(())
}

fn storage_name(storage: StorageTarget) -> &'static str {
    match storage {
        StorageTarget::Config => "config",
        StorageTarget::Keyring => "keyring",
    }
}

/// Removes the stored token from the config file and, if used, the keyring.
pub fn execute_logout(ctx: &CommandContext) -> Result<()> {
    let mut config = load_config()?;
    let had_config_token = config.token.take().is_some();

    if config.uses_keyring() {
        keyring::delete_token()?;
    }
    if had_config_token || config.uses_keyring() {
        config.token_storage = None;
        save_config(&config)?;
    }

    if ctx.json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "status": "success" }))?
        );
    } else if !ctx.quiet {
        println!("Stored token removed.");
    }

    Ok(())
}

/// Reports which token is active and who it belongs to.
pub async fn execute_status(ctx: &CommandContext, resolved: &ResolvedToken) -> Result<()> {
    let login = match &resolved.token {
        Some(token) => {
            let client = GithubClient::new(token.clone())?;
            Some(client.get_authenticated_user().await?.login)
        }
        None => None,
    };

    if ctx.json_output {
        let output = serde_json::json!({
            "source": resolved.source.to_string(),
            "token": resolved.token.as_deref().map(mask_token),
            "login": login,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Token source: {}", resolved.source);
        if let Some(token) = &resolved.token {
            println!("Token: {}", mask_token(token));
        }
        match login {
            Some(login) => println!("Authenticated as: {}", login),
            None => println!("Queries run anonymously (60 requests per hour)."),
        }
    }

    Ok(())
}
