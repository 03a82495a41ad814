use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::auth::{resolve_token, ResolvedToken, TokenSource};
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{LocalCommand, LocalDispatch, RemoteCommand, RemoteDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", error_json(&e));
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    if let Some(dispatch) = LocalDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    let Some(dispatch) = RemoteDispatch::from_cli(cli) else {
        return Err(CommandError::Config(format!(
            "unhandled command: {:?}",
            cli.command
        )));
    };

    let config = load_config()?;
    let ctx = ctx.with_config(&config);
    let token = if dispatch.needs_token() {
        resolve_token(cli.token.as_deref(), &config)?
    } else {
        ResolvedToken {
            token: None,
            source: TokenSource::Anonymous,
        }
    };

    dispatch.execute(&ctx, token, &config).await
}

/// Renders an error as `{"error": {"code", "message"}}`.
fn error_json(e: &CommandError) -> String {
    let error_json = serde_json::json!({
        "error": {
            "code": e.code(),
            "message": e.to_string(),
        }
    });
    serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| e.to_string())
}
