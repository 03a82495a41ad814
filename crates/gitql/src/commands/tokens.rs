//! Tokens command: shows how a query is split into tokens.

use gitql_engine::query::Tokenizer;
use gitql_engine::QueryError;

use super::{CommandContext, Result};
use crate::output::{format_tokens_json, format_tokens_table};

/// Executes the tokens command.
pub fn execute(ctx: &CommandContext, sql: &str) -> Result<()> {
    let mut tokenizer = Tokenizer::new();
    let tokens = tokenizer.tokenize(sql).map_err(QueryError::from)?;

    if ctx.json_output {
        println!("{}", format_tokens_json(tokens)?);
    } else {
        print!("{}", format_tokens_table(tokens, ctx.use_colors));
    }

    Ok(())
}
