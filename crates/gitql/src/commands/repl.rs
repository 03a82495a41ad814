//! Interactive prompt.
//!
//! Reads one query per line until an empty line, `exit`, `quit` or end of
//! input. A failed query prints its error and the session carries on; the
//! engine (and its resolution cache) lives for the whole session.

use std::io::{self, BufRead, Write};

use gitql_engine::{Engine, Origin};
use owo_colors::OwoColorize;

use super::query::{render, run_query};
use super::{CommandContext, CommandError, Result};

pub const PROMPT: &str = "GitQL> ";

/// Counters for a finished session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub succeeded: usize,
    pub failed: usize,
}

fn is_terminator(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Points at the byte offset `index` of `line`, as echoed after the prompt.
fn caret_line(line: &str, index: usize) -> Option<String> {
    let column = line.get(..index)?.chars().count();
    Some(format!("{}^", " ".repeat(PROMPT.len() + column)))
}

fn write_error(
    ctx: &CommandContext,
    line: &str,
    error: &CommandError,
    out: &mut dyn Write,
) -> io::Result<()> {
    if let CommandError::Query(query_error) = error {
        if let Some(caret) = query_error.index().and_then(|i| caret_line(line, i)) {
            writeln!(out, "{}", caret)?;
        }
    }
    let message = format!("Error: {}", error);
    if ctx.use_colors {
        writeln!(out, "{}", message.red())
    } else {
        writeln!(out, "{}", message)
    }
}

/// Runs the prompt loop over arbitrary input and output.
pub async fn run_session<O: Origin, R: BufRead, W: Write>(
    ctx: &CommandContext,
    engine: &mut Engine<O>,
    mut input: R,
    out: &mut W,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary::default();
    let mut line = String::new();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            // EOF: keep the shell prompt on its own line.
            writeln!(out)?;
            break;
        }
        let query = line.trim_end_matches(['\r', '\n']);
        if is_terminator(query) {
            break;
        }

        match run_query(ctx, engine, query).await {
            Ok((output, elapsed)) => {
                render(ctx, &output, elapsed, out)?;
                summary.succeeded += 1;
            }
            Err(e) => {
                write_error(ctx, query, &e, out)?;
                summary.failed += 1;
            }
        }
    }

    ctx.debug(format!(
        "session ended: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    ));
    Ok(summary)
}

/// Executes the repl command on stdin and stdout.
pub async fn execute<O: Origin>(ctx: &CommandContext, engine: &mut Engine<O>) -> Result<()> {
    if !ctx.quiet && !ctx.json_output {
        println!("gitql {} - empty line, 'exit' or 'quit' to leave", env!("CARGO_PKG_VERSION"));
    }
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(ctx, engine, stdin.lock(), &mut stdout).await?;
    Ok(())
}
