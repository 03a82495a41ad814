//! One-shot query command and the result rendering shared with the prompt.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use gitql_engine::{Engine, Origin, QueryOutput};

use super::{CommandContext, Result};
use crate::output::helpers::{format_elapsed, row_count};
use crate::output::{format_output_json, format_output_table};

/// Runs `sql` and reports fetch statistics under `--verbose`.
pub async fn run_query<O: Origin>(
    ctx: &CommandContext,
    engine: &mut Engine<O>,
    sql: &str,
) -> Result<(QueryOutput, Duration)> {
    let started = Instant::now();
    let output = engine.execute(sql).await?;
    let elapsed = started.elapsed();

    ctx.debug(format!(
        "read {} records in {} fetches, evaluated {}, stopped {:?}",
        output.read_cursor, output.populate_count, output.evaluated, output.state
    ));
    ctx.debug(format!("finished in {}", format_elapsed(elapsed)));

    Ok((output, elapsed))
}

/// Writes the result table (or JSON) followed by the row count and elapsed time.
pub fn render(
    ctx: &CommandContext,
    output: &QueryOutput,
    elapsed: Duration,
    out: &mut dyn Write,
) -> Result<()> {
    if ctx.json_output {
        writeln!(out, "{}", format_output_json(output)?)?;
        return Ok(());
    }

    write!(out, "{}", format_output_table(output, ctx.use_colors))?;
    if !ctx.quiet {
        writeln!(
            out,
            "{} ({})",
            row_count(output.len()),
            format_elapsed(elapsed)
        )?;
    }
    Ok(())
}

/// Executes the query command.
pub async fn execute<O: Origin>(
    ctx: &CommandContext,
    engine: &mut Engine<O>,
    sql: &str,
) -> Result<()> {
    let (output, elapsed) = run_query(ctx, engine, sql).await?;
    render(ctx, &output, elapsed, &mut io::stdout().lock())
}
