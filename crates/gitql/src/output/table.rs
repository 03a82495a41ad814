//! Query result and token stream formatting.

use gitql_engine::query::Token;
use gitql_engine::{Datum, QueryOutput};
use owo_colors::OwoColorize;

use super::helpers::{cell_text, pad, paint, truncate_str};

/// Widest a column may grow before its cells are truncated.
pub const MAX_COLUMN_WIDTH: usize = 48;

/// Formats query results as an aligned table.
pub fn format_output_table(output: &QueryOutput, use_colors: bool) -> String {
    if output.is_empty() {
        return "(no rows)\n".to_string();
    }

    let rows: Vec<Vec<(String, Option<&Datum>)>> = output
        .records
        .iter()
        .map(|record| {
            output
                .columns
                .iter()
                .map(|column| {
                    let value = record.get(column);
                    let text = value.map(cell_text).unwrap_or_default();
                    (truncate_str(&text, MAX_COLUMN_WIDTH), value)
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = output
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].0.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();

    let header: Vec<String> = output
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, &width)| pad(column, width, false))
        .collect();
    let header = header.join("  ");
    let header = header.trim_end();
    if use_colors {
        out.push_str(&header.bold().to_string());
    } else {
        out.push_str(header);
    }
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, value), &width)| {
                let numeric = matches!(value, Some(Datum::Integer(_)));
                let cell = pad(text, width, numeric);
                match value {
                    Some(value) => paint(cell, value, use_colors),
                    None => cell,
                }
            })
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

/// Formats query results as JSON.
pub fn format_output_json(output: &QueryOutput) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(output)
}

/// Formats a token stream, one token per line.
pub fn format_tokens_table(tokens: &[Token], use_colors: bool) -> String {
    let mut out = String::new();
    for token in tokens {
        let index = format!("{:>4}", token.index);
        let kind = token.kind.to_string();
        let line = match &token.value {
            Some(value) => format!("{}  {}  {}", index, kind, value),
            None => format!("{}  {}", index, kind),
        };
        if use_colors {
            out.push_str(&line.replacen(&kind, &kind.yellow().to_string(), 1));
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

/// Formats a token stream as JSON.
pub fn format_tokens_json(tokens: &[Token]) -> Result<String, serde_json::Error> {
    let tokens: Vec<serde_json::Value> = tokens
        .iter()
        .map(|token| {
            serde_json::json!({
                "kind": token.kind.name(),
                "index": token.index,
                "value": token.value.as_ref().map(|v| match v.as_integer() {
                    Some(n) => serde_json::Value::from(n),
                    None => serde_json::Value::from(v.as_text().unwrap_or_default()),
                }),
            })
        })
        .collect();
    serde_json::to_string_pretty(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitql_engine::query::Tokenizer;
    use gitql_engine::source::SelectionState;
    use gitql_engine::Record;

    fn output(records: Vec<Record>) -> QueryOutput {
        QueryOutput {
            columns: vec!["number".to_string(), "title".to_string()],
            records,
            read_cursor: 0,
            populate_count: 1,
            evaluated: 0,
            state: SelectionState::Exhausted,
        }
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(format_output_table(&output(vec![]), false), "(no rows)\n");
    }

    #[test]
    fn test_table_alignment() {
        let records = vec![
            Record::new().with("number", 7i64).with("title", "Fix build"),
            Record::new()
                .with("number", 1234i64)
                .with("title", "Crash"),
        ];
        let table = format_output_table(&output(records), false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "number  title");
        assert_eq!(lines[1], "------  ---------");
        assert_eq!(lines[2], "     7  Fix build");
        assert_eq!(lines[3], "  1234  Crash");
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let title = "x".repeat(MAX_COLUMN_WIDTH + 10);
        let records = vec![Record::new().with("number", 1i64).with("title", title)];
        let table = format_output_table(&output(records), false);
        let last = table.lines().last().unwrap();
        assert!(last.ends_with("..."));
        assert_eq!(last.chars().count(), 6 + 2 + MAX_COLUMN_WIDTH);
    }

    #[test]
    fn test_output_json() {
        let records = vec![Record::new().with("number", 3i64).with("title", "Hi")];
        let json = format_output_json(&output(records)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"][0]["number"], 3);
        assert_eq!(value["records"][0]["title"], "Hi");
        assert_eq!(value["state"], "exhausted");
    }

    #[test]
    fn test_tokens_table() {
        let mut tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("SELECT column1 FROM table1;").unwrap();
        let table = format_tokens_table(tokens, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "   0  SELECT");
        assert_eq!(lines[1], "   7  COLUMN_PLACEHOLDER  'column1'");
        assert_eq!(lines[3], "  20  SOURCE  'table1'");
        assert_eq!(lines[4], "  26  SEMI_COLON");
    }

    #[test]
    fn test_tokens_json() {
        let mut tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("LIMIT 5").unwrap();
        let json = format_tokens_json(tokens).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "LIMIT");
        assert!(value[0]["value"].is_null());
        assert_eq!(value[1]["kind"], "NUMBER");
        assert_eq!(value[1]["value"], 5);
        assert_eq!(value[1]["index"], 6);
    }
}
