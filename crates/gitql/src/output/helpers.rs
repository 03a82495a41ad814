//! Common helper functions for output formatting.

use std::time::Duration;

use gitql_engine::Datum;
use owo_colors::OwoColorize;

/// Truncates a string to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

/// Flattens a cell value to one line.
pub fn cell_text(value: &Datum) -> String {
    match value {
        Datum::Text(s) => s.replace(['\n', '\r'], " "),
        other => other.to_string(),
    }
}

/// Pads `text` to `width` characters, right-aligning numbers.
pub fn pad(text: &str, width: usize, numeric: bool) -> String {
    if numeric {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

/// Colors a padded cell by the kind of value it holds.
pub fn paint(cell: String, value: &Datum, use_colors: bool) -> String {
    if !use_colors {
        return cell;
    }
    match value {
        Datum::Integer(_) => cell.cyan().to_string(),
        Datum::Boolean(true) => cell.green().to_string(),
        Datum::Boolean(false) => cell.red().to_string(),
        Datum::Text(s) if s.is_empty() => cell.dimmed().to_string(),
        Datum::Text(_) => cell,
    }
}

/// Formats an elapsed time the way the prompt reports it.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{} ms", millis)
    } else {
        format!("{:.2} s", elapsed.as_secs_f64())
    }
}

/// "1 row" / "3 rows".
pub fn row_count(n: usize) -> String {
    if n == 1 {
        "1 row".to_string()
    } else {
        format!("{} rows", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is long", 10), "this is...");
        assert_eq!(truncate_str("ünïcödé text", 6), "ünï...");
    }

    #[test]
    fn test_cell_text_flattens_newlines() {
        let value = Datum::Text("first line\nsecond line".to_string());
        assert_eq!(cell_text(&value), "first line second line");
        assert_eq!(cell_text(&Datum::Integer(-4)), "-4");
        assert_eq!(cell_text(&Datum::Boolean(true)), "true");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("42", 5, true), "   42");
        assert_eq!(pad("ab", 4, false), "ab  ");
    }

    #[test]
    fn test_paint_without_colors_is_identity() {
        let cell = "7".to_string();
        assert_eq!(paint(cell.clone(), &Datum::Integer(7), false), cell);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(250)), "250 ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.50 s");
    }

    #[test]
    fn test_row_count() {
        assert_eq!(row_count(0), "0 rows");
        assert_eq!(row_count(1), "1 row");
        assert_eq!(row_count(12), "12 rows");
    }
}
