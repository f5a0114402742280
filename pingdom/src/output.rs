//! Output formatting: plain text (tables and key-value) and JSON.

use pingdom_lib::format_timestamp_display;
use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables and key-value
    #[default]
    Plain,
    /// JSON (pretty-printed)
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" | "p" => Ok(OutputFormat::Plain),
            "json" | "j" => Ok(OutputFormat::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// One table column: the object key it reads and how to render it.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub timestamp: bool,
}

impl Column {
    pub const fn text(key: &'static str) -> Self {
        Self {
            key,
            timestamp: false,
        }
    }

    /// Unix seconds, rendered as a date; zero renders as `-`.
    pub const fn time(key: &'static str) -> Self {
        Self {
            key,
            timestamp: true,
        }
    }
}

const MAX_CELL: usize = 40;

/// Render an array of objects as a left-aligned table of `columns`.
pub fn format_table(value: &Value, columns: &[Column], use_utc: bool) -> String {
    let rows = match value {
        Value::Array(rows) => rows,
        other => return format_plain(other),
    };
    if rows.is_empty() {
        return "<empty>\n".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|col| truncate(&cell(row.get(col.key), col, use_utc), MAX_CELL))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(col.key.len())
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<w$}", col.key, w = *w))
        .collect();
    let header = header.join("  ");
    let _ = writeln!(out, "{}", header.trim_end());
    let _ = writeln!(out, "{}", "-".repeat(header.trim_end().len()));
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    out
}

fn cell(value: Option<&Value>, col: &Column, use_utc: bool) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::Number(n)) if col.timestamp => match n.as_i64() {
            Some(0) | None => "-".to_string(),
            Some(ts) => format_timestamp_display(ts, use_utc),
        },
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| as_short_str(v).or_else(|| v.get("name").and_then(as_short_str)))
            .collect::<Vec<_>>()
            .join(","),
        Some(v) => as_short_str(v).unwrap_or_else(|| v.to_string()),
    }
}

/// Format value as plain text (key-value for objects, one line per scalar).
pub fn format_plain(value: &Value) -> String {
    let mut out = String::new();
    format_plain_impl(value, &mut out, 0);
    out
}

fn format_plain_impl(v: &Value, out: &mut String, indent: usize) {
    let pad = "  ".repeat(indent);
    match v {
        Value::Array(arr) => {
            if arr.is_empty() {
                let _ = writeln!(out, "{}<empty>", pad);
                return;
            }
            for (i, item) in arr.iter().enumerate() {
                if item.is_object() || item.is_array() {
                    let _ = writeln!(out, "{}[{}]", pad, i + 1);
                    format_plain_impl(item, out, indent + 1);
                } else {
                    let s = as_short_str(item).unwrap_or_default();
                    let _ = writeln!(out, "{}{}", pad, s);
                }
            }
        }
        Value::Object(map) => {
            for (k, val) in map {
                if val.is_object() || val.is_array() {
                    let _ = writeln!(out, "{}{}:", pad, k);
                    format_plain_impl(val, out, indent + 1);
                } else {
                    let s = as_short_str(val).unwrap_or_default();
                    let _ = writeln!(out, "{}{}: {}", pad, k, s);
                }
            }
        }
        scalar => {
            let s = as_short_str(scalar).unwrap_or_default();
            let _ = writeln!(out, "{}{}", pad, s);
        }
    }
}

fn as_short_str(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        s
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

/// Format value as JSON (pretty).
pub fn format_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLS: [Column; 3] = [
        Column::text("id"),
        Column::text("name"),
        Column::time("lasttesttime"),
    ];

    #[test]
    fn output_format_from_str() {
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("p".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("j".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn table_has_header_and_rows() {
        let v = json!([
            {"id": 85975, "name": "My check 1", "lasttesttime": 1297446423},
            {"id": 161748, "name": "My check 2", "lasttesttime": 0}
        ]);
        let out = format_table(&v, &COLS, true);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id"));
        assert!(lines[0].contains("lasttesttime"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert!(lines[2].contains("My check 1"));
        assert!(lines[2].contains("2011-02-11 17:47:03 UTC"));
        assert!(lines[3].ends_with('-'));
    }

    #[test]
    fn table_columns_align() {
        let v = json!([{"id": 1, "name": "a"}, {"id": 22222, "name": "b"}]);
        let out = format_table(&v, &COLS[..2], true);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2].find('a'), lines[3].find('b'));
    }

    #[test]
    fn table_missing_and_list_cells() {
        let v = json!([{"id": 1, "teams": [{"id": 3, "name": "ops"}, {"id": 4, "name": "dev"}]}]);
        let columns = [Column::text("id"), Column::text("teams"), Column::text("name")];
        let out = format_table(&v, &columns, true);
        assert!(out.contains("ops,dev"));
        assert!(out.lines().nth(2).unwrap().ends_with('-'));
    }

    #[test]
    fn table_empty() {
        assert_eq!(format_table(&json!([]), &COLS, true), "<empty>\n");
    }

    #[test]
    fn plain_object() {
        let out = format_plain(&json!({"name": "web", "paused": false, "tags": ["a"]}));
        assert!(out.contains("name: web"));
        assert!(out.contains("paused: false"));
        assert!(out.contains("tags:\n  a"));
    }

    #[test]
    fn truncate_long_cells() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("a\nb", 4), "a b");
    }

    #[test]
    fn format_json_roundtrip() {
        let v = json!({"x": 1, "y": [2, 3]});
        let parsed: Value = serde_json::from_str(&format_json(&v).unwrap()).unwrap();
        assert_eq!(parsed, v);
    }
}
