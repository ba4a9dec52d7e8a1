pub mod csv_out;
pub mod minimal;
pub mod table;

use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => {
            if let Err(e) = write_json(io::stdout().lock(), value) {
                eprintln!("{}: {}", "error".red().bold(), e);
            }
        }
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty JSON followed by a newline.
pub(crate) fn write_json<W: Write>(mut out: W, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)
}

/// Render a scalar for a table cell. Arrays and objects collapse to a short
/// summary; monthly series would otherwise swamp the table.
pub(crate) fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => format!("[{} values]", arr.len()),
        Value::Object(map) => format!("{{{} fields}}", map.len()),
    }
}

/// Flatten nested objects into `parent.child` keys, stopping at arrays.
pub(crate) fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, out);
            }
        }
        _ => out.push((prefix.to_string(), value.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use viability_core::diagnostics::{Finding, FindingCategory, Severity};

    #[test]
    fn test_write_json_serializes_typed_values() {
        let finding = Finding::new(
            FindingCategory::Revenue,
            Severity::Attention,
            "Few sales at launch",
            "Launch absorbs under a quarter of the units.",
        )
        .values("20.5%", "25.0%");
        let mut buf = Vec::new();
        write_json(&mut buf, &finding).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back["severity"], json!("attention"));
        assert_eq!(back["title"], json!("Few sales at launch"));
        assert_eq!(back["current_value"], json!("20.5%"));
    }

    #[test]
    fn test_flatten_stops_at_arrays() {
        let value = json!({"indicators": {"irr": {"annual": "0.2"}}, "net_flow": [1, 2]});
        let mut out = Vec::new();
        flatten("", &value, &mut out);
        let keys: Vec<&str> = out.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["indicators.irr.annual", "net_flow"]);
        assert_eq!(format_cell(&out[1].1), "[2 values]");
    }
}
