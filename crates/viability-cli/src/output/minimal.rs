use serde_json::Value;

use super::format_cell;

/// Paths to the headline figure of each kind of output, in priority order.
const HEADLINES: [&[&str]; 3] = [
    &["indicators", "result"],
    &["simulation", "indicators", "result"],
    &["assumptions"],
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Array(items) = result_obj {
        println!("{}", summarise_array(items));
        return;
    }

    for path in HEADLINES {
        let found = path
            .iter()
            .try_fold(result_obj, |node, key| node.get(*key));
        match found {
            Some(Value::Array(items)) => {
                println!("{} assumptions", items.len());
                return;
            }
            Some(val) if !val.is_null() => {
                println!("{}", format_cell(val));
                return;
            }
            _ => {}
        }
    }

    println!("{}", format_cell(result_obj));
}

/// Findings collapse to a severity count; cash-flow rows to the final balance.
fn summarise_array(items: &[Value]) -> String {
    let severity = |s: &str| {
        items
            .iter()
            .filter(|f| f.get("severity").and_then(Value::as_str) == Some(s))
            .count()
    };
    match items.first() {
        Some(first) if first.get("severity").is_some() => format!(
            "{} critical, {} attention, {} positive",
            severity("critical"),
            severity("attention"),
            severity("positive")
        ),
        Some(_) => items
            .last()
            .and_then(|row| row.get("cumulative_flow"))
            .map(format_cell)
            .unwrap_or_else(|| format!("{} rows", items.len())),
        None => "0 rows".to_string(),
    }
}
