use serde_json::Value;
use std::io;

use super::{flatten, format_cell};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let body = map.get("result").unwrap_or(value);
            match body.get("lines").and_then(|l| l.get("lines")) {
                // A simulation: one column per cash-flow line
                Some(Value::Object(lines)) => write_lines_csv(&mut wtr, lines),
                _ => write_fields_csv(&mut wtr, body),
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, value: &Value) {
    let mut fields = Vec::new();
    flatten("", value, &mut fields);
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in fields {
        if !val.is_array() {
            let _ = wtr.write_record([key.as_str(), &format_cell(&val)]);
        }
    }
}

fn write_lines_csv(
    wtr: &mut csv::Writer<io::StdoutLock<'_>>,
    lines: &serde_json::Map<String, Value>,
) {
    let mut headers = vec!["month".to_string()];
    headers.extend(lines.keys().cloned());
    let _ = wtr.write_record(&headers);

    let months = lines
        .values()
        .filter_map(Value::as_array)
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    for month in 0..months {
        let mut row = vec![month.to_string()];
        row.extend(lines.values().map(|values| {
            values
                .get(month)
                .map(format_cell)
                .unwrap_or_default()
        }));
        let _ = wtr.write_record(&row);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
