use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_row, result_of, INLINE_KEYS};

/// Format output as tables using the tabled crate: one Field/Value table for
/// the headline figures, then one table per row-oriented section.
pub fn print_table(value: &Value) {
    print_section(None, result_of(value));

    if let Some(envelope) = value.as_object() {
        print_envelope_notes(envelope);
    }
}

fn print_section(title: Option<&str>, value: &Value) {
    match value {
        Value::Object(map) => {
            let fields = flatten_row(map);
            if !fields.is_empty() {
                print_title(title);
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in fields {
                    builder.push_record([key.to_string(), format_value(val)]);
                }
                println!("{}", Table::from(builder));
            }

            for (key, val) in map {
                match val {
                    Value::Array(rows) if rows.iter().any(Value::is_object) => {
                        print_rows(key, rows);
                    }
                    Value::Object(_) if !INLINE_KEYS.contains(&key.as_str()) => {
                        print_section(Some(key), val);
                    }
                    _ => {}
                }
            }
        }
        Value::Array(rows) => print_rows("result", rows),
        _ => println!("{}", format_value(value)),
    }
}

fn print_rows(title: &str, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("\n{}: (empty)", title);
        return;
    };

    let headers: Vec<String> = flatten_row(first)
        .into_iter()
        .map(|(k, _)| k.to_string())
        .collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());

    for item in rows {
        if let Value::Object(map) = item {
            let flat = flatten_row(map);
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    flat.iter()
                        .find(|(k, _)| *k == h.as_str())
                        .map(|(_, v)| format_value(v))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
    }

    print_title(Some(title));
    println!("{}", Table::from(builder));
}

fn print_title(title: Option<&str>) {
    if let Some(t) = title {
        println!("\n{}:", t);
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
