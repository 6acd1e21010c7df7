pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Nested objects whose fields are shown inline with their parent.
const INLINE_KEYS: [&str; 3] = ["summary", "base_summary", "cashflow"];

/// Result fields that hold one row per year, point or scenario.
const ROW_KEYS: [&str; 4] = ["years", "points", "scenarios", "parameters"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` member of an output envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Scalar fields of an object, with the fields of summary-like children
/// pulled up to the same level. Other nested objects are left out.
pub(crate) fn flatten_row(map: &Map<String, Value>) -> Vec<(&str, &Value)> {
    let mut fields = Vec::new();
    for (key, val) in map {
        match val {
            Value::Object(inner) if INLINE_KEYS.contains(&key.as_str()) => {
                fields.extend(flatten_row(inner));
            }
            Value::Object(_) => {}
            Value::Array(items) if items.iter().any(Value::is_object) => {}
            _ => fields.push((key.as_str(), val)),
        }
    }
    fields
}

/// The first row-oriented field of a result, if any.
pub(crate) fn primary_rows(map: &Map<String, Value>) -> Option<(&str, &[Value])> {
    ROW_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(rows)) if rows.iter().all(Value::is_object) && !rows.is_empty() => {
            Some((*key, rows.as_slice()))
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_pulls_up_summary() {
        let row = json!({
            "value": "0.10",
            "summary": { "npv": "12.5", "irr": null },
            "assumptions": { "tax_rate": "0.2" },
            "years": [{ "year": 1 }],
        });
        let flat = flatten_row(row.as_object().unwrap());
        let mut keys: Vec<&str> = flat.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["irr", "npv", "value"]);
    }

    #[test]
    fn test_primary_rows_prefers_years() {
        let result = json!({ "npv": "1", "years": [{ "year": 1 }, { "year": 2 }] });
        let (key, rows) = primary_rows(result.as_object().unwrap()).unwrap();
        assert_eq!(key, "years");
        assert_eq!(rows.len(), 2);

        let empty = json!({ "points": [] });
        assert!(primary_rows(empty.as_object().unwrap()).is_none());
    }
}
