use serde_json::Value;

use super::{flatten_row, primary_rows, result_of};

/// Key output fields in order of priority.
const PRIORITY_KEYS: [&str; 5] = ["npv", "irr", "min_dscr", "profitability_index", "name"];

/// Fields that label a row in multi-row results.
const LABEL_KEYS: [&str; 3] = ["name", "parameter", "value"];

/// Print just the key answer from the output: the headline figure of a single
/// run, or one `label: figure` line per sensitivity point or scenario.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    let Value::Object(map) = result else {
        println!("{}", format_minimal(result));
        return;
    };

    match primary_rows(map) {
        Some(("years", _)) | None => {
            let flat = flatten_row(map);
            match pick(&flat, &PRIORITY_KEYS) {
                Some(val) => println!("{}", format_minimal(val)),
                None => {
                    if let Some((key, val)) = flat.first() {
                        println!("{}: {}", key, format_minimal(val));
                    }
                }
            }
        }
        Some((_, rows)) => {
            for row in rows.iter().filter_map(Value::as_object) {
                let flat = flatten_row(row);
                let label = pick(&flat, &LABEL_KEYS).map(format_minimal).unwrap_or_default();
                match pick(&flat, &PRIORITY_KEYS[..4]) {
                    Some(figure) => println!("{}: {}", label, format_minimal(figure)),
                    None => println!("{}", label),
                }
            }
        }
    }
}

/// First non-null field among `keys`, in key order.
fn pick<'a>(fields: &[(&str, &'a Value)], keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| {
        fields
            .iter()
            .find(|(k, v)| k == key && !v.is_null())
            .map(|(_, v)| *v)
    })
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_pick_skips_null_and_follows_priority() {
        let row = json!({ "irr": null, "min_dscr": "1.4", "npv": "10" });
        let flat = flatten_row(row.as_object().unwrap());
        assert_eq!(pick(&flat, &PRIORITY_KEYS), Some(&json!("10")));
        assert_eq!(pick(&flat, &["irr", "min_dscr"]), Some(&json!("1.4")));
        assert_eq!(pick(&flat, &["payback_period"]), None);
    }
}
