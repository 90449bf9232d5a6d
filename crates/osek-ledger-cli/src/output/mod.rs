pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;
pub mod yaml;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
        OutputFormat::Yaml => yaml::print_yaml(value),
    }
}

/// Flatten nested objects and arrays into `(dotted.key, leaf)` rows,
/// e.g. `tax.breakdown.0.amount`.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into("", value, &mut rows);
    rows
}

fn flatten_into(prefix: &str, value: &Value, rows: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, val) in map {
                flatten_into(&join(prefix, key), val, rows);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, val) in arr.iter().enumerate() {
                flatten_into(&join(prefix, &i.to_string()), val, rows);
            }
        }
        _ => rows.push((prefix.to_string(), value.clone())),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Render a leaf value without JSON quoting.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "totals": {"income_ytd": "1000", "months_left": 3},
            "breakdown": [{"amount": "10"}, {"amount": "20"}],
            "empty": [],
        });
        let keys: Vec<String> = flatten(&value).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "breakdown.0.amount",
                "breakdown.1.amount",
                "empty",
                "totals.income_ytd",
                "totals.months_left",
            ]
        );
    }

    #[test]
    fn test_flatten_scalar() {
        assert_eq!(flatten(&json!(5)), vec![(String::new(), json!(5))]);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("7135.2")), "7135.2");
        assert_eq!(format_value(&json!(null)), "");
        assert_eq!(format_value(&json!([])), "[]");
    }
}
