use serde_json::Value;

use crate::output::{flatten, format_value};

/// Headline figures, most specific first, as dotted paths into the result.
const PRIORITY_KEYS: [&str; 10] = [
    "tax_analysis.summary.total_tax_burden",
    "net_tax",
    "total_amount",
    "estimated_burden",
    "projected_tax.net_tax",
    "total",
    "status",
    "ni_paid_manually",
    "current_month",
    "revision",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first leaf of the result.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);
    let rows = flatten(result);

    for key in PRIORITY_KEYS {
        if let Some((_, val)) = rows.iter().find(|(k, v)| k == key && !v.is_null()) {
            return format_value(val);
        }
    }

    match rows.first() {
        Some((key, val)) if !key.is_empty() => format!("{}: {}", key, format_value(val)),
        Some((_, val)) => format_value(val),
        None => String::new(),
    }
}
