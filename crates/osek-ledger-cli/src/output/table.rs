use serde_json::Value;
use tabled::{builder::Builder, Table};

use crate::output::{flatten, format_value};

/// Format output as a two-column table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                println!("{}", build_table(result));
                print_envelope_notes(map);
            } else {
                println!("{}", build_table(value));
            }
        }
        _ => println!("{}", format_value(value)),
    }
}

fn build_table(value: &Value) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, format_value(&val)]);
    }
    builder.build()
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
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
