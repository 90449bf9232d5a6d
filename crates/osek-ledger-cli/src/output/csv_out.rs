use serde_json::Value;
use std::io;

use crate::output::{flatten, format_value};

/// Write output as `field,value` CSV to stdout.
///
/// For a computation envelope only the `result` section is written.
pub fn print_csv(value: &Value) {
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Err(e) = write_csv(io::stdout().lock(), body) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: io::Write>(writer: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["field", "value"])?;
    for (key, val) in flatten(value) {
        wtr.write_record([key, format_value(&val)])?;
    }
    wtr.flush()?;
    Ok(())
}
