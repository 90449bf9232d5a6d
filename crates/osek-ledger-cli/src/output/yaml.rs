use serde_json::Value;

/// Print the value as a YAML document to stdout.
pub fn print_yaml(value: &Value) {
    match serde_yaml::to_string(value) {
        Ok(s) => print!("{}", s),
        Err(e) => eprintln!("YAML serialization error: {}", e),
    }
}
