use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a JSON document piped on stdin.
///
/// Returns None if stdin is a TTY (interactive) or nothing was piped.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: T = serde_json::from_str(trimmed)?;
    Ok(Some(value))
}
