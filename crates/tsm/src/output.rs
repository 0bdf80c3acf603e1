//! Output formatting helpers for the `tsm` CLI.

use std::io::{self, Write};

use serde::Serialize;

/// Serialize a value as pretty-printed JSON to stdout.
///
/// Exits the process with an error if serialization fails.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}
