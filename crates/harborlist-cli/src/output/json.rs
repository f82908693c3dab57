use serde_json::Value;
use std::io::{self, Write};

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    let rendered = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("JSON serialization error: {}", e);
            return;
        }
    };
    // A closed pipe (e.g. `| head`) is not an error worth reporting
    let _ = writeln!(io::stdout().lock(), "{}", rendered);
}
