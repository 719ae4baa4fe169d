//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin
//! - Output: one JSON document per line on stdout

use std::io::{self, Read, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

/// Parse one JSON document; blank input is an error
pub fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a serializable value to stdout as one line
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
