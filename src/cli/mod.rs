//! CLI module for insightdb
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP server
//! - query: One-shot query from stdin
//! - add / remove / list: Dataset management against the data directory

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{add, list, query, remove, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_json};
