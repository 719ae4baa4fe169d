//! CLI argument definitions using clap
//!
//! Commands:
//! - insightdb serve --config <path>
//! - insightdb query --config <path>
//! - insightdb add --id <id> --kind <kind> --file <path> --config <path>
//! - insightdb remove --id <id> --config <path>
//! - insightdb list --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// insightdb - query engine over course sections and campus rooms
#[derive(Parser, Debug)]
#[command(name = "insightdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./insightdb.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Read one JSON query from stdin and print the response
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./insightdb.json")]
        config: PathBuf,
    },

    /// Add a dataset from a file
    Add {
        /// Path to configuration file
        #[arg(long, default_value = "./insightdb.json")]
        config: PathBuf,

        /// Dataset id
        #[arg(long)]
        id: String,

        /// Dataset kind: sections or rooms
        #[arg(long)]
        kind: String,

        /// Archive (sections) or JSON rows (rooms)
        #[arg(long)]
        file: PathBuf,
    },

    /// Remove a dataset
    Remove {
        /// Path to configuration file
        #[arg(long, default_value = "./insightdb.json")]
        config: PathBuf,

        /// Dataset id
        #[arg(long)]
        id: String,
    },

    /// List loaded datasets
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./insightdb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "insightdb", "add", "--id", "ubc", "--kind", "sections", "--file", "ubc.tar",
        ])
        .unwrap();
        match cli.command {
            Command::Add { config, id, kind, file } => {
                assert_eq!(config, PathBuf::from("./insightdb.json"));
                assert_eq!(id, "ubc");
                assert_eq!(kind, "sections");
                assert_eq!(file, PathBuf::from("ubc.tar"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["insightdb", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Command::Serve { port: Some(8080), .. }));
    }

    #[test]
    fn test_remove_requires_id() {
        assert!(Cli::try_parse_from(["insightdb", "remove"]).is_err());
    }
}
