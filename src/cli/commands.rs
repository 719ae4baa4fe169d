//! CLI command implementations
//!
//! Each command loads the config, opens the service over `data_dir`, does
//! one thing and exits. `serve` blocks on the HTTP server.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ErrorResponse, InsightService, SuccessResponse};
use crate::dataset::DatasetKind;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{log_event_with_fields, Event};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one JSON file per dataset (required)
    pub data_dir: String,

    /// HTTP server settings (optional)
    #[serde(default)]
    pub http: HttpServerConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        if self.http.max_body_bytes == 0 {
            return Err(CliError::config_error("http.max_body_bytes must be > 0"));
        }

        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    fn open_service(&self) -> CliResult<InsightService> {
        InsightService::open(self.data_path()).map_err(|e| {
            log_event_with_fields(Event::StartupFailed, &[("error", e.message())]);
            CliError::boot_failed(format!("Failed to open data directory: {}", e))
        })
    }
}

/// Main CLI entry point
///
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::Query { config } => query(&config),
        Command::Add {
            config,
            id,
            kind,
            file,
        } => add(&config, &id, &kind, &file),
        Command::Remove { config, id } => remove(&config, &id),
        Command::List { config } => list(&config),
    }
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let service = Arc::new(config.open_service()?);

    let mut http_config = config.http.clone();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::new(http_config, service);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Read one query from stdin and print its response
///
/// A rejected query is a response, not a CLI failure.
pub fn query(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let service = config.open_service()?;

    let request = read_request()?;
    write_json(&query_response(&service, &request)?)
}

/// Add a dataset from a file and print the loaded ids
pub fn add(config_path: &Path, id: &str, kind: &str, file: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let service = config.open_service()?;

    let ids = add_from_file(&service, id, kind, file)?;
    write_json(&SuccessResponse::new(ids))
}

/// Remove a dataset and print its id
pub fn remove(config_path: &Path, id: &str) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let service = config.open_service()?;

    let removed = service.remove_dataset(id)?;
    write_json(&SuccessResponse::new(removed))
}

/// Print a summary of each loaded dataset
pub fn list(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let service = config.open_service()?;

    write_json(&SuccessResponse::new(service.list_datasets()?))
}

fn add_from_file(
    service: &InsightService,
    id: &str,
    kind: &str,
    file: &Path,
) -> CliResult<Vec<String>> {
    let kind: DatasetKind = kind.parse().map_err(CliError::io_error)?;
    let content = fs::read(file).map_err(|e| {
        CliError::io_error(format!("Failed to read {}: {}", file.display(), e))
    })?;
    Ok(service.add_dataset(id, &content, kind)?)
}

fn query_response(service: &InsightService, request: &Value) -> CliResult<Value> {
    let value = match service.perform_query(request) {
        Ok(rows) => serde_json::to_value(SuccessResponse::new(rows))?,
        Err(err) => serde_json::to_value(ErrorResponse::from_error(&err))?,
    };
    Ok(value)
}
