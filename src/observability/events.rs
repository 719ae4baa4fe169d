//! Observable events
//!
//! Every log line the service emits outside of scopes is one of these.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    ServerStart,
    ServerStop,
    ConfigLoaded,
    RegistryOpened,

    // Datasets
    DatasetAdded,
    DatasetRemoved,
    DatasetRejected,

    // Queries
    QueryExecuted,
    QueryRejected,
    QueryTooLarge,

    /// Unrecoverable startup failure
    StartupFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::RegistryOpened => "REGISTRY_OPENED",
            Event::DatasetAdded => "DATASET_ADDED",
            Event::DatasetRemoved => "DATASET_REMOVED",
            Event::DatasetRejected => "DATASET_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryTooLarge => "QUERY_TOO_LARGE",
            Event::StartupFailed => "STARTUP_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StartupFailed => Severity::Fatal,
            Event::DatasetRejected | Event::QueryRejected | Event::QueryTooLarge => {
                Severity::Warn
            }
            _ => Severity::Info,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
