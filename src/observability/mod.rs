//! Observability subsystem for insightdb
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//! - Atomic counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use insightdb::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::DatasetAdded, &[("id", "ubc"), ("rows", "64612")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_query_executed(42);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
