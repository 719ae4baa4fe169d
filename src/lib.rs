//! insightdb - a query engine over course sections and campus rooms
//!
//! Datasets are loaded once, held in memory, and answered through a JSON
//! query language with filtering, grouping, aggregation and ordering.

pub mod api;
pub mod cli;
pub mod dataset;
pub mod executor;
pub mod http_server;
pub mod ingest;
pub mod observability;
pub mod query;
pub mod registry;
pub mod validator;
