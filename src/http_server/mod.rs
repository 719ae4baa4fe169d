//! # insightdb HTTP Server Module
//!
//! Exposes `InsightService` over HTTP with axum.
//!
//! # Endpoints
//!
//! - `PUT /dataset/:id/:kind` - Add a dataset from the raw request body
//! - `DELETE /dataset/:id` - Remove a dataset
//! - `GET /datasets` - List loaded datasets
//! - `POST /query` - Run a query
//! - `/health` - Health check
//! - `/observability/metrics` - Counters

pub mod config;
pub mod dataset_routes;
pub mod errors;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{HttpError, HttpResult};
pub use server::HttpServer;
