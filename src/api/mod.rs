//! API Layer for insightdb
//!
//! `InsightService` composes the dataset registry, ingestion and the query
//! engine behind one registry lock.
//!
//! # Design Principles
//!
//! - Writers (add, remove) serialize; readers (query, list) share
//! - Error codes passed through unchanged from subsystems
//! - Every outcome is counted and logged
//!
//! # Supported Operations
//!
//! - add_dataset
//! - remove_dataset
//! - list_datasets
//! - perform_query

mod errors;
mod handler;
mod response;

pub use errors::{ApiError, ApiErrorCode, ApiResult, ErrorKind};
pub use handler::InsightService;
pub use response::{ErrorResponse, SuccessResponse};
