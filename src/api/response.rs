//! Response bodies shared by the HTTP server and the CLI
//!
//! Success: `{"result": ...}`. Failure: `{"error": message, "code": code}`.

use serde::{Deserialize, Serialize};

use super::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub result: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            error: err.message().to_string(),
            code: err.code().to_string(),
        }
    }
}
