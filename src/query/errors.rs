//! Query error types
//!
//! Error codes:
//! - INSIGHT_QUERY_INVALID (REJECT)
//! - INSIGHT_RESULT_TOO_LARGE (REJECT)

use std::fmt;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Query error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Query is structurally or semantically invalid
    InsightQueryInvalid,
    /// Query was valid but the final row count exceeds the cap
    InsightResultTooLarge,
}

impl QueryErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::InsightQueryInvalid => "INSIGHT_QUERY_INVALID",
            QueryErrorCode::InsightResultTooLarge => "INSIGHT_RESULT_TOO_LARGE",
        }
    }

    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with context
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
    /// Actual row count for result-too-large errors
    row_count: Option<usize>,
}

impl QueryError {
    /// Create a query invalid error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::InsightQueryInvalid,
            message: reason.into(),
            row_count: None,
        }
    }

    /// Create a result too large error
    pub fn too_large(row_count: usize, limit: usize) -> Self {
        Self {
            code: QueryErrorCode::InsightResultTooLarge,
            message: format!(
                "Query produced {} rows, more than the maximum of {}",
                row_count, limit
            ),
            row_count: Some(row_count),
        }
    }

    /// Create an error for a dataset id that is not loaded
    pub fn dataset_not_loaded(id: impl Into<String>) -> Self {
        Self::invalid(format!("Dataset '{}' is not loaded", id.into()))
    }

    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    pub fn is_too_large(&self) -> bool {
        self.code == QueryErrorCode::InsightResultTooLarge
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for QueryError {}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
