//! API error types
//!
//! API errors are pass-through: they keep the code and message of the
//! subsystem error they wrap, and add a classification the outer surfaces
//! (HTTP, CLI) map onto their own status vocabulary.

use std::fmt;

use crate::ingest::IngestError;
use crate::query::QueryError;
use crate::registry::RegistryError;

/// How the caller should treat an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: bad query, bad id, bad content
    InvalidRequest,
    /// Target dataset does not exist
    NotFound,
    /// Valid query, too many rows
    ResultTooLarge,
    /// Failure on our side (I/O, poisoned lock)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ResultTooLarge => "RESULT_TOO_LARGE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API-level error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Request rejected before reaching a subsystem
    InsightInvalidRequest,
    /// Shared state is unusable
    InsightInternal,
}

impl ApiErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorCode::InsightInvalidRequest => "INSIGHT_INVALID_REQUEST",
            ApiErrorCode::InsightInternal => "INSIGHT_INTERNAL",
        }
    }
}

/// API error with preserved subsystem error information
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    code: String,
    message: String,
    kind: ErrorKind,
}

impl ApiError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::InsightInvalidRequest.code().to_string(),
            message: reason.into(),
            kind: ErrorKind::InvalidRequest,
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self {
            code: ApiErrorCode::InsightInternal.code().to_string(),
            message: reason.into(),
            kind: ErrorKind::Internal,
        }
    }

    /// Create from a query error (pass-through)
    pub fn from_query_error(err: QueryError) -> Self {
        Self {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
            kind: if err.is_too_large() {
                ErrorKind::ResultTooLarge
            } else {
                ErrorKind::InvalidRequest
            },
        }
    }

    /// Create from a registry error (pass-through)
    pub fn from_registry_error(err: RegistryError) -> Self {
        let kind = match &err {
            RegistryError::InvalidId(_) | RegistryError::AlreadyExists(_) => {
                ErrorKind::InvalidRequest
            }
            RegistryError::NotFound(_) => ErrorKind::NotFound,
            RegistryError::Io(_) | RegistryError::Serialization(_) => ErrorKind::Internal,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            kind,
        }
    }

    /// Create from an ingestion error (pass-through)
    pub fn from_ingest_error(err: IngestError) -> Self {
        let kind = match &err {
            IngestError::Io(_) => ErrorKind::Internal,
            _ => ErrorKind::InvalidRequest,
        };
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            kind,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::from_query_error(err)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        Self::from_registry_error(err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::from_ingest_error(err)
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
