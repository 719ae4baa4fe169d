//! HTTP error mapping
//!
//! | Error | Status |
//! |---|---|
//! | invalid query / id / content | 400 |
//! | remove of unknown dataset | 404 |
//! | result too large | 413 |
//! | internal | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::{ApiError, ErrorKind, ErrorResponse};

/// Result type for HTTP handlers
pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone, Error)]
pub enum HttpError {
    #[error("{}", .0.message())]
    Api(ApiError),

    #[error("Unknown dataset kind: {0}")]
    UnknownKind(String),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::Api(err) => match err.kind() {
                ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::ResultTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            HttpError::UnknownKind(_) | HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            HttpError::Api(err) => err.code(),
            HttpError::UnknownKind(_) => "HTTP_UNKNOWN_KIND",
            HttpError::InvalidBody(_) => "HTTP_INVALID_BODY",
        }
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        HttpError::Api(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            HttpError::Api(err) => ErrorResponse::from_error(err),
            other => ErrorResponse {
                error: other.to_string(),
                code: other.code().to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
