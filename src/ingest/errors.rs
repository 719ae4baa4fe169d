//! # Ingestion Errors

use thiserror::Error;

use crate::dataset::DatasetKind;

/// Result type for ingestion
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors raised while turning raw content into a dataset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    #[error("Archive has no courses/ directory")]
    MissingCourses,

    #[error("Archive has no index.htm")]
    MissingIndex,

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("No valid {0} found in content")]
    Empty(DatasetKind),

    #[error("I/O error: {0}")]
    Io(String),
}

impl IngestError {
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::InvalidArchive(_) => "INGEST_INVALID_ARCHIVE",
            IngestError::MissingCourses => "INGEST_MISSING_COURSES",
            IngestError::MissingIndex => "INGEST_MISSING_INDEX",
            IngestError::InvalidContent(_) => "INGEST_INVALID_CONTENT",
            IngestError::Empty(_) => "INGEST_EMPTY",
            IngestError::Io(_) => "INGEST_IO",
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}
