//! # Registry Errors

use thiserror::Error;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Dataset registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid dataset id: '{0}'")]
    InvalidId(String),

    #[error("Dataset already exists: {0}")]
    AlreadyExists(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RegistryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RegistryError::InvalidId(_) => "REGISTRY_INVALID_ID",
            RegistryError::AlreadyExists(_) => "REGISTRY_ALREADY_EXISTS",
            RegistryError::NotFound(_) => "REGISTRY_NOT_FOUND",
            RegistryError::Io(_) => "REGISTRY_IO",
            RegistryError::Serialization(_) => "REGISTRY_SERIALIZATION",
        }
    }

    /// True for errors caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::InvalidId(_)
                | RegistryError::AlreadyExists(_)
                | RegistryError::NotFound(_)
        )
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Serialization(err.to_string())
    }
}
