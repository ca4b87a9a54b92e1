use thiserror::Error;

/// Errors related to the core types of the link registry.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors returned by [`LinkRegistry`](crate::registry::LinkRegistry) implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("registry backend unavailable: {0}")]
    Unavailable(String),
    #[error("registry operation failed: {0}")]
    Operation(String),
}
