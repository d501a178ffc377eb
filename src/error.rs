//! Error types for Droply.

use thiserror::Error;

/// Common error type for Droply.
#[derive(Error, Debug)]
pub enum DroplyError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Remote object store error.
    #[error("object store error: {0}")]
    ObjectStore(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for DroplyError {
    fn from(e: sqlx::Error) -> Self {
        DroplyError::Database(e.to_string())
    }
}

/// Result type alias for Droply operations.
pub type Result<T> = std::result::Result<T, DroplyError>;
