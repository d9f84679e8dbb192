//! Common error types for CityWatch

use thiserror::Error;

/// Common result type for CityWatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the CityWatch crates
#[derive(Error, Debug)]
pub enum Error {
    /// Record store unavailable (wraps sqlx::Error)
    #[error("Storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
