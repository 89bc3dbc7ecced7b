//! Common error types for the colony workspace

use thiserror::Error;

/// Common result type for colony operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the server and the importer
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness constraint violated (duplicate strain name, cage number, email...)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map a sqlx error, turning SQLite UNIQUE violations into [`Error::Conflict`]
    pub fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Error::Conflict(what.into())
            }
            _ => Error::Database(err),
        }
    }

    /// True when this error is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}
