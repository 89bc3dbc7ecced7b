//! Error types for colony-import

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Workbook could not be opened or a sheet could not be read
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Persistence failure that makes continuing pointless
    #[error("Store error: {0}")]
    Store(#[from] colony_common::Error),
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Workbook(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
