//! Error types for pennybook-store

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed CSV in {location}: {message}")]
    Csv { location: String, message: String },

    #[error("Expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
}

impl StoreError {
    /// The backing file (or buffer) does not exist yet
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }

    /// The content exists but is not a well-formed ledger table
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Csv { .. } | StoreError::ColumnCount { .. })
    }

    pub(crate) fn csv(location: &str, error: csv::Error) -> Self {
        StoreError::Csv {
            location: location.to_string(),
            message: error.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
