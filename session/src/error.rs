//! Session and result error types.

use thiserror::Error;
use unidb_driver::DriverError;

/// Errors raised while reading a `QueryResult`.
#[derive(Debug, Error, PartialEq)]
pub enum ResultError {
    /// Column name lookup failed.
    #[error("column not found: {name}")]
    ColumnNotFound { name: String },

    /// Named lookup attempted on a result with no elements.
    #[error("result has no elements")]
    EmptyResult,

    /// Positional lookup outside the row bounds.
    #[error("index {index} out of range for {len} columns")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation used on a result holding neither a row nor a row set.
    #[error("invalid state: {message}")]
    InvalidState { message: String },
}

impl ResultError {
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound { name: name.into() }
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Driver-level execution failure.
    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    /// Result access failure.
    #[error("result error: {0}")]
    Result(#[from] ResultError),

    /// A background statement panicked before producing an outcome.
    #[error("background task failed: {message}")]
    Background { message: String },
}

impl SessionError {
    pub fn background(message: impl Into<String>) -> Self {
        Self::Background {
            message: message.into(),
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
