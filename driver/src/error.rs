//! Driver error types.

use thiserror::Error;

/// Driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// SQLite-level failure with the extended result code.
    #[error("sqlite error {code}: {message}")]
    Sqlite { message: String, code: i64 },
}

impl DriverError {
    pub fn sqlite(message: impl Into<String>, code: i64) -> Self {
        Self::Sqlite {
            message: message.into(),
            code,
        }
    }
}

/// Result type for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
