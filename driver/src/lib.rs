//! unidb Driver
//!
//! The database-client seam the session layer executes through.
//!
//! Responsibilities:
//! - Define the `Driver` trait: transaction control plus the four
//!   statement shapes (scalar, single row, row set, non-query)
//! - Provide the SQLite backend built on rusqlite

mod error;
mod sqlite;

pub use error::{DriverError, DriverResult};
pub use sqlite::SqliteDriver;

use unidb_core::Value;

/// A connected database client bound to one connection/transaction pair.
///
/// All statement parameters are positional. Row-producing calls report the
/// result's column names even when no row matched, so callers can tell an
/// empty result apart from an unknown column.
pub trait Driver {
    /// Begin a transaction on the connection.
    fn begin(&mut self) -> DriverResult<()>;

    /// Commit the active transaction.
    fn commit(&mut self) -> DriverResult<()>;

    /// Roll back the active transaction.
    fn rollback(&mut self) -> DriverResult<()>;

    /// Execute and capture the first column of the first row, or
    /// `Value::Null` when the statement produces no rows.
    fn query_scalar(&mut self, sql: &str, params: &[Value]) -> DriverResult<Value>;

    /// Execute and consume at most one row. The row value list is empty
    /// when the statement produced no rows.
    fn query_row(&mut self, sql: &str, params: &[Value])
        -> DriverResult<(Vec<Value>, Vec<String>)>;

    /// Execute and consume all rows.
    fn query_rows(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> DriverResult<(Vec<Vec<Value>>, Vec<String>)>;

    /// Execute a non-query statement and report the affected row count.
    fn execute(&mut self, sql: &str, params: &[Value]) -> DriverResult<usize>;
}
