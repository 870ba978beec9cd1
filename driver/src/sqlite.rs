//! SQLite backend for the driver seam.
//!
//! Transactions are issued as plain BEGIN/COMMIT/ROLLBACK batches so the
//! driver owns its connection outright instead of threading rusqlite's
//! borrowing `Transaction` guard through the session layer.

use rusqlite::{params_from_iter, types::Value as SqlValue, Connection};
use unidb_core::Value;

use crate::error::{DriverError, DriverResult};
use crate::Driver;

/// Driver backed by a single rusqlite connection.
pub struct SqliteDriver {
    conn: Connection,
}

impl SqliteDriver {
    /// Open a database file.
    pub fn open(path: &str) -> DriverResult<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database.
    pub fn open_in_memory() -> DriverResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Rows changed by the most recent INSERT/UPDATE/DELETE.
    pub fn changes(&self) -> usize {
        self.conn.changes() as usize
    }

    /// Rowid of the most recent successful INSERT.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

impl Driver for SqliteDriver {
    fn begin(&mut self) -> DriverResult<()> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> DriverResult<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> DriverResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    fn query_scalar(&mut self, sql: &str, params: &[Value]) -> DriverResult<Value> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(params.iter().map(value_to_sql)))?;
        match rows.next()? {
            Some(row) => Ok(value_from_sql(row.get::<_, SqlValue>(0)?)),
            None => Ok(Value::Null),
        }
    }

    fn query_row(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> DriverResult<(Vec<Value>, Vec<String>)> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns = column_names(&stmt);
        let mut rows = stmt.query(params_from_iter(params.iter().map(value_to_sql)))?;
        let mut values = Vec::with_capacity(columns.len());
        if let Some(row) = rows.next()? {
            for i in 0..columns.len() {
                values.push(value_from_sql(row.get::<_, SqlValue>(i)?));
            }
        }
        Ok((values, columns))
    }

    fn query_rows(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> DriverResult<(Vec<Vec<Value>>, Vec<String>)> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns = column_names(&stmt);
        let mut rows = stmt.query(params_from_iter(params.iter().map(value_to_sql)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                values.push(value_from_sql(row.get::<_, SqlValue>(i)?));
            }
            out.push(values);
        }
        Ok((out, columns))
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> DriverResult<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        let affected = stmt.execute(params_from_iter(params.iter().map(value_to_sql)))?;
        Ok(affected)
    }
}

/// Column names captured from the prepared statement, before stepping,
/// so zero-row results still carry their schema.
fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    (0..stmt.column_count())
        .map(|i| stmt.column_name(i).unwrap_or("").to_string())
        .collect()
}

fn value_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(*b as i64),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

fn value_from_sql(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::Int(i),
        SqlValue::Real(f) => Value::Float(f),
        SqlValue::Text(s) => Value::Text(s),
        SqlValue::Blob(b) => Value::Blob(b),
    }
}

fn sqlite_error_code(e: &rusqlite::Error) -> i64 {
    match e {
        rusqlite::Error::SqliteFailure(err, _) => err.extended_code as i64,
        _ => -1,
    }
}

impl From<rusqlite::Error> for DriverError {
    fn from(e: rusqlite::Error) -> Self {
        DriverError::sqlite(e.to_string(), sqlite_error_code(&e))
    }
}
