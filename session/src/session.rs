//! Session manager.
//!
//! A `Session` owns one driver (one connection/transaction pair) and the
//! result of the most recent statement. Construction begins the initial
//! transaction; commit and rollback immediately begin a fresh one, so an
//! open session always has an active transaction.
//!
//! Driver failures are returned to the caller, never swallowed; the
//! previously stored result is left untouched on the failure path so the
//! last good result remains readable.

use unidb_core::Value;
use unidb_driver::Driver;

use crate::error::SessionResult;
use crate::observer::QueryObserver;
use crate::result::{LookupOptions, QueryResult, ResultValue};

/// How long the session-owned transaction lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSpan {
    /// Commit after every non-query statement unless the caller opts out.
    #[default]
    PerStatement,
    /// One long-lived transaction, ended only by explicit commit/rollback.
    Process,
}

/// A database session.
pub struct Session<D: Driver> {
    /// The underlying client, transaction already begun.
    driver: D,
    /// Result of the most recent successful statement.
    result: QueryResult,
    /// Column-name lookup options applied to every wrapped result.
    options: LookupOptions,
    /// Auto-commit policy for non-query statements.
    span: TransactionSpan,
    /// Before/after notification subscribers.
    observers: Vec<Box<dyn QueryObserver>>,
}

impl<D: Driver> Session<D> {
    /// Open a session over a connected driver and begin the initial
    /// transaction.
    pub fn open(mut driver: D) -> SessionResult<Self> {
        driver.begin()?;
        Ok(Self {
            driver,
            result: QueryResult::empty(),
            options: LookupOptions::default(),
            span: TransactionSpan::default(),
            observers: Vec::new(),
        })
    }

    /// Set the column-name lookup options for wrapped results.
    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the transaction span policy.
    pub fn with_span(mut self, span: TransactionSpan) -> Self {
        self.span = span;
        self
    }

    /// Subscribe an observer to before/after statement notifications.
    pub fn add_observer(&mut self, observer: Box<dyn QueryObserver>) {
        self.observers.push(observer);
    }

    /// Result of the most recent successful statement.
    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    /// Discard the stored result.
    pub fn clear_result(&mut self) {
        self.result.clear();
    }

    /// Execute and capture the first column of the first row as a scalar
    /// result. `Value::Null` when the statement produced no rows.
    pub fn get_scalar(&mut self, sql: &str, params: &[Value]) -> SessionResult<&QueryResult> {
        self.notify_executing(sql, params);
        let outcome = self.driver.query_scalar(sql, params);
        self.notify_executed(sql, params);
        let value = outcome?;
        self.result = QueryResult::new(ResultValue::Scalar(value), Vec::new(), self.options);
        Ok(&self.result)
    }

    /// Execute, read at most one row, and capture it with its columns.
    pub fn get_row(&mut self, sql: &str, params: &[Value]) -> SessionResult<&QueryResult> {
        self.notify_executing(sql, params);
        let outcome = self.driver.query_row(sql, params);
        self.notify_executed(sql, params);
        let (values, columns) = outcome?;
        self.result = QueryResult::new(ResultValue::Row(values), columns, self.options);
        Ok(&self.result)
    }

    /// Execute, read all rows, and capture them with their columns.
    pub fn get_rows(&mut self, sql: &str, params: &[Value]) -> SessionResult<&QueryResult> {
        self.notify_executing(sql, params);
        let outcome = self.driver.query_rows(sql, params);
        self.notify_executed(sql, params);
        let (rows, columns) = outcome?;
        self.result = QueryResult::new(ResultValue::RowSet(rows), columns, self.options);
        Ok(&self.result)
    }

    /// Execute a non-query statement, honoring the auto-commit policy.
    pub fn execute(&mut self, sql: &str, params: &[Value]) -> SessionResult<usize> {
        self.execute_with(sql, params, true)
    }

    /// Execute a non-query statement. `commit` opts in or out of the
    /// per-statement auto-commit; it has no effect under
    /// `TransactionSpan::Process`.
    pub fn execute_with(
        &mut self,
        sql: &str,
        params: &[Value],
        commit: bool,
    ) -> SessionResult<usize> {
        self.notify_executing(sql, params);
        let outcome = self.driver.execute(sql, params);
        self.notify_executed(sql, params);
        let affected = outcome?;
        if commit && self.span == TransactionSpan::PerStatement {
            self.driver.commit()?;
            self.driver.begin()?;
        }
        Ok(affected)
    }

    /// Commit the active transaction and begin a fresh one.
    pub fn commit(&mut self) -> SessionResult<()> {
        self.driver.commit()?;
        self.driver.begin()?;
        Ok(())
    }

    /// Roll back the active transaction and begin a fresh one.
    pub fn rollback(&mut self) -> SessionResult<()> {
        self.driver.rollback()?;
        self.driver.begin()?;
        Ok(())
    }

    /// Give back the driver, leaving any active transaction to the
    /// connection's drop behavior.
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn notify_executing(&self, sql: &str, params: &[Value]) {
        for observer in &self.observers {
            observer.executing(sql, params);
        }
    }

    fn notify_executed(&self, sql: &str, params: &[Value]) {
        for observer in &self.observers {
            observer.executed(sql, params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use crate::result::Selection;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};
    use unidb_driver::{DriverError, DriverResult};

    /// Scripted driver recording every call it receives.
    struct FakeDriver {
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl FakeDriver {
        fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
            let log = Rc::new(RefCell::new(Vec::new()));
            (
                Self {
                    log: Rc::clone(&log),
                    fail: false,
                },
                log,
            )
        }

        fn record(&self, entry: impl Into<String>) {
            self.log.borrow_mut().push(entry.into());
        }

        fn outcome<T>(&self, value: T) -> DriverResult<T> {
            if self.fail {
                Err(DriverError::sqlite("scripted failure", -1))
            } else {
                Ok(value)
            }
        }
    }

    impl Driver for FakeDriver {
        fn begin(&mut self) -> DriverResult<()> {
            self.record("begin");
            Ok(())
        }

        fn commit(&mut self) -> DriverResult<()> {
            self.record("commit");
            Ok(())
        }

        fn rollback(&mut self) -> DriverResult<()> {
            self.record("rollback");
            Ok(())
        }

        fn query_scalar(&mut self, sql: &str, _params: &[Value]) -> DriverResult<Value> {
            self.record(format!("scalar:{sql}"));
            self.outcome(Value::Int(42))
        }

        fn query_row(
            &mut self,
            sql: &str,
            _params: &[Value],
        ) -> DriverResult<(Vec<Value>, Vec<String>)> {
            self.record(format!("row:{sql}"));
            self.outcome((
                vec![Value::Int(1), Value::Text("a".into())],
                vec!["id".to_string(), "name".to_string()],
            ))
        }

        fn query_rows(
            &mut self,
            sql: &str,
            _params: &[Value],
        ) -> DriverResult<(Vec<Vec<Value>>, Vec<String>)> {
            self.record(format!("rows:{sql}"));
            self.outcome((
                vec![vec![Value::Int(1)], vec![Value::Int(2)]],
                vec!["id".to_string()],
            ))
        }

        fn execute(&mut self, sql: &str, _params: &[Value]) -> DriverResult<usize> {
            self.record(format!("execute:{sql}"));
            self.outcome(3)
        }
    }

    struct RecordingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl QueryObserver for RecordingObserver {
        fn executing(&self, sql: &str, _params: &[Value]) {
            self.events.lock().unwrap().push(format!("executing:{sql}"));
        }

        fn executed(&self, sql: &str, _params: &[Value]) {
            self.events.lock().unwrap().push(format!("executed:{sql}"));
        }
    }

    #[test]
    fn test_open_begins_transaction() {
        // GIVEN
        let (driver, log) = FakeDriver::new();

        // WHEN
        let _session = Session::open(driver).unwrap();

        // THEN
        assert_eq!(*log.borrow(), vec!["begin"]);
    }

    #[test]
    fn test_get_scalar_stores_scalar_result() {
        // GIVEN
        let (driver, _log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();

        // WHEN
        let result = session.get_scalar("SELECT COUNT(*)", &[]).unwrap();

        // THEN
        assert_eq!(result.as_scalar(), Some(&Value::Int(42)));
    }

    #[test]
    fn test_get_row_stores_row_with_columns() {
        // GIVEN
        let (driver, _log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();

        // WHEN
        session.get_row("SELECT id, name", &[]).unwrap();

        // THEN
        let result = session.result();
        assert_eq!(result.columns(), ["id", "name"]);
        assert_eq!(
            result.get_named("name").unwrap(),
            Selection::One(Value::Text("a".into()))
        );
    }

    #[test]
    fn test_get_rows_stores_row_set() {
        // GIVEN
        let (driver, _log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();

        // WHEN
        session.get_rows("SELECT id", &[]).unwrap();

        // THEN
        assert_eq!(
            session.result().get_named("id").unwrap(),
            Selection::Many(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_driver_failure_keeps_last_good_result() {
        // GIVEN
        let (driver, _log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();
        session.get_scalar("SELECT 1", &[]).unwrap();

        // WHEN a later statement fails
        let events = Arc::new(Mutex::new(Vec::new()));
        session.add_observer(Box::new(RecordingObserver {
            events: Arc::clone(&events),
        }));
        session.driver.fail = true;
        let err = session.get_rows("SELECT broken", &[]).unwrap_err();

        // THEN the error is surfaced, the prior result remains, and both
        // notifications fired
        assert!(matches!(err, SessionError::Driver(_)));
        assert_eq!(session.result().as_scalar(), Some(&Value::Int(42)));
        assert_eq!(
            *events.lock().unwrap(),
            vec!["executing:SELECT broken", "executed:SELECT broken"]
        );
    }

    #[test]
    fn test_execute_auto_commits_per_statement() {
        // GIVEN
        let (driver, log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();

        // WHEN
        let affected = session.execute("DELETE FROM users", &[]).unwrap();

        // THEN
        assert_eq!(affected, 3);
        assert_eq!(
            *log.borrow(),
            vec!["begin", "execute:DELETE FROM users", "commit", "begin"]
        );
    }

    #[test]
    fn test_execute_with_opt_out_skips_commit() {
        // GIVEN
        let (driver, log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();

        // WHEN
        session
            .execute_with("DELETE FROM users", &[], false)
            .unwrap();

        // THEN
        assert_eq!(*log.borrow(), vec!["begin", "execute:DELETE FROM users"]);
    }

    #[test]
    fn test_process_span_never_auto_commits() {
        // GIVEN
        let (driver, log) = FakeDriver::new();
        let mut session = Session::open(driver)
            .unwrap()
            .with_span(TransactionSpan::Process);

        // WHEN
        session.execute("DELETE FROM users", &[]).unwrap();

        // THEN
        assert_eq!(*log.borrow(), vec!["begin", "execute:DELETE FROM users"]);
    }

    #[test]
    fn test_commit_and_rollback_begin_fresh_transaction() {
        // GIVEN
        let (driver, log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();

        // WHEN
        session.commit().unwrap();
        session.rollback().unwrap();

        // THEN
        assert_eq!(
            *log.borrow(),
            vec!["begin", "commit", "begin", "rollback", "begin"]
        );
    }

    #[test]
    fn test_lookup_options_flow_into_results() {
        // GIVEN
        let (driver, _log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap().with_options(LookupOptions {
            case_insensitive: true,
        });

        // WHEN
        session.get_row("SELECT id, name", &[]).unwrap();

        // THEN
        assert_eq!(
            session.result().get_named("NAME").unwrap(),
            Selection::One(Value::Text("a".into()))
        );
    }

    #[test]
    fn test_clear_result() {
        // GIVEN
        let (driver, _log) = FakeDriver::new();
        let mut session = Session::open(driver).unwrap();
        session.get_row("SELECT id, name", &[]).unwrap();

        // WHEN
        session.clear_result();

        // THEN
        assert!(session.result().get(0).is_err());
    }
}
