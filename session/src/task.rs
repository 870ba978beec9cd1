//! Background execution over a shared session handle.
//!
//! `SharedSession` is a cloneable handle serializing access to one
//! session through a mutex. The `spawn_*` variants run the synchronous
//! counterpart on a background thread and hand back a `TaskHandle` whose
//! `join` surfaces both the value and any execution error.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use unidb_core::Value;
use unidb_driver::Driver;

use crate::error::{SessionError, SessionResult};
use crate::result::QueryResult;
use crate::session::Session;

/// Cloneable handle to a session shared across threads.
pub struct SharedSession<D: Driver> {
    inner: Arc<Mutex<Session<D>>>,
}

impl<D: Driver> Clone for SharedSession<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Driver> SharedSession<D> {
    /// Wrap a session for shared use.
    pub fn new(session: Session<D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    // A poisoned lock only means another caller panicked mid-statement;
    // the session value itself is still usable.
    fn lock(&self) -> MutexGuard<'_, Session<D>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// See [`Session::get_scalar`]. Returns a snapshot of the new result.
    pub fn get_scalar(&self, sql: &str, params: &[Value]) -> SessionResult<QueryResult> {
        Ok(self.lock().get_scalar(sql, params)?.clone())
    }

    /// See [`Session::get_row`]. Returns a snapshot of the new result.
    pub fn get_row(&self, sql: &str, params: &[Value]) -> SessionResult<QueryResult> {
        Ok(self.lock().get_row(sql, params)?.clone())
    }

    /// See [`Session::get_rows`]. Returns a snapshot of the new result.
    pub fn get_rows(&self, sql: &str, params: &[Value]) -> SessionResult<QueryResult> {
        Ok(self.lock().get_rows(sql, params)?.clone())
    }

    /// See [`Session::execute`].
    pub fn execute(&self, sql: &str, params: &[Value]) -> SessionResult<usize> {
        self.lock().execute(sql, params)
    }

    /// See [`Session::execute_with`].
    pub fn execute_with(&self, sql: &str, params: &[Value], commit: bool) -> SessionResult<usize> {
        self.lock().execute_with(sql, params, commit)
    }

    /// See [`Session::commit`].
    pub fn commit(&self) -> SessionResult<()> {
        self.lock().commit()
    }

    /// See [`Session::rollback`].
    pub fn rollback(&self) -> SessionResult<()> {
        self.lock().rollback()
    }

    /// Snapshot of the most recent successful result.
    pub fn result(&self) -> QueryResult {
        self.lock().result().clone()
    }
}

impl<D: Driver + Send + 'static> SharedSession<D> {
    /// Run `get_scalar` on a background thread.
    pub fn spawn_get_scalar(&self, sql: &str, params: &[Value]) -> TaskHandle<QueryResult> {
        let handle = self.clone();
        let sql = sql.to_string();
        let params = params.to_vec();
        TaskHandle::spawn(move || handle.get_scalar(&sql, &params))
    }

    /// Run `get_row` on a background thread.
    pub fn spawn_get_row(&self, sql: &str, params: &[Value]) -> TaskHandle<QueryResult> {
        let handle = self.clone();
        let sql = sql.to_string();
        let params = params.to_vec();
        TaskHandle::spawn(move || handle.get_row(&sql, &params))
    }

    /// Run `get_rows` on a background thread.
    pub fn spawn_get_rows(&self, sql: &str, params: &[Value]) -> TaskHandle<QueryResult> {
        let handle = self.clone();
        let sql = sql.to_string();
        let params = params.to_vec();
        TaskHandle::spawn(move || handle.get_rows(&sql, &params))
    }

    /// Run `execute` on a background thread.
    pub fn spawn_execute(&self, sql: &str, params: &[Value]) -> TaskHandle<usize> {
        let handle = self.clone();
        let sql = sql.to_string();
        let params = params.to_vec();
        TaskHandle::spawn(move || handle.execute(&sql, &params))
    }
}

/// Handle to a statement running on a background thread.
pub struct TaskHandle<T> {
    handle: JoinHandle<SessionResult<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    fn spawn(work: impl FnOnce() -> SessionResult<T> + Send + 'static) -> Self {
        Self {
            handle: thread::spawn(work),
        }
    }

    /// Wait for the background statement and surface its outcome.
    pub fn join(self) -> SessionResult<T> {
        self.handle
            .join()
            .unwrap_or_else(|_| Err(SessionError::background("worker thread panicked")))
    }

    /// Whether the background statement has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
