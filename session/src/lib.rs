//! unidb Session
//!
//! Session manager and uniform result wrapper over a SQL driver.
//!
//! Responsibilities:
//! - Run parameterized statements through a `Driver` and wrap each
//!   outcome (scalar, row, row set) in a `QueryResult`
//! - Resolve result cells by position or column name
//! - Project rows onto caller-defined record types via `FieldMap`
//! - Fire before/after notifications for every statement
//! - Offload statements to background threads via `SharedSession`

mod error;
mod map;
mod observer;
mod result;
mod session;
mod task;

pub use error::{ResultError, SessionError, SessionResult};
pub use map::FieldMap;
pub use observer::QueryObserver;
pub use result::{LookupOptions, QueryResult, ResultItem, ResultIter, ResultValue, Selection};
pub use session::{Session, TransactionSpan};
pub use task::{SharedSession, TaskHandle};
