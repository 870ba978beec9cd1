//! Before/after statement notification hooks.

use unidb_core::Value;

/// Observer notified around every statement execution.
///
/// Both callbacks fire whether or not the driver reported an error, so a
/// subscriber sees every statement the session attempted. Implementations
/// must be `Send` because sessions can be moved to background threads.
pub trait QueryObserver: Send {
    /// Called before the statement is handed to the driver.
    fn executing(&self, _sql: &str, _params: &[Value]) {}

    /// Called after the driver returns, regardless of outcome.
    fn executed(&self, _sql: &str, _params: &[Value]) {}
}
