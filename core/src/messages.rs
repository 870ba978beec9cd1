//! Common error messages used across unidb components.
//!
//! These constants ensure consistent error messaging between the result
//! wrapper and the session layer.

/// Error: indexing used on a result holding neither a row nor a row set.
pub const ERR_NOT_TABULAR: &str = "Indexing requires a row or row set result";

/// Error: iteration used on a result holding neither a row nor a row set.
pub const ERR_NOT_ITERABLE: &str = "Iteration requires a row or row set result";

/// Error: row search used on a result that is not a row set.
pub const ERR_ROWSET_ONLY: &str = "Row search requires a row set result";

/// Error: single-record mapping used on a result that is not a row.
pub const ERR_MAP_ONE_ROW_ONLY: &str = "Single-record mapping requires a row result";

/// Error: multi-record mapping used on a result that is not a row set.
pub const ERR_MAP_ALL_ROWSET_ONLY: &str = "Multi-record mapping requires a row set result";
