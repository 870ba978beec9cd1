//! Projection of rows onto caller-defined record types.
//!
//! Matching is by normalized name: underscores stripped, ASCII case
//! folded, so a field registered as `UserName` matches a `user_name`
//! column. Fields with no matching column keep their `Default` value;
//! columns with no matching field are ignored.

use unidb_core::{messages, Value};

use crate::error::ResultError;
use crate::result::{QueryResult, ResultValue};

type Setter<T> = Box<dyn Fn(&mut T, &Value)>;

/// Ordered table of field name → setter pairs driving a projection.
pub struct FieldMap<T> {
    fields: Vec<(String, Setter<T>)>,
}

impl<T> FieldMap<T> {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register a field. The setter receives the source cell, which may be
    /// `Value::Null` for a database null.
    pub fn field(mut self, name: &str, set: impl Fn(&mut T, &Value) + 'static) -> Self {
        self.fields.push((normalize(name), Box::new(set)));
        self
    }

    fn setter_for(&self, column: &str) -> Option<&Setter<T>> {
        let normalized = normalize(column);
        self.fields
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, set)| set)
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> FieldMap<T> {
    fn apply(&self, columns: &[String], values: &[Value]) -> T {
        let mut record = T::default();
        for (i, column) in columns.iter().enumerate() {
            if let Some(set) = self.setter_for(column) {
                if let Some(value) = values.get(i) {
                    set(&mut record, value);
                }
            }
        }
        record
    }
}

impl QueryResult {
    /// Project a row result onto one record.
    pub fn map_one<T: Default>(&self, map: &FieldMap<T>) -> Result<T, ResultError> {
        match self.value() {
            ResultValue::Row(values) => Ok(map.apply(self.columns(), values)),
            _ => Err(ResultError::invalid_state(messages::ERR_MAP_ONE_ROW_ONLY)),
        }
    }

    /// Project a row set onto one record per row, in result order.
    pub fn map_all<T: Default>(&self, map: &FieldMap<T>) -> Result<Vec<T>, ResultError> {
        match self.value() {
            ResultValue::RowSet(rows) => Ok(rows
                .iter()
                .map(|row| map.apply(self.columns(), row))
                .collect()),
            _ => Err(ResultError::invalid_state(messages::ERR_MAP_ALL_ROWSET_ONLY)),
        }
    }
}

/// Strip underscores and fold ASCII case so `UserName` matches `user_name`.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
