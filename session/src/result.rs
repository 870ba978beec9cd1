//! Uniform query result wrapper.
//!
//! Every statement the session runs produces a `QueryResult`: a sum-typed
//! value (nothing, scalar, row, or row set) plus the column names captured
//! from the driver. Cells are read by position or by column name; a lookup
//! on a row set selects that column across all rows.

use unidb_core::{messages, Value};

use crate::error::ResultError;

/// Options controlling result lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Compare column names ignoring ASCII case.
    pub case_insensitive: bool,
}

/// The value a statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    /// No statement has run, or the result was cleared.
    None,
    /// Single cell.
    Scalar(Value),
    /// One record as an ordered value list.
    Row(Vec<Value>),
    /// All records, each an ordered value list.
    RowSet(Vec<Vec<Value>>),
}

/// A value selected from a result: one cell of a row, or one column of a
/// row set (ordered across all rows).
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    One(Value),
    Many(Vec<Value>),
}

impl Selection {
    /// Get the single cell if this selection came from a row.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Selection::One(v) => Some(v),
            Selection::Many(_) => None,
        }
    }

    /// Flatten into an ordered value list.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Selection::One(v) => vec![v],
            Selection::Many(vs) => vs,
        }
    }
}

/// Result of one statement execution.
#[derive(Debug, Clone)]
pub struct QueryResult {
    value: ResultValue,
    columns: Vec<String>,
    options: LookupOptions,
}

impl QueryResult {
    /// Wrap a raw outcome with its column names.
    pub fn new(value: ResultValue, columns: Vec<String>, options: LookupOptions) -> Self {
        Self {
            value,
            columns,
            options,
        }
    }

    /// Create an empty result holding nothing.
    pub fn empty() -> Self {
        Self::new(ResultValue::None, Vec::new(), LookupOptions::default())
    }

    /// The wrapped value.
    pub fn value(&self) -> &ResultValue {
        &self.value
    }

    /// Column names, in result order. Empty for scalar results.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The scalar cell, if this result holds one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match &self.value {
            ResultValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the result holds no elements.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            ResultValue::None => true,
            ResultValue::Scalar(_) => false,
            ResultValue::Row(values) => values.is_empty(),
            ResultValue::RowSet(rows) => rows.is_empty(),
        }
    }

    /// Number of records held: 0 or 1 for a row, the row count for a row
    /// set, 1 for a scalar.
    pub fn row_count(&self) -> usize {
        match &self.value {
            ResultValue::None => 0,
            ResultValue::Scalar(_) => 1,
            ResultValue::Row(values) => usize::from(!values.is_empty()),
            ResultValue::RowSet(rows) => rows.len(),
        }
    }

    /// Index by position. For a row this is the cell at that position; for
    /// a row set it is that position's cell across all rows.
    pub fn get(&self, index: usize) -> Result<Selection, ResultError> {
        match &self.value {
            ResultValue::Row(values) => values
                .get(index)
                .cloned()
                .map(Selection::One)
                .ok_or_else(|| ResultError::index_out_of_range(index, values.len())),
            ResultValue::RowSet(rows) => {
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    let cell = row
                        .get(index)
                        .cloned()
                        .ok_or_else(|| ResultError::index_out_of_range(index, row.len()))?;
                    out.push(cell);
                }
                Ok(Selection::Many(out))
            }
            ResultValue::None | ResultValue::Scalar(_) => {
                Err(ResultError::invalid_state(messages::ERR_NOT_TABULAR))
            }
        }
    }

    /// Index by column name under the active comparison mode.
    pub fn get_named(&self, name: &str) -> Result<Selection, ResultError> {
        match &self.value {
            ResultValue::Row(_) | ResultValue::RowSet(_) => {
                if self.is_empty() {
                    return Err(ResultError::EmptyResult);
                }
                let index = self
                    .column_index(name)
                    .ok_or_else(|| ResultError::column_not_found(name))?;
                self.get(index)
            }
            ResultValue::None | ResultValue::Scalar(_) => {
                Err(ResultError::invalid_state(messages::ERR_NOT_TABULAR))
            }
        }
    }

    /// Iterate over the cells of a row or the rows of a row set.
    pub fn iter(&self) -> Result<ResultIter<'_>, ResultError> {
        match &self.value {
            ResultValue::Row(values) => Ok(ResultIter {
                inner: IterInner::Cells(values.iter()),
            }),
            ResultValue::RowSet(rows) => Ok(ResultIter {
                inner: IterInner::Rows(rows.iter()),
            }),
            ResultValue::None | ResultValue::Scalar(_) => {
                Err(ResultError::invalid_state(messages::ERR_NOT_ITERABLE))
            }
        }
    }

    /// Position of the first row satisfying the predicate. Row sets only.
    pub fn find_row<P>(&self, predicate: P) -> Result<Option<usize>, ResultError>
    where
        P: Fn(&[Value]) -> bool,
    {
        match &self.value {
            ResultValue::RowSet(rows) => Ok(rows.iter().position(|row| predicate(row))),
            _ => Err(ResultError::invalid_state(messages::ERR_ROWSET_ONLY)),
        }
    }

    /// Discard the value and column names. Subsequent lookups and
    /// iteration report `InvalidState`.
    pub fn clear(&mut self) {
        self.value = ResultValue::None;
        self.columns.clear();
    }

    /// Resolve a column name to its position.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        if self.options.case_insensitive {
            self.columns
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name))
        } else {
            self.columns.iter().position(|c| c == name)
        }
    }
}

/// Iterator over a tabular result.
pub struct ResultIter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Cells(std::slice::Iter<'a, Value>),
    Rows(std::slice::Iter<'a, Vec<Value>>),
}

/// One item yielded while iterating a result.
#[derive(Debug, PartialEq)]
pub enum ResultItem<'a> {
    /// A cell of a row result.
    Cell(&'a Value),
    /// A row of a row set result.
    Row(&'a [Value]),
}

impl<'a> Iterator for ResultIter<'a> {
    type Item = ResultItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Cells(iter) => iter.next().map(ResultItem::Cell),
            IterInner::Rows(iter) => iter.next().map(|row| ResultItem::Row(row)),
        }
    }
}
