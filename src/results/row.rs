use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TableSetError;
use crate::record::FromRowValue;
use crate::types::RowValues;

/// A row from a database query result
///
/// Column names and the name-to-index map are shared by every row of the
/// result set that produced the row.
#[derive(Debug, Clone)]
pub struct CustomDbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub rows: Vec<RowValues>,
    pub(crate) column_index_cache: Arc<HashMap<String, usize>>,
}

impl CustomDbRow {
    /// Create a new database row, building its own column index.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, rows: Vec<RowValues>) -> Self {
        let cache = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            rows,
            column_index_cache: cache,
        }
    }

    /// Get the index of a column by name.
    ///
    /// Falls back to a case-insensitive match because some drivers report
    /// column labels in upper case.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index_cache.get(column_name) {
            return Some(idx);
        }
        self.column_names
            .iter()
            .position(|col| col.eq_ignore_ascii_case(column_name))
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.rows.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.rows.get(index)
    }

    /// Read a column converted to `T`.
    ///
    /// A column that is absent from the row reads as `T::default()`, so records
    /// can be built from partial selects.
    ///
    /// # Errors
    /// Returns `TableSetError::ConversionError` if the cell cannot be converted to `T`.
    pub fn get_as<T: FromRowValue>(&self, column_name: &str) -> Result<T, TableSetError> {
        match self.get(column_name) {
            Some(value) => T::from_row_value(value).map_err(|e| match e {
                TableSetError::ConversionError(msg) => {
                    TableSetError::ConversionError(format!("column {column_name}: {msg}"))
                }
                other => other,
            }),
            None => Ok(T::default()),
        }
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    column_names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), i))
        .collect()
}
