use std::collections::HashMap;
use std::sync::Arc;

use super::row::{CustomDbRow, index_columns};
use crate::types::RowValues;

/// A result set from a database query
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    /// The number of rows read (selects) or affected (DML)
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names shared by all rows of this result set.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(index_columns(&column_names)));
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append a row. Ignored until column names have been set.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if let (Some(column_names), Some(index)) = (&self.column_names, &self.column_index) {
            self.results.push(CustomDbRow {
                column_names: Arc::clone(column_names),
                rows: row_values,
                column_index_cache: Arc::clone(index),
            });
            self.rows_affected += 1;
        }
    }

    /// First cell of the first row, if any row was returned.
    #[must_use]
    pub fn first_value(&self) -> Option<&RowValues> {
        self.results.first().and_then(|row| row.get_by_index(0))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
