use super::{TableSet, log_statement};
use crate::error::TableSetError;
use crate::record::{FromRowValue, Record};
use crate::types::RowValues;

impl<T: Record> TableSet<T> {
    /// First cell of `field` in the first matching row; `None` when no row matches.
    ///
    /// # Errors
    /// Returns open and execution errors.
    pub async fn get_value(&mut self, field: &str) -> Result<Option<RowValues>, TableSetError> {
        let (dialect, mut conn) = self.connection().await?;
        let rendered = self.statement.render_scalar(dialect, field)?;
        log_statement("scalar", &rendered);
        let result_set = conn.select(&rendered.sql, &rendered.params).await?;
        Ok(result_set.first_value().cloned())
    }

    /// `field` of the first matching row converted to `S`; the zero value of
    /// `S` when no row matches or the cell is NULL.
    ///
    /// # Errors
    /// Returns open and execution errors, and `TableSetError::ConversionError`
    /// when the cell cannot be read as `S`.
    pub async fn get_scalar<S: FromRowValue>(&mut self, field: &str) -> Result<S, TableSetError> {
        match self.get_value(field).await? {
            Some(value) => S::from_row_value(&value)
                .map_err(|e| TableSetError::ConversionError(format!("{field}: {e}"))),
            None => Ok(S::default()),
        }
    }

    /// # Errors
    /// See [`get_scalar`](Self::get_scalar).
    pub async fn get_string(&mut self, field: &str) -> Result<String, TableSetError> {
        self.get_scalar(field).await
    }

    /// # Errors
    /// See [`get_scalar`](Self::get_scalar).
    pub async fn get_int(&mut self, field: &str) -> Result<i32, TableSetError> {
        self.get_scalar(field).await
    }

    /// # Errors
    /// See [`get_scalar`](Self::get_scalar).
    pub async fn get_long(&mut self, field: &str) -> Result<i64, TableSetError> {
        self.get_scalar(field).await
    }

    /// # Errors
    /// See [`get_scalar`](Self::get_scalar).
    pub async fn get_bool(&mut self, field: &str) -> Result<bool, TableSetError> {
        self.get_scalar(field).await
    }

    /// # Errors
    /// See [`get_scalar`](Self::get_scalar).
    pub async fn get_float32(&mut self, field: &str) -> Result<f32, TableSetError> {
        self.get_scalar(field).await
    }

    /// # Errors
    /// See [`get_scalar`](Self::get_scalar).
    pub async fn get_float64(&mut self, field: &str) -> Result<f64, TableSetError> {
        self.get_scalar(field).await
    }
}
