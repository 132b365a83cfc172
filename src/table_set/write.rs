use super::{TableSet, log_statement};
use crate::error::TableSetError;
use crate::record::Record;
use crate::types::RowValues;

impl<T: Record> TableSet<T> {
    /// Insert `record` and return the affected-row count.
    ///
    /// When the record's key is database-generated and still unset (NULL or
    /// 0), the key column is left out and the generated key is written back
    /// through [`Record::set_generated_key`].
    ///
    /// # Errors
    /// Returns open and execution errors.
    pub async fn insert(&mut self, record: &mut T) -> Result<usize, TableSetError> {
        let key = T::primary_key();
        let mut values = record.to_values();
        let generate = T::auto_generated_key()
            && values
                .iter()
                .find(|(column, _)| *column == key)
                .is_none_or(|(_, value)| value.is_unset_key());
        if generate {
            values.retain(|(column, _)| *column != key);
        }

        let (dialect, mut conn) = self.connection().await?;
        let rendered = self
            .statement
            .render_insert(dialect, &values, generate.then_some(key))?;
        log_statement("insert", &rendered);

        if !generate {
            return conn.dml(&rendered.sql, &rendered.params).await;
        }
        let inserted = conn
            .insert_returning(&rendered.sql, &rendered.params, dialect.key_retrieval())
            .await?;
        if let Some(generated) = inserted.key {
            record.set_generated_key(generated);
        }
        Ok(inserted.rows_affected)
    }

    /// Write the non-key, non-NULL columns of `record` to the row with its
    /// primary key, narrowed further by any accumulated filters.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the record carries no primary
    /// key value (or a NULL one) or no column to set, plus open and execution errors.
    pub async fn update(&mut self, record: &T) -> Result<usize, TableSetError> {
        let key = T::primary_key();
        let (key_values, sets): (Vec<_>, Vec<_>) = record
            .to_values()
            .into_iter()
            .filter(|(column, value)| *column == key || !value.is_null())
            .partition(|(column, _)| *column == key);
        let Some((_, key_value)) = key_values
            .into_iter()
            .next()
            .filter(|(_, value)| !value.is_null())
        else {
            return Err(TableSetError::ConfigError(format!(
                "record has no value for primary key {key}"
            )));
        };

        let (dialect, mut conn) = self.connection().await?;
        let rendered = self
            .statement
            .render_update(dialect, &sets, Some((key, key_value)))?;
        log_statement("update", &rendered);
        conn.dml(&rendered.sql, &rendered.params).await
    }

    /// Set `field` to `value` in every row matching the accumulated filters.
    ///
    /// # Errors
    /// Returns open and execution errors.
    pub async fn update_value(
        &mut self,
        field: &str,
        value: impl Into<RowValues>,
    ) -> Result<(), TableSetError> {
        let (dialect, mut conn) = self.connection().await?;
        let rendered = self
            .statement
            .render_update(dialect, &[(field, value.into())], None)?;
        if self.statement.filters().is_empty() {
            tracing::warn!(
                table = self.statement.table(),
                field,
                "update without filter touches every row"
            );
        }
        log_statement("update", &rendered);
        conn.dml(&rendered.sql, &rendered.params).await?;
        Ok(())
    }

    /// Delete every row matching the accumulated filters and return the
    /// affected-row count. Without a filter every row is deleted.
    ///
    /// # Errors
    /// Returns open and execution errors.
    pub async fn delete(&mut self) -> Result<usize, TableSetError> {
        let (dialect, mut conn) = self.connection().await?;
        let rendered = self.statement.render_delete(dialect)?;
        if self.statement.filters().is_empty() {
            tracing::warn!(
                table = self.statement.table(),
                "delete without filter removes every row"
            );
        }
        log_statement("delete", &rendered);
        conn.dml(&rendered.sql, &rendered.params).await
    }
}
