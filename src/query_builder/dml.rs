use super::{RenderedQuery, Statement, placeholders};
use crate::dialect::{Dialect, KeyRetrieval};
use crate::error::TableSetError;
use crate::types::RowValues;

impl Statement {
    /// Render an INSERT of `values`.
    ///
    /// With `returning_key` set, the statement also yields the generated key
    /// in the form the dialect supports.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty.
    pub fn render_insert(
        &self,
        dialect: Dialect,
        values: &[(&str, RowValues)],
        returning_key: Option<&str>,
    ) -> Result<RenderedQuery, TableSetError> {
        let table = self.quoted_table(dialect)?;
        let key = returning_key.map(|k| dialect.quote_identifier(k));
        let output = match (&key, dialect.key_retrieval()) {
            (Some(key), KeyRetrieval::OutputInserted) => format!(" OUTPUT INSERTED.{key}"),
            _ => String::new(),
        };

        let mut sql = format!("INSERT INTO {table}");
        if values.is_empty() {
            match dialect {
                Dialect::Mysql => sql.push_str(" () VALUES ()"),
                Dialect::Mssql => {
                    sql.push_str(&output);
                    sql.push_str(" DEFAULT VALUES");
                }
                Dialect::Postgres | Dialect::Sqlite => sql.push_str(" DEFAULT VALUES"),
            }
        } else {
            let columns = values
                .iter()
                .map(|(column, _)| dialect.quote_identifier(column))
                .collect::<Vec<_>>()
                .join(", ");
            let marks = placeholders(dialect, values.len(), 0).join(", ");
            sql.push_str(&format!(" ({columns}){output} VALUES ({marks})"));
        }

        if let (Some(key), KeyRetrieval::Returning) = (&key, dialect.key_retrieval()) {
            sql.push_str(&format!(" RETURNING {key}"));
        }

        Ok(RenderedQuery {
            sql,
            params: values.iter().map(|(_, v)| v.clone()).collect(),
        })
    }

    /// Render an UPDATE assigning `sets` to rows matching `key` (when given)
    /// and the accumulated filters.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty or
    /// there is nothing to assign.
    pub fn render_update(
        &self,
        dialect: Dialect,
        sets: &[(&str, RowValues)],
        key: Option<(&str, RowValues)>,
    ) -> Result<RenderedQuery, TableSetError> {
        let table = self.quoted_table(dialect)?;
        if sets.is_empty() {
            return Err(TableSetError::ConfigError(format!(
                "update of {table} has no columns to set"
            )));
        }

        let marks = placeholders(dialect, sets.len(), 0);
        let assignments = sets
            .iter()
            .zip(&marks)
            .map(|((column, _), mark)| format!("{} = {mark}", dialect.quote_identifier(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut params: Vec<RowValues> = sets.iter().map(|(_, v)| v.clone()).collect();

        let mut leading = Vec::new();
        if let Some((column, value)) = key {
            let mark = placeholders(dialect, 1, params.len()).concat();
            leading.push(format!("{} = {mark}", dialect.quote_identifier(column)));
            params.push(value);
        }

        let mut sql = format!("UPDATE {table} SET {assignments}");
        self.push_where(dialect, leading, &mut sql, &mut params);
        Ok(RenderedQuery { sql, params })
    }

    /// Render a DELETE over the accumulated filters.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty.
    pub fn render_delete(&self, dialect: Dialect) -> Result<RenderedQuery, TableSetError> {
        let table = self.quoted_table(dialect)?;
        let mut params = Vec::new();
        let mut sql = format!("DELETE FROM {table}");
        self.push_where(dialect, Vec::new(), &mut sql, &mut params);
        Ok(RenderedQuery { sql, params })
    }
}
