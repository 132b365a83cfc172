use super::{Clause, RenderedQuery, Statement, render_fragment};
use crate::dialect::Dialect;
use crate::error::TableSetError;

impl Statement {
    /// Render the SELECT a list query sends.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty.
    pub fn render_select(&self, dialect: Dialect) -> Result<RenderedQuery, TableSetError> {
        let table = self.quoted_table(dialect)?;
        let mut params = Vec::new();

        let columns = if self.selects.is_empty() {
            "*".to_string()
        } else {
            self.selects
                .iter()
                .map(|clause| render_fragment(dialect, clause, &mut params))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {table}");
        self.push_where(dialect, Vec::new(), &mut sql, &mut params);
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orders.join(", "));
        }
        sql.push_str(&dialect.limit_clause(self.limit, self.offset, !self.orders.is_empty()));

        Ok(RenderedQuery { sql, params })
    }

    /// Render `SELECT COUNT(*)` over the accumulated filters.
    ///
    /// Selected columns, ordering, limit and offset do not apply to a count.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty.
    pub fn render_count(&self, dialect: Dialect) -> Result<RenderedQuery, TableSetError> {
        let table = self.quoted_table(dialect)?;
        let mut params = Vec::new();
        let mut sql = format!("SELECT COUNT(*) FROM {table}");
        self.push_where(dialect, Vec::new(), &mut sql, &mut params);
        Ok(RenderedQuery { sql, params })
    }

    /// Render a single-column, single-row read of `field`.
    ///
    /// Replaces any selected columns; filters and ordering still apply.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty.
    pub fn render_scalar(
        &self,
        dialect: Dialect,
        field: &str,
    ) -> Result<RenderedQuery, TableSetError> {
        let mut scalar = self.clone();
        scalar.selects = vec![Clause::new(field, Vec::new())];
        scalar.limit = Some(1);
        scalar.render_select(dialect)
    }
}
