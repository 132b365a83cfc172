//! Typed, chainable access to one table.
//!
//! Chaining calls (`select`, `filter`, `order`, `asc`, `desc`, `table`) take
//! the accessor by value and hand it back; terminal calls borrow it mutably,
//! so one accessor can be reused for several statements:
//! ```rust,no_run
//! use sql_tableset::prelude::*;
//! # #[derive(Default)] struct User { id: i64, name: String }
//! # impl Record for User {
//! #     fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
//! #         Ok(User { id: row.get_as("id")?, name: row.get_as("name")? })
//! #     }
//! #     fn to_values(&self) -> Vec<(&'static str, RowValues)> {
//! #         vec![("id", self.id.into()), ("name", self.name.clone().into())]
//! #     }
//! # }
//!
//! # async fn demo(ctx: DbContext) -> Result<(), TableSetError> {
//! let mut adults = ctx
//!     .table::<User>("users")
//!     .filter("age >= ?", &[RowValues::Int(18)])
//!     .desc("age");
//! let page = adults.to_page_list(20, 1).await?;
//! let total = adults.count().await?;
//! assert_eq!(page.total_count, total);
//! # Ok(()) }
//! ```

use std::marker::PhantomData;

use crate::context::{DbContext, Handle};
use crate::dialect::Dialect;
use crate::error::TableSetError;
use crate::pool::MiddlewarePoolConnection;
use crate::query_builder::{Clause, RenderedQuery, Statement};
use crate::record::Record;
use crate::types::RowValues;

mod read;
mod scalar;
mod write;

/// Accessor for records of type `T` stored in one table.
pub struct TableSet<T> {
    context: DbContext,
    statement: Statement,
    handle: Option<Handle>,
    // message of a failed open, replayed instead of reopening
    open_error: Option<String>,
    _record: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for TableSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSet")
            .field("statement", &self.statement)
            .field("handle", &self.handle.as_ref().map(Handle::dialect))
            .field("open_error", &self.open_error)
            .finish_non_exhaustive()
    }
}

impl<T: Record> TableSet<T> {
    pub(crate) fn new(context: DbContext, statement: Statement) -> Self {
        Self {
            context,
            statement,
            handle: None,
            open_error: None,
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        self.statement.table()
    }

    /// Point every later terminal call at `table`.
    pub fn set_table_name(&mut self, table: impl Into<String>) {
        self.statement.set_table(table);
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.set_table_name(table);
        self
    }

    /// Add selected columns or expressions; `?` markers bind `args`.
    #[must_use]
    pub fn select(mut self, expr: impl Into<String>, args: &[RowValues]) -> Self {
        self.statement.push_select(Clause::new(expr, args.to_vec()));
        self
    }

    /// Add a WHERE condition; several conditions are joined with AND.
    #[must_use]
    pub fn filter(mut self, expr: impl Into<String>, args: &[RowValues]) -> Self {
        self.statement.push_filter(Clause::new(expr, args.to_vec()));
        self
    }

    /// Add a raw ORDER BY term such as `"age desc"`.
    #[must_use]
    pub fn order(mut self, expr: impl Into<String>) -> Self {
        self.statement.push_order(expr);
        self
    }

    #[must_use]
    pub fn asc(self, field: &str) -> Self {
        self.order(format!("{field} asc"))
    }

    #[must_use]
    pub fn desc(self, field: &str) -> Self {
        self.order(format!("{field} desc"))
    }

    /// Accumulated clause state.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// The SELECT that [`to_list`](Self::to_list) would send to `dialect`.
    ///
    /// # Errors
    /// Returns `TableSetError::ConfigError` if the table name is empty.
    pub fn rendered_select(&self, dialect: Dialect) -> Result<RenderedQuery, TableSetError> {
        self.statement.render_select(dialect)
    }

    /// The handle this accessor executes on, opened on first use.
    ///
    /// # Errors
    /// Returns the open failure on the first call and
    /// `TableSetError::HandleUnavailable` on every call after it.
    pub async fn handle(&mut self) -> Result<Handle, TableSetError> {
        if let Some(handle) = &self.handle {
            return Ok(handle.clone());
        }
        if let Some(message) = &self.open_error {
            return Err(TableSetError::HandleUnavailable(message.clone()));
        }
        match self.context.open().await {
            Ok(handle) => {
                self.handle = Some(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                tracing::warn!(table = self.statement.table(), error = %e, "database open failed");
                self.open_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn connection(&mut self) -> Result<(Dialect, MiddlewarePoolConnection), TableSetError> {
        let handle = self.handle().await?;
        let conn = handle.get_connection().await?;
        Ok((handle.dialect(), conn))
    }
}

fn log_statement(kind: &'static str, rendered: &RenderedQuery) {
    tracing::debug!(kind, sql = %rendered.sql, params = rendered.params.len(), "statement");
}
