//! Fluent, typed table accessors over pooled `MySQL`, `PostgreSQL`, `SQLite`
//! and SQL Server connections.
//!
//! A [`DbContext`](context::DbContext) holds one configuration and lazily opens
//! one `bb8` pool for it; [`TableSet`](table_set::TableSet) accessors created
//! from the context chain filters and ordering, then run a terminal query.
//!
//! ```rust,no_run
//! use sql_tableset::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Task {
//!     id: i64,
//!     title: String,
//!     done: bool,
//! }
//!
//! impl Record for Task {
//!     fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
//!         Ok(Task {
//!             id: row.get_as("id")?,
//!             title: row.get_as("title")?,
//!             done: row.get_as("done")?,
//!         })
//!     }
//!
//!     fn to_values(&self) -> Vec<(&'static str, RowValues)> {
//!         vec![
//!             ("id", self.id.into()),
//!             ("title", self.title.clone().into()),
//!             ("done", self.done.into()),
//!         ]
//!     }
//!
//!     fn set_generated_key(&mut self, key: i64) {
//!         self.id = key;
//!     }
//! }
//!
//! # async fn demo() -> Result<(), TableSetError> {
//! let ctx = DbContext::new(DbConfig::new("sqlite", "tasks.db"));
//! let mut task = Task { title: "write docs".into(), ..Task::default() };
//! ctx.table::<Task>("tasks").insert(&mut task).await?;
//!
//! let open = ctx
//!     .table::<Task>("tasks")
//!     .filter("done = ?", &[RowValues::Bool(false)])
//!     .asc("id")
//!     .to_list()
//!     .await?;
//! # let _ = open;
//! # Ok(()) }
//! ```

pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod page;
pub mod pool;
pub mod prelude;
pub mod query_builder;
pub mod record;
pub mod results;
pub mod table_set;
pub mod translation;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use context::{DbContext, Handle};
pub use error::TableSetError;
pub use table_set::TableSet;
