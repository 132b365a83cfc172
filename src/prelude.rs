//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{DbConfig, MAX_CONNECTION_LIFETIME, PoolSettings};
pub use crate::context::{DbContext, Handle};
pub use crate::dialect::{Dialect, KeyRetrieval};
pub use crate::error::TableSetError;
pub use crate::page::{PageList, page_offset};
pub use crate::pool::{MiddlewarePool, MiddlewarePoolConnection};
pub use crate::query_builder::{Clause, RenderedQuery, Statement};
pub use crate::record::{FromRowValue, Record};
pub use crate::results::{CustomDbRow, ResultSet};
pub use crate::table_set::TableSet;
pub use crate::translation::{PlaceholderStyle, translate_placeholders};
pub use crate::types::{DatabaseType, RowValues};
