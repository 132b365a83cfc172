use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::{DbConfig, PoolSettings};
use crate::dialect::Dialect;
use crate::error::TableSetError;
use crate::pool::{MiddlewarePool, MiddlewarePoolConnection};
use crate::query_builder::Statement;
use crate::record::Record;
use crate::table_set::TableSet;

/// An opened backend pool together with its dialect and the limits it was opened with.
///
/// Clones share the same pool.
#[derive(Debug, Clone)]
pub struct Handle {
    pool: MiddlewarePool,
    dialect: Dialect,
    settings: PoolSettings,
}

impl Handle {
    /// Resolve the dialect of `config` and open its pool.
    ///
    /// # Errors
    /// Returns `TableSetError::UnsupportedDatabase` for an unknown kind,
    /// `TableSetError::ConfigError` for invalid pool bounds and
    /// `TableSetError::ConnectionError` if the database cannot be reached.
    pub async fn open(config: &DbConfig) -> Result<Self, TableSetError> {
        let dialect = Dialect::from_kind(&config.data_type)?;
        let settings = config.pool_settings();
        let pool = dialect.open(&config.connection_string, &settings).await?;
        tracing::info!(
            dialect = %dialect.database_type(),
            min_idle = ?settings.min_idle,
            max_open = ?settings.max_open,
            max_lifetime_secs = settings.max_lifetime.as_secs(),
            "database pool opened"
        );
        Ok(Self {
            pool,
            dialect,
            settings,
        })
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn pool(&self) -> &MiddlewarePool {
        &self.pool
    }

    /// Limits applied when the pool was opened.
    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        self.settings
    }

    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns the backend's pool error if no connection becomes available.
    pub async fn get_connection(&self) -> Result<MiddlewarePoolConnection, TableSetError> {
        self.pool.get_connection().await
    }
}

/// Connection context: one configuration, one lazily opened pool shared by
/// every accessor created from it.
///
/// ```rust,no_run
/// use sql_tableset::prelude::*;
///
/// # async fn demo() -> Result<(), TableSetError> {
/// let ctx = DbContext::new(DbConfig::new("sqlite", "app.db").with_pool_bounds(1, 4));
/// assert_eq!(ctx.dialect()?, Dialect::Sqlite);
/// let handle = ctx.open().await?;
/// assert_eq!(handle.pool_settings().max_open, Some(4));
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct DbContext {
    config: Arc<DbConfig>,
    handle: Arc<OnceCell<Handle>>,
}

impl DbContext {
    #[must_use]
    pub fn new(config: DbConfig) -> Self {
        Self {
            config: Arc::new(config),
            handle: Arc::new(OnceCell::new()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// The dialect for the configured backend kind.
    ///
    /// # Errors
    /// Returns `TableSetError::UnsupportedDatabase` for an unknown kind and
    /// `TableSetError::Unimplemented` when the backend's feature is disabled.
    pub fn dialect(&self) -> Result<Dialect, TableSetError> {
        let dialect = Dialect::from_kind(&self.config.data_type)?;
        if !dialect.is_compiled_in() {
            return Err(TableSetError::Unimplemented(format!(
                "{} support is not enabled in the current build",
                dialect.database_type()
            )));
        }
        Ok(dialect)
    }

    /// The shared handle, opening the pool on first use.
    ///
    /// A failed open is not cached here; the next call tries again.
    ///
    /// # Errors
    /// Returns the error from [`Handle::open`].
    pub async fn open(&self) -> Result<Handle, TableSetError> {
        self.handle
            .get_or_try_init(|| Handle::open(&self.config))
            .await
            .cloned()
    }

    /// Whether the pool has been opened.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.handle.initialized()
    }

    /// Create an accessor for records of type `T` stored in `table`.
    #[must_use]
    pub fn table<T: Record>(&self, table: impl Into<String>) -> TableSet<T> {
        TableSet::new(self.clone(), Statement::new(table))
    }

    /// Run statements without parameters, such as schema setup.
    ///
    /// # Errors
    /// Returns open failures and the backend's execution error.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), TableSetError> {
        let handle = self.open().await?;
        let mut conn = handle.get_connection().await?;
        tracing::debug!(sql, "execute batch");
        conn.execute_batch(sql).await
    }
}
