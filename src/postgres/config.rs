use std::future::Future;

use bb8::{ManageConnection, Pool};
use tokio_postgres::{Client, NoTls};

use crate::config::PoolSettings;
use crate::error::TableSetError;
use crate::pool::MiddlewarePool;

/// bb8 manager for Postgres clients.
pub struct PgManager {
    pub(crate) config: tokio_postgres::Config,
}

impl PgManager {
    #[must_use]
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self { config }
    }

    /// Parse a key/value (`host=... user=...`) or URL connection string.
    ///
    /// # Errors
    /// Returns `TableSetError::ConnectionError` if the string cannot be parsed.
    pub fn from_connection_string(connection_string: &str) -> Result<Self, TableSetError> {
        connection_string
            .parse::<tokio_postgres::Config>()
            .map(Self::new)
            .map_err(|e| {
                TableSetError::ConnectionError(format!("invalid postgres connection string: {e}"))
            })
    }
}

impl ManageConnection for PgManager {
    type Connection = Client;
    type Error = tokio_postgres::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let cfg = self.config.clone();
        async move {
            tracing::debug!(
                hosts = ?cfg.get_hosts(),
                dbname = ?cfg.get_dbname(),
                "postgres connect"
            );
            let (client, connection) = cfg.connect(NoTls).await?;
            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::warn!(error = %e, "postgres connection task ended");
                }
            });
            Ok(client)
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move { conn.simple_query("SELECT 1").await.map(|_| ()) }
    }

    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        conn.is_closed()
    }
}

/// Open a Postgres pool with the configured limits and open one
/// connection so a bad connection string fails here.
///
/// # Errors
/// Returns `TableSetError::ConnectionError` if parsing, the first connection
/// or pool creation fails.
pub async fn open_pool(
    connection_string: &str,
    settings: &PoolSettings,
) -> Result<MiddlewarePool, TableSetError> {
    let manager = PgManager::from_connection_string(connection_string)?;
    // connect once so a bad connection string fails here instead of at first use
    manager
        .connect()
        .await
        .map_err(|e| TableSetError::ConnectionError(format!("postgres connect error: {e}")))?;
    let pool = settings
        .apply(Pool::builder())
        .build(manager)
        .await
        .map_err(|e| TableSetError::ConnectionError(format!("postgres pool error: {e}")))?;
    Ok(MiddlewarePool::Postgres(pool))
}
