use std::future::Future;

use bb8::{ManageConnection, Pool};
use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::config::PoolSettings;
use crate::error::TableSetError;
use crate::pool::MiddlewarePool;

/// Type alias for SQL Server client
pub type MssqlClient = Client<Compat<TcpStream>>;

/// bb8 manager for tiberius clients.
pub struct MssqlManager {
    config: Config,
}

impl MssqlManager {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parse an ADO.NET style connection string
    /// (`server=tcp:host,1433;user=sa;password=...;TrustServerCertificate=true`).
    ///
    /// # Errors
    /// Returns `TableSetError::ConnectionError` if the string cannot be parsed.
    pub fn from_ado_string(connection_string: &str) -> Result<Self, TableSetError> {
        Config::from_ado_string(connection_string)
            .map(Self::new)
            .map_err(|e| {
                TableSetError::ConnectionError(format!("invalid SQL Server connection string: {e}"))
            })
    }
}

impl ManageConnection for MssqlManager {
    type Connection = MssqlClient;
    type Error = tiberius::error::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let config = self.config.clone();
        async move {
            let addr = config.get_addr();
            tracing::debug!(addr = %addr, "mssql connect");
            let tcp = TcpStream::connect(addr).await?;
            tcp.set_nodelay(true)?;
            Client::connect(config, tcp.compat_write()).await
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async move {
            conn.simple_query("SELECT 1").await?.into_results().await?;
            Ok(())
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Open a SQL Server pool with the configured limits and open one
/// connection so bad credentials fail here.
///
/// # Errors
/// Returns `TableSetError::ConnectionError` if parsing, the first connection
/// or pool creation fails.
pub async fn open_pool(
    connection_string: &str,
    settings: &PoolSettings,
) -> Result<MiddlewarePool, TableSetError> {
    let manager = MssqlManager::from_ado_string(connection_string)?;
    // connect once so a bad connection string fails here instead of at first use
    manager
        .connect()
        .await
        .map_err(|e| TableSetError::ConnectionError(format!("SQL Server connect error: {e}")))?;
    let pool = settings
        .apply(Pool::builder())
        .build(manager)
        .await
        .map_err(|e| TableSetError::ConnectionError(format!("SQL Server pool error: {e}")))?;
    Ok(MiddlewarePool::Mssql(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ado_strings() {
        let manager =
            MssqlManager::from_ado_string("server=tcp:db.local,1444;user=sa;password=pw").unwrap();
        assert_eq!(manager.config.get_addr(), "db.local:1444");
    }
}
