#[cfg(feature = "mssql")]
mod mssql;
#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(
    feature = "mysql",
    feature = "postgres",
    feature = "sqlite",
    feature = "mssql"
))]
use bb8::PooledConnection;

use super::types::MiddlewarePool;
use crate::error::TableSetError;
#[cfg(feature = "mssql")]
use crate::mssql::config::MssqlManager;
#[cfg(feature = "mysql")]
use crate::mysql::config::MysqlManager;
#[cfg(feature = "postgres")]
use crate::postgres::config::PgManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::config::SqliteManager;

/// A connection checked out of a [`MiddlewarePool`]; returned to the pool on drop.
pub enum MiddlewarePoolConnection {
    #[cfg(feature = "mysql")]
    Mysql(PooledConnection<'static, MysqlManager>),
    #[cfg(feature = "postgres")]
    Postgres(PooledConnection<'static, PgManager>),
    #[cfg(feature = "sqlite")]
    Sqlite(PooledConnection<'static, SqliteManager>),
    #[cfg(feature = "mssql")]
    Mssql(PooledConnection<'static, MssqlManager>),
}

// Manual Debug implementation because the driver connections do not all expose `Debug`
impl std::fmt::Debug for MiddlewarePoolConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(_) => f.debug_tuple("Mysql").field(&"<Conn>").finish(),
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").field(&"<Client>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").field(&"<Connection>").finish(),
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => f.debug_tuple("Mssql").field(&"<TiberiusClient>").finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("MiddlewarePoolConnection"),
        }
    }
}

impl MiddlewarePool {
    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns the backend's pool error if no connection becomes available
    /// before the pool's checkout timeout.
    pub async fn get_connection(&self) -> Result<MiddlewarePoolConnection, TableSetError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => mysql::get_connection(pool).await,
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => postgres::get_connection(pool).await,
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => sqlite::get_connection(pool).await,
            #[cfg(feature = "mssql")]
            MiddlewarePool::Mssql(pool) => mssql::get_connection(pool).await,
            #[allow(unreachable_patterns)]
            _ => Err(TableSetError::Unimplemented(
                "This database type is not enabled in the current build".to_string(),
            )),
        }
    }
}
