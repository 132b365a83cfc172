#[cfg(feature = "mssql")]
use crate::mssql::config::MssqlManager;
#[cfg(feature = "mysql")]
use crate::mysql::config::MysqlManager;
#[cfg(feature = "postgres")]
use crate::postgres::config::PgManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::config::SqliteManager;

/// Connection pool for one of the supported backends.
///
/// Every variant is a `bb8` pool, so cloning is cheap and all clones share the
/// same connections.
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `MySQL` connection pool
    #[cfg(feature = "mysql")]
    Mysql(bb8::Pool<MysqlManager>),
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(bb8::Pool<PgManager>),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
    /// SQL Server connection pool
    #[cfg(feature = "mssql")]
    Mssql(bb8::Pool<MssqlManager>),
}

// Manual Debug implementation because the connection managers do not implement `Debug`
impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(pool) => f.debug_tuple("Mysql").field(&pool.state()).finish(),
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => f.debug_tuple("Postgres").field(&pool.state()).finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f.debug_tuple("Sqlite").field(&pool.state()).finish(),
            #[cfg(feature = "mssql")]
            Self::Mssql(pool) => f.debug_tuple("Mssql").field(&pool.state()).finish(),
            #[allow(unreachable_patterns)]
            _ => f.write_str("MiddlewarePool"),
        }
    }
}

/// Snapshot of a pool's connection counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle_connections: u32,
}

impl MiddlewarePool {
    /// Current connection counts.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let state: bb8::State = match self {
            #[cfg(feature = "mysql")]
            Self::Mysql(pool) => pool.state(),
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => pool.state(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => pool.state(),
            #[cfg(feature = "mssql")]
            Self::Mssql(pool) => pool.state(),
            #[allow(unreachable_patterns)]
            _ => {
                return PoolStatus {
                    connections: 0,
                    idle_connections: 0,
                };
            }
        };
        PoolStatus {
            connections: state.connections,
            idle_connections: state.idle_connections,
        }
    }
}
