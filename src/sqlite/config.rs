use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool};
use rusqlite::{Connection, OpenFlags};
use tokio::sync::Mutex;

use crate::config::PoolSettings;
use crate::error::TableSetError;
use crate::pool::MiddlewarePool;

/// A rusqlite connection shared between the pool and the blocking worker that runs statements.
pub type SharedSqliteConnection = Arc<Mutex<Connection>>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// bb8 manager for `SQLite` connections opened from a file path or `file:` URI.
pub struct SqliteManager {
    path: String,
}

impl SqliteManager {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

fn open_connection(path: &str) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_with_flags(path, OpenFlags::default())?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if !is_memory_path(path) {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::trace!(path = %path, journal_mode = %mode, "sqlite connect");
    }
    Ok(conn)
}

fn join_error(err: &tokio::task::JoinError) -> rusqlite::Error {
    rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_INTERNAL),
        Some(format!("sqlite spawn_blocking join error: {err}")),
    )
}

fn is_memory_path(path: &str) -> bool {
    path == ":memory:" || path.contains("mode=memory") || path.starts_with("file::memory:")
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = rusqlite::Error;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.path.clone();
        async move {
            let conn = tokio::task::spawn_blocking(move || open_connection(&path))
                .await
                .map_err(|e| join_error(&e))??;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let handle = Arc::clone(conn);
        async move {
            tokio::task::spawn_blocking(move || handle.blocking_lock().execute_batch("SELECT 1"))
                .await
                .map_err(|e| join_error(&e))?
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Run synchronous rusqlite work on a blocking thread.
///
/// # Errors
/// Returns whatever `func` returns, or `TableSetError::ExecutionError` if the
/// blocking task panicked.
pub async fn run_blocking<F, R>(conn: SharedSqliteConnection, func: F) -> Result<R, TableSetError>
where
    F: FnOnce(&mut Connection) -> Result<R, TableSetError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| TableSetError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}

/// Open a `SQLite` pool with the configured limits and open one
/// connection so an unreadable path fails here.
///
/// # Errors
/// Returns `TableSetError::ConnectionError` if the first connection or pool creation fails.
pub async fn open_pool(
    connection_string: &str,
    settings: &PoolSettings,
) -> Result<MiddlewarePool, TableSetError> {
    let manager = SqliteManager::new(connection_string);
    // connect once so a bad connection string fails here instead of at first use
    manager
        .connect()
        .await
        .map_err(|e| TableSetError::ConnectionError(format!("sqlite connect error: {e}")))?;
    let pool = settings
        .apply(Pool::builder())
        .build(manager)
        .await
        .map_err(|e| TableSetError::ConnectionError(format!("sqlite pool error: {e}")))?;
    Ok(MiddlewarePool::Sqlite(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_memory_paths() {
        assert!(is_memory_path(":memory:"));
        assert!(is_memory_path("file::memory:?cache=shared"));
        assert!(is_memory_path("file:db1?mode=memory&cache=shared"));
        assert!(!is_memory_path("/tmp/app.db"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn manager_connects_off_the_runtime_thread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manager.db");
        let manager = SqliteManager::new(path.to_string_lossy());
        let mut conn = manager.connect().await.unwrap();
        manager.is_valid(&mut conn).await.unwrap();
        let mode = run_blocking(Arc::clone(&conn), |c| {
            Ok(c.query_row("PRAGMA journal_mode", [], |row| row.get::<_, String>(0))?)
        })
        .await
        .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn unopenable_path_fails_at_open() {
        let settings = crate::config::DbConfig::new("sqlite", "").pool_settings();
        let err = open_pool("/nonexistent-dir/for/sure/app.db", &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, TableSetError::ConnectionError(_)));
    }
}
