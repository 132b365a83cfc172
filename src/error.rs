use thiserror::Error;

/// Every failure the crate reports.
#[derive(Debug, Error)]
pub enum TableSetError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] bb8::RunError<tokio_postgres::Error>),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolErrorSqlite(#[from] bb8::RunError<rusqlite::Error>),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    PoolErrorMssql(#[from] bb8::RunError<tiberius::error::Error>),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    PoolErrorMysql(#[from] bb8::RunError<mysql_async::Error>),

    #[error("Unsupported database type: {0}")]
    UnsupportedDatabase(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Database handle unavailable: {0}")]
    HandleUnavailable(String),

    #[error("Value conversion error: {0}")]
    ConversionError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl TableSetError {
    /// True for failures raised while resolving or opening the database handle.
    #[must_use]
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            TableSetError::UnsupportedDatabase(_)
                | TableSetError::ConnectionError(_)
                | TableSetError::HandleUnavailable(_)
                | TableSetError::Unimplemented(_)
        )
    }
}
