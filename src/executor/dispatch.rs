use crate::dialect::KeyRetrieval;
use crate::error::TableSetError;
use crate::pool::MiddlewarePoolConnection;
use crate::results::ResultSet;
use crate::types::RowValues;

#[cfg(feature = "mssql")]
use crate::mssql;
#[cfg(feature = "mysql")]
use crate::mysql;
#[cfg(feature = "postgres")]
use crate::postgres;
#[cfg(feature = "sqlite")]
use crate::sqlite;

/// Outcome of an insert: affected rows plus the key the database generated, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedKey {
    pub rows_affected: usize,
    pub key: Option<i64>,
}

fn unimplemented_backend() -> TableSetError {
    TableSetError::Unimplemented(
        "This database type is not enabled in the current build".to_string(),
    )
}

impl MiddlewarePoolConnection {
    /// Executes statements without parameters by delegating to the specific database module.
    ///
    /// # Errors
    /// Returns an error if the selected backend cannot execute the batch or the database responds with an error.
    pub async fn execute_batch(&mut self, query: &str) -> Result<(), TableSetError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => mysql::execute_batch(conn, query).await,
            #[cfg(feature = "postgres")]
            MiddlewarePoolConnection::Postgres(client) => {
                postgres::execute_batch(client, query).await
            }
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => sqlite::execute_batch(conn, query).await,
            #[cfg(feature = "mssql")]
            MiddlewarePoolConnection::Mssql(client) => mssql::execute_batch(client, query).await,
            #[allow(unreachable_patterns)]
            _ => {
                let _ = query;
                Err(unimplemented_backend())
            }
        }
    }

    /// Run a statement that returns rows.
    ///
    /// # Errors
    /// Returns the backend's execution error.
    pub async fn select(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, TableSetError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => {
                mysql::execute_select(conn, query, params).await
            }
            #[cfg(feature = "postgres")]
            MiddlewarePoolConnection::Postgres(client) => {
                postgres::execute_select(client, query, params).await
            }
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_select(conn, query, params).await
            }
            #[cfg(feature = "mssql")]
            MiddlewarePoolConnection::Mssql(client) => {
                mssql::execute_select(client, query, params).await
            }
            #[allow(unreachable_patterns)]
            _ => {
                let _ = (query, params);
                Err(unimplemented_backend())
            }
        }
    }

    /// Run an INSERT/UPDATE/DELETE and return the affected-row count.
    ///
    /// # Errors
    /// Returns the backend's execution error.
    pub async fn dml(&mut self, query: &str, params: &[RowValues]) -> Result<usize, TableSetError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => mysql::execute_dml(conn, query, params).await,
            #[cfg(feature = "postgres")]
            MiddlewarePoolConnection::Postgres(client) => {
                postgres::execute_dml(client, query, params).await
            }
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_dml(conn, query, params).await
            }
            #[cfg(feature = "mssql")]
            MiddlewarePoolConnection::Mssql(client) => {
                mssql::execute_dml(client, query, params).await
            }
            #[allow(unreachable_patterns)]
            _ => {
                let _ = (query, params);
                Err(unimplemented_backend())
            }
        }
    }

    /// Run an INSERT rendered for `retrieval` and read back the generated key.
    ///
    /// For `Returning` and `OutputInserted` the statement itself yields the key
    /// as its first cell; for `LastInsertId` the connection reports it.
    ///
    /// # Errors
    /// Returns the backend's execution error, `TableSetError::Unimplemented` when
    /// the backend cannot report a last insert id, or
    /// `TableSetError::ConversionError` if the returned key is not an integer.
    pub async fn insert_returning(
        &mut self,
        query: &str,
        params: &[RowValues],
        retrieval: KeyRetrieval,
    ) -> Result<GeneratedKey, TableSetError> {
        let (rows_affected, key) = match retrieval {
            KeyRetrieval::Returning | KeyRetrieval::OutputInserted => {
                let result_set = self.select(query, params).await?;
                (result_set.rows_affected, result_set.first_value().cloned())
            }
            KeyRetrieval::LastInsertId => {
                let (rows, id) = self.insert_last_id(query, params).await?;
                (rows, id.map(RowValues::Int))
            }
        };
        tracing::trace!(?retrieval, rows_affected, ?key, "insert returned");

        let key = match key {
            None | Some(RowValues::Null) => None,
            Some(RowValues::Int(i)) => Some(i),
            #[allow(clippy::cast_possible_truncation)]
            Some(RowValues::Float(f)) if f.fract() == 0.0 => Some(f as i64),
            Some(RowValues::Text(s)) => Some(s.trim().parse().map_err(|_| {
                TableSetError::ConversionError(format!("generated key {s:?} is not an integer"))
            })?),
            Some(other) => {
                return Err(TableSetError::ConversionError(format!(
                    "generated key {other:?} is not an integer"
                )));
            }
        };
        Ok(GeneratedKey { rows_affected, key })
    }

    async fn insert_last_id(
        &mut self,
        query: &str,
        params: &[RowValues],
    ) -> Result<(usize, Option<i64>), TableSetError> {
        match self {
            #[cfg(feature = "mysql")]
            MiddlewarePoolConnection::Mysql(conn) => {
                mysql::execute_insert_last_id(conn, query, params).await
            }
            #[cfg(feature = "sqlite")]
            MiddlewarePoolConnection::Sqlite(conn) => {
                sqlite::execute_insert_last_id(conn, query, params).await
            }
            #[allow(unreachable_patterns)]
            _ => {
                let _ = (query, params);
                Err(TableSetError::Unimplemented(
                    "this backend does not report a last insert id".to_string(),
                ))
            }
        }
    }
}
