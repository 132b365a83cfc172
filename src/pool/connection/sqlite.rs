use bb8::Pool;

use super::MiddlewarePoolConnection;
use crate::error::TableSetError;
use crate::sqlite::config::SqliteManager;

pub(super) async fn get_connection(
    pool: &Pool<SqliteManager>,
) -> Result<MiddlewarePoolConnection, TableSetError> {
    let conn = pool
        .get_owned()
        .await
        .map_err(TableSetError::PoolErrorSqlite)?;
    Ok(MiddlewarePoolConnection::Sqlite(conn))
}
