use bb8::Pool;

use super::MiddlewarePoolConnection;
use crate::error::TableSetError;
use crate::mssql::config::MssqlManager;

pub(super) async fn get_connection(
    pool: &Pool<MssqlManager>,
) -> Result<MiddlewarePoolConnection, TableSetError> {
    let conn = pool
        .get_owned()
        .await
        .map_err(TableSetError::PoolErrorMssql)?;
    Ok(MiddlewarePoolConnection::Mssql(conn))
}
