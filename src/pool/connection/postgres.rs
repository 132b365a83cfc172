use bb8::Pool;

use super::MiddlewarePoolConnection;
use crate::error::TableSetError;
use crate::postgres::config::PgManager;

pub(super) async fn get_connection(
    pool: &Pool<PgManager>,
) -> Result<MiddlewarePoolConnection, TableSetError> {
    let client = pool
        .get_owned()
        .await
        .map_err(TableSetError::PoolErrorPostgres)?;
    Ok(MiddlewarePoolConnection::Postgres(client))
}
