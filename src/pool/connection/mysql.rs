use bb8::Pool;

use super::MiddlewarePoolConnection;
use crate::error::TableSetError;
use crate::mysql::config::MysqlManager;

pub(super) async fn get_connection(
    pool: &Pool<MysqlManager>,
) -> Result<MiddlewarePoolConnection, TableSetError> {
    let conn = pool
        .get_owned()
        .await
        .map_err(TableSetError::PoolErrorMysql)?;
    Ok(MiddlewarePoolConnection::Mysql(conn))
}
