use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, Statement, params_from_iter};

use super::config::{SharedSqliteConnection, run_blocking};
use super::params::Params;
use crate::error::TableSetError;
use crate::results::ResultSet;
use crate::types::RowValues;

fn execution_error(context: &str, err: &rusqlite::Error) -> TableSetError {
    TableSetError::ExecutionError(format!("sqlite {context} error: {err}"))
}

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `TableSetError::SqliteError` if the cell cannot be read.
pub fn sqlite_extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, TableSetError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared statement and collect every row it returns.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if execution fails and
/// `TableSetError::SqliteError` if a cell cannot be read.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, TableSetError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stmt
        .query(params_from_iter(params.iter()))
        .map_err(|e| execution_error("select", &e))?;
    while let Some(row) = rows.next().map_err(|e| execution_error("select", &e))? {
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(sqlite_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

fn select_sync(conn: &Connection, query: &str, params: &[Value]) -> Result<ResultSet, TableSetError> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| execution_error("select", &e))?;
    build_result_set(&mut stmt, params)
}

/// Execute one or more statements without parameters.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if any statement fails.
pub async fn execute_batch(conn: &SharedSqliteConnection, query: &str) -> Result<(), TableSetError> {
    let query = query.to_owned();
    run_blocking(Arc::clone(conn), move |conn| {
        conn.execute_batch(&query)
            .map_err(|e| execution_error("batch", &e))
    })
    .await
}

/// Execute a SELECT on a pooled connection.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_select(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableSetError> {
    let query = query.to_owned();
    let params = Params::convert(params);
    run_blocking(Arc::clone(conn), move |conn| {
        select_sync(conn, &query, params.as_values())
    })
    .await
}

/// Execute an INSERT/UPDATE/DELETE and return the affected-row count.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_dml(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<usize, TableSetError> {
    let query = query.to_owned();
    let params = Params::convert(params);
    run_blocking(Arc::clone(conn), move |conn| {
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| execution_error("execute", &e))?;
        stmt.execute(params_from_iter(params.as_values().iter()))
            .map_err(|e| execution_error("execute", &e))
    })
    .await
}

/// Execute an INSERT and read back the connection's last inserted rowid.
///
/// The rowid is read under the same lock as the insert, so no other statement
/// on this connection can interleave. `None` when nothing was inserted.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_insert_last_id(
    conn: &SharedSqliteConnection,
    query: &str,
    params: &[RowValues],
) -> Result<(usize, Option<i64>), TableSetError> {
    let query = query.to_owned();
    let params = Params::convert(params);
    run_blocking(Arc::clone(conn), move |conn| {
        let mut stmt = conn
            .prepare(&query)
            .map_err(|e| execution_error("insert", &e))?;
        let rows = stmt
            .execute(params_from_iter(params.as_values().iter()))
            .map_err(|e| execution_error("insert", &e))?;
        Ok((rows, (rows > 0).then(|| conn.last_insert_rowid())))
    })
    .await
}
