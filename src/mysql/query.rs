use std::sync::Arc;

use chrono::NaiveDate;
use mysql_async::consts::ColumnType;
use mysql_async::prelude::Queryable;
use mysql_async::{Column, Conn, Row, Value};

use super::params::Params;
use crate::error::TableSetError;
use crate::results::ResultSet;
use crate::types::RowValues;

// collation id MySQL reports for binary strings
const BINARY_CHARSET: u16 = 63;

/// Convert one `mysql_async` cell into a `RowValues`, using the column
/// metadata to tell JSON and binary strings apart from text.
#[must_use]
pub fn mysql_extract_value(column: &Column, value: &Value) -> RowValues {
    match value {
        Value::NULL => RowValues::Null,
        Value::Int(i) => RowValues::Int(*i),
        Value::UInt(u) => {
            i64::try_from(*u).map_or_else(|_| RowValues::Text(u.to_string()), RowValues::Int)
        }
        Value::Float(f) => RowValues::Float(f64::from(*f)),
        Value::Double(f) => RowValues::Float(*f),
        Value::Date(y, mo, d, h, mi, s, us) => NaiveDate::from_ymd_opt(
            i32::from(*y),
            u32::from(*mo),
            u32::from(*d),
        )
        .and_then(|date| {
            date.and_hms_micro_opt(u32::from(*h), u32::from(*mi), u32::from(*s), *us)
        })
        .map_or(RowValues::Null, RowValues::Timestamp),
        Value::Time(neg, days, h, mi, s, us) => {
            let hours = u32::from(*h) + days * 24;
            let sign = if *neg { "-" } else { "" };
            RowValues::Text(format!("{sign}{hours:02}:{mi:02}:{s:02}.{us:06}"))
        }
        Value::Bytes(bytes) => {
            if column.column_type() == ColumnType::MYSQL_TYPE_JSON {
                if let Ok(json) = serde_json::from_slice(bytes) {
                    return RowValues::JSON(json);
                }
            }
            if column.character_set() == BINARY_CHARSET {
                return RowValues::Blob(bytes.clone());
            }
            match String::from_utf8(bytes.clone()) {
                Ok(text) => RowValues::Text(text),
                Err(e) => RowValues::Blob(e.into_bytes()),
            }
        }
    }
}

/// Build a result set from fetched rows.
#[must_use]
pub fn build_result_set(rows: &[Row]) -> ResultSet {
    let mut result_set = ResultSet::with_capacity(rows.len());
    let columns = rows.first().map(Row::columns_ref).unwrap_or_default();
    let names: Vec<String> = columns.iter().map(|c| c.name_str().into_owned()).collect();
    result_set.set_column_names(Arc::new(names));

    for row in rows {
        let row_values = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                row.as_ref(idx)
                    .map_or(RowValues::Null, |value| mysql_extract_value(column, value))
            })
            .collect();
        result_set.add_row_values(row_values);
    }

    result_set
}

/// Execute one or more statements without parameters.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if any statement fails.
pub async fn execute_batch(conn: &mut Conn, query: &str) -> Result<(), TableSetError> {
    conn.query_drop(query)
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("mysql batch error: {e}")))
}

/// Execute a SELECT on a pooled connection.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_select(
    conn: &mut Conn,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableSetError> {
    let rows: Vec<Row> = conn
        .exec(query, Params::convert(params).into_params())
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("mysql select error: {e}")))?;
    Ok(build_result_set(&rows))
}

/// Execute an INSERT/UPDATE/DELETE and return the affected-row count.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_dml(
    conn: &mut Conn,
    query: &str,
    params: &[RowValues],
) -> Result<usize, TableSetError> {
    conn.exec_drop(query, Params::convert(params).into_params())
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("mysql execute error: {e}")))?;
    usize::try_from(conn.affected_rows()).map_err(|e| {
        TableSetError::ExecutionError(format!("mysql affected rows conversion error: {e}"))
    })
}

/// Execute an INSERT and read back the connection's last insert id.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_insert_last_id(
    conn: &mut Conn,
    query: &str,
    params: &[RowValues],
) -> Result<(usize, Option<i64>), TableSetError> {
    let rows = execute_dml(conn, query, params).await?;
    let key = conn.last_insert_id().and_then(|id| i64::try_from(id).ok());
    Ok((rows, key))
}
