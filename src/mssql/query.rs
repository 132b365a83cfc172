use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures_util::TryStreamExt;
use tiberius::{ColumnData, FromSql};

use super::config::MssqlClient;
use super::params::bind_query_params;
use crate::error::TableSetError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Convert one tiberius cell into a `RowValues`.
///
/// # Errors
/// Returns `TableSetError::MssqlError` if a date/time cell cannot be decoded.
pub fn mssql_extract_value(data: &ColumnData<'static>) -> Result<RowValues, TableSetError> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I16(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I32(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I64(v) => v.map(RowValues::Int),
        ColumnData::F32(v) => v.map(|v| RowValues::Float(f64::from(v))),
        ColumnData::F64(v) => v.map(RowValues::Float),
        ColumnData::Bit(v) => v.map(RowValues::Bool),
        ColumnData::Numeric(v) => v.map(|n| RowValues::Float(f64::from(n))),
        ColumnData::String(v) => v.as_ref().map(|s| RowValues::Text(s.to_string())),
        ColumnData::Guid(v) => v.map(|g| RowValues::Text(g.to_string())),
        ColumnData::Binary(v) => v.as_ref().map(|b| RowValues::Blob(b.to_vec())),
        ColumnData::Xml(v) => v
            .as_ref()
            .map(|x| RowValues::Text(x.clone().into_owned().into_string())),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)?.map(RowValues::Timestamp)
        }
        ColumnData::Date(_) => {
            NaiveDate::from_sql(data)?.map(|d| RowValues::Timestamp(d.and_time(NaiveTime::MIN)))
        }
        ColumnData::DateTimeOffset(_) => {
            DateTime::<Utc>::from_sql(data)?.map(|dt| RowValues::Timestamp(dt.naive_utc()))
        }
        ColumnData::Time(_) => NaiveTime::from_sql(data)?.map(|t| RowValues::Text(t.to_string())),
    };
    Ok(value.unwrap_or(RowValues::Null))
}

/// Run a query and collect its first result set.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement or row fetch fails.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableSetError> {
    let query_builder = bind_query_params(query, params);

    let mut stream = query_builder
        .query(client)
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("SQL Server query error: {e}")))?;

    let column_names: Vec<String> = stream
        .columns()
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("SQL Server column fetch error: {e}")))?
        .map(|columns| columns.iter().map(|col| col.name().to_string()).collect())
        .unwrap_or_default();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let mut rows = stream.into_row_stream();
    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("SQL Server row fetch error: {e}")))?
    {
        let mut row_values = Vec::with_capacity(col_count);
        for (_, data) in row.cells() {
            row_values.push(mssql_extract_value(data)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Execute one or more statements without parameters.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if any statement fails.
pub async fn execute_batch(client: &mut MssqlClient, query: &str) -> Result<(), TableSetError> {
    client
        .simple_query(query)
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("SQL Server batch error: {e}")))?
        .into_results()
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("SQL Server batch error: {e}")))?;
    Ok(())
}

/// Execute a SELECT on a pooled client.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_select(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableSetError> {
    build_result_set(client, query, params).await
}

/// Execute an INSERT/UPDATE/DELETE and return the affected-row count.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_dml(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<usize, TableSetError> {
    let exec_result = bind_query_params(query, params)
        .execute(client)
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("SQL Server execute error: {e}")))?;

    usize::try_from(exec_result.total()).map_err(|e| {
        TableSetError::ExecutionError(format!("SQL Server affected rows conversion error: {e}"))
    })
}
