use std::sync::Arc;

use std::net::IpAddr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::decode::{PgNumeric, PgRaw};
use super::params::Params;
use crate::error::TableSetError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// # Errors
/// Returns `TableSetError` if the column cannot be retrieved.
pub fn postgres_extract_value(row: &Row, idx: usize) -> Result<RowValues, TableSetError> {
    let type_info = row.columns()[idx].type_();

    let value = match type_info.name() {
        "int2" => {
            let v: Option<i16> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))
        }
        "int4" => {
            let v: Option<i32> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))
        }
        "int8" => {
            let v: Option<i64> = row.try_get(idx)?;
            v.map_or(RowValues::Null, RowValues::Int)
        }
        "float4" => {
            let v: Option<f32> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Float(f64::from(v)))
        }
        "float8" => {
            let v: Option<f64> = row.try_get(idx)?;
            v.map_or(RowValues::Null, RowValues::Float)
        }
        "bool" => {
            let v: Option<bool> = row.try_get(idx)?;
            v.map_or(RowValues::Null, RowValues::Bool)
        }
        "timestamp" => {
            let v: Option<NaiveDateTime> = row.try_get(idx)?;
            v.map_or(RowValues::Null, RowValues::Timestamp)
        }
        "timestamptz" => {
            let v: Option<DateTime<Utc>> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Timestamp(v.naive_utc()))
        }
        "json" | "jsonb" => {
            let v: Option<Value> = row.try_get(idx)?;
            v.map_or(RowValues::Null, RowValues::JSON)
        }
        "bytea" => {
            let v: Option<Vec<u8>> = row.try_get(idx)?;
            v.map_or(RowValues::Null, RowValues::Blob)
        }
        "oid" => {
            let v: Option<u32> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v)))
        }
        "numeric" => {
            let v: Option<PgNumeric> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Text(v.0))
        }
        "date" => {
            let v: Option<NaiveDate> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Timestamp(NaiveDateTime::from(v)))
        }
        "time" => {
            let v: Option<NaiveTime> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| {
                RowValues::Text(v.format("%H:%M:%S%.f").to_string())
            })
        }
        "uuid" => {
            let v: Option<Uuid> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Text(v.to_string()))
        }
        "inet" => {
            let v: Option<IpAddr> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| RowValues::Text(v.to_string()))
        }
        // text-like types and enums as text, anything else as its wire bytes
        _ => {
            let v: Option<PgRaw> = row.try_get(idx)?;
            v.map_or(RowValues::Null, |v| v.into_value(type_info))
        }
    };
    Ok(value)
}

/// Build a result set from raw Postgres rows.
///
/// # Errors
/// Returns errors from row value extraction.
pub fn build_result_set(rows: &[Row]) -> Result<ResultSet, TableSetError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let cols: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        result_set.set_column_names(Arc::new(cols));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Execute one or more statements without parameters.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if any statement fails.
pub async fn execute_batch(client: &Client, query: &str) -> Result<(), TableSetError> {
    client
        .batch_execute(query)
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("postgres batch error: {e}")))
}

/// Execute a SELECT on a pooled client.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_select(
    client: &Client,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableSetError> {
    let converted = Params::convert(params);
    let rows = client
        .query(query, converted.as_refs())
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("postgres select error: {e}")))?;
    build_result_set(&rows)
}

/// Execute an INSERT/UPDATE/DELETE and return the affected-row count.
///
/// # Errors
/// Returns `TableSetError::ExecutionError` if the statement fails.
pub async fn execute_dml(
    client: &Client,
    query: &str,
    params: &[RowValues],
) -> Result<usize, TableSetError> {
    let converted = Params::convert(params);
    let rows = client
        .execute(query, converted.as_refs())
        .await
        .map_err(|e| TableSetError::ExecutionError(format!("postgres execute error: {e}")))?;
    usize::try_from(rows).map_err(|e| {
        TableSetError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
    })
}
