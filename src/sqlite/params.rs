use rusqlite::types::Value;

use crate::types::RowValues;

/// Convert a single `RowValues` into a rusqlite `Value`.
///
/// `SQLite` has no boolean, timestamp or JSON storage class, so booleans are
/// stored as integers and the other two as text.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(json) => Value::Text(json.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Owned `SQLite` parameters, movable onto the blocking worker.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_sqlite_value).collect())
    }

    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}
