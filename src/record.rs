//! Mapping between result rows and record types.
//!
//! A record type implements [`Record`] once and can then be read and written
//! through a [`TableSet`](crate::table_set::TableSet):
//! ```rust
//! use sql_tableset::prelude::*;
//!
//! #[derive(Debug, Default, Clone)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Record for User {
//!     fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError> {
//!         Ok(User {
//!             id: row.get_as("id")?,
//!             name: row.get_as("name")?,
//!         })
//!     }
//!
//!     fn to_values(&self) -> Vec<(&'static str, RowValues)> {
//!         vec![("id", self.id.into()), ("name", self.name.clone().into())]
//!     }
//!
//!     fn set_generated_key(&mut self, key: i64) {
//!         self.id = key;
//!     }
//! }
//! ```

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::TableSetError;
use crate::results::CustomDbRow;
use crate::types::RowValues;

/// A type stored as one row of a table.
pub trait Record: Sized + Send {
    /// Build a record from a result row.
    ///
    /// # Errors
    /// Returns `TableSetError::ConversionError` when a cell has an incompatible type.
    fn from_row(row: &CustomDbRow) -> Result<Self, TableSetError>;

    /// Column/value pairs written by inserts and updates.
    fn to_values(&self) -> Vec<(&'static str, RowValues)>;

    /// Column identifying a row for [`TableSet::update`](crate::table_set::TableSet::update).
    fn primary_key() -> &'static str {
        "id"
    }

    /// Whether the database assigns the primary key on insert.
    fn auto_generated_key() -> bool {
        true
    }

    /// Receives the key the database generated for an insert.
    fn set_generated_key(&mut self, _key: i64) {}
}

/// Conversion from a result cell into a Rust value.
///
/// NULL converts to `Self::default()`.
pub trait FromRowValue: Sized + Default {
    /// # Errors
    /// Returns `TableSetError::ConversionError` if the cell cannot represent `Self`.
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError>;
}

fn mismatch(value: &RowValues, target: &str) -> TableSetError {
    TableSetError::ConversionError(format!("cannot read {value:?} as {target}"))
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(String::new()),
            RowValues::Text(s) => Ok(s.clone()),
            RowValues::Int(i) => Ok(i.to_string()),
            RowValues::Float(f) => Ok(f.to_string()),
            RowValues::Bool(b) => Ok(b.to_string()),
            RowValues::Timestamp(dt) => Ok(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            RowValues::JSON(json) => Ok(json.to_string()),
            RowValues::Blob(bytes) => {
                String::from_utf8(bytes.clone()).map_err(|_| mismatch(value, "String"))
            }
        }
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(0),
            RowValues::Int(i) => Ok(*i),
            RowValues::Bool(b) => Ok(i64::from(*b)),
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) if f.fract() == 0.0 => Ok(*f as i64),
            RowValues::Text(s) => s.trim().parse().map_err(|_| mismatch(value, "i64")),
            _ => Err(mismatch(value, "i64")),
        }
    }
}

impl FromRowValue for i32 {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        let wide = i64::from_row_value(value)?;
        i32::try_from(wide).map_err(|_| mismatch(value, "i32"))
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(false),
            RowValues::Bool(b) => Ok(*b),
            RowValues::Int(i) => Ok(*i != 0),
            RowValues::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" => Ok(true),
                "0" | "f" | "false" => Ok(false),
                _ => Err(mismatch(value, "bool")),
            },
            _ => Err(mismatch(value, "bool")),
        }
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(0.0),
            RowValues::Float(f) => Ok(*f),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(i) => Ok(*i as f64),
            RowValues::Text(s) => s.trim().parse().map_err(|_| mismatch(value, "f64")),
            _ => Err(mismatch(value, "f64")),
        }
    }
}

impl FromRowValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        f64::from_row_value(value).map(|f| f as f32)
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(NaiveDateTime::default()),
            other => other
                .as_timestamp()
                .ok_or_else(|| mismatch(value, "NaiveDateTime")),
        }
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(JsonValue::Null),
            RowValues::JSON(json) => Ok(json.clone()),
            RowValues::Text(s) => serde_json::from_str(s).map_err(|_| mismatch(value, "JSON")),
            _ => Err(mismatch(value, "JSON")),
        }
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        match value {
            RowValues::Null => Ok(Vec::new()),
            RowValues::Blob(bytes) => Ok(bytes.clone()),
            RowValues::Text(s) => Ok(s.as_bytes().to_vec()),
            _ => Err(mismatch(value, "bytes")),
        }
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: &RowValues) -> Result<Self, TableSetError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}
